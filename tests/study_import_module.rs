use std::fs;
use studyforge::study::error::StudyError;
use studyforge::study::import::list_candidate_outputs;
use studyforge::study::record::StudyName;
use studyforge::study::store::StudyStore;
use tempfile::tempdir;

#[test]
fn import_aborts_on_first_bad_row_keeping_earlier_rows() {
    let dir = tempdir().expect("tempdir");
    let store = StudyStore::new(dir.path().join("studies"));
    let name = StudyName::parse("partial").expect("name");

    let csv_path = dir.path().join("inputs.csv");
    fs::write(
        &csv_path,
        "name,lower_bound,upper_bound\nalpha,0,1\nbeta,2,notanumber\ngamma,3,4\n",
    )
    .expect("write csv");

    let err = store
        .import_inputs(&name, &csv_path)
        .expect_err("bad row should abort");
    let message = err.to_string();
    assert!(message.contains("beta"));
    assert!(message.contains("1 row(s) imported"));

    let record = store.load(&name).expect("load");
    assert_eq!(record.inputs.len(), 1);
    assert_eq!(record.inputs[0].name, "alpha");
    assert_eq!(record.inputs[0].lower_bound, 0.0);
    assert_eq!(record.inputs[0].upper_bound, 1.0);
}

#[test]
fn import_requires_the_three_headers_in_any_order() {
    let dir = tempdir().expect("tempdir");
    let store = StudyStore::new(dir.path().join("studies"));
    let name = StudyName::parse("headers").expect("name");

    let ok_path = dir.path().join("reordered.csv");
    fs::write(&ok_path, "Upper_Bound, name ,lower_bound\n5,speed,0\n").expect("write csv");
    let report = store.import_inputs(&name, &ok_path).expect("import");
    assert_eq!(report.imported, 1);

    let bad_path = dir.path().join("short.csv");
    fs::write(&bad_path, "name,lower_bound\nspeed,0\n").expect("write csv");
    let err = store
        .import_inputs(&name, &bad_path)
        .expect_err("missing header should fail");
    assert!(matches!(err, StudyError::MissingHeaders { .. }));
}

#[test]
fn import_missing_source_is_not_found() {
    let dir = tempdir().expect("tempdir");
    let store = StudyStore::new(dir.path().join("studies"));
    let name = StudyName::parse("missing").expect("name");

    let err = store
        .import_inputs(&name, &dir.path().join("absent.csv"))
        .expect_err("absent source should fail");
    assert!(matches!(err, StudyError::NotFound { .. }));
}

#[test]
fn imported_rows_replace_existing_inputs_of_the_same_name() {
    let dir = tempdir().expect("tempdir");
    let store = StudyStore::new(dir.path().join("studies"));
    let name = StudyName::parse("replace").expect("name");

    let first = dir.path().join("first.csv");
    fs::write(&first, "name,lower_bound,upper_bound\nspeed,0,5\n").expect("write csv");
    store.import_inputs(&name, &first).expect("first import");

    let second = dir.path().join("second.csv");
    fs::write(&second, "name,lower_bound,upper_bound\nspeed,1,9\n").expect("write csv");
    store.import_inputs(&name, &second).expect("second import");

    let record = store.load(&name).expect("load");
    assert_eq!(record.inputs.len(), 1);
    assert_eq!(record.inputs[0].lower_bound, 1.0);
    assert_eq!(record.inputs[0].upper_bound, 9.0);
}

#[test]
fn output_lister_trims_and_drops_blank_lines_without_persisting() {
    let dir = tempdir().expect("tempdir");
    let source = dir.path().join("outputs.txt");
    fs::write(&source, "  cost \n\n tastiness\n   \ndrag\n").expect("write outputs");

    let outputs = list_candidate_outputs(&source).expect("list");
    assert_eq!(outputs, vec!["cost", "tastiness", "drag"]);

    let err = list_candidate_outputs(&dir.path().join("absent.txt"))
        .expect_err("absent file should fail");
    assert!(matches!(err, StudyError::NotFound { .. }));
}
