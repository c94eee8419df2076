use rmcp::schemars;
use serde::Deserialize;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct StudyNameParams {
    #[schemars(description = "Name of the study; also its persistence key after sanitization")]
    pub study_name: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetExecutableParams {
    #[schemars(description = "Name of the study")]
    pub study_name: String,
    #[schemars(description = "Path of the target executable; not checked for existence")]
    pub path: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddInputParams {
    #[schemars(description = "Name of the study")]
    pub study_name: String,
    #[schemars(description = "Input parameter name")]
    pub name: String,
    #[schemars(description = "Lower sampling bound")]
    pub lower_bound: f64,
    #[schemars(description = "Upper sampling bound")]
    pub upper_bound: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ImportInputsParams {
    #[schemars(description = "Name of the study")]
    pub study_name: String,
    #[schemars(
        description = "Delimited file with headers `name`, `lower_bound`, `upper_bound`"
    )]
    pub csv_path: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListOutputsParams {
    #[schemars(description = "Line-oriented file of candidate output names")]
    pub path: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetOutputsParams {
    #[schemars(description = "Name of the study")]
    pub study_name: String,
    #[schemars(description = "Output names to add to the study's output set")]
    pub selected_outputs: Vec<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct BuildArtifactParams {
    #[schemars(description = "Name of the study")]
    pub study_name: String,
    #[schemars(description = "Where to write the runnable artifact; overwritten if present")]
    pub artifact_path: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RunArtifactParams {
    #[schemars(description = "Path of a previously built artifact")]
    pub artifact_path: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct StopRunParams {
    #[schemars(description = "Process id returned by study.run_artifact")]
    pub pid: u32,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ProgressParams {
    #[schemars(description = "Path of the result table written by a running artifact")]
    pub result_table_path: String,
}
