/// Tool ids exposed at the protocol boundary, in the order an agent would
/// typically drive them: define, validate, build, run, observe.
pub const TOOL_IDS: [&str; 12] = [
    "study.create_or_load",
    "study.set_executable",
    "study.add_input",
    "study.import_inputs",
    "study.list_outputs",
    "study.set_outputs",
    "study.status",
    "study.build_artifact",
    "study.run_artifact",
    "study.stop_run",
    "study.progress",
    "study.launch_visualizer",
];

pub fn tool_ids() -> &'static [&'static str] {
    &TOOL_IDS
}
