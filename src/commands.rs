use crate::config::load_settings;
use crate::server::{catalog, reports, StudyService};
use crate::study::store::StudyStore;

/// Shared CLI engine; the binary and tests both drive this.
pub fn run_cli(args: Vec<String>) -> Result<String, String> {
    let mut args = args.into_iter();
    match args.next().as_deref() {
        None | Some("help") | Some("--help") => Ok(help_text()),
        Some("serve") => cmd_serve(),
        Some("status") => {
            let name = args
                .next()
                .ok_or_else(|| "usage: studyforge status <study-name>".to_string())?;
            cmd_status(&name)
        }
        Some("tools") => Ok(catalog::tool_ids().join("\n")),
        Some(other) => Err(format!(
            "unknown command `{other}`; run `studyforge help` for the command list"
        )),
    }
}

fn cmd_status(name: &str) -> Result<String, String> {
    let settings = load_settings().map_err(|err| err.to_string())?;
    let store = StudyStore::new(settings.studies_dir());
    Ok(reports::status(&store, name))
}

fn cmd_serve() -> Result<String, String> {
    let settings = load_settings().map_err(|err| err.to_string())?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| format!("failed to start async runtime: {err}"))?;
    let service = StudyService::new(settings);
    runtime
        .block_on(service.serve_stdio())
        .map_err(|err| format!("mcp server terminated: {err}"))?;
    Ok("studyforge server stopped".to_string())
}

fn help_text() -> String {
    let mut lines = vec![
        "studyforge - parametric study builder and runner".to_string(),
        String::new(),
        "Commands:".to_string(),
        "  serve                 serve the study tools over stdio (MCP)".to_string(),
        "  status <study-name>   print the readiness report for a study".to_string(),
        "  tools                 list the tool ids exposed by `serve`".to_string(),
        "  help                  show this help".to_string(),
        String::new(),
        "Tools:".to_string(),
    ];
    lines.extend(
        catalog::tool_ids()
            .iter()
            .map(|id| format!("  {id}")),
    );
    lines.join("\n")
}
