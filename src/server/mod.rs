pub mod catalog;
pub mod reports;
mod types;

use crate::config::Settings;
use crate::generator::ArtifactGenerator;
use crate::process::launcher::ProcessLauncher;
use crate::shared::logging::append_server_log;
use crate::study::record::InputSpec;
use crate::study::store::StudyStore;
use std::path::Path;
use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::{tool, tool_handler, tool_router, ErrorData, ServerHandler, ServiceExt};

use types::*;

/// MCP tool surface over the study core. Every tool resolves to a
/// human-readable report, failures included; protocol-level errors are left
/// to the transport.
#[derive(Clone)]
pub struct StudyService {
    settings: Arc<Settings>,
    store: Arc<StudyStore>,
    generator: Arc<ArtifactGenerator>,
    launcher: Arc<ProcessLauncher>,
    tool_router: ToolRouter<Self>,
}

fn text(report: String) -> CallToolResult {
    CallToolResult::success(vec![Content::text(report)])
}

#[tool_router]
impl StudyService {
    pub fn new(settings: Settings) -> Self {
        let settings = Arc::new(settings);
        Self {
            store: Arc::new(StudyStore::new(settings.studies_dir())),
            generator: Arc::new(ArtifactGenerator::new(settings.run.clone())),
            launcher: Arc::new(ProcessLauncher::new(settings.state_root.clone())),
            settings,
            tool_router: Self::tool_router(),
        }
    }

    /// Serves the tool surface over stdio until the client disconnects.
    /// Stdout carries the protocol stream; diagnostics go to the server log.
    pub async fn serve_stdio(self) -> Result<(), rmcp::RmcpError> {
        append_server_log(
            &self.settings.state_root,
            "info",
            "server.started",
            "serving study tools over stdio",
        );
        let service = self.serve((tokio::io::stdin(), tokio::io::stdout())).await?;
        service.waiting().await?;
        Ok(())
    }

    /// Initializes a new study or loads an existing one; always safe to call
    /// first, an existing record is never reset.
    #[tool(name = "study.create_or_load")]
    async fn create_or_load(
        &self,
        params: Parameters<StudyNameParams>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(text(reports::create_or_load(
            &self.store,
            &params.0.study_name,
        )))
    }

    /// Sets the study's executable path. The path is stored as given; it is
    /// not checked for existence.
    #[tool(name = "study.set_executable")]
    async fn set_executable(
        &self,
        params: Parameters<SetExecutableParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let SetExecutableParams { study_name, path } = params.0;
        Ok(text(reports::set_executable(&self.store, &study_name, &path)))
    }

    /// Adds one bounded input to the study; an input of the same name has its
    /// bounds replaced in place.
    #[tool(name = "study.add_input")]
    async fn add_input(
        &self,
        params: Parameters<AddInputParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let AddInputParams {
            study_name,
            name,
            lower_bound,
            upper_bound,
        } = params.0;
        let input = InputSpec {
            name,
            lower_bound,
            upper_bound,
        };
        Ok(text(reports::add_input(&self.store, &study_name, input)))
    }

    /// Imports inputs from a delimited file with headers `name`,
    /// `lower_bound`, `upper_bound`. Rows before the first malformed row are
    /// kept.
    #[tool(name = "study.import_inputs")]
    async fn import_inputs(
        &self,
        params: Parameters<ImportInputsParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let ImportInputsParams {
            study_name,
            csv_path,
        } = params.0;
        Ok(text(reports::import_inputs(
            &self.store,
            &study_name,
            Path::new(&csv_path),
        )))
    }

    /// Lists candidate output names from a line-oriented file so the caller
    /// can pick a subset; nothing is persisted by this call.
    #[tool(name = "study.list_outputs")]
    async fn list_outputs(
        &self,
        params: Parameters<ListOutputsParams>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(text(reports::list_outputs(Path::new(&params.0.path))))
    }

    /// Adds the selected output names to the study, deduplicating while
    /// preserving first-seen order.
    #[tool(name = "study.set_outputs")]
    async fn set_outputs(
        &self,
        params: Parameters<SetOutputsParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let SetOutputsParams {
            study_name,
            selected_outputs,
        } = params.0;
        Ok(text(reports::set_outputs(
            &self.store,
            &study_name,
            &selected_outputs,
        )))
    }

    /// Reports the three readiness checks and the VALID/INCOMPLETE verdict.
    #[tool(name = "study.status")]
    async fn status(
        &self,
        params: Parameters<StudyNameParams>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(text(reports::status(&self.store, &params.0.study_name)))
    }

    /// Compiles the study into a standalone runnable artifact at the given
    /// path, overwriting silently.
    #[tool(name = "study.build_artifact")]
    async fn build_artifact(
        &self,
        params: Parameters<BuildArtifactParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let BuildArtifactParams {
            study_name,
            artifact_path,
        } = params.0;
        Ok(text(reports::build_artifact(
            &self.store,
            &self.generator,
            &study_name,
            Path::new(&artifact_path),
        )))
    }

    /// Launches a built artifact as a detached background process and returns
    /// its pid; the run is not supervised afterwards.
    #[tool(name = "study.run_artifact")]
    async fn run_artifact(
        &self,
        params: Parameters<RunArtifactParams>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(text(reports::run_artifact(
            &self.launcher,
            Path::new(&params.0.artifact_path),
        )))
    }

    /// Stops a running artifact by pid: TERM first, KILL after a grace
    /// period, and the child is reaped when it was spawned by this server.
    #[tool(name = "study.stop_run")]
    async fn stop_run(
        &self,
        params: Parameters<StopRunParams>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(text(reports::stop_run(&self.launcher, params.0.pid)))
    }

    /// Reports how many sample rows the running artifact has written so far.
    #[tool(name = "study.progress")]
    async fn progress(
        &self,
        params: Parameters<ProgressParams>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(text(reports::progress(Path::new(
            &params.0.result_table_path,
        ))))
    }

    /// Spawns the configured visualizer pointed at the result table,
    /// fire-and-forget.
    #[tool(name = "study.launch_visualizer")]
    async fn launch_visualizer(&self) -> Result<CallToolResult, ErrorData> {
        Ok(text(reports::launch_visualizer(
            &self.launcher,
            &self.settings,
        )))
    }
}

#[tool_handler]
impl ServerHandler for StudyService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "StudyForge assembles parametric study definitions and runs them. \
                 Call study.create_or_load first, define inputs and outputs, check \
                 study.status until it reports VALID, then study.build_artifact, \
                 study.run_artifact and study.progress."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            ..Default::default()
        }
    }
}
