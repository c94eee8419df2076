use crate::shared::logging::append_server_log;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::time::{Duration, Instant};

#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error("artifact not found at {path}")]
    ArtifactNotFound { path: String },
    #[error("failed to resolve artifact path {path}: {source}")]
    ResolveArtifact {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to open run log {path}: {source}")]
    OpenLog {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("visualizer command is empty; set `visualizer.command` in the settings file")]
    EmptyVisualizerCommand,
    #[error("process {pid} is still alive after TERM and KILL")]
    StopFailedAlive { pid: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StopReport {
    pub pid: u32,
    /// True when the process survived the graceful signal and had to be
    /// killed.
    pub forced: bool,
    /// True when the exit status was collected here; false for pids this
    /// server did not spawn (their parent reaps them).
    pub reaped: bool,
}

const STOP_GRACE: Duration = Duration::from_secs(2);
const STOP_POLL: Duration = Duration::from_millis(100);

/// Spawns study artifacts and the visualizer. Artifact children are retained
/// so a later stop can reap them; beyond that nothing about a run is
/// supervised — crashes show up only in the run log or as a stalled progress
/// count.
#[derive(Debug)]
pub struct ProcessLauncher {
    state_root: PathBuf,
    children: Mutex<BTreeMap<u32, Child>>,
}

fn unpoisoned<T>(lock: &Mutex<T>) -> MutexGuard<'_, T> {
    lock.lock().unwrap_or_else(|err| err.into_inner())
}

impl ProcessLauncher {
    pub fn new(state_root: impl Into<PathBuf>) -> Self {
        Self {
            state_root: state_root.into(),
            children: Mutex::new(BTreeMap::new()),
        }
    }

    /// Combined stdout/stderr of the most recently launched artifact.
    pub fn run_log_path(&self) -> PathBuf {
        self.state_root.join("logs/study_run.log")
    }

    /// Detached launch: stdin closed, combined stdout/stderr into a truncated
    /// log file, working directory next to the artifact so the result table
    /// lands beside it. Returns the pid immediately, without waiting.
    pub fn launch_artifact(&self, artifact: &Path) -> Result<u32, LaunchError> {
        if !artifact.exists() {
            return Err(LaunchError::ArtifactNotFound {
                path: artifact.display().to_string(),
            });
        }
        let artifact = fs::canonicalize(artifact).map_err(|source| LaunchError::ResolveArtifact {
            path: artifact.display().to_string(),
            source,
        })?;

        let log_path = self.run_log_path();
        let log_err = |source: std::io::Error| LaunchError::OpenLog {
            path: log_path.display().to_string(),
            source,
        };
        if let Some(parent) = log_path.parent() {
            fs::create_dir_all(parent).map_err(log_err)?;
        }
        let log = fs::File::create(&log_path).map_err(log_err)?;
        let log_stderr = log.try_clone().map_err(log_err)?;

        let mut command = Command::new(&artifact);
        if let Some(dir) = artifact.parent() {
            command.current_dir(dir);
        }
        let child = command
            .stdin(Stdio::null())
            .stdout(Stdio::from(log))
            .stderr(Stdio::from(log_stderr))
            .spawn()
            .map_err(|source| LaunchError::Spawn {
                program: artifact.display().to_string(),
                source,
            })?;

        let pid = child.id();
        unpoisoned(&self.children).insert(pid, child);
        append_server_log(
            &self.state_root,
            "info",
            "run.spawned",
            &format!("pid={pid} artifact={}", artifact.display()),
        );
        Ok(pid)
    }

    /// Fire-and-forget visualizer spawn. The child is deliberately not
    /// tracked; the caller only learns whether the spawn itself worked.
    pub fn launch_visualizer(
        &self,
        command_line: &[String],
        result_table: &Path,
    ) -> Result<u32, LaunchError> {
        let (program, args) = resolve_visualizer_command(command_line, result_table)?;
        let child = Command::new(&program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| LaunchError::Spawn {
                program: program.clone(),
                source,
            })?;
        let pid = child.id();
        append_server_log(
            &self.state_root,
            "info",
            "visualizer.spawned",
            &format!("pid={pid} program={program}"),
        );
        Ok(pid)
    }

    /// Stops a run by pid. Children spawned by this server get a graceful
    /// TERM, an escalation to KILL after the grace period, and their exit
    /// status collected so no zombie is left. Unknown pids fall back to the
    /// same signal escalation, verified via signal 0.
    pub fn stop(&self, pid: u32) -> Result<StopReport, LaunchError> {
        let managed = unpoisoned(&self.children).remove(&pid);

        let report = match managed {
            Some(mut child) => {
                if child.try_wait().ok().flatten().is_some() {
                    StopReport {
                        pid,
                        forced: false,
                        reaped: true,
                    }
                } else {
                    signal(pid, "-TERM");
                    let start = Instant::now();
                    let mut forced = false;
                    loop {
                        match child.try_wait() {
                            Ok(Some(_)) => break,
                            Ok(None) if start.elapsed() < STOP_GRACE => thread::sleep(STOP_POLL),
                            _ => {
                                forced = true;
                                let _ = child.kill();
                                let _ = child.wait();
                                break;
                            }
                        }
                    }
                    StopReport {
                        pid,
                        forced,
                        reaped: true,
                    }
                }
            }
            None => {
                if !process_alive(pid) {
                    return Ok(StopReport {
                        pid,
                        forced: false,
                        reaped: false,
                    });
                }
                signal(pid, "-TERM");
                let mut forced = false;
                if !wait_for_death(pid, STOP_GRACE) {
                    forced = true;
                    signal(pid, "-KILL");
                    if !wait_for_death(pid, STOP_GRACE) {
                        append_server_log(
                            &self.state_root,
                            "error",
                            "run.stop.failed",
                            &format!("pid={pid} survived TERM and KILL"),
                        );
                        return Err(LaunchError::StopFailedAlive { pid });
                    }
                }
                StopReport {
                    pid,
                    forced,
                    reaped: false,
                }
            }
        };

        append_server_log(
            &self.state_root,
            "info",
            "run.stopped",
            &format!("pid={pid} forced={}", report.forced),
        );
        Ok(report)
    }
}

/// Substitutes `{table}` tokens in the configured visualizer command; when no
/// token is present the result-table path is appended as the final argument.
pub fn resolve_visualizer_command(
    command_line: &[String],
    result_table: &Path,
) -> Result<(String, Vec<String>), LaunchError> {
    let (program, args) = command_line
        .split_first()
        .ok_or(LaunchError::EmptyVisualizerCommand)?;
    let table = result_table.display().to_string();
    let mut resolved: Vec<String> = args.iter().map(|arg| arg.replace("{table}", &table)).collect();
    if !command_line.iter().any(|arg| arg.contains("{table}")) {
        resolved.push(table);
    }
    Ok((program.clone(), resolved))
}

fn wait_for_death(pid: u32, timeout: Duration) -> bool {
    let start = Instant::now();
    while process_alive(pid) {
        if start.elapsed() >= timeout {
            return false;
        }
        thread::sleep(STOP_POLL);
    }
    true
}

pub fn process_alive(pid: u32) -> bool {
    if pid == 0 {
        return false;
    }

    #[cfg(unix)]
    {
        Command::new("kill")
            .arg("-0")
            .arg(pid.to_string())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    #[cfg(not(unix))]
    {
        false
    }
}

fn signal(pid: u32, sig: &str) {
    #[cfg(unix)]
    {
        let _ = Command::new("kill")
            .arg(sig)
            .arg(pid.to_string())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
    }

    #[cfg(not(unix))]
    {
        let _ = (pid, sig);
    }
}
