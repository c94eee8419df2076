use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub fn server_log_path(state_root: &Path) -> PathBuf {
    state_root.join("logs/server.log")
}

/// Best-effort structured log line. Logging failures are swallowed; the
/// server must never go down because its log file is unwritable.
pub fn append_server_log(state_root: &Path, level: &str, event: &str, message: &str) {
    let payload = serde_json::json!({
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "level": level,
        "event": event,
        "message": message,
    });

    let Ok(line) = serde_json::to_string(&payload) else {
        return;
    };

    let path = server_log_path(state_root);
    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(mut file) = fs::OpenOptions::new().create(true).append(true).open(path) else {
        return;
    };
    let _ = writeln!(file, "{line}");
}
