use std::fs;
use std::io::Write;
use std::path::Path;

/// Writes `content` through a sibling temp file and a rename, so a reader
/// polling the same path never observes a half-written record.
pub fn write_atomic(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| std::io::Error::other("path has no parent"))?;
    fs::create_dir_all(parent)?;
    let stem = path
        .file_name()
        .and_then(|v| v.to_str())
        .unwrap_or("record");
    let tmp_path = parent.join(format!(".{stem}.tmp-{}", std::process::id()));

    {
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(content)?;
        file.sync_all()?;
    }

    fs::rename(&tmp_path, path)
}
