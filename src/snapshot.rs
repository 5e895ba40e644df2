//! Local copy of the last fetched configuration, for downstream steps to cache.

use crate::error::Result;
use crate::models::MsgConfig;
use std::fs;
use std::path::{Path, PathBuf};

pub const SNAPSHOT_DIR: &str = ".msgram";
pub const SNAPSHOT_FILE: &str = "msgram.json";

/// Overwrites `<root>/.msgram/msgram.json` with `config`. Last write wins.
pub fn save_msg_json(root: &Path, config: &MsgConfig) -> Result<PathBuf> {
    let dir = root.join(SNAPSHOT_DIR);
    fs::create_dir_all(&dir)?;

    let path = dir.join(SNAPSHOT_FILE);
    let contents = serde_json::to_string(config).map_err(std::io::Error::other)?;
    fs::write(&path, contents)?;

    tracing::debug!(path = %path.display(), "Wrote configuration snapshot");
    Ok(path)
}
