use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use crate::config::DirectoryConfig;

/// On-disk locations the service writes to. Only the rolling log lives there.
#[derive(Debug, Clone)]
pub struct ResolvedPaths {
    pub logs_dir: PathBuf,
}

pub fn ensure_directories(cfg: &DirectoryConfig) -> Result<ResolvedPaths> {
    let requested = PathBuf::from(&cfg.logs_dir);
    fs::create_dir_all(&requested)
        .with_context(|| format!("failed to create log directory {}", requested.display()))?;
    let logs_dir = requested
        .canonicalize()
        .with_context(|| format!("failed to resolve log directory {}", requested.display()))?;

    check_writable(&logs_dir)?;
    Ok(ResolvedPaths { logs_dir })
}

// The appender opens its file lazily, so a read-only directory would only surface on the first event.
fn check_writable(dir: &Path) -> Result<()> {
    let marker = dir.join(format!(".email-triage-{}.check", std::process::id()));
    fs::write(&marker, b"ok")
        .with_context(|| format!("log directory {} is not writable", dir.display()))?;
    fs::remove_file(&marker)
        .with_context(|| format!("failed to clean up {}", marker.display()))?;
    Ok(())
}
