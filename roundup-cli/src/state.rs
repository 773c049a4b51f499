use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// `$ROUNDUP_HOME`, else `~/.roundup`
pub fn roundup_home() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os("ROUNDUP_HOME") {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".roundup"))
}

pub fn ensure_roundup_home() -> Result<PathBuf> {
    let dir = roundup_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}
