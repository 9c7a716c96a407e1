use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Home directory for all weekwise state. `WEEKWISE_HOME` overrides the
/// default `~/.weekwise` (used by tests to stay out of the real home).
pub fn weekwise_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("WEEKWISE_HOME") {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".weekwise"))
}

pub fn ensure_weekwise_home() -> Result<PathBuf> {
    let dir = weekwise_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn exports_dir() -> Result<PathBuf> {
    let dir = ensure_weekwise_home()?.join("exports");
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

/// Read a JSON file into `T`, returning `T::default()` when the file does
/// not exist yet.
pub fn read_json_or_default<T>(path: &Path) -> Result<T>
where
    T: serde::de::DeserializeOwned + Default,
{
    if !path.exists() {
        return Ok(T::default());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

pub fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("serialize")?;
    fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}
