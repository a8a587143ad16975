//! Inspector configuration stored under `.inspector/config.toml`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

/// Inspector configuration (TOML).
///
/// This file is intended to be edited by humans and must remain stable and
/// automatable. Missing fields default to sensible values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct InspectorConfig {
    /// Maximum number of inspections shown by `inspector list` and the
    /// dashboard listing.
    pub list_limit: usize,

    /// Currency symbol used when displaying prices and estimates.
    pub currency: String,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            list_limit: 50,
            currency: "$".to_string(),
        }
    }
}

impl InspectorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.list_limit == 0 {
            return Err(anyhow!("list_limit must be > 0"));
        }
        if self.currency.trim().is_empty() {
            return Err(anyhow!("currency must not be blank"));
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `InspectorConfig::default()`.
pub fn load_config(path: &Path) -> Result<InspectorConfig> {
    if !path.exists() {
        let cfg = InspectorConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: InspectorConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &InspectorConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("config path missing parent {}", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}
