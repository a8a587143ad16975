//! Initialization helpers for `.inspector/` scaffolding.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};

use super::config::{InspectorConfig, write_config};

const RECORD_SCHEMA: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../schemas/inspection/v1.schema.json"
));

/// All canonical paths within `.inspector/` for a data root.
#[derive(Debug, Clone)]
pub struct InspectorPaths {
    pub root: PathBuf,
    pub inspector_dir: PathBuf,
    pub inspections_dir: PathBuf,
    pub config_path: PathBuf,
    pub schema_path: PathBuf,
    pub session_path: PathBuf,
}

impl InspectorPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let inspector_dir = root.join(".inspector");
        Self {
            root: root.clone(),
            inspector_dir: inspector_dir.clone(),
            inspections_dir: inspector_dir.join("inspections"),
            config_path: inspector_dir.join("config.toml"),
            schema_path: inspector_dir.join("schema.json"),
            session_path: inspector_dir.join("session"),
        }
    }

    /// True once `init_inspector` has run for this root.
    pub fn is_initialized(&self) -> bool {
        self.schema_path.is_file() && self.inspections_dir.is_dir()
    }
}

/// Options for `init_inspector`.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// If true, overwrite existing inspector-owned files.
    pub force: bool,
}

/// Create `.inspector/` scaffolding in `root`.
///
/// Fails if `.inspector/` already exists unless `options.force` is set.
/// Never touches saved inspections or the auth session.
pub fn init_inspector(root: &Path, options: &InitOptions) -> Result<InspectorPaths> {
    let paths = InspectorPaths::new(root);
    if paths.inspector_dir.exists() && !options.force {
        return Err(anyhow!(
            "inspector init: .inspector already exists (use --force to overwrite)"
        ));
    }
    if paths.inspector_dir.exists() && !paths.inspector_dir.is_dir() {
        return Err(anyhow!(
            "inspector init: .inspector exists but is not a directory"
        ));
    }

    create_dir(&paths.inspector_dir)?;
    create_dir(&paths.inspections_dir)?;

    fs::write(&paths.schema_path, RECORD_SCHEMA)
        .with_context(|| format!("write schema {}", paths.schema_path.display()))?;
    write_config(&paths.config_path, &InspectorConfig::default())?;

    Ok(paths)
}

fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).with_context(|| format!("create directory {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Verifies init_inspector creates the complete directory structure.
    #[test]
    fn init_creates_expected_layout() {
        let temp = tempfile::tempdir().expect("tempdir");
        let root = temp.path();

        let paths = init_inspector(root, &InitOptions { force: false }).expect("init");

        assert!(paths.inspector_dir.is_dir());
        assert!(paths.inspections_dir.is_dir());
        assert!(paths.schema_path.is_file());
        assert!(paths.config_path.is_file());
        assert!(paths.is_initialized());
        // sessions are created by `inspector login`, not init
        assert!(!paths.session_path.exists());

        let schema = fs::read_to_string(&paths.schema_path).expect("read schema");
        assert_eq!(schema, RECORD_SCHEMA);
    }

    /// Verifies init_inspector refuses to overwrite without --force.
    #[test]
    fn init_without_force_refuses_existing_dir() {
        let temp = tempfile::tempdir().expect("tempdir");
        let root = temp.path();

        init_inspector(root, &InitOptions { force: false }).expect("init");
        let err = init_inspector(root, &InitOptions { force: false }).unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    /// Verifies --force re-init restores defaults but keeps inspections.
    #[test]
    fn init_with_force_keeps_saved_inspections() {
        let temp = tempfile::tempdir().expect("tempdir");
        let root = temp.path();
        let paths = init_inspector(root, &InitOptions { force: false }).expect("init");

        let record_path = paths.inspections_dir.join("ins-1.json");
        fs::write(&record_path, "{}\n").expect("write record");
        fs::write(&paths.config_path, "list_limit = 5\n").expect("write config");

        init_inspector(root, &InitOptions { force: true }).expect("re-init");

        assert!(record_path.exists());
        let config = fs::read_to_string(&paths.config_path).expect("read config");
        assert!(config.contains("list_limit = 50"));
    }
}
