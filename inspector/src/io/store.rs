//! Inspection store: capability trait and the JSON-file implementation
//! with schema + invariant validation.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use chrono::Utc;
use jsonschema::validator_for;
use rand::{Rng, distributions::Alphanumeric};
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::core::invariants::validate_record;
use crate::record::{NewInspection, StoredInspection};

/// Abstraction over inspection persistence backends.
pub trait InspectionStore {
    /// Persist a completed inspection, returning its new id.
    fn create_inspection(&self, record: &NewInspection) -> Result<String>;

    /// List a user's inspections, newest first, up to `limit`.
    fn list_inspections(&self, user_id: &str, limit: usize) -> Result<Vec<StoredInspection>>;

    /// Fetch one inspection by id, or `None` if it does not exist.
    fn get_inspection(&self, id: &str) -> Result<Option<StoredInspection>>;
}

/// Store that keeps one pretty-printed JSON file per inspection.
///
/// Records are validated against the v1 JSON Schema plus semantic
/// invariants on load, and against the invariants before every write.
pub struct JsonFileStore {
    inspections_dir: PathBuf,
    schema_path: PathBuf,
}

impl JsonFileStore {
    pub fn new(inspections_dir: PathBuf, schema_path: PathBuf) -> Self {
        Self {
            inspections_dir,
            schema_path,
        }
    }

    /// Load and validate every record in the store, unordered.
    pub fn load_all(&self) -> Result<Vec<StoredInspection>> {
        if !self.inspections_dir.exists() {
            return Ok(Vec::new());
        }
        let entries = fs::read_dir(&self.inspections_dir)
            .with_context(|| format!("read {}", self.inspections_dir.display()))?;
        let mut records = Vec::new();
        for entry in entries {
            let path = entry
                .with_context(|| format!("read entry in {}", self.inspections_dir.display()))?
                .path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            records.push(self.load_record(&path)?);
        }
        Ok(records)
    }

    fn load_record(&self, path: &Path) -> Result<StoredInspection> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("read inspection {}", path.display()))?;
        let value: Value = serde_json::from_str(&contents)
            .with_context(|| format!("parse inspection {}", path.display()))?;
        self.validate_schema(&value)
            .with_context(|| format!("validate inspection {}", path.display()))?;
        let record: StoredInspection = serde_json::from_value(value)
            .with_context(|| format!("deserialize inspection {}", path.display()))?;
        validate_record_invariants(&record)
            .with_context(|| format!("validate inspection {}", path.display()))?;
        Ok(record)
    }

    fn validate_schema(&self, record: &Value) -> Result<()> {
        let schema_contents = fs::read_to_string(&self.schema_path)
            .with_context(|| format!("read schema {}", self.schema_path.display()))?;
        let schema_value: Value = serde_json::from_str(&schema_contents)
            .with_context(|| format!("parse schema {}", self.schema_path.display()))?;
        let compiled =
            validator_for(&schema_value).map_err(|err| anyhow!("invalid schema: {}", err))?;
        if !compiled.is_valid(record) {
            let messages = compiled
                .iter_errors(record)
                .map(|err| err.to_string())
                .collect::<Vec<_>>();
            return Err(anyhow!(
                "record schema validation failed: {}",
                messages.join("; ")
            ));
        }
        Ok(())
    }

    fn record_path(&self, id: &str) -> Result<PathBuf> {
        validate_record_id(id)?;
        Ok(self.inspections_dir.join(format!("{id}.json")))
    }
}

impl InspectionStore for JsonFileStore {
    #[instrument(skip_all, fields(user_id = %record.user_id))]
    fn create_inspection(&self, record: &NewInspection) -> Result<String> {
        let stored = StoredInspection {
            id: generate_inspection_id(),
            created_at: Utc::now(),
            inspection: record.clone(),
        };
        validate_record_invariants(&stored)?;

        let path = self.record_path(&stored.id)?;
        let mut buf = serde_json::to_string_pretty(&stored)?;
        buf.push('\n');
        write_atomic(&path, &buf)?;
        info!(id = %stored.id, "inspection saved");
        Ok(stored.id)
    }

    fn list_inspections(&self, user_id: &str, limit: usize) -> Result<Vec<StoredInspection>> {
        let mut records = self.load_all()?;
        records.retain(|record| record.inspection.user_id == user_id);
        records.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        records.truncate(limit);
        debug!(user_id = %user_id, count = records.len(), "listed inspections");
        Ok(records)
    }

    fn get_inspection(&self, id: &str) -> Result<Option<StoredInspection>> {
        let path = self.record_path(id)?;
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(self.load_record(&path)?))
    }
}

fn validate_record_invariants(record: &StoredInspection) -> Result<()> {
    let errors = validate_record(record);
    if errors.is_empty() {
        return Ok(());
    }
    Err(anyhow!("record invariants failed: {}", errors.join("; ")))
}

/// Validate that an id is safe for use as a file stem.
pub fn validate_record_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(anyhow!("inspection id must not be empty"));
    }
    if id
        .chars()
        .any(|c| !(c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-'))
    {
        return Err(anyhow!(
            "inspection id must be [A-Za-z0-9._-] only (got '{id}')"
        ));
    }
    Ok(())
}

/// Generate a unique inspection id: UTC timestamp plus a random suffix.
fn generate_inspection_id() -> String {
    let timestamp = Utc::now().format("%Y%m%d%H%M%S");
    let mut rng = rand::thread_rng();
    let suffix = std::iter::repeat_with(|| rng.sample(Alphanumeric))
        .map(char::from)
        .take(6)
        .collect::<String>()
        .to_lowercase();
    format!("ins-{timestamp}-{suffix}")
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("record path missing parent {}", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp record {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace record {}", path.display()))?;
    Ok(())
}
