//! Shared application state for the dashboard server.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::broadcast;

/// Events broadcast to SSE clients when inspection files change.
#[derive(Debug, Clone)]
pub enum ChangeEvent {
    /// A new inspection record appeared.
    InspectionAdded { id: String },
    /// An existing inspection record was rewritten.
    InspectionChanged { id: String },
    ConfigChanged,
}

/// Shared state accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Root directory of the inspection data (contains .inspector/).
    pub data_root: PathBuf,
    /// Broadcast sender for file change events.
    pub event_tx: Arc<broadcast::Sender<ChangeEvent>>,
}

impl AppState {
    pub fn new(data_root: PathBuf) -> Self {
        let (event_tx, _) = broadcast::channel(64);
        Self {
            data_root,
            event_tx: Arc::new(event_tx),
        }
    }

    /// Path to the .inspector/ directory.
    pub fn inspector_dir(&self) -> PathBuf {
        self.data_root.join(".inspector")
    }

    /// Path to the inspections directory.
    pub fn inspections_dir(&self) -> PathBuf {
        self.inspector_dir().join("inspections")
    }

    /// Path to config.toml.
    pub fn config_path(&self) -> PathBuf {
        self.inspector_dir().join("config.toml")
    }

    /// Path to the record schema copy.
    pub fn schema_path(&self) -> PathBuf {
        self.inspector_dir().join("schema.json")
    }
}
