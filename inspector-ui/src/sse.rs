//! Server-Sent Events stream and file watcher.

use std::collections::HashSet;
use std::convert::Infallible;
use std::path::Path;
use std::time::Duration;

use axum::extract::State;
use axum::response::sse::{Event, Sse};
use futures::stream::Stream;
use notify::{Event as NotifyEvent, EventKind, PollWatcher, RecursiveMode, Watcher};
use serde::Serialize;
use tokio::sync::broadcast;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::state::{AppState, ChangeEvent};

#[derive(Serialize)]
struct SsePayload {
    #[serde(rename = "type")]
    event_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
}

impl From<&ChangeEvent> for SsePayload {
    fn from(event: &ChangeEvent) -> Self {
        match event {
            ChangeEvent::InspectionAdded { id } => SsePayload {
                event_type: "inspection_added".to_string(),
                id: Some(id.clone()),
            },
            ChangeEvent::InspectionChanged { id } => SsePayload {
                event_type: "inspection_changed".to_string(),
                id: Some(id.clone()),
            },
            ChangeEvent::ConfigChanged => SsePayload {
                event_type: "config_changed".to_string(),
                id: None,
            },
        }
    }
}

/// SSE endpoint handler.
pub async fn events_handler(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let mut rx = state.event_tx.subscribe();

    let stream = async_stream::stream! {
        // Send initial connected event
        yield Ok(Event::default().event("connected").data("{}"));

        loop {
            match rx.recv().await {
                Ok(change_event) => {
                    let payload = SsePayload::from(&change_event);
                    if let Ok(json) = serde_json::to_string(&payload) {
                        yield Ok(Event::default().event("change").data(json));
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!(skipped = n, "SSE client lagged, some events dropped");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    break;
                }
            }
        }
    };

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}

/// Start the file watcher in a background task.
pub fn start_file_watcher(state: AppState) {
    tokio::spawn(async move {
        if let Err(e) = run_file_watcher(state).await {
            warn!(error = %e, "file watcher failed");
        }
    });
}

async fn run_file_watcher(state: AppState) -> anyhow::Result<()> {
    let (tx, mut rx) = mpsc::channel::<NotifyEvent>(100);

    let tx_clone = tx.clone();
    let mut watcher = PollWatcher::new(
        move |res: Result<NotifyEvent, notify::Error>| {
            if let Ok(event) = res {
                let _ = tx_clone.try_send(event);
            }
        },
        notify::Config::default().with_poll_interval(Duration::from_millis(100)),
    )?;

    let inspector_dir = state.inspector_dir();
    if inspector_dir.exists() {
        watcher.watch(&inspector_dir, RecursiveMode::Recursive)?;
        info!(path = %inspector_dir.display(), "watching inspector directory");
    } else {
        warn!(path = %inspector_dir.display(), "inspector directory missing, watcher idle");
    }

    // Track known records to distinguish new inspections from rewrites
    let mut known_records = collect_known_records(&state.inspections_dir());

    // Process in batches at a fixed interval so a record being written does
    // not starve other updates.
    let mut pending_events: Vec<NotifyEvent> = Vec::new();
    let mut flush_tick = tokio::time::interval(Duration::from_millis(100));
    flush_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            Some(event) = rx.recv() => {
                pending_events.push(event);
            }
            _ = flush_tick.tick() => {
                if pending_events.is_empty() {
                    continue;
                }
                process_events(&state, &pending_events, &mut known_records);
                pending_events.clear();
            }
        }
    }
}

fn process_events(
    state: &AppState,
    events: &[NotifyEvent],
    known_records: &mut HashSet<String>,
) {
    let mut config_changed = false;
    let mut added: Vec<String> = Vec::new();
    let mut changed: HashSet<String> = HashSet::new();

    let config_path = state.config_path();
    let inspections_dir = state.inspections_dir();

    for event in events {
        // Only care about create/modify events
        if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
            continue;
        }

        for path in &event.paths {
            if path == &config_path {
                config_changed = true;
            } else if path.starts_with(&inspections_dir) {
                let Some(id) = parse_record_path(&inspections_dir, path) else {
                    continue;
                };
                if known_records.insert(id.clone()) {
                    added.push(id);
                } else {
                    changed.insert(id);
                }
            }
        }
    }

    if config_changed {
        debug!("broadcasting config change");
        let _ = state.event_tx.send(ChangeEvent::ConfigChanged);
    }

    added.sort();
    for id in added {
        debug!(id = %id, "broadcasting new inspection");
        let _ = state.event_tx.send(ChangeEvent::InspectionAdded { id });
    }

    let mut rewrites: Vec<String> = changed.into_iter().collect();
    rewrites.sort();
    for id in rewrites {
        debug!(id = %id, "broadcasting inspection change");
        let _ = state.event_tx.send(ChangeEvent::InspectionChanged { id });
    }
}

fn collect_known_records(inspections_dir: &Path) -> HashSet<String> {
    let mut known = HashSet::new();

    if !inspections_dir.exists() {
        return known;
    }

    if let Ok(entries) = std::fs::read_dir(inspections_dir) {
        for entry in entries.flatten() {
            if let Some(id) = parse_record_path(inspections_dir, &entry.path()) {
                known.insert(id);
            }
        }
    }

    known
}

/// Extract an inspection id from a record path, ignoring temp files and
/// anything that is not a direct `<id>.json` child.
fn parse_record_path(inspections_dir: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(inspections_dir).ok()?;
    let mut components = rel.components();
    let name = components.next()?.as_os_str().to_str()?;
    if components.next().is_some() {
        return None;
    }
    let id = name.strip_suffix(".json")?;
    if id.is_empty() {
        return None;
    }
    Some(id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn modify_event(path: std::path::PathBuf) -> NotifyEvent {
        NotifyEvent {
            kind: EventKind::Modify(notify::event::ModifyKind::Any),
            paths: vec![path],
            attrs: Default::default(),
        }
    }

    fn test_state() -> AppState {
        let data_root = std::env::temp_dir()
            .join("inspector-ui-tests")
            .join(format!("pid-{}", std::process::id()));
        AppState::new(data_root)
    }

    #[test]
    fn new_record_emits_inspection_added() {
        let state = test_state();
        let mut rx = state.event_tx.subscribe();
        let mut known = HashSet::new();

        let path = state.inspections_dir().join("ins-1.json");
        process_events(&state, &[modify_event(path)], &mut known);

        let mut events = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            events.push(ev);
        }

        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], ChangeEvent::InspectionAdded { id } if id == "ins-1"));
    }

    #[test]
    fn known_record_emits_inspection_changed() {
        let state = test_state();
        let mut rx = state.event_tx.subscribe();
        let mut known = HashSet::new();
        known.insert("ins-1".to_string());

        let path = state.inspections_dir().join("ins-1.json");
        process_events(&state, &[modify_event(path)], &mut known);

        let mut events = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            events.push(ev);
        }

        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], ChangeEvent::InspectionChanged { id } if id == "ins-1"));
    }

    /// Temp files from atomic writes must not produce events.
    #[test]
    fn temp_files_are_ignored() {
        let state = test_state();
        let mut rx = state.event_tx.subscribe();
        let mut known = HashSet::new();

        let path = state.inspections_dir().join("ins-1.json.tmp");
        process_events(&state, &[modify_event(path)], &mut known);

        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn config_write_emits_config_changed() {
        let state = test_state();
        let mut rx = state.event_tx.subscribe();
        let mut known = HashSet::new();

        process_events(&state, &[modify_event(state.config_path())], &mut known);

        let mut events = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            events.push(ev);
        }
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], ChangeEvent::ConfigChanged));
    }
}
