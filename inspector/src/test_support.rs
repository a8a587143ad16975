//! Test-only helpers: deterministic fixtures and in-memory fakes for the
//! store and auth collaborators.

use std::cell::{Cell, RefCell};

use anyhow::{Result, anyhow};
use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::core::types::Component;
use crate::draft::{ComponentScores, DraftInspection};
use crate::io::auth::AuthProvider;
use crate::io::store::InspectionStore;
use crate::record::{NewInspection, StoredInspection};

/// Create a default draft with the given name.
pub fn draft_named(name: &str) -> DraftInspection {
    DraftInspection {
        name: name.to_string(),
        ..DraftInspection::default()
    }
}

/// Build component scores from an array in assessment order.
pub fn scores_from(values: [u8; 8]) -> ComponentScores {
    let mut scores = ComponentScores::default();
    for (component, value) in Component::ALL.into_iter().zip(values) {
        scores.set(component, value);
    }
    scores
}

/// Fixed timestamp so fixture records serialize deterministically.
fn fixture_created_at(offset_secs: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap() + Duration::seconds(offset_secs)
}

/// Build a stored record whose derived values are consistent with its
/// component scores and asking price.
pub fn stored_record(
    id: &str,
    user_id: &str,
    name: &str,
    values: [u8; 8],
    asking_price: Option<f64>,
) -> StoredInspection {
    let mut draft = draft_named(name);
    draft.scores = scores_from(values);
    draft.asking_price = asking_price;
    StoredInspection {
        id: id.to_string(),
        created_at: fixture_created_at(0),
        inspection: NewInspection::from_draft(user_id, &draft),
    }
}

/// Auth fake with a fixed answer.
pub struct FakeAuth(Option<String>);

impl FakeAuth {
    pub fn signed_in(user_id: &str) -> Self {
        Self(Some(user_id.to_string()))
    }

    pub fn signed_out() -> Self {
        Self(None)
    }
}

impl AuthProvider for FakeAuth {
    fn current_user_id(&self) -> Option<String> {
        self.0.clone()
    }
}

/// In-memory store that records every create attempt and can be told to
/// fail the next one.
#[derive(Default)]
pub struct RecordingStore {
    attempts: RefCell<Vec<NewInspection>>,
    saved: RefCell<Vec<StoredInspection>>,
    fail_next: RefCell<Option<String>>,
    next_id: Cell<u32>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `create_inspection` call fail with this message.
    pub fn fail_next(&self, message: &str) {
        *self.fail_next.borrow_mut() = Some(message.to_string());
    }

    /// Every record passed to `create_inspection`, failed attempts included.
    pub fn attempted(&self) -> Vec<NewInspection> {
        self.attempts.borrow().clone()
    }

    /// Successfully created records, in creation order.
    pub fn created(&self) -> Vec<NewInspection> {
        self.saved
            .borrow()
            .iter()
            .map(|record| record.inspection.clone())
            .collect()
    }
}

impl InspectionStore for RecordingStore {
    fn create_inspection(&self, record: &NewInspection) -> Result<String> {
        self.attempts.borrow_mut().push(record.clone());
        if let Some(message) = self.fail_next.borrow_mut().take() {
            return Err(anyhow!(message));
        }
        let n = self.next_id.get() + 1;
        self.next_id.set(n);
        let stored = StoredInspection {
            id: format!("ins-test-{n}"),
            created_at: fixture_created_at(i64::from(n)),
            inspection: record.clone(),
        };
        let id = stored.id.clone();
        self.saved.borrow_mut().push(stored);
        Ok(id)
    }

    fn list_inspections(&self, user_id: &str, limit: usize) -> Result<Vec<StoredInspection>> {
        let mut records: Vec<StoredInspection> = self
            .saved
            .borrow()
            .iter()
            .filter(|record| record.inspection.user_id == user_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records.truncate(limit);
        Ok(records)
    }

    fn get_inspection(&self, id: &str) -> Result<Option<StoredInspection>> {
        Ok(self
            .saved
            .borrow()
            .iter()
            .find(|record| record.id == id)
            .cloned())
    }
}
