//! Orchestration for submitting a finished wizard session.
//!
//! Every failure kind (blocked precondition, signed-out user, store error)
//! is absorbed here and reported through [`SubmitOutcome`]; nothing
//! propagates to the caller as an error. On failure the draft and current
//! step are left untouched so the user can retry without re-entering data.

use tracing::{debug, info, instrument, warn};

use crate::core::wizard::WizardSession;
use crate::io::auth::AuthProvider;
use crate::io::store::InspectionStore;
use crate::record::NewInspection;

/// Notice shown to the user for any submission failure. Signed-out and
/// store errors are deliberately not distinguished in user-facing text.
pub const FAILURE_NOTICE: &str = "Failed to save inspection. Please try again.";

/// Result of one submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The inspection was persisted; the session is finished and must be
    /// discarded by the caller.
    Saved { id: String },
    /// Precondition unmet: not on the final step, or a submission is
    /// already in flight. Nothing happened.
    Blocked,
    /// The submission failed; the session is intact and may be retried.
    Failed { notice: &'static str },
}

/// Submit the session's draft to the store as the current user.
///
/// The in-flight flag is set before the store call and is the only guard
/// against re-entrant submission; it is cleared on failure only. Exactly
/// one store call is made per accepted attempt, and a signed-out user
/// fails before the store is reached.
#[instrument(skip_all, fields(step = session.step().number()))]
pub fn submit(
    session: &mut WizardSession,
    store: &dyn InspectionStore,
    auth: &dyn AuthProvider,
) -> SubmitOutcome {
    if !session.step().is_last() {
        debug!("submit blocked: not on final step");
        return SubmitOutcome::Blocked;
    }
    if !session.begin_submit() {
        debug!("submit blocked: already in flight");
        return SubmitOutcome::Blocked;
    }

    let Some(user_id) = auth.current_user_id() else {
        warn!("submit failed: no signed-in user");
        session.fail_submit();
        return SubmitOutcome::Failed {
            notice: FAILURE_NOTICE,
        };
    };

    let record = NewInspection::from_draft(&user_id, session.draft());
    match store.create_inspection(&record) {
        Ok(id) => {
            info!(id = %id, "inspection submitted");
            SubmitOutcome::Saved { id }
        }
        Err(err) => {
            warn!(error = %format!("{err:#}"), "submit failed: store error");
            session.fail_submit();
            SubmitOutcome::Failed {
                notice: FAILURE_NOTICE,
            }
        }
    }
}
