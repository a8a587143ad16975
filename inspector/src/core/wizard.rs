//! Wizard-owned state transitions for one inspection session.
//!
//! The session is a finite state + data reducer: `{step} x {submitting}`
//! over a draft, mutated only through the operations below. Advancing is
//! gated per step; field edits are never validated at write time.

use crate::core::types::{FieldEdit, STEP_COUNT, WizardStep};
use crate::draft::{DraftInspection, default_draft};

/// Whether the wizard may advance past `step` with the given draft.
///
/// Only the first step gates: identity is mandatory, assessment and notes
/// are not.
pub fn can_advance(step: WizardStep, draft: &DraftInspection) -> bool {
    match step {
        WizardStep::BasicInfo => !draft.name.trim().is_empty(),
        WizardStep::Assessment | WizardStep::Notes => true,
    }
}

/// One in-progress inspection flow: current step, draft, and the
/// submission-in-flight flag.
///
/// Created when the user opens the new-inspection flow and discarded on
/// successful submission or on navigating away; never persisted mid-flow.
#[derive(Debug, Clone, PartialEq)]
pub struct WizardSession {
    step: WizardStep,
    draft: DraftInspection,
    submitting: bool,
}

impl Default for WizardSession {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardSession {
    pub fn new() -> Self {
        Self {
            step: WizardStep::first(),
            draft: default_draft(),
            submitting: false,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn draft(&self) -> &DraftInspection {
        &self.draft
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Replace one draft field. Accepts any value typed for the field;
    /// validation is advance-time only.
    pub fn apply(&mut self, edit: FieldEdit) {
        match edit {
            FieldEdit::Name(value) => self.draft.name = value,
            FieldEdit::Year(value) => self.draft.year = value,
            FieldEdit::Make(value) => self.draft.make = value,
            FieldEdit::Model(value) => self.draft.model = value,
            FieldEdit::Mileage(value) => self.draft.mileage = value,
            FieldEdit::AskingPrice(value) => self.draft.asking_price = value,
            FieldEdit::Location(value) => self.draft.location = value,
            FieldEdit::Notes(value) => self.draft.notes = value,
            FieldEdit::Score(component, value) => self.draft.scores.set(component, value),
        }
    }

    pub fn can_advance(&self) -> bool {
        can_advance(self.step, &self.draft)
    }

    /// Move to the next step. No-op (returns false) when the current step's
    /// gate is unmet, on the last step, or while a submission is in flight.
    pub fn advance(&mut self) -> bool {
        if self.submitting || !self.can_advance() {
            return false;
        }
        let Some(next) = self.step.next() else {
            return false;
        };
        self.step = next;
        true
    }

    /// Move to the previous step, floored at the first. No-op while a
    /// submission is in flight.
    pub fn retreat(&mut self) -> bool {
        if self.submitting {
            return false;
        }
        let Some(prev) = self.step.prev() else {
            return false;
        };
        self.step = prev;
        true
    }

    /// Jump directly to `target`. Backward jumps are always allowed; forward
    /// jumps require every intermediate gate to be satisfied. No-op while a
    /// submission is in flight.
    pub fn jump_to(&mut self, target: WizardStep) -> bool {
        if self.submitting || target == self.step {
            return false;
        }
        if target > self.step {
            let mut step = self.step;
            while step < target {
                if !can_advance(step, &self.draft) {
                    return false;
                }
                match step.next() {
                    Some(next) => step = next,
                    None => return false,
                }
            }
        }
        self.step = target;
        true
    }

    /// Whole-number completion percentage for the progress display.
    pub fn progress_percent(&self) -> u8 {
        (f64::from(self.step.number()) / f64::from(STEP_COUNT) * 100.0).round() as u8
    }

    /// Mark a submission as in flight. Returns false (and changes nothing)
    /// if one is already in flight; exactly one caller wins.
    pub(crate) fn begin_submit(&mut self) -> bool {
        if self.submitting {
            return false;
        }
        self.submitting = true;
        true
    }

    /// Clear the in-flight flag after a failed submission so the user can
    /// retry without re-entering data.
    pub(crate) fn fail_submit(&mut self) {
        self.submitting = false;
    }
}
