//! End-to-end wizard lifecycle against in-memory fakes.
//!
//! Exercises the public session + submit API the way a frontend would:
//! edits, gated navigation, submission, and the retry path.

use inspector::core::types::{Component, FieldEdit, WizardStep};
use inspector::core::wizard::WizardSession;
use inspector::io::store::InspectionStore;
use inspector::submit::{SubmitOutcome, submit};
use inspector::test_support::{FakeAuth, RecordingStore, scores_from};

fn finished_session() -> WizardSession {
    let mut session = WizardSession::new();
    session.apply(FieldEdit::Name("Red Ducati".to_string()));
    session.apply(FieldEdit::Year(Some(2018)));
    session.apply(FieldEdit::Make("Ducati".to_string()));
    session.apply(FieldEdit::Model("Monster 821".to_string()));
    session.apply(FieldEdit::Mileage(Some(15_000)));
    session.apply(FieldEdit::AskingPrice(Some(8_000.0)));
    session.apply(FieldEdit::Location("Austin, TX".to_string()));
    assert!(session.advance());

    let values = [90, 85, 80, 75, 70, 95, 60, 88];
    for (component, value) in Component::ALL.into_iter().zip(values) {
        session.apply(FieldEdit::Score(component, value));
    }
    assert!(session.advance());
    session.apply(FieldEdit::Notes("Owner has all service records.".to_string()));
    session
}

/// The worked example: scores averaging 80.375 round to 80, which lands in
/// the top band, so the estimate equals the asking price.
#[test]
fn red_ducati_scenario_persists_expected_derived_values() {
    let store = RecordingStore::new();
    let auth = FakeAuth::signed_in("rider-1");
    let mut session = finished_session();

    let outcome = submit(&mut session, &store, &auth);
    let SubmitOutcome::Saved { id } = outcome else {
        panic!("expected save, got {outcome:?}");
    };

    let created = store.created();
    assert_eq!(created.len(), 1);
    let record = &created[0];
    assert_eq!(record.user_id, "rider-1");
    assert_eq!(record.motorcycle_name, "Red Ducati");
    assert_eq!(record.motorcycle_year, Some(2018));
    assert_eq!(record.scores, scores_from([90, 85, 80, 75, 70, 95, 60, 88]));
    assert_eq!(record.overall_score, 80);
    assert_eq!(record.estimated_value, Some(8_000.0));

    let fetched = store.get_inspection(&id).expect("get").expect("present");
    assert_eq!(&fetched.inspection, record);
}

/// After a successful save the session is terminal: a second submit is a
/// structural no-op and the store sees exactly one create call.
#[test]
fn second_submit_after_success_makes_no_store_call() {
    let store = RecordingStore::new();
    let auth = FakeAuth::signed_in("rider-1");
    let mut session = finished_session();

    assert!(matches!(
        submit(&mut session, &store, &auth),
        SubmitOutcome::Saved { .. }
    ));
    assert_eq!(submit(&mut session, &store, &auth), SubmitOutcome::Blocked);
    assert_eq!(store.attempted().len(), 1);
}

/// Store failure surfaces the uniform notice, leaves everything editable,
/// and an unmodified retry submits byte-identical data.
#[test]
fn failed_submit_leaves_the_session_editable() {
    let store = RecordingStore::new();
    store.fail_next("connection refused");
    let auth = FakeAuth::signed_in("rider-1");
    let mut session = finished_session();
    let draft_before = session.draft().clone();

    assert!(matches!(
        submit(&mut session, &store, &auth),
        SubmitOutcome::Failed { .. }
    ));
    assert_eq!(session.step(), WizardStep::Notes);
    assert_eq!(session.draft(), &draft_before);
    assert!(!session.is_submitting());
    assert!(session.retreat());
    assert!(session.advance());

    assert!(matches!(
        submit(&mut session, &store, &auth),
        SubmitOutcome::Saved { .. }
    ));
    let attempts = store.attempted();
    assert_eq!(attempts.len(), 2);
    assert_eq!(attempts[0], attempts[1]);
}

/// Derived values shown mid-wizard match what submission persists: there
/// is one scoring path, not a preview path and a final path.
#[test]
fn preview_and_persisted_values_agree() {
    let store = RecordingStore::new();
    let auth = FakeAuth::signed_in("rider-1");
    let mut session = finished_session();

    let draft = session.draft();
    let preview_overall = inspector::core::scoring::overall_score(&draft.scores);
    let preview_value =
        inspector::core::scoring::estimated_value(preview_overall, draft.asking_price);

    submit(&mut session, &store, &auth);
    let record = &store.created()[0];
    assert_eq!(record.overall_score, preview_overall);
    assert_eq!(record.estimated_value, preview_value);
}
