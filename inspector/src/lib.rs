//! Motorcycle inspection tracker.
//!
//! This crate implements a three-step inspection wizard (basic info,
//! component assessment, notes) that reduces eight component condition
//! scores into an overall score and a condition-adjusted value estimate.
//! The architecture enforces a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (wizard transitions, scoring,
//!   record invariants). No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting collaborators (inspection store, auth
//!   session, config). Isolated behind traits to enable fakes in tests.
//!
//! Orchestration modules ([`submit`], [`console`]) coordinate core logic
//! with I/O to implement CLI commands.

pub mod console;
pub mod core;
pub mod draft;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod record;
pub mod submit;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
