//! Domain types for the update decision.
//!
//! Pure data: no I/O, no platform handles.

mod consent;
mod decision;

pub use consent::{ConsentRequest, ConsentResponse, ConsentStrategy, UpdateNotice};
pub use decision::{CycleState, DecisionOutcome, DecisionReport, UpdatePlan};
