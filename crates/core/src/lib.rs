#![forbid(unsafe_code)]

pub mod exam_session;
pub mod model;
pub mod progression;

pub use exam_session::{ExamError, ExamPhase, ExamResult, ExamSession, PASS_THRESHOLD, TickOutcome};
pub use progression::{ItemCounts, complete_item, counts, is_locked, percentage, reconcile};
