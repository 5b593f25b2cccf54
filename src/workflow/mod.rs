pub mod grading_session;
pub mod submission_ctx;

pub use grading_session::{CriterionKind, GradingSession};
pub use submission_ctx::SubmissionCtx;
