// src/lib.rs
// Public library surface for the session handler, the demo binary and integration tests.

pub mod community;
pub mod config;
pub mod error;
pub mod scorer;
pub mod session;
pub mod telemetry;

// ---- Re-exports for stable public API ----
pub use crate::error::SessionError;
pub use crate::scorer::{
    compute_score, explain, in_bounds, judge, total_score, Interval, Judgement, ScoreBreakdown,
};
pub use crate::session::{finalize_session, Answer, QuestionResult, SessionPolicy, SessionResult};
