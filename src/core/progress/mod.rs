//! Progress and Gamification
//!
//! Pure operations over an explicit [`SessionProgress`] value: quiz grading,
//! point awards, unit gating, leaderboard ranking, levels and certificates.
//! Nothing here touches storage; the caller owns the session state.

pub mod leaderboard;
pub mod points;
pub mod session;

pub use leaderboard::{rank_of, recompute_leaderboard, rerank, LeaderboardEntry};
pub use points::{level_for, PointsPolicy};
pub use session::{
    certificate_id, complete_course, complete_unit, submit_answer, AnswerOutcome,
    CourseCompletion, NavigationMode, ProgressError, QuizKey, SessionProgress, UnitAnswer,
    UnitState,
};
