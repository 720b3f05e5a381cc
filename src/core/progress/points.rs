//! Point awards and levels.

use serde::{Deserialize, Serialize};

/// Points granted for each kind of progress. Loaded from the `[points]`
/// config section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointsPolicy {
    /// First correct answer on a unit
    pub correct_answer: u32,
    /// First completion of a unit
    pub unit_completion: u32,
    /// Finishing every unit of the course (once per session)
    pub course_completion: u32,
    pub points_per_level: u32,
}

impl Default for PointsPolicy {
    fn default() -> Self {
        Self {
            correct_answer: 25,
            unit_completion: 10,
            course_completion: 100,
            points_per_level: 100,
        }
    }
}

/// Levels start at 1 and go up every `points_per_level` points.
pub fn level_for(points: u32, policy: &PointsPolicy) -> u32 {
    points / policy.points_per_level.max(1) + 1
}
