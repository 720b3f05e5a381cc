//! Leaderboard ranking.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub id: String,
    pub name: String,
    pub points: u32,
    /// Derived; always recomputed by [`rerank`]
    #[serde(default)]
    pub rank: u32,
}

impl LeaderboardEntry {
    pub fn new(id: impl Into<String>, name: impl Into<String>, points: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            points,
            rank: 0,
        }
    }
}

/// Sort descending by points, keeping list order among ties, and assign
/// `rank = position + 1`.
pub fn rerank(mut entries: Vec<LeaderboardEntry>) -> Vec<LeaderboardEntry> {
    entries.sort_by(|a, b| b.points.cmp(&a.points));
    for (i, entry) in entries.iter_mut().enumerate() {
        entry.rank = i as u32 + 1;
    }
    entries
}

/// Set `user_id`'s points and rerank. Unknown ids leave the points untouched.
pub fn recompute_leaderboard(
    mut entries: Vec<LeaderboardEntry>,
    user_id: &str,
    user_points: u32,
) -> Vec<LeaderboardEntry> {
    if let Some(entry) = entries.iter_mut().find(|e| e.id == user_id) {
        entry.points = user_points;
    }
    rerank(entries)
}

/// Rank of `user_id`, if present.
pub fn rank_of(entries: &[LeaderboardEntry], user_id: &str) -> Option<u32> {
    entries.iter().find(|e| e.id == user_id).map(|e| e.rank)
}
