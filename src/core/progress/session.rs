//! Session Progress
//!
//! Every operation takes the current [`SessionProgress`] by value and hands
//! back the next one, so callers own the state and nothing is hidden in
//! globals.
//!
//! Unit lifecycle: `Locked -> Available -> Answered { is_correct } -> Completed`.

use std::collections::{BTreeMap, BTreeSet};

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::leaderboard::{rank_of, recompute_leaderboard, rerank, LeaderboardEntry};
use super::points::{level_for, PointsPolicy};
use crate::core::course::types::Quiz;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgressError {
    #[error("Unit {index} is out of range (course has {unit_count} units)")]
    UnitOutOfRange { index: usize, unit_count: usize },

    #[error("Unit {0} is locked")]
    UnitLocked(usize),

    #[error("Course has no units")]
    EmptyCourse,

    #[error("Course incomplete: {completed} of {total} units completed")]
    CourseIncomplete { completed: usize, total: usize },
}

pub type Result<T> = std::result::Result<T, ProgressError>;

/// How units unlock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationMode {
    /// A unit opens once the previous one is completed (slides)
    #[default]
    Linear,
    /// Any unit up to one past the furthest completed is open (video, audio)
    Free,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum UnitState {
    Locked,
    Available,
    Answered { is_correct: bool },
    Completed,
}

/// The part of a quiz needed to grade an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizKey {
    pub correct_answer: String,
}

impl From<&Quiz> for QuizKey {
    fn from(quiz: &Quiz) -> Self {
        Self {
            correct_answer: quiz.correct_answer.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitAnswer {
    pub selected: String,
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionProgress {
    pub unit_count: usize,
    pub mode: NavigationMode,
    pub user_id: String,
    pub completed_units: BTreeSet<usize>,
    pub answers: BTreeMap<usize, UnitAnswer>,
    /// Units that already paid out the correct-answer award
    pub rewarded_answers: BTreeSet<usize>,
    pub points: u32,
    pub leaderboard: Vec<LeaderboardEntry>,
    pub certificate_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerOutcome {
    pub is_correct: bool,
    pub points_awarded: u32,
    pub newly_completed: bool,
    pub total_points: u32,
    pub level: u32,
    pub rank: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseCompletion {
    pub certificate_id: String,
    /// Zero when the bonus was already granted this session
    pub points_awarded: u32,
    pub total_points: u32,
    pub level: u32,
    pub rank: Option<u32>,
}

impl SessionProgress {
    /// Start a session. `user` joins (or replaces its entry in) the leaderboard
    /// and its points become the session's starting points.
    pub fn new(
        unit_count: usize,
        mode: NavigationMode,
        user: LeaderboardEntry,
        leaderboard: Vec<LeaderboardEntry>,
    ) -> Self {
        let user_id = user.id.clone();
        let points = user.points;
        let mut entries: Vec<LeaderboardEntry> =
            leaderboard.into_iter().filter(|e| e.id != user_id).collect();
        entries.push(user);

        Self {
            unit_count,
            mode,
            user_id,
            completed_units: BTreeSet::new(),
            answers: BTreeMap::new(),
            rewarded_answers: BTreeSet::new(),
            points,
            leaderboard: rerank(entries),
            certificate_id: None,
        }
    }

    pub fn level(&self, policy: &PointsPolicy) -> u32 {
        level_for(self.points, policy)
    }

    pub fn rank(&self) -> Option<u32> {
        rank_of(&self.leaderboard, &self.user_id)
    }

    /// A course without units is never complete.
    pub fn is_complete(&self) -> bool {
        self.unit_count > 0 && self.completed_units.len() >= self.unit_count
    }

    /// State of unit `index`. Indices past the end are reported as locked.
    pub fn unit_state(&self, index: usize) -> UnitState {
        if index >= self.unit_count {
            return UnitState::Locked;
        }
        if self.completed_units.contains(&index) {
            return UnitState::Completed;
        }
        if let Some(answer) = self.answers.get(&index) {
            return UnitState::Answered {
                is_correct: answer.is_correct,
            };
        }
        if self.is_unlocked(index) {
            UnitState::Available
        } else {
            UnitState::Locked
        }
    }

    fn is_unlocked(&self, index: usize) -> bool {
        if index == 0 {
            return true;
        }
        match self.mode {
            NavigationMode::Linear => self.completed_units.contains(&(index - 1)),
            NavigationMode::Free => self
                .completed_units
                .iter()
                .next_back()
                .is_some_and(|&furthest| index <= furthest + 1),
        }
    }

    fn check_open(&self, index: usize) -> Result<()> {
        if index >= self.unit_count {
            return Err(ProgressError::UnitOutOfRange {
                index,
                unit_count: self.unit_count,
            });
        }
        if self.unit_state(index) == UnitState::Locked {
            return Err(ProgressError::UnitLocked(index));
        }
        Ok(())
    }

    fn award(mut self, amount: u32) -> Self {
        if amount > 0 {
            self.points = self.points.saturating_add(amount);
            self.leaderboard = recompute_leaderboard(
                std::mem::take(&mut self.leaderboard),
                &self.user_id,
                self.points,
            );
        }
        self
    }

    /// Mark a unit completed; returns the points it paid out (zero if the
    /// unit was already completed).
    fn mark_completed(self, index: usize, policy: &PointsPolicy) -> (Self, u32) {
        if self.completed_units.contains(&index) {
            return (self, 0);
        }
        let mut next = self;
        next.completed_units.insert(index);
        (next.award(policy.unit_completion), policy.unit_completion)
    }
}

/// Grade an answer and apply its awards.
///
/// Correctness depends only on `selected == key.correct_answer`. A correct
/// answer pays `correct_answer` the first time per unit and completes the
/// unit. Wrong answers are recorded and can be retried.
pub fn submit_answer(
    progress: SessionProgress,
    index: usize,
    key: &QuizKey,
    selected: &str,
    policy: &PointsPolicy,
) -> Result<(SessionProgress, AnswerOutcome)> {
    progress.check_open(index)?;

    let is_correct = selected == key.correct_answer;
    let mut next = progress;
    next.answers.insert(
        index,
        UnitAnswer {
            selected: selected.to_string(),
            is_correct,
        },
    );

    let mut awarded = 0;
    let mut newly_completed = false;
    if is_correct {
        if next.rewarded_answers.insert(index) {
            awarded += policy.correct_answer;
            next = next.award(policy.correct_answer);
        }
        let (after, unit_points) = next.mark_completed(index, policy);
        next = after;
        newly_completed = unit_points > 0;
        awarded += unit_points;
    }

    log::debug!(
        "Answer on unit {}: correct={} awarded={} total={}",
        index,
        is_correct,
        awarded,
        next.points
    );

    let outcome = AnswerOutcome {
        is_correct,
        points_awarded: awarded,
        newly_completed,
        total_points: next.points,
        level: next.level(policy),
        rank: next.rank(),
    };
    Ok((next, outcome))
}

/// Advance past a unit: it counts as completed and pays the unit award once.
pub fn complete_unit(
    progress: SessionProgress,
    index: usize,
    policy: &PointsPolicy,
) -> Result<(SessionProgress, u32)> {
    progress.check_open(index)?;
    Ok(progress.mark_completed(index, policy))
}

/// Finish the course once every unit is completed. The bonus and the
/// certificate id are granted on the first call; later calls return the same
/// certificate and award nothing.
pub fn complete_course(
    progress: SessionProgress,
    policy: &PointsPolicy,
) -> Result<(SessionProgress, CourseCompletion)> {
    if progress.unit_count == 0 {
        return Err(ProgressError::EmptyCourse);
    }
    if !progress.is_complete() {
        return Err(ProgressError::CourseIncomplete {
            completed: progress.completed_units.len(),
            total: progress.unit_count,
        });
    }

    let (next, awarded, certificate_id) = match progress.certificate_id.clone() {
        Some(existing) => (progress, 0, existing),
        None => {
            let id = certificate_id();
            let mut next = progress.award(policy.course_completion);
            next.certificate_id = Some(id.clone());
            log::info!("Course completed by {}; certificate {}", next.user_id, id);
            (next, policy.course_completion, id)
        }
    };

    let completion = CourseCompletion {
        certificate_id,
        points_awarded: awarded,
        total_points: next.points,
        level: next.level(policy),
        rank: next.rank(),
    };
    Ok((next, completion))
}

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

fn to_base36(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(BASE36[(n % 36) as usize]);
        n /= 36;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}

/// `cert-<8 random>-<4 random>-<millis since epoch>`, base36 throughout.
pub fn certificate_id() -> String {
    let mut rng = rand::thread_rng();
    let mut random = |len: usize| -> String {
        (0..len)
            .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
            .collect()
    };
    let first = random(8);
    let second = random(4);
    let millis = chrono::Utc::now().timestamp_millis().max(0) as u64;
    format!("cert-{}-{}-{}", first, second, to_base36(millis))
}
