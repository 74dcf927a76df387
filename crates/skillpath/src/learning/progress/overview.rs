use serde::Serialize;

use super::achievements::AchievementBoard;
use super::leveling::LevelProgress;
use super::topics::{weak_topics, TopicAccuracy};
use crate::learning::domain::{Achievement, EarnedAchievement, Profile, Quiz, QuizResult, UserId};
use crate::learning::quiz::scoring::percentage;

/// Everything the dashboard shows for one learner.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressOverview {
    pub user_id: UserId,
    pub display_name: String,
    pub level: LevelProgress,
    pub daily_streak: u32,
    pub completed_quizzes: usize,
    pub pending_reviews: usize,
    pub average_percentage: u8,
    pub weak_topics: Vec<TopicAccuracy>,
    pub achievements: AchievementBoard,
}

/// Inputs for one overview, already fetched from the gateway.
#[derive(Debug, Clone, Copy)]
pub struct ProgressInputs<'a> {
    pub profile: &'a Profile,
    pub results: &'a [QuizResult],
    pub quizzes: &'a [Quiz],
    pub achievements: &'a [Achievement],
    pub earned: &'a [EarnedAchievement],
}

impl ProgressOverview {
    pub fn build(inputs: ProgressInputs<'_>) -> Self {
        let ProgressInputs {
            profile,
            results,
            quizzes,
            achievements,
            earned,
        } = inputs;

        let owned: Vec<&QuizResult> = results
            .iter()
            .filter(|result| result.user_id == profile.id)
            .collect();
        let completed: Vec<&QuizResult> = owned
            .iter()
            .copied()
            .filter(|result| result.is_completed())
            .collect();

        let average_percentage = if completed.is_empty() {
            0
        } else {
            let sum: u32 = completed
                .iter()
                .map(|result| u32::from(percentage(result.score, result.total_points)))
                .sum();
            (f64::from(sum) / completed.len() as f64).round() as u8
        };

        Self {
            user_id: profile.id.clone(),
            display_name: profile
                .display_name()
                .unwrap_or_else(|| "Student".to_string()),
            level: LevelProgress::from_experience(profile.experience_points),
            daily_streak: profile.daily_streak,
            completed_quizzes: completed.len(),
            pending_reviews: owned.len() - completed.len(),
            average_percentage,
            weak_topics: weak_topics(Some(profile), results, quizzes),
            achievements: AchievementBoard::build(&profile.id, achievements, earned),
        }
    }
}
