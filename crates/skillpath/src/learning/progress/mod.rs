//! Derived learner progress: weak topics, leveling, achievements and rankings.

pub mod achievements;
pub mod leaderboard;
pub mod leveling;
pub mod overview;
pub mod topics;

pub use achievements::{AchievementBadge, AchievementBoard};
pub use leaderboard::{leaderboard, LeaderboardEntry, DEFAULT_LEADERBOARD_SIZE};
pub use leveling::LevelProgress;
pub use overview::{ProgressInputs, ProgressOverview};
pub use topics::{topic_stats, weak_topics, TopicAccuracy, TopicStat};
