use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::learning::domain::{Achievement, AchievementId, EarnedAchievement, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementBadge {
    pub id: AchievementId,
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge_color: Option<String>,
    pub earned: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub earned_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementBoard {
    pub earned_count: usize,
    pub total_count: usize,
    pub badges: Vec<AchievementBadge>,
}

impl AchievementBoard {
    /// Join the catalog with the user's earned rows. Earned badges come first;
    /// catalog order is kept within each group. Rows for other users or for
    /// achievements missing from the catalog are ignored.
    pub fn build(user_id: &UserId, catalog: &[Achievement], earned: &[EarnedAchievement]) -> Self {
        let earned_at: HashMap<&AchievementId, Option<DateTime<Utc>>> = earned
            .iter()
            .filter(|row| &row.user_id == user_id)
            .map(|row| (&row.achievement_id, row.earned_at))
            .collect();

        let mut badges: Vec<AchievementBadge> = catalog
            .iter()
            .map(|achievement| {
                let earned_on = earned_at.get(&achievement.id);
                AchievementBadge {
                    id: achievement.id.clone(),
                    name: achievement.name.clone(),
                    description: achievement.description.clone(),
                    icon_name: achievement.icon_name.clone(),
                    badge_color: achievement.badge_color.clone(),
                    earned: earned_on.is_some(),
                    earned_at: earned_on.copied().flatten(),
                }
            })
            .collect();
        badges.sort_by_key(|badge| !badge.earned);

        Self {
            earned_count: badges.iter().filter(|badge| badge.earned).count(),
            total_count: badges.len(),
            badges,
        }
    }
}
