use serde::Serialize;

use super::leveling::LevelProgress;
use crate::learning::domain::{Profile, UserId};

pub const DEFAULT_LEADERBOARD_SIZE: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub user_id: UserId,
    pub display_name: String,
    pub experience_points: u64,
    pub level: u64,
    pub daily_streak: u32,
}

/// Rank profiles by experience, highest first. Equal experience falls back
/// to display name, then user id, so the order is stable between requests.
pub fn leaderboard(profiles: &[Profile], limit: usize) -> Vec<LeaderboardEntry> {
    let mut ranked: Vec<(&Profile, String)> = profiles
        .iter()
        .map(|profile| {
            let name = profile
                .display_name()
                .unwrap_or_else(|| profile.id.0.clone());
            (profile, name)
        })
        .collect();

    ranked.sort_by(|(left, left_name), (right, right_name)| {
        right
            .experience()
            .cmp(&left.experience())
            .then_with(|| left_name.cmp(right_name))
            .then_with(|| left.id.cmp(&right.id))
    });

    ranked
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(position, (profile, display_name))| LeaderboardEntry {
            rank: position + 1,
            user_id: profile.id.clone(),
            display_name,
            experience_points: profile.experience(),
            level: LevelProgress::from_experience(profile.experience_points).level,
            daily_streak: profile.daily_streak,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(id: &str, name: Option<&str>, xp: Option<u64>) -> Profile {
        Profile {
            id: UserId(id.into()),
            experience_points: xp,
            daily_streak: 2,
            first_name: name.map(str::to_string),
            last_name: None,
        }
    }

    #[test]
    fn ranks_by_experience_then_name() {
        let profiles = vec![
            profile("u1", Some("Zed"), Some(120)),
            profile("u2", Some("Amy"), Some(120)),
            profile("u3", None, None),
            profile("u4", Some("Bo"), Some(480)),
        ];

        let board = leaderboard(&profiles, 10);

        let names: Vec<&str> = board.iter().map(|entry| entry.display_name.as_str()).collect();
        assert_eq!(names, vec!["Bo", "Amy", "Zed", "u3"]);
        assert_eq!(board[0].rank, 1);
        assert_eq!(board[0].level, 5);
        assert_eq!(board[3].experience_points, 0);
    }

    #[test]
    fn truncates_to_limit() {
        let profiles: Vec<Profile> = (0..5)
            .map(|index| profile(&format!("u{index}"), None, Some(index * 10)))
            .collect();
        let board = leaderboard(&profiles, 2);
        assert_eq!(board.len(), 2);
        assert_eq!(board[0].user_id, UserId("u4".into()));
        assert!(leaderboard(&profiles, 0).is_empty());
    }
}
