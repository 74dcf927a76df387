use serde::Serialize;

pub const XP_PER_LEVEL: u64 = 100;

/// Position on the linear leveling curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelProgress {
    pub experience_points: u64,
    pub level: u64,
    pub current_level_xp: u64,
    pub next_level_xp: u64,
    pub xp_into_level: u64,
    pub progress_percentage: f64,
}

impl LevelProgress {
    pub fn from_experience(experience_points: Option<u64>) -> Self {
        let xp = experience_points.unwrap_or(0);
        let level = xp / XP_PER_LEVEL + 1;
        let current_level_xp = (level - 1) * XP_PER_LEVEL;
        let next_level_xp = level.saturating_mul(XP_PER_LEVEL);
        let xp_into_level = xp - current_level_xp;
        // Every level is XP_PER_LEVEL wide even where next_level_xp saturates.
        let progress_percentage = xp_into_level as f64 * 100.0 / XP_PER_LEVEL as f64;

        Self {
            experience_points: xp,
            level,
            current_level_xp,
            next_level_xp,
            xp_into_level,
            progress_percentage,
        }
    }

    pub fn xp_to_next_level(&self) -> u64 {
        self.next_level_xp.saturating_sub(self.experience_points)
    }
}
