use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

use super::domain::{Achievement, EarnedAchievement, Profile, Quiz, QuizResult, UserId};
use super::progress::{ProgressInputs, ProgressOverview};

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid dataset JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Gateway export holding every collection the core consumes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LearningDataset {
    #[serde(default)]
    pub profiles: Vec<Profile>,
    #[serde(default)]
    pub quizzes: Vec<Quiz>,
    #[serde(default)]
    pub results: Vec<QuizResult>,
    #[serde(default)]
    pub achievements: Vec<Achievement>,
    #[serde(default)]
    pub earned_achievements: Vec<EarnedAchievement>,
}

impl LearningDataset {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn profile(&self, user_id: &UserId) -> Option<&Profile> {
        self.profiles.iter().find(|profile| &profile.id == user_id)
    }

    pub fn overview(&self, user_id: &UserId) -> Option<ProgressOverview> {
        let profile = self.profile(user_id)?;
        Some(ProgressOverview::build(ProgressInputs {
            profile,
            results: &self.results,
            quizzes: &self.quizzes,
            achievements: &self.achievements,
            earned: &self.earned_achievements,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn exported_dataset_keeps_quiz_passcodes() {
        let raw = json!({
            "quizzes": [{ "id": "locked", "title": "Locked", "passcode": "owl" }]
        });
        let dataset = LearningDataset::from_reader(raw.to_string().as_bytes()).expect("parses");

        let exported = serde_json::to_string(&dataset).expect("serializes");
        let reloaded = LearningDataset::from_reader(exported.as_bytes()).expect("reparses");

        assert_eq!(reloaded.quizzes[0].passcode.as_deref(), Some("owl"));
        assert_eq!(reloaded, dataset);
    }
}
