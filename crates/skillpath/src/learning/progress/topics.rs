use std::collections::HashMap;

use serde::Serialize;

use crate::learning::domain::{Profile, Question, Quiz, QuizId, QuizResult, UserId};
use crate::learning::quiz::grade_answer;
use crate::learning::quiz::scoring::percentage;

/// Topics need more than this many graded questions before they are ranked.
pub const NOISE_FLOOR: u32 = 2;
pub const WEAK_TOPIC_LIMIT: usize = 3;

/// Running counters for one topic.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TopicStat {
    pub topic: String,
    pub correct: u32,
    pub total: u32,
}

impl TopicStat {
    pub fn accuracy(&self) -> u8 {
        percentage(self.correct, self.total)
    }

    pub fn to_view(&self) -> TopicAccuracy {
        TopicAccuracy {
            topic: self.topic.clone(),
            correct: self.correct,
            total: self.total,
            accuracy: self.accuracy(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicAccuracy {
    pub topic: String,
    pub correct: u32,
    pub total: u32,
    pub accuracy: u8,
}

/// Accumulates counters keyed by topic while remembering first-seen order.
#[derive(Debug, Default)]
struct TopicLedger {
    index: HashMap<String, usize>,
    stats: Vec<TopicStat>,
}

impl TopicLedger {
    fn record(&mut self, topic: &str, correct: bool) {
        let slot = match self.index.get(topic) {
            Some(slot) => *slot,
            None => {
                self.stats.push(TopicStat {
                    topic: topic.to_string(),
                    ..TopicStat::default()
                });
                let slot = self.stats.len() - 1;
                self.index.insert(topic.to_string(), slot);
                slot
            }
        };

        let stat = &mut self.stats[slot];
        stat.total += 1;
        if correct {
            stat.correct += 1;
        }
    }
}

/// Set union of the live quiz's category and the snapshot question's tags.
/// Names are kept verbatim; blank ones are skipped.
fn topics_for<'a>(category: Option<&'a str>, question: &'a Question) -> Vec<&'a str> {
    let mut topics: Vec<&str> = Vec::new();
    for candidate in category
        .into_iter()
        .chain(question.tags.iter().map(String::as_str))
    {
        if !candidate.trim().is_empty() && !topics.contains(&candidate) {
            topics.push(candidate);
        }
    }
    topics
}

/// Per-topic counters over the user's completed results, in first-seen order.
pub fn topic_stats(user_id: &UserId, results: &[QuizResult], quizzes: &[Quiz]) -> Vec<TopicStat> {
    let catalog: HashMap<&QuizId, &Quiz> = quizzes.iter().map(|quiz| (&quiz.id, quiz)).collect();
    let mut ledger = TopicLedger::default();

    for result in results
        .iter()
        .filter(|result| &result.user_id == user_id && result.is_completed())
    {
        let category = catalog
            .get(&result.quiz_id)
            .and_then(|quiz| quiz.category.as_deref());

        for question in &result.question_order {
            let topics = topics_for(category, question);
            if topics.is_empty() {
                continue;
            }

            let correct = grade_answer(question, result.user_answers.get(&question.id));
            for topic in topics {
                ledger.record(topic, correct);
            }
        }
    }

    ledger.stats
}

/// The three weakest topics with enough samples, weakest first.
pub fn weak_topics(
    profile: Option<&Profile>,
    results: &[QuizResult],
    quizzes: &[Quiz],
) -> Vec<TopicAccuracy> {
    let Some(profile) = profile else {
        return Vec::new();
    };
    if results.is_empty() || quizzes.is_empty() {
        return Vec::new();
    }

    let mut ranked: Vec<TopicAccuracy> = topic_stats(&profile.id, results, quizzes)
        .iter()
        .filter(|stat| stat.total > NOISE_FLOOR)
        .map(TopicStat::to_view)
        .collect();

    ranked.sort_by_key(|entry| entry.accuracy);
    ranked.truncate(WEAK_TOPIC_LIMIT);
    ranked
}
