use crate::infra::{parse_date, InMemoryLearningRepository};
use chrono::{Local, NaiveDate};
use clap::Args;
use serde::de::DeserializeOwned;
use skillpath::error::AppError;
use skillpath::learning::progress::ProgressOverview;
use skillpath::learning::quiz::AttemptGrade;
use skillpath::learning::{
    AnswerSheet, DatasetError, LearningDataset, LearningService, QuestionCsvImporter, Quiz, UserId,
};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct GradeArgs {
    /// Quiz definition in gateway JSON
    #[arg(long)]
    pub(crate) quiz: PathBuf,
    /// Answer sheet keyed by question id
    #[arg(long)]
    pub(crate) answers: PathBuf,
}

#[derive(Args, Debug)]
pub(crate) struct ProgressArgs {
    /// Dataset snapshot exported from the gateway
    #[arg(long)]
    pub(crate) dataset: PathBuf,
    /// Learner id
    #[arg(long)]
    pub(crate) user: String,
}

#[derive(Args, Debug)]
pub(crate) struct CertificateArgs {
    /// Dataset snapshot exported from the gateway
    #[arg(long)]
    pub(crate) dataset: PathBuf,
    /// Learner id
    #[arg(long)]
    pub(crate) user: String,
    /// Course title printed on the certificate
    #[arg(long)]
    pub(crate) course: String,
    /// Issue date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) issued_on: Option<NaiveDate>,
    /// Issuing organisation
    #[arg(long)]
    pub(crate) issuer: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct ImportQuestionsArgs {
    /// Question CSV (`id,type,text,options,correct,points,tags,explanation`)
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Write the JSON here instead of stdout
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, DatasetError> {
    let file = std::fs::File::open(path)?;
    Ok(serde_json::from_reader(file)?)
}

fn dataset_service(path: &Path) -> Result<LearningService<InMemoryLearningRepository>, AppError> {
    let dataset = LearningDataset::from_path(path)?;
    let repository = InMemoryLearningRepository::from_dataset(dataset);
    Ok(LearningService::new(Arc::new(repository)))
}

pub(crate) fn run_grade(args: GradeArgs) -> Result<(), AppError> {
    let quiz: Quiz = read_json(&args.quiz)?;
    let answers: AnswerSheet = read_json(&args.answers)?;

    let grade = AttemptGrade::grade(&quiz.questions, &answers);
    print!("{}", render_grade(&quiz.title, &grade));
    Ok(())
}

pub(crate) fn run_progress(args: ProgressArgs) -> Result<(), AppError> {
    let service = dataset_service(&args.dataset)?;
    let overview = service.progress_overview(&UserId(args.user))?;
    print!("{}", render_overview(&overview));
    Ok(())
}

pub(crate) fn run_certificate(args: CertificateArgs) -> Result<(), AppError> {
    let service = dataset_service(&args.dataset)?;
    let issued_on = args
        .issued_on
        .unwrap_or_else(|| Local::now().date_naive());

    let document = service.certificate(&UserId(args.user), &args.course, issued_on, args.issuer)?;
    println!("{}", document.render_text());
    Ok(())
}

pub(crate) fn run_import_questions(args: ImportQuestionsArgs) -> Result<(), AppError> {
    let questions = QuestionCsvImporter::from_path(&args.csv)?;
    let json = serde_json::to_string_pretty(&questions).map_err(DatasetError::from)?;

    match args.output {
        Some(path) => {
            std::fs::write(&path, json)?;
            println!("Wrote {} questions to {}", questions.len(), path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

pub(crate) fn render_grade(title: &str, grade: &AttemptGrade) -> String {
    let summary = &grade.summary;
    let mut out = String::new();
    let _ = writeln!(out, "{title}");
    let _ = writeln!(
        out,
        "- Score {}/{} ({}%) | {} of {} questions correct",
        summary.score,
        summary.total_points,
        summary.percentage,
        summary.correct_answers_count,
        summary.total_questions
    );
    for question in &grade.questions {
        let mark = if question.correct {
            "correct"
        } else if question.answered {
            "incorrect"
        } else {
            "unanswered"
        };
        let _ = writeln!(
            out,
            "  - {} [{}]: {} ({}/{} pts)",
            question.question_id,
            question.question_type,
            mark,
            question.points_awarded,
            question.points_possible
        );
        if !question.correct {
            if let Some(explanation) = &question.explanation {
                let _ = writeln!(out, "    {explanation}");
            }
        }
    }
    out
}

pub(crate) fn render_overview(overview: &ProgressOverview) -> String {
    let level = &overview.level;
    let mut out = String::new();
    let _ = writeln!(out, "Progress for {} ({})", overview.display_name, overview.user_id);
    let _ = writeln!(
        out,
        "- Level {} | {} XP | {:.0}% to level {} ({} XP to go)",
        level.level,
        level.experience_points,
        level.progress_percentage,
        level.level + 1,
        level.xp_to_next_level()
    );
    let _ = writeln!(
        out,
        "- {} day streak | {} quizzes completed | {} awaiting review | {}% average",
        overview.daily_streak,
        overview.completed_quizzes,
        overview.pending_reviews,
        overview.average_percentage
    );

    if overview.weak_topics.is_empty() {
        let _ = writeln!(out, "Weak topics: none yet");
    } else {
        let _ = writeln!(out, "Weak topics:");
        for topic in &overview.weak_topics {
            let _ = writeln!(
                out,
                "  - {}: {}% ({}/{})",
                topic.topic, topic.accuracy, topic.correct, topic.total
            );
        }
    }

    let board = &overview.achievements;
    let _ = writeln!(
        out,
        "Achievements: {}/{} earned",
        board.earned_count, board.total_count
    );
    for badge in board.badges.iter().filter(|badge| badge.earned) {
        let _ = writeln!(out, "  - {}", badge.name);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn quiz() -> Quiz {
        serde_json::from_value(json!({
            "id": "geo",
            "title": "Capitals",
            "category": "Geography",
            "questions": [
                { "id": "fr", "type": "single", "options": ["Lyon", "Paris"], "correctAnswers": [1], "points": 2 },
                { "id": "it", "type": "textInput", "correctAnswers": ["Rome"], "explanation": "Rome became capital in 1871" },
                { "id": "es", "type": "textInput", "correctAnswers": ["Madrid"] }
            ]
        }))
        .expect("quiz parses")
    }

    fn dataset() -> LearningDataset {
        let quiz = quiz();
        let results: Vec<serde_json::Value> = (0..3)
            .map(|index| {
                json!({
                    "id": format!("r{index}"),
                    "user_id": "u1",
                    "quizId": "geo",
                    "status": "completed",
                    "questionOrder": quiz.questions,
                    "userAnswers": { "fr": "Paris", "it": "Milan" },
                    "score": 2,
                    "totalPoints": 4
                })
            })
            .collect();

        serde_json::from_value(json!({
            "profiles": [{ "id": "u1", "experience_points": 130, "daily_streak": 2, "first_name": "Lee" }],
            "quizzes": [quiz],
            "results": results,
            "achievements": [{ "id": "a1", "name": "Globetrotter" }],
            "earned_achievements": [{ "user_id": "u1", "achievement_id": "a1" }]
        }))
        .expect("dataset parses")
    }

    #[test]
    fn grade_report_marks_each_question() {
        let answers: AnswerSheet =
            serde_json::from_value(json!({ "fr": "Paris", "it": "Milan" })).expect("answers");
        let grade = AttemptGrade::grade(&quiz().questions, &answers);

        let rendered = render_grade("Capitals", &grade);

        assert!(rendered.contains("Score 2/4 (50%) | 1 of 3 questions correct"));
        assert!(rendered.contains("fr [single]: correct (2/2 pts)"));
        assert!(rendered.contains("it [textInput]: incorrect (0/1 pts)"));
        assert!(rendered.contains("Rome became capital in 1871"));
        assert!(rendered.contains("es [textInput]: unanswered"));
    }

    #[test]
    fn overview_report_lists_level_topics_and_badges() {
        let repository = InMemoryLearningRepository::from_dataset(dataset());
        let service = LearningService::new(Arc::new(repository));
        let overview = service
            .progress_overview(&UserId("u1".into()))
            .expect("overview builds");

        let rendered = render_overview(&overview);

        assert!(rendered.contains("Progress for Lee (u1)"));
        assert!(rendered.contains("Level 2 | 130 XP | 30% to level 3 (70 XP to go)"));
        assert!(rendered.contains("3 quizzes completed"));
        assert!(rendered.contains("Geography: 33% (3/9)"));
        assert!(rendered.contains("Achievements: 1/1 earned"));
        assert!(rendered.contains("  - Globetrotter"));
    }
}
