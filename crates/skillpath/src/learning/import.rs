//! Bulk question authoring from CSV exports.
//!
//! Expected header: `id,type,text,options,correct,points,tags,explanation`.
//! List cells are `|`-separated. `correct` holds option indexes for choice
//! questions, accepted answers for `textInput`, `true`/`false` for
//! `trueFalse`, and the items in canonical order for `ordering`.

use serde::{Deserialize, Deserializer};
use std::io::Read;
use std::path::Path;

use super::domain::{Question, QuestionId, QuestionKind};

#[derive(Debug, thiserror::Error)]
pub enum QuestionImportError {
    #[error("failed to read question file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid question CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: unknown question type '{value}'")]
    UnknownType { row: usize, value: String },
    #[error("row {row}: '{value}' is not a valid option index")]
    InvalidIndex { row: usize, value: String },
    #[error("row {row}: option index {index} is out of range")]
    IndexOutOfRange { row: usize, index: usize },
    #[error("row {row}: expected true or false, got '{value}'")]
    InvalidBoolean { row: usize, value: String },
    #[error("row {row}: question id is required")]
    MissingId { row: usize },
}

#[derive(Debug, Deserialize)]
struct QuestionRow {
    #[serde(default)]
    id: String,
    #[serde(rename = "type")]
    question_type: String,
    #[serde(default)]
    text: String,
    #[serde(default, deserialize_with = "pipe_list")]
    options: Vec<String>,
    #[serde(default, deserialize_with = "pipe_list")]
    correct: Vec<String>,
    #[serde(default)]
    points: Option<u32>,
    #[serde(default, deserialize_with = "pipe_list")]
    tags: Vec<String>,
    #[serde(default)]
    explanation: Option<String>,
}

fn pipe_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .map(|value| {
            value
                .split('|')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default())
}

pub struct QuestionCsvImporter;

impl QuestionCsvImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Question>, QuestionImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Question>, QuestionImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut questions = Vec::new();

        for (offset, record) in csv_reader.deserialize::<QuestionRow>().enumerate() {
            // Header is row 1.
            let row = offset + 2;
            questions.push(question_from_row(row, record?)?);
        }

        Ok(questions)
    }
}

fn question_from_row(row: usize, record: QuestionRow) -> Result<Question, QuestionImportError> {
    if record.id.is_empty() {
        return Err(QuestionImportError::MissingId { row });
    }

    let kind = match record.question_type.as_str() {
        "single" => QuestionKind::SingleChoice {
            correct_answers: indexes(row, &record.correct, record.options.len())?,
            options: record.options,
        },
        "multiple" => QuestionKind::MultipleChoice {
            correct_answers: indexes(row, &record.correct, record.options.len())?,
            options: record.options,
        },
        "textInput" => QuestionKind::FreeText {
            correct_answers: record.correct,
        },
        "trueFalse" => QuestionKind::TrueFalse {
            correct_answer: Some(boolean(row, record.correct.first())?),
        },
        "ordering" => QuestionKind::Ordering {
            order_items: record.correct,
        },
        other => {
            return Err(QuestionImportError::UnknownType {
                row,
                value: other.to_string(),
            })
        }
    };

    Ok(Question {
        id: QuestionId(record.id),
        text: record.text,
        kind,
        explanation: record.explanation.filter(|text| !text.is_empty()),
        points: record.points.unwrap_or(1),
        tags: record.tags,
    })
}

fn indexes(
    row: usize,
    cells: &[String],
    option_count: usize,
) -> Result<Vec<usize>, QuestionImportError> {
    cells
        .iter()
        .map(|cell| {
            let index = cell
                .parse::<usize>()
                .map_err(|_| QuestionImportError::InvalidIndex {
                    row,
                    value: cell.clone(),
                })?;
            if index >= option_count {
                return Err(QuestionImportError::IndexOutOfRange { row, index });
            }
            Ok(index)
        })
        .collect()
}

fn boolean(row: usize, cell: Option<&String>) -> Result<bool, QuestionImportError> {
    match cell.map(|value| value.to_ascii_lowercase()).as_deref() {
        Some("true") => Ok(true),
        Some("false") => Ok(false),
        _ => Err(QuestionImportError::InvalidBoolean {
            row,
            value: cell.cloned().unwrap_or_default(),
        }),
    }
}
