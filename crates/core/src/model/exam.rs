use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::model::catalog::CatalogError;
use crate::model::ids::ExamId;

/// A single multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamQuestion {
    pub id: u32,
    pub prompt: String,
    pub options: Vec<String>,
    /// Index into `options`. Questions without one can never be answered correctly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<usize>,
}

impl ExamQuestion {
    #[must_use]
    pub fn is_correct(&self, selected: Option<usize>) -> bool {
        matches!((self.correct_answer, selected), (Some(want), Some(got)) if want == got)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exam {
    pub id: ExamId,
    pub title: String,
    pub questions: Vec<ExamQuestion>,
    pub duration_minutes: u32,
}

impl Exam {
    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// Full time allowance in seconds.
    #[must_use]
    pub fn duration_secs(&self) -> u32 {
        self.duration_minutes.saturating_mul(60)
    }
}

/// Exam content dataset, keyed by exam id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExamCatalog {
    exams: HashMap<ExamId, Exam>,
}

impl ExamCatalog {
    #[must_use]
    pub fn new(exams: impl IntoIterator<Item = Exam>) -> Self {
        Self {
            exams: exams.into_iter().map(|e| (e.id.clone(), e)).collect(),
        }
    }

    /// Parse the dataset from a JSON array of exams.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Parse` if the JSON is not a list of exams.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let exams: Vec<Exam> =
            serde_json::from_str(json).map_err(|err| CatalogError::Parse(err.to_string()))?;
        Ok(Self::new(exams))
    }

    #[must_use]
    pub fn get(&self, id: &ExamId) -> Option<&Exam> {
        self.exams.get(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.exams.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exams.is_empty()
    }
}
