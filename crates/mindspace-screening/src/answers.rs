use std::collections::BTreeMap;
use std::sync::Arc;

use mindspace_core::models::answer::AnswerValue;
use mindspace_core::models::question::QuestionSet;

use crate::error::ScreeningError;

/// Selected answers keyed by question id.
///
/// Entries are only ever added or overwritten; the store is dropped with
/// its session.
#[derive(Debug, Clone)]
pub struct AnswerStore {
    questions: Arc<QuestionSet>,
    answers: BTreeMap<String, AnswerValue>,
}

impl AnswerStore {
    pub fn new(questions: Arc<QuestionSet>) -> Self {
        Self {
            questions,
            answers: BTreeMap::new(),
        }
    }

    /// Record `value` for `question_id`, replacing any earlier choice.
    pub fn set_answer(
        &mut self,
        question_id: &str,
        value: u8,
    ) -> Result<AnswerValue, ScreeningError> {
        if !self.questions.contains(question_id) {
            return Err(ScreeningError::UnknownQuestion(question_id.to_string()));
        }
        let value = AnswerValue::try_from(value)?;
        self.answers.insert(question_id.to_string(), value);
        Ok(value)
    }

    pub fn is_answered(&self, question_id: &str) -> bool {
        self.answers.contains_key(question_id)
    }

    pub fn get(&self, question_id: &str) -> Option<AnswerValue> {
        self.answers.get(question_id).copied()
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    pub fn total_score(&self) -> u32 {
        self.answers.values().map(|v| u32::from(v.weight())).sum()
    }

    pub fn as_map(&self) -> &BTreeMap<String, AnswerValue> {
        &self.answers
    }
}
