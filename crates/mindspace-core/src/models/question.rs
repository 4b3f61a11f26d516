use std::collections::HashSet;
use std::sync::{Arc, LazyLock};

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::models::answer::AnswerValue;
use crate::models::submission::RESERVED_FIELDS;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub text: String,
}

impl Question {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// A selectable option as rendered next to a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnswerOption {
    pub value: AnswerValue,
    pub label: &'static str,
}

/// Ordered, immutable list of questions for one screening instrument.
///
/// Every question shares the same four options, so a set's maximum score is
/// `3 * len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionSet {
    questions: Vec<Question>,
}

impl QuestionSet {
    /// Build a set. Rejects an empty set, empty or duplicate ids, and ids
    /// that would clash with the payload's own fields.
    pub fn new(questions: Vec<Question>) -> Result<Self, CoreError> {
        if questions.is_empty() {
            return Err(CoreError::EmptyQuestionSet);
        }

        let mut seen = HashSet::new();
        for question in &questions {
            if question.id.is_empty() {
                return Err(CoreError::EmptyQuestionId);
            }
            if RESERVED_FIELDS.contains(&question.id.as_str()) {
                return Err(CoreError::ReservedQuestionId(question.id.clone()));
            }
            if !seen.insert(question.id.as_str()) {
                return Err(CoreError::DuplicateQuestionId(question.id.clone()));
            }
        }

        Ok(Self { questions })
    }

    /// The built-in four-question depression scan.
    pub fn depression_scan() -> Arc<QuestionSet> {
        static SET: LazyLock<Arc<QuestionSet>> = LazyLock::new(|| {
            Arc::new(QuestionSet {
                questions: vec![
                    Question::new(
                        "q1",
                        "In the last 2 weeks, how often did you feel sad, unhappy, or like crying, even when nothing bad happened?",
                    ),
                    Question::new(
                        "q2",
                        "How often did you feel that things you usually enjoy (games, drawing, friends, TV, sports) were not fun anymore?",
                    ),
                    Question::new(
                        "q3",
                        "How often did you have trouble sleeping, like: sleeping too little, sleeping too much, or waking up tired?",
                    ),
                    Question::new(
                        "q4",
                        "How often did you feel very tired or low on energy, even after resting or sleeping?",
                    ),
                ],
            })
        });
        Arc::clone(&SET)
    }

    /// The options offered for every question, lowest weight first.
    pub fn options() -> [AnswerOption; 4] {
        AnswerValue::ALL.map(|value| AnswerOption {
            value,
            label: value.label(),
        })
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always false for a constructed set.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn contains(&self, question_id: &str) -> bool {
        self.position(question_id).is_some()
    }

    pub fn position(&self, question_id: &str) -> Option<usize> {
        self.questions.iter().position(|q| q.id == question_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }

    pub fn max_score(&self) -> u32 {
        self.questions.len() as u32 * u32::from(AnswerValue::MAX_WEIGHT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depression_scan_has_four_ordered_questions() {
        let set = QuestionSet::depression_scan();
        let ids: Vec<_> = set.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, ["q1", "q2", "q3", "q4"]);
        assert_eq!(set.max_score(), 12);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = QuestionSet::new(vec![Question::new("a", "one"), Question::new("a", "two")])
            .unwrap_err();
        assert!(matches!(err, CoreError::DuplicateQuestionId(id) if id == "a"));
    }

    #[test]
    fn rejects_ids_used_by_the_payload() {
        for id in ["user", "total_score"] {
            let err = QuestionSet::new(vec![Question::new("q1", "one"), Question::new(id, "two")])
                .unwrap_err();
            assert!(matches!(err, CoreError::ReservedQuestionId(ref r) if r == id));
        }
        assert!(QuestionSet::new(vec![Question::new("username", "ok")]).is_ok());
    }

    #[test]
    fn rejects_empty_set_and_empty_id() {
        assert!(matches!(
            QuestionSet::new(Vec::new()),
            Err(CoreError::EmptyQuestionSet)
        ));
        assert!(matches!(
            QuestionSet::new(vec![Question::new("", "blank")]),
            Err(CoreError::EmptyQuestionId)
        ));
    }

    #[test]
    fn options_are_labelled_in_weight_order() {
        let labels: Vec<_> = QuestionSet::options().iter().map(|o| o.label).collect();
        assert_eq!(
            labels,
            ["Not at all", "A little", "Many days", "Almost every day"]
        );
    }
}
