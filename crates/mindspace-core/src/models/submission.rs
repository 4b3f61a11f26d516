use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::answer::AnswerValue;
use crate::models::question::QuestionSet;

/// Payload keys that sit beside the flattened answers.
pub const RESERVED_FIELDS: [&str; 2] = ["user", "total_score"];

/// The body POSTed to the scan endpoint.
///
/// Answers are flattened next to `user` and `total_score`, so the built-in
/// set serializes as `{ "user", "q1", "q2", "q3", "q4", "total_score" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    pub user: String,
    #[serde(flatten)]
    pub answers: BTreeMap<String, u8>,
    pub total_score: u32,
}

impl SubmissionPayload {
    /// Build a payload for every question in `questions`. Questions with no
    /// entry in `answers` contribute 0.
    pub fn build(
        user: impl Into<String>,
        questions: &QuestionSet,
        answers: &BTreeMap<String, AnswerValue>,
    ) -> Self {
        let answers: BTreeMap<String, u8> = questions
            .iter()
            .map(|q| {
                let value = answers.get(&q.id).map_or(0, |v| v.weight());
                (q.id.clone(), value)
            })
            .collect();
        let total_score = answers.values().map(|&v| u32::from(v)).sum();

        Self {
            user: user.into(),
            answers,
            total_score,
        }
    }

    pub fn answer(&self, question_id: &str) -> Option<u8> {
        self.answers.get(question_id).copied()
    }
}

/// Confirmation returned by the backend after a scan is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanReceipt {
    pub total_score: u32,
    #[serde(default)]
    pub percentage: Option<u32>,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answers(pairs: &[(&str, u8)]) -> BTreeMap<String, AnswerValue> {
        pairs
            .iter()
            .map(|&(id, v)| (id.to_string(), AnswerValue::try_from(v).unwrap()))
            .collect()
    }

    #[test]
    fn full_answer_set_sums_to_total() {
        let set = QuestionSet::depression_scan();
        let payload = SubmissionPayload::build(
            "7",
            &set,
            &answers(&[("q1", 2), ("q2", 1), ("q3", 3), ("q4", 0)]),
        );
        assert_eq!(payload.total_score, 6);

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "user": "7", "q1": 2, "q2": 1, "q3": 3, "q4": 0, "total_score": 6
            })
        );
    }

    #[test]
    fn unanswered_questions_default_to_zero() {
        let set = QuestionSet::depression_scan();
        let payload = SubmissionPayload::build("7", &set, &answers(&[("q1", 1), ("q2", 1)]));
        assert_eq!(payload.answer("q3"), Some(0));
        assert_eq!(payload.answer("q4"), Some(0));
        assert_eq!(payload.total_score, 2);
    }

    #[test]
    fn answers_for_unknown_questions_are_ignored() {
        let set = QuestionSet::depression_scan();
        let payload = SubmissionPayload::build("7", &set, &answers(&[("q9", 3)]));
        assert_eq!(payload.total_score, 0);
        assert!(payload.answer("q9").is_none());
    }

    #[test]
    fn receipt_requires_only_total_score() {
        let receipt: ScanReceipt = serde_json::from_str(r#"{"total_score": 6}"#).unwrap();
        assert_eq!(receipt.total_score, 6);
        assert!(receipt.percentage.is_none());

        assert!(serde_json::from_str::<ScanReceipt>(r#"{"message": "ok"}"#).is_err());
    }
}
