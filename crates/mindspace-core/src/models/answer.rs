use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// One of the four fixed-weight options shared by every question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum AnswerValue {
    NotAtAll = 0,
    ALittle = 1,
    ManyDays = 2,
    AlmostEveryDay = 3,
}

impl AnswerValue {
    pub const ALL: [AnswerValue; 4] = [
        AnswerValue::NotAtAll,
        AnswerValue::ALittle,
        AnswerValue::ManyDays,
        AnswerValue::AlmostEveryDay,
    ];

    /// Highest weight any single answer can carry.
    pub const MAX_WEIGHT: u8 = 3;

    pub fn weight(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            AnswerValue::NotAtAll => "Not at all",
            AnswerValue::ALittle => "A little",
            AnswerValue::ManyDays => "Many days",
            AnswerValue::AlmostEveryDay => "Almost every day",
        }
    }
}

impl TryFrom<u8> for AnswerValue {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(AnswerValue::NotAtAll),
            1 => Ok(AnswerValue::ALittle),
            2 => Ok(AnswerValue::ManyDays),
            3 => Ok(AnswerValue::AlmostEveryDay),
            other => Err(CoreError::InvalidAnswerValue(other)),
        }
    }
}

impl From<AnswerValue> for u8 {
    fn from(value: AnswerValue) -> Self {
        value.weight()
    }
}
