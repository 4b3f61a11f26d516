use serde::{Deserialize, Serialize};

/// Percentage above which a result is flagged for follow-up.
pub const ATTENTION_THRESHOLD_PERCENT: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClinicalStatus {
    Stable,
    AttentionRequired,
}

impl ClinicalStatus {
    pub fn label(self) -> &'static str {
        match self {
            ClinicalStatus::Stable => "Normal / Stable",
            ClinicalStatus::AttentionRequired => "Attention Required",
        }
    }
}

/// Interpretation of a total score against the instrument's maximum.
/// This is a screening aid, not a diagnosis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Severity {
    pub total_score: u32,
    pub max_score: u32,
    pub percentage: u32,
    pub status: ClinicalStatus,
}

impl Severity {
    pub fn assess(total_score: u32, max_score: u32) -> Self {
        let percentage = percentage(total_score, max_score);
        let status = if percentage > ATTENTION_THRESHOLD_PERCENT {
            ClinicalStatus::AttentionRequired
        } else {
            ClinicalStatus::Stable
        };
        Self {
            total_score,
            max_score,
            percentage,
            status,
        }
    }
}

/// `total / max * 100`, rounded half away from zero. A zero maximum yields 0.
pub fn percentage(total_score: u32, max_score: u32) -> u32 {
    if max_score == 0 {
        return 0;
    }
    (f64::from(total_score) / f64::from(max_score) * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_score_is_stable() {
        let s = Severity::assess(6, 12);
        assert_eq!(s.percentage, 50);
        assert_eq!(s.status, ClinicalStatus::Stable);
    }

    #[test]
    fn above_half_requires_attention() {
        let s = Severity::assess(7, 12);
        assert_eq!(s.percentage, 58);
        assert_eq!(s.status, ClinicalStatus::AttentionRequired);
    }

    #[test]
    fn rounds_to_nearest_percent() {
        assert_eq!(percentage(1, 12), 8);
        assert_eq!(percentage(2, 12), 17);
        assert_eq!(percentage(12, 12), 100);
        assert_eq!(percentage(3, 0), 0);
    }
}
