use serde::{Deserialize, Serialize};

use crate::error::EnhanceError;

pub const DEFAULT_MODE: &str = "general";

/// A validated enhancement request.
///
/// Construction goes through [`EnhancementRequest::new`], so an instance always carries
/// non-blank input and a resolved mode label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnhancementRequest {
    input: String,
    mode: String,
}

impl EnhancementRequest {
    /// Validate raw request fields.
    ///
    /// Blank input is rejected with [`EnhanceError::InvalidRequest`]. A missing or blank
    /// mode resolves to [`DEFAULT_MODE`].
    pub fn new(input: impl Into<String>, mode: Option<&str>) -> Result<Self, EnhanceError> {
        let input = input.into();
        if input.trim().is_empty() {
            return Err(EnhanceError::input_required());
        }

        let mode = mode
            .map(str::trim)
            .filter(|mode| !mode.is_empty())
            .unwrap_or(DEFAULT_MODE)
            .to_string();

        Ok(Self { input, mode })
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn mode(&self) -> &str {
        &self.mode
    }
}

/// Heuristic quality score.
///
/// Only the five sub-scores are stored. `final_score` is derived on demand and written
/// out when serializing; it is never read back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "ScoreReport")]
pub struct QualityScore {
    pub clarity: u8,
    pub specificity: u8,
    pub executability: u8,
    pub ambiguity_control: u8,
    pub structure: u8,
}

impl QualityScore {
    pub fn final_score(&self) -> f64 {
        let total = u32::from(self.clarity)
            + u32::from(self.specificity)
            + u32::from(self.executability)
            + u32::from(self.ambiguity_control)
            + u32::from(self.structure);
        f64::from(total) / 5.0
    }
}

#[derive(Serialize)]
struct ScoreReport {
    clarity: u8,
    specificity: u8,
    executability: u8,
    ambiguity_control: u8,
    structure: u8,
    final_score: f64,
}

impl From<QualityScore> for ScoreReport {
    fn from(score: QualityScore) -> Self {
        Self {
            clarity: score.clarity,
            specificity: score.specificity,
            executability: score.executability,
            ambiguity_control: score.ambiguity_control,
            structure: score.structure,
            final_score: score.final_score(),
        }
    }
}

/// Response envelope for one enhancement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancementResult {
    pub optimized_prompt: String,
    pub improvements_applied: Vec<String>,
    pub score: QualityScore,
    pub compact_version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_rejects_blank_input() {
        let err = EnhancementRequest::new("   \n\t", None).unwrap_err();
        assert_eq!(err, EnhanceError::InvalidRequest("Input is required".to_string()));
        assert!(EnhancementRequest::new("", Some("coding")).is_err());
    }

    #[test]
    fn request_defaults_mode_to_general() {
        let request = EnhancementRequest::new("write a parser", None).unwrap();
        assert_eq!(request.mode(), "general");

        let request = EnhancementRequest::new("write a parser", Some("  ")).unwrap();
        assert_eq!(request.mode(), "general");
    }

    #[test]
    fn request_keeps_input_verbatim_and_trims_mode() {
        let request = EnhancementRequest::new("  build a CLI  ", Some(" coding ")).unwrap();
        assert_eq!(request.input(), "  build a CLI  ");
        assert_eq!(request.mode(), "coding");
    }

    #[test]
    fn final_score_is_mean_of_sub_scores() {
        let score = QualityScore {
            clarity: 9,
            specificity: 8,
            executability: 9,
            ambiguity_control: 8,
            structure: 9,
        };
        assert!((score.final_score() - 8.6).abs() < 1e-9);
    }

    #[test]
    fn score_serializes_derived_final_score() {
        let score = QualityScore {
            clarity: 6,
            specificity: 5,
            executability: 5,
            ambiguity_control: 8,
            structure: 5,
        };
        let json = serde_json::to_value(score).unwrap();

        assert_eq!(json["clarity"], 6);
        assert_eq!(json["ambiguity_control"], 8);
        assert!((json["final_score"].as_f64().unwrap() - 5.8).abs() < 1e-9);
    }

    #[test]
    fn score_ignores_stored_final_score_when_deserializing() {
        let json = r#"{"clarity":9,"specificity":8,"executability":9,"ambiguity_control":8,"structure":9,"final_score":1.0}"#;
        let score: QualityScore = serde_json::from_str(json).unwrap();
        assert!((score.final_score() - 8.6).abs() < 1e-9);
    }
}
