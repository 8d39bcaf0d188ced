//! Caller-side interpretation of a fit score. The orchestrator hands back the
//! model's raw number; handlers clamp and band it for display.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitmentBand {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl FitmentBand {
    /// ≥85 excellent, ≥70 good, ≥50 fair, anything lower poor.
    pub fn from_score(score: u8) -> Self {
        match score {
            85.. => FitmentBand::Excellent,
            70..=84 => FitmentBand::Good,
            50..=69 => FitmentBand::Fair,
            _ => FitmentBand::Poor,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FitmentBand::Excellent => "Excellent",
            FitmentBand::Good => "Good",
            FitmentBand::Fair => "Fair",
            FitmentBand::Poor => "Poor",
        }
    }
}

/// Clamps a model-reported score into 0..=100.
pub fn clamp_score(raw: i64) -> u8 {
    raw.clamp(0, 100) as u8
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FitmentSummary {
    pub score: u8,
    pub band: FitmentBand,
    pub label: String,
}

impl FitmentSummary {
    pub fn from_raw(raw: i64) -> Self {
        let score = clamp_score(raw);
        let band = FitmentBand::from_score(score);
        Self {
            score,
            band,
            label: band.label().to_string(),
        }
    }
}
