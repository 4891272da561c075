// Dual-path extraction: AI-assisted primary path with a deterministic heuristic fallback.
// Both paths emit the same candidate object shape; profile::validation is the single entry
// point that turns a candidate into an AlumniProfile.

pub mod ai;
pub mod heuristic;
pub mod prompts;
pub mod record;
pub mod rules;

use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionSource {
    Ai,
    Heuristic,
}

/// Candidate profile fields plus where they came from.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionResult {
    AiDerived {
        fields: Value,
        /// Self-reported by the model; absent when it did not say.
        confidence: Option<f64>,
    },
    HeuristicDerived {
        fields: Value,
        /// Why the AI path was abandoned, when it was attempted.
        fallback_reason: Option<String>,
    },
}

impl ExtractionResult {
    pub fn source(&self) -> ExtractionSource {
        match self {
            ExtractionResult::AiDerived { .. } => ExtractionSource::Ai,
            ExtractionResult::HeuristicDerived { .. } => ExtractionSource::Heuristic,
        }
    }

    pub fn candidate(&self) -> &Value {
        match self {
            ExtractionResult::AiDerived { fields, .. }
            | ExtractionResult::HeuristicDerived { fields, .. } => fields,
        }
    }

    pub fn confidence(&self) -> Option<f64> {
        match self {
            ExtractionResult::AiDerived { confidence, .. } => *confidence,
            ExtractionResult::HeuristicDerived { .. } => Some(heuristic::HEURISTIC_CONFIDENCE),
        }
    }

    pub fn fallback_reason(&self) -> Option<&str> {
        match self {
            ExtractionResult::AiDerived { .. } => None,
            ExtractionResult::HeuristicDerived {
                fallback_reason, ..
            } => fallback_reason.as_deref(),
        }
    }
}
