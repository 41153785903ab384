use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::PredictionResult;

/// Multipart field the prediction service reads the image from.
pub const UPLOAD_FIELD: &str = "file";

/// Slack allowed around `[0, 1]` before a confidence counts as malformed.
pub const CONFIDENCE_DRIFT_TOLERANCE: f64 = 0.01;

/// Body returned by the prediction service on success.
///
/// The deployed service answers with `prediccion` / `confianza`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    #[serde(default, alias = "prediction", alias = "prediccion")]
    pub label: Option<String>,
    #[serde(default, alias = "confianza")]
    pub confidence: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResponseViolation {
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("label is empty")]
    EmptyLabel,
    #[error("confidence is not a finite number")]
    NonFiniteConfidence,
    #[error("confidence {0} is outside [0, 1]")]
    ConfidenceOutOfRange(f64),
}

impl PredictionResponse {
    pub fn parse(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }

    /// Accepts the response as a whole or rejects it; nothing is defaulted.
    pub fn into_result(
        self,
        received_at: DateTime<Utc>,
    ) -> Result<PredictionResult, ResponseViolation> {
        let label = self.label.ok_or(ResponseViolation::MissingField("label"))?;
        let label = label.trim();
        if label.is_empty() {
            return Err(ResponseViolation::EmptyLabel);
        }
        let confidence = self
            .confidence
            .ok_or(ResponseViolation::MissingField("confidence"))?;

        Ok(PredictionResult {
            label: label.to_string(),
            confidence: validate_confidence(confidence)?,
            received_at,
        })
    }
}

pub fn validate_confidence(raw: f64) -> Result<f64, ResponseViolation> {
    if !raw.is_finite() {
        return Err(ResponseViolation::NonFiniteConfidence);
    }
    if raw < -CONFIDENCE_DRIFT_TOLERANCE || raw > 1.0 + CONFIDENCE_DRIFT_TOLERANCE {
        return Err(ResponseViolation::ConfidenceOutOfRange(raw));
    }
    Ok(raw.clamp(0.0, 1.0))
}
