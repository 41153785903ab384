use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Internal classification of a failed analysis cycle.
///
/// Users always see the same localized text; the kind is kept for logs and
/// JSON snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureKind {
    #[error("validation error: {reason}")]
    Validation { reason: String },
    #[error("network error (timed out: {timed_out}): {detail}")]
    Network { timed_out: bool, detail: String },
    #[error("server error: HTTP {status}")]
    Server { status: u16 },
    #[error("malformed response: {detail}")]
    MalformedResponse { detail: String },
}

impl FailureKind {
    pub fn name(&self) -> &'static str {
        match self {
            FailureKind::Validation { .. } => "validation",
            FailureKind::Network { .. } => "network",
            FailureKind::Server { .. } => "server",
            FailureKind::MalformedResponse { .. } => "malformed_response",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Locale {
    #[default]
    Es,
    En,
}

impl Locale {
    pub fn generic_failure_text(self) -> &'static str {
        match self {
            Locale::Es => "Error al procesar la imagen. Por favor, intenta nuevamente.",
            Locale::En => "Error processing the image. Please try again.",
        }
    }

    /// Status line for an analyze request made before the preview is ready.
    pub fn preview_pending_text(self) -> &'static str {
        match self {
            Locale::Es => "La vista previa aún se está generando; inténtalo de nuevo en un momento.",
            Locale::En => "The preview is still being generated; try again in a moment.",
        }
    }
}

impl TryFrom<String> for Locale {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.trim().to_lowercase().as_str() {
            "es" => Ok(Self::Es),
            "en" => Ok(Self::En),
            other => Err(format!(
                "{other} is not a supported locale. Use either `es` or `en`."
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureMessage {
    pub message: String,
    pub kind: FailureKind,
}

impl FailureMessage {
    pub fn localized(kind: FailureKind, locale: Locale) -> Self {
        Self {
            message: locale.generic_failure_text().to_string(),
            kind,
        }
    }
}
