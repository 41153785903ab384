use std::{path::PathBuf, time::Duration};

use shared::{error::FailureKind, protocol::ResponseViolation};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("failed to build upload request: {0}")]
    BuildRequest(#[source] reqwest::Error),
    #[error("prediction request timed out after {0:?}")]
    Timeout(Duration),
    #[error("failed to reach prediction service: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("prediction service returned HTTP {status}")]
    Status { status: u16, body: String },
    #[error("prediction response is not valid JSON: {0}")]
    MalformedBody(#[from] serde_json::Error),
    #[error("prediction response rejected: {0}")]
    InvalidResponse(#[from] ResponseViolation),
}

impl PredictError {
    pub(crate) fn from_transport(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout)
        } else {
            Self::Transport(err)
        }
    }

    pub fn failure_kind(&self) -> FailureKind {
        match self {
            PredictError::BuildRequest(err) => FailureKind::Validation {
                reason: err.to_string(),
            },
            PredictError::Timeout(_) => FailureKind::Network {
                timed_out: true,
                detail: self.to_string(),
            },
            PredictError::Transport(err) => FailureKind::Network {
                timed_out: false,
                detail: err.to_string(),
            },
            PredictError::Status { status, .. } => FailureKind::Server { status: *status },
            PredictError::MalformedBody(err) => FailureKind::MalformedResponse {
                detail: err.to_string(),
            },
            PredictError::InvalidResponse(violation) => FailureKind::MalformedResponse {
                detail: violation.to_string(),
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("failed to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("'{}' is not a regular file", .0.display())]
    NotAFile(PathBuf),
    #[error("file is empty")]
    Empty,
    #[error("file is {size} bytes; the limit is {limit} bytes")]
    TooLarge { size: u64, limit: u64 },
    #[error("file is not an image (detected type: {detected})")]
    NotAnImage { detected: String },
}

impl IntakeError {
    pub fn failure_kind(&self) -> FailureKind {
        FailureKind::Validation {
            reason: self.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("failed to read image header: {0}")]
    Header(#[from] std::io::Error),
    #[error("failed to decode image dimensions: {0}")]
    Decode(#[from] image::ImageError),
    #[error("preview job aborted: {0}")]
    Join(String),
}
