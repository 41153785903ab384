use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{
    multipart::{Form, Part},
    Client,
};
use shared::{
    domain::{PredictionResult, SelectedFile},
    protocol::{PredictionResponse, UPLOAD_FIELD},
};
use tracing::{debug, info, warn};
use url::Url;

pub mod config;
pub mod error;
pub mod intake;
pub mod preview;

pub use error::{IntakeError, PredictError, PreviewError};

/// Maximum number of response-body bytes echoed into logs for non-2xx replies.
const ERROR_BODY_LOG_LIMIT: usize = 256;

#[async_trait]
pub trait PredictionClient: Send + Sync {
    async fn predict(&self, file: &SelectedFile) -> Result<PredictionResult, PredictError>;
}

/// Uploads an image as multipart form data and reads back the label and
/// confidence.
pub struct HttpPredictionClient {
    http: Client,
    endpoint: Url,
    timeout: Duration,
}

impl HttpPredictionClient {
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, PredictError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(PredictError::BuildRequest)?;
        Ok(Self {
            http,
            endpoint,
            timeout,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl PredictionClient for HttpPredictionClient {
    async fn predict(&self, file: &SelectedFile) -> Result<PredictionResult, PredictError> {
        let part = Part::bytes(file.bytes.to_vec())
            .file_name(file.name.clone())
            .mime_str(&file.mime_type)
            .map_err(PredictError::BuildRequest)?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        debug!(
            endpoint = %self.endpoint,
            file = %file.name,
            size_bytes = file.size_bytes,
            "uploading image for prediction"
        );
        let response = self
            .http
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|err| PredictError::from_transport(err, self.timeout))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| PredictError::from_transport(err, self.timeout))?;

        if !status.is_success() {
            let body = String::from_utf8_lossy(&body[..body.len().min(ERROR_BODY_LOG_LIMIT)])
                .into_owned();
            warn!(status = status.as_u16(), %body, "prediction service rejected upload");
            return Err(PredictError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let result = PredictionResponse::parse(&body)?.into_result(Utc::now())?;
        info!(
            label = %result.label,
            confidence = result.confidence,
            "prediction received"
        );
        Ok(result)
    }
}


#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
