use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
        )]
        pub struct $name(pub u64);

        impl $name {
            pub fn next(self) -> Self {
                Self(self.0 + 1)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(SelectionId);
id_newtype!(RequestId);

/// Upper bound advertised and enforced for a single upload.
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// An image picked by the user, validated and ready to be previewed or uploaded.
///
/// The payload is shared so that handing it to a preview job and an upload
/// does not copy the bytes. It is not part of serialized snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedFile {
    pub name: String,
    pub mime_type: String,
    pub size_bytes: u64,
    #[serde(skip, default = "empty_payload")]
    pub bytes: Arc<[u8]>,
}

fn empty_payload() -> Arc<[u8]> {
    Arc::from(Vec::new())
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        let size_bytes = bytes.len() as u64;
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size_bytes,
            bytes: Arc::from(bytes),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preview {
    pub data_url: String,
    /// Pixel size, when the header could be probed.
    pub dimensions: Option<(u32, u32)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PreviewState {
    Loading,
    Ready(Preview),
    Unavailable { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub label: String,
    /// Always within `[0, 1]`.
    pub confidence: f64,
    pub received_at: DateTime<Utc>,
}

impl PredictionResult {
    pub fn confidence_percent(&self) -> f64 {
        (self.confidence.clamp(0.0, 1.0) * 100.0).clamp(0.0, 100.0)
    }
}
