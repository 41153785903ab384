//! Backend commands emitted by the reducer for the runtime to execute.

use shared::domain::{RequestId, SelectedFile, SelectionId};

#[derive(Debug, Clone, PartialEq)]
pub enum BackendCommand {
    ComputePreview {
        selection_id: SelectionId,
        file: SelectedFile,
    },
    CancelPreview {
        selection_id: SelectionId,
    },
    SubmitPrediction {
        request_id: RequestId,
        file: SelectedFile,
    },
    CancelPrediction {
        request_id: RequestId,
    },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::ComputePreview { .. } => "compute_preview",
            BackendCommand::CancelPreview { .. } => "cancel_preview",
            BackendCommand::SubmitPrediction { .. } => "submit_prediction",
            BackendCommand::CancelPrediction { .. } => "cancel_prediction",
        }
    }
}
