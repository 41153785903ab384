//! Events fed into the reducer: user actions and backend completions.

use shared::{
    domain::{PredictionResult, PreviewState, RequestId, SelectedFile, SelectionId},
    error::FailureKind,
};

#[derive(Debug, Clone)]
pub enum AppEvent {
    FileSelected(SelectedFile),
    SelectionRejected(FailureKind),
    PreviewCompleted {
        selection_id: SelectionId,
        preview: PreviewState,
    },
    AnalyzeRequested,
    PredictionSucceeded {
        request_id: RequestId,
        result: PredictionResult,
    },
    PredictionFailed {
        request_id: RequestId,
        failure: FailureKind,
    },
    ResetRequested,
}

impl AppEvent {
    pub fn name(&self) -> &'static str {
        match self {
            AppEvent::FileSelected(_) => "file_selected",
            AppEvent::SelectionRejected(_) => "selection_rejected",
            AppEvent::PreviewCompleted { .. } => "preview_completed",
            AppEvent::AnalyzeRequested => "analyze_requested",
            AppEvent::PredictionSucceeded { .. } => "prediction_succeeded",
            AppEvent::PredictionFailed { .. } => "prediction_failed",
            AppEvent::ResetRequested => "reset_requested",
        }
    }
}
