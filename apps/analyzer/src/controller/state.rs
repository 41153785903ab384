//! Explicit, serializable session state.

use serde::{Deserialize, Serialize};
use shared::{
    domain::{PredictionResult, PreviewState, RequestId, SelectedFile, SelectionId},
    error::{FailureMessage, Locale},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub id: SelectionId,
    pub file: SelectedFile,
    pub preview: PreviewState,
}

/// The currently chosen file and its preview, if any.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionStore {
    current: Option<Selection>,
}

impl SelectionStore {
    pub fn current(&self) -> Option<&Selection> {
        self.current.as_ref()
    }

    pub fn current_mut(&mut self) -> Option<&mut Selection> {
        self.current.as_mut()
    }

    pub fn select(&mut self, id: SelectionId, file: SelectedFile) {
        self.current = Some(Selection {
            id,
            file,
            preview: PreviewState::Loading,
        });
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RequestStatus {
    #[default]
    Idle,
    Pending {
        request_id: RequestId,
    },
    Succeeded {
        request_id: RequestId,
    },
    Failed {
        request_id: RequestId,
    },
}

impl RequestStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, RequestStatus::Pending { .. })
    }

    pub fn pending_request(&self) -> Option<RequestId> {
        match self {
            RequestStatus::Pending { request_id } => Some(*request_id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Prediction(PredictionResult),
    Failure(FailureMessage),
}

/// Holds at most one outcome, so a prediction and a failure can never coexist.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultStore {
    outcome: Option<Outcome>,
}

impl ResultStore {
    pub fn prediction(&self) -> Option<&PredictionResult> {
        match &self.outcome {
            Some(Outcome::Prediction(result)) => Some(result),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&FailureMessage> {
        match &self.outcome {
            Some(Outcome::Failure(failure)) => Some(failure),
            _ => None,
        }
    }

    pub(crate) fn store(&mut self, outcome: Outcome) {
        self.outcome = Some(outcome);
    }

    pub fn clear(&mut self) {
        self.outcome = None;
    }

    pub fn is_empty(&self) -> bool {
        self.outcome.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    pub locale: Locale,
    pub selection: SelectionStore,
    pub request: RequestStatus,
    pub result: ResultStore,
    /// Status line for actions that were refused without entering the result panel.
    pub notice: Option<String>,
    pub(crate) last_selection_id: SelectionId,
    pub(crate) last_request_id: RequestId,
}

impl AppState {
    pub fn new(locale: Locale) -> Self {
        Self {
            locale,
            ..Self::default()
        }
    }

    /// True while a preview conversion or an upload is outstanding.
    pub fn is_busy(&self) -> bool {
        let preview_loading = self
            .selection
            .current()
            .is_some_and(|selection| selection.preview == PreviewState::Loading);
        preview_loading || self.request.is_pending()
    }

    pub fn can_analyze(&self) -> bool {
        self.selection
            .current()
            .is_some_and(|selection| selection.preview != PreviewState::Loading)
            && self.request == RequestStatus::Idle
    }
}
