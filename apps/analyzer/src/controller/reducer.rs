//! Pure `(state, event) -> (state, commands)` transitions of the analysis session.
//!
//! Completions carry the selection or request id they were started for; any
//! completion whose id is no longer current is dropped here, which is what
//! keeps superseded previews and abandoned uploads out of the stores.

use shared::{
    domain::{PredictionResult, PreviewState, RequestId, SelectedFile, SelectionId},
    error::{FailureKind, FailureMessage},
};
use tracing::{debug, info, warn};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    events::AppEvent,
    state::{AppState, Outcome, RequestStatus},
};

#[derive(Debug)]
pub struct Transition {
    pub state: AppState,
    pub commands: Vec<BackendCommand>,
}

impl Transition {
    fn unchanged(state: AppState) -> Self {
        Self {
            state,
            commands: Vec::new(),
        }
    }
}

pub fn reduce(state: AppState, event: AppEvent) -> Transition {
    match event {
        AppEvent::FileSelected(file) => select_file(state, file),
        AppEvent::SelectionRejected(kind) => reject_selection(state, kind),
        AppEvent::PreviewCompleted {
            selection_id,
            preview,
        } => complete_preview(state, selection_id, preview),
        AppEvent::AnalyzeRequested => start_analysis(state),
        AppEvent::PredictionSucceeded { request_id, result } => {
            complete_prediction(state, request_id, Ok(result))
        }
        AppEvent::PredictionFailed {
            request_id,
            failure,
        } => complete_prediction(state, request_id, Err(failure)),
        AppEvent::ResetRequested => reset(state),
    }
}

/// Commands that abandon whatever is still running for the current cycle.
fn abandon_outstanding(state: &AppState) -> Vec<BackendCommand> {
    let mut commands = Vec::new();
    if let Some(request_id) = state.request.pending_request() {
        commands.push(BackendCommand::CancelPrediction { request_id });
    }
    if let Some(selection) = state.selection.current() {
        if selection.preview == PreviewState::Loading {
            commands.push(BackendCommand::CancelPreview {
                selection_id: selection.id,
            });
        }
    }
    commands
}

fn select_file(mut state: AppState, file: SelectedFile) -> Transition {
    let mut commands = abandon_outstanding(&state);

    let selection_id = state.last_selection_id.next();
    state.last_selection_id = selection_id;
    info!(
        %selection_id,
        file = %file.name,
        mime_type = %file.mime_type,
        size_bytes = file.size_bytes,
        "file selected"
    );

    state.selection.select(selection_id, file.clone());
    state.request = RequestStatus::Idle;
    state.result.clear();
    state.notice = None;
    commands.push(BackendCommand::ComputePreview { selection_id, file });

    Transition { state, commands }
}

fn reject_selection(mut state: AppState, kind: FailureKind) -> Transition {
    warn!(
        kind = kind.name(),
        kept_selection = !state.selection.is_empty(),
        "file selection rejected: {kind}"
    );
    state.notice = Some(kind.to_string());
    Transition::unchanged(state)
}

fn complete_preview(
    mut state: AppState,
    selection_id: SelectionId,
    preview: PreviewState,
) -> Transition {
    match state.selection.current_mut() {
        Some(selection)
            if selection.id == selection_id && selection.preview == PreviewState::Loading =>
        {
            selection.preview = preview;
        }
        _ => debug!(%selection_id, "dropping preview for superseded selection"),
    }
    Transition::unchanged(state)
}

/// Only an idle cycle may start an upload. `Succeeded` and `Failed` stay
/// terminal until a reset or a new pick.
fn start_analysis(mut state: AppState) -> Transition {
    let Some(selection) = state.selection.current() else {
        debug!("analyze ignored: no file selected");
        return Transition::unchanged(state);
    };
    if state.request != RequestStatus::Idle {
        debug!(request = ?state.request, "analyze ignored: cycle not idle");
        return Transition::unchanged(state);
    }
    if selection.preview == PreviewState::Loading {
        debug!("analyze ignored: preview still loading");
        state.notice = Some(state.locale.preview_pending_text().to_string());
        return Transition::unchanged(state);
    }

    debug_assert!(state.result.is_empty(), "idle cycle holds an outcome");

    let selection_id = selection.id;
    let file = selection.file.clone();
    let request_id = state.last_request_id.next();
    state.last_request_id = request_id;
    info!(%request_id, %selection_id, file = %file.name, "analysis started");

    state.request = RequestStatus::Pending { request_id };
    state.notice = None;

    Transition {
        state,
        commands: vec![BackendCommand::SubmitPrediction { request_id, file }],
    }
}

fn complete_prediction(
    mut state: AppState,
    request_id: RequestId,
    outcome: Result<PredictionResult, FailureKind>,
) -> Transition {
    if state.request != (RequestStatus::Pending { request_id }) {
        debug!(%request_id, "dropping completion for abandoned request");
        return Transition::unchanged(state);
    }

    match outcome {
        Ok(result) => {
            info!(
                %request_id,
                label = %result.label,
                confidence = result.confidence,
                "analysis succeeded"
            );
            state.request = RequestStatus::Succeeded { request_id };
            state.result.store(Outcome::Prediction(result));
        }
        Err(kind) => {
            warn!(%request_id, kind = kind.name(), "analysis failed: {kind}");
            state.request = RequestStatus::Failed { request_id };
            state
                .result
                .store(Outcome::Failure(FailureMessage::localized(kind, state.locale)));
        }
    }
    Transition::unchanged(state)
}

fn reset(mut state: AppState) -> Transition {
    let commands = abandon_outstanding(&state);
    info!("session reset");
    // Id counters and locale survive so late completions never match a fresh cycle.
    state.selection.clear();
    state.result.clear();
    state.request = RequestStatus::Idle;
    state.notice = None;
    Transition { state, commands }
}

#[cfg(test)]
#[path = "../tests/reducer_tests.rs"]
mod tests;
