use super::{reduce, Transition};
use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    events::AppEvent,
    state::{AppState, RequestStatus},
};

use chrono::Utc;
use shared::{
    domain::{Preview, PredictionResult, PreviewState, RequestId, SelectedFile, SelectionId},
    error::{FailureKind, Locale},
};

fn png_file(name: &str) -> SelectedFile {
    SelectedFile::new(name, "image/png", vec![0x89, b'P', b'N', b'G'])
}

fn ready_preview() -> PreviewState {
    PreviewState::Ready(Preview {
        data_url: "data:image/png;base64,AAAA".to_string(),
        dimensions: Some((4, 3)),
    })
}

fn prediction(label: &str, confidence: f64) -> PredictionResult {
    PredictionResult {
        label: label.to_string(),
        confidence,
        received_at: Utc::now(),
    }
}

fn apply(state: AppState, events: impl IntoIterator<Item = AppEvent>) -> AppState {
    events
        .into_iter()
        .fold(state, |state, event| reduce(state, event).state)
}

/// A state with `name` selected and its preview ready.
fn selected(name: &str) -> AppState {
    let state = apply(AppState::default(), [AppEvent::FileSelected(png_file(name))]);
    let selection_id = state.selection.current().expect("selection").id;
    apply(
        state,
        [AppEvent::PreviewCompleted {
            selection_id,
            preview: ready_preview(),
        }],
    )
}

fn pending(name: &str) -> (AppState, RequestId) {
    let Transition { state, commands } = reduce(selected(name), AppEvent::AnalyzeRequested);
    let request_id = state.request.pending_request().expect("pending request");
    assert!(matches!(
        commands.as_slice(),
        [BackendCommand::SubmitPrediction { request_id: sent, .. }] if *sent == request_id
    ));
    (state, request_id)
}

#[test]
fn selecting_a_file_starts_a_preview() {
    let Transition { state, commands } =
        reduce(AppState::default(), AppEvent::FileSelected(png_file("cat.png")));

    let selection = state.selection.current().expect("selection");
    assert_eq!(selection.id, SelectionId(1));
    assert_eq!(selection.preview, PreviewState::Loading);
    assert!(state.result.is_empty());
    assert_eq!(
        commands,
        vec![BackendCommand::ComputePreview {
            selection_id: SelectionId(1),
            file: png_file("cat.png"),
        }]
    );
}

#[test]
fn analyze_without_selection_is_a_no_op() {
    let Transition { state, commands } = reduce(AppState::default(), AppEvent::AnalyzeRequested);

    assert_eq!(state, AppState::default());
    assert!(commands.is_empty());
}

#[test]
fn analyze_while_pending_does_not_submit_twice() {
    let (state, request_id) = pending("cat.png");

    let Transition { state, commands } = reduce(state, AppEvent::AnalyzeRequested);

    assert!(commands.is_empty());
    assert_eq!(state.request, RequestStatus::Pending { request_id });
}

#[test]
fn analyze_waits_for_the_preview() {
    let state = apply(
        AppState::default(),
        [AppEvent::FileSelected(png_file("cat.png"))],
    );

    let Transition { state, commands } = reduce(state, AppEvent::AnalyzeRequested);

    assert!(commands.is_empty());
    assert_eq!(state.request, RequestStatus::Idle);
    assert!(state.notice.is_some());
}

#[test]
fn analyze_is_allowed_when_preview_is_unavailable() {
    let state = apply(
        AppState::default(),
        [
            AppEvent::FileSelected(png_file("cat.png")),
            AppEvent::PreviewCompleted {
                selection_id: SelectionId(1),
                preview: PreviewState::Unavailable {
                    reason: "corrupt header".to_string(),
                },
            },
        ],
    );

    let Transition { state, commands } = reduce(state, AppEvent::AnalyzeRequested);

    assert!(state.request.is_pending());
    assert_eq!(commands.len(), 1);
}

#[test]
fn success_fills_the_prediction_and_clears_pending() {
    let (state, request_id) = pending("cat.png");

    let state = apply(
        state,
        [AppEvent::PredictionSucceeded {
            request_id,
            result: prediction("Gato", 0.9732),
        }],
    );

    assert_eq!(state.request, RequestStatus::Succeeded { request_id });
    let result = state.result.prediction().expect("prediction");
    assert_eq!(result.label, "Gato");
    assert!(state.result.failure().is_none());
}

#[test]
fn failure_is_stored_as_localized_message() {
    let (mut state, request_id) = pending("cat.png");
    state.locale = Locale::En;

    let state = apply(
        state,
        [AppEvent::PredictionFailed {
            request_id,
            failure: FailureKind::Server { status: 500 },
        }],
    );

    let failure = state.result.failure().expect("failure");
    assert_eq!(
        failure.message,
        "Error processing the image. Please try again."
    );
    assert_eq!(failure.kind, FailureKind::Server { status: 500 });
    assert!(state.result.prediction().is_none());
    assert_eq!(state.request, RequestStatus::Failed { request_id });
}

#[test]
fn every_failure_kind_shows_the_same_text() {
    let kinds = [
        FailureKind::Validation {
            reason: "bad".to_string(),
        },
        FailureKind::Network {
            timed_out: true,
            detail: "slow".to_string(),
        },
        FailureKind::Server { status: 503 },
        FailureKind::MalformedResponse {
            detail: "not json".to_string(),
        },
    ];

    for kind in kinds {
        let (state, request_id) = pending("cat.png");
        let state = apply(
            state,
            [AppEvent::PredictionFailed {
                request_id,
                failure: kind,
            }],
        );
        assert_eq!(
            state.result.failure().expect("failure").message,
            "Error al procesar la imagen. Por favor, intenta nuevamente."
        );
    }
}

#[test]
fn analyze_after_failure_is_a_no_op() {
    let (state, request_id) = pending("cat.png");
    let state = apply(
        state,
        [AppEvent::PredictionFailed {
            request_id,
            failure: FailureKind::Server { status: 500 },
        }],
    );
    assert!(!state.can_analyze());

    let Transition {
        state: after,
        commands,
    } = reduce(state.clone(), AppEvent::AnalyzeRequested);

    assert!(commands.is_empty());
    assert_eq!(after, state);
    assert_eq!(after.request, RequestStatus::Failed { request_id });
}

#[test]
fn analyze_after_success_is_a_no_op() {
    let (state, request_id) = pending("cat.png");
    let state = apply(
        state,
        [AppEvent::PredictionSucceeded {
            request_id,
            result: prediction("Gato", 0.9),
        }],
    );
    assert!(!state.can_analyze());

    let Transition {
        state: after,
        commands,
    } = reduce(state.clone(), AppEvent::AnalyzeRequested);

    assert!(commands.is_empty());
    assert_eq!(after, state);
}

#[test]
fn preview_loading_notice_follows_locale() {
    let mut state = apply(
        AppState::default(),
        [AppEvent::FileSelected(png_file("cat.png"))],
    );
    state.locale = Locale::En;
    let english = reduce(state.clone(), AppEvent::AnalyzeRequested).state;
    state.locale = Locale::Es;
    let spanish = reduce(state, AppEvent::AnalyzeRequested).state;

    assert_eq!(
        english.notice.as_deref(),
        Some(Locale::En.preview_pending_text())
    );
    assert_eq!(
        spanish.notice.as_deref(),
        Some(Locale::Es.preview_pending_text())
    );
    assert_ne!(english.notice, spanish.notice);
}

#[test]
fn reset_cancels_pending_request_and_drops_late_completion() {
    let (state, request_id) = pending("cat.png");

    let Transition { state, commands } = reduce(state, AppEvent::ResetRequested);

    assert_eq!(commands, vec![BackendCommand::CancelPrediction { request_id }]);
    assert!(state.selection.is_empty());
    assert_eq!(state.request, RequestStatus::Idle);

    let late = apply(
        state.clone(),
        [AppEvent::PredictionSucceeded {
            request_id,
            result: prediction("Perro", 0.5),
        }],
    );
    assert_eq!(late, state);
}

#[test]
fn reset_keeps_locale_and_id_counters() {
    let (mut state, _) = pending("cat.png");
    state.locale = Locale::En;

    let state = apply(
        state,
        [
            AppEvent::ResetRequested,
            AppEvent::FileSelected(png_file("dog.png")),
        ],
    );

    assert_eq!(state.locale, Locale::En);
    assert_eq!(state.selection.current().expect("selection").id, SelectionId(2));
}

#[test]
fn reselecting_abandons_the_pending_request() {
    let (state, request_id) = pending("cat.png");

    let Transition { state, commands } =
        reduce(state, AppEvent::FileSelected(png_file("dog.png")));

    assert_eq!(
        commands.first(),
        Some(&BackendCommand::CancelPrediction { request_id })
    );
    assert!(matches!(
        commands.last(),
        Some(BackendCommand::ComputePreview { .. })
    ));
    assert_eq!(state.request, RequestStatus::Idle);

    let state = apply(
        state,
        [AppEvent::PredictionFailed {
            request_id,
            failure: FailureKind::Server { status: 500 },
        }],
    );
    assert!(state.result.is_empty());
}

#[test]
fn superseded_preview_is_ignored() {
    let state = apply(
        AppState::default(),
        [
            AppEvent::FileSelected(png_file("a.png")),
            AppEvent::FileSelected(png_file("b.png")),
        ],
    );

    let Transition { state, .. } = reduce(
        state,
        AppEvent::PreviewCompleted {
            selection_id: SelectionId(1),
            preview: ready_preview(),
        },
    );

    let selection = state.selection.current().expect("selection");
    assert_eq!(selection.file.name, "b.png");
    assert_eq!(selection.preview, PreviewState::Loading);
}

#[test]
fn reselecting_cancels_loading_preview() {
    let state = apply(
        AppState::default(),
        [AppEvent::FileSelected(png_file("a.png"))],
    );

    let Transition { commands, .. } = reduce(state, AppEvent::FileSelected(png_file("b.png")));

    assert_eq!(
        commands[0],
        BackendCommand::CancelPreview {
            selection_id: SelectionId(1)
        }
    );
}

#[test]
fn rejected_selection_keeps_current_file() {
    let state = selected("cat.png");

    let Transition { state, commands } = reduce(
        state,
        AppEvent::SelectionRejected(FailureKind::Validation {
            reason: "notes.txt is not an image".to_string(),
        }),
    );

    assert!(commands.is_empty());
    assert_eq!(
        state.selection.current().expect("selection").file.name,
        "cat.png"
    );
    assert!(state
        .notice
        .as_deref()
        .is_some_and(|notice| notice.contains("notes.txt")));
    assert!(state.result.is_empty());
}

#[test]
fn outcome_slots_are_mutually_exclusive_across_picks() {
    let (state, first) = pending("cat.png");
    let state = apply(
        state,
        [AppEvent::PredictionSucceeded {
            request_id: first,
            result: prediction("Gato", 0.8),
        }],
    );
    let state = apply(
        state,
        [
            AppEvent::FileSelected(png_file("dog.png")),
            AppEvent::PreviewCompleted {
                selection_id: SelectionId(2),
                preview: ready_preview(),
            },
        ],
    );
    assert!(state.result.is_empty());
    let Transition { state, .. } = reduce(state, AppEvent::AnalyzeRequested);
    let second = state.request.pending_request().expect("pending");
    let state = apply(
        state,
        [AppEvent::PredictionFailed {
            request_id: second,
            failure: FailureKind::Network {
                timed_out: false,
                detail: "refused".to_string(),
            },
        }],
    );

    assert!(state.result.failure().is_some());
    assert!(state.result.prediction().is_none());
}
