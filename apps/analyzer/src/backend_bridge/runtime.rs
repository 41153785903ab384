//! Executes backend commands as tasks on the session's runtime and feeds their
//! completions back as [`AppEvent`]s.

use std::sync::Arc;

use client_core::{preview::compute_preview, PredictionClient};
use shared::domain::{RequestId, SelectionId};
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, error, warn};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::AppEvent;

pub struct BackendRuntime {
    client: Arc<dyn PredictionClient>,
    events_tx: mpsc::UnboundedSender<AppEvent>,
    preview_task: Option<(SelectionId, JoinHandle<()>)>,
    prediction_task: Option<(RequestId, JoinHandle<()>)>,
}

impl BackendRuntime {
    pub fn new(client: Arc<dyn PredictionClient>) -> (Self, mpsc::UnboundedReceiver<AppEvent>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        (
            Self {
                client,
                events_tx,
                preview_task: None,
                prediction_task: None,
            },
            events_rx,
        )
    }

    pub fn execute(&mut self, cmd: BackendCommand) {
        match cmd {
            BackendCommand::ComputePreview { selection_id, file } => {
                abort_task(self.preview_task.take());
                let events_tx = self.events_tx.clone();
                let handle = tokio::spawn(async move {
                    let preview = compute_preview(file).await;
                    let _ = events_tx.send(AppEvent::PreviewCompleted {
                        selection_id,
                        preview,
                    });
                });
                self.preview_task = Some((selection_id, handle));
            }
            BackendCommand::CancelPreview { selection_id } => {
                if let Some((running, _)) = &self.preview_task {
                    if *running == selection_id {
                        debug!(%selection_id, "aborting preview job");
                        abort_task(self.preview_task.take());
                    }
                }
            }
            BackendCommand::SubmitPrediction { request_id, file } => {
                if let Some((running, handle)) = self.prediction_task.take() {
                    if !handle.is_finished() {
                        warn!(
                            %request_id,
                            %running,
                            "prediction submitted while another was running; aborting the old one"
                        );
                        handle.abort();
                    }
                }
                let client = Arc::clone(&self.client);
                let events_tx = self.events_tx.clone();
                let handle = tokio::spawn(async move {
                    let event = match client.predict(&file).await {
                        Ok(result) => AppEvent::PredictionSucceeded { request_id, result },
                        Err(err) => {
                            error!(%request_id, file = %file.name, "prediction failed: {err}");
                            AppEvent::PredictionFailed {
                                request_id,
                                failure: err.failure_kind(),
                            }
                        }
                    };
                    let _ = events_tx.send(event);
                });
                self.prediction_task = Some((request_id, handle));
            }
            BackendCommand::CancelPrediction { request_id } => {
                if let Some((running, _)) = &self.prediction_task {
                    if *running == request_id {
                        debug!(%request_id, "aborting prediction request");
                        abort_task(self.prediction_task.take());
                    }
                }
            }
        }
    }
}

fn abort_task<Id>(task: Option<(Id, JoinHandle<()>)>) {
    if let Some((_, handle)) = task {
        handle.abort();
    }
}

impl Drop for BackendRuntime {
    fn drop(&mut self) {
        abort_task(self.preview_task.take());
        abort_task(self.prediction_task.take());
    }
}
