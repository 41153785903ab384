//! Drives one analysis session: events go through the reducer, the resulting
//! commands go to the backend runtime, and completions come back as events.

use std::{path::Path, sync::Arc};

use client_core::{intake::load_selected_file, PredictionClient};
use shared::error::Locale;
use tokio::sync::mpsc;
use tracing::debug;

use crate::backend_bridge::{commands::BackendCommand, runtime::BackendRuntime};
use crate::controller::{events::AppEvent, reducer::reduce, state::AppState};
use crate::view::{resolve_view, ViewState};

pub fn dispatch_backend_command(runtime: &mut BackendRuntime, cmd: BackendCommand) {
    debug!(command = cmd.name(), "queued session->backend command");
    runtime.execute(cmd);
}

pub struct Session {
    state: AppState,
    runtime: BackendRuntime,
    events_rx: mpsc::UnboundedReceiver<AppEvent>,
    max_upload_bytes: u64,
}

impl Session {
    pub fn new(client: Arc<dyn PredictionClient>, locale: Locale, max_upload_bytes: u64) -> Self {
        let (runtime, events_rx) = BackendRuntime::new(client);
        Self {
            state: AppState::new(locale),
            runtime,
            events_rx,
            max_upload_bytes,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn view(&self) -> ViewState {
        resolve_view(&self.state)
    }

    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_bytes
    }

    pub fn dispatch(&mut self, event: AppEvent) {
        debug!(event = event.name(), "dispatching event");
        let transition = reduce(std::mem::take(&mut self.state), event);
        self.state = transition.state;
        for cmd in transition.commands {
            dispatch_backend_command(&mut self.runtime, cmd);
        }
    }

    /// Validates the file at `path` and either selects it or records the rejection.
    pub async fn select_path(&mut self, path: &Path) -> bool {
        match load_selected_file(path, self.max_upload_bytes).await {
            Ok(file) => {
                self.dispatch(AppEvent::FileSelected(file));
                true
            }
            Err(err) => {
                self.dispatch(AppEvent::SelectionRejected(err.failure_kind()));
                false
            }
        }
    }

    pub async fn next_completion(&mut self) -> Option<AppEvent> {
        self.events_rx.recv().await
    }

    /// Processes completions until no preview or upload is outstanding.
    pub async fn settle(&mut self) {
        while self.state.is_busy() {
            match self.events_rx.recv().await {
                Some(event) => self.dispatch(event),
                None => break,
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/orchestration_tests.rs"]
mod tests;
