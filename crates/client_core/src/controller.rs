//! Request lifecycle for the diagram view.
//!
//! Every accepted parameter change issues a fetch tagged with a fresh
//! [`RequestToken`]. Fetches are never cancelled; when one completes, its
//! result is applied only if its token is still the latest issued, so an
//! older response that arrives late can never overwrite a newer one.
//!
//! The controller is driven from a single task: callers interleave
//! [`SelectionController::update`] with [`SelectionController::next_completion`]
//! (typically in a `tokio::select!` loop). Nothing here locks.

use std::{fmt, sync::Arc};

use futures::{future::BoxFuture, stream::FuturesUnordered, StreamExt};
use shared::{
    domain::{ChordContext, ScaleQuery},
    error::ValidationError,
};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

use crate::{
    chord_options::ChordOptions,
    error::ClientError,
    parameters::{ChangeKind, ParameterChange, ParameterField, ParameterModel},
    DiagramClient, DiagramResult,
};

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RequestToken(pub u64);

impl RequestToken {
    fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    Fetching(RequestToken),
    Settled,
}

/// What the view shows. Written only by the controller.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    diagram: Option<Vec<u8>>,
    displayed_query: Option<ScaleQuery>,
    chords: ChordOptions,
}

impl UiState {
    pub fn diagram(&self) -> Option<&[u8]> {
        self.diagram.as_deref()
    }

    /// Query whose diagram is currently displayed.
    pub fn displayed_query(&self) -> Option<&ScaleQuery> {
        self.displayed_query.as_ref()
    }

    pub fn chord_options(&self) -> &ChordOptions {
        &self.chords
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    DiagramUpdated {
        token: RequestToken,
        query: ScaleQuery,
    },
    ChordOptionsUpdated {
        token: RequestToken,
        options: Vec<String>,
    },
    ChordFilterReset {
        token: RequestToken,
        previous: String,
    },
    FetchFailed {
        token: RequestToken,
        error: ClientError,
    },
}

/// How a finished fetch was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Applied {
        token: RequestToken,
        chords_synced: bool,
    },
    Failed {
        token: RequestToken,
        error: ClientError,
    },
    /// Superseded by a newer request; dropped without touching the view.
    Stale { token: RequestToken },
}

struct PendingFetch {
    token: RequestToken,
    query: ScaleQuery,
    kind: ChangeKind,
}

type FetchOutcome = (PendingFetch, Result<DiagramResult, ClientError>);

pub struct SelectionController {
    client: Arc<dyn DiagramClient>,
    model: ParameterModel,
    changes: mpsc::UnboundedReceiver<ParameterChange>,
    latest: RequestToken,
    state: ControllerState,
    ui: UiState,
    synced_context: Option<ChordContext>,
    in_flight: FuturesUnordered<BoxFuture<'static, FetchOutcome>>,
    events: broadcast::Sender<ControllerEvent>,
}

impl SelectionController {
    pub fn new(mut model: ParameterModel, client: Arc<dyn DiagramClient>) -> Self {
        let changes = model.subscribe();
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let mut ui = UiState::default();
        ui.chords.select(model.current_query().chord_filter);
        Self {
            client,
            model,
            changes,
            latest: RequestToken::default(),
            state: ControllerState::Idle,
            ui,
            synced_context: None,
            in_flight: FuturesUnordered::new(),
            events,
        }
    }

    /// Applies a user edit. Invalid input is rejected before any request is
    /// issued; otherwise returns the token of the request it started.
    pub fn update(
        &mut self,
        field: ParameterField,
        value: &str,
    ) -> Result<RequestToken, ValidationError> {
        if let Err(err) = self.model.update(field, value) {
            debug!(%field, value, error = %err, "rejected parameter update");
            return Err(err);
        }
        self.drain_changes();
        Ok(self.latest)
    }

    /// Re-requests the current query, e.g. for the initial load.
    pub fn refresh(&mut self) -> RequestToken {
        self.issue(ParameterChange {
            query: self.model.current_query(),
            kind: ChangeKind::ChordContext,
        })
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn latest_token(&self) -> RequestToken {
        self.latest
    }

    pub fn current_query(&self) -> ScaleQuery {
        self.model.current_query()
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    pub fn has_in_flight(&self) -> bool {
        !self.in_flight.is_empty()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ControllerEvent> {
        self.events.subscribe()
    }

    /// Waits for the next outstanding fetch, in completion order, and
    /// applies or drops it. `None` when nothing is in flight.
    pub async fn next_completion(&mut self) -> Option<Completion> {
        let (pending, result) = self.in_flight.next().await?;
        Some(self.complete(pending, result))
    }

    /// Drives every outstanding fetch to completion.
    pub async fn settle(&mut self) -> Vec<Completion> {
        let mut completions = Vec::new();
        while let Some(completion) = self.next_completion().await {
            completions.push(completion);
        }
        completions
    }

    fn drain_changes(&mut self) {
        while let Ok(change) = self.changes.try_recv() {
            self.issue(change);
        }
    }

    fn issue(&mut self, change: ParameterChange) -> RequestToken {
        let token = self.latest.next();
        self.latest = token;
        self.state = ControllerState::Fetching(token);
        self.ui.chords.select(change.query.chord_filter.clone());

        debug!(
            token = token.0,
            root = %change.query.root,
            scale = %change.query.scale_type,
            tuning = %change.query.tuning,
            frets = change.query.frets.get(),
            chord = %change.query.chord_filter,
            kind = ?change.kind,
            "issuing diagram request"
        );

        let client = Arc::clone(&self.client);
        let pending = PendingFetch {
            token,
            query: change.query,
            kind: change.kind,
        };
        self.in_flight.push(Box::pin(async move {
            let result = client.fetch(&pending.query).await;
            (pending, result)
        }));
        token
    }

    fn complete(
        &mut self,
        pending: PendingFetch,
        result: Result<DiagramResult, ClientError>,
    ) -> Completion {
        let token = pending.token;
        if token != self.latest {
            debug!(
                token = token.0,
                latest = self.latest.0,
                "dropping superseded diagram response"
            );
            return Completion::Stale { token };
        }
        self.state = ControllerState::Settled;

        let diagram = match result {
            Ok(diagram) => diagram,
            Err(error) => {
                warn!(token = token.0, status = ?error.status(), error = %error, "diagram request failed");
                let _ = self.events.send(ControllerEvent::FetchFailed {
                    token,
                    error: error.clone(),
                });
                return Completion::Failed { token, error };
            }
        };

        self.ui.diagram = Some(diagram.picture_bytes);
        self.ui.displayed_query = Some(pending.query.clone());
        let _ = self.events.send(ControllerEvent::DiagramUpdated {
            token,
            query: pending.query.clone(),
        });

        // A filter-only request can win over a superseded context change, so
        // the synced context is compared as well as the change kind.
        let context = pending.query.chord_context();
        let chords_synced = pending.kind == ChangeKind::ChordContext
            || self.synced_context.as_ref() != Some(&context);
        if chords_synced {
            self.sync_chords(token, &diagram.chords);
            self.synced_context = Some(context);
        }

        info!(
            token = token.0,
            scale = %pending.query.title(),
            chords = diagram.chords.len(),
            chords_synced,
            "applied diagram"
        );
        Completion::Applied {
            token,
            chords_synced,
        }
    }

    fn sync_chords(&mut self, token: RequestToken, chords: &[String]) {
        let reset = self.ui.chords.apply(chords);
        if let Some(previous) = &reset {
            info!(token = token.0, chord = %previous, "chord filter not valid for scale, reset");
            self.model.reset_chord_filter();
            let _ = self.events.send(ControllerEvent::ChordFilterReset {
                token,
                previous: previous.clone(),
            });
        }
        let _ = self.events.send(ControllerEvent::ChordOptionsUpdated {
            token,
            options: self.ui.chords.options().to_vec(),
        });

        // The displayed picture still highlights the dropped chord.
        if reset.is_some() {
            let follow_up = self.issue(ParameterChange {
                query: self.model.current_query(),
                kind: ChangeKind::FilterOnly,
            });
            debug!(token = token.0, follow_up = follow_up.0, "refetching without chord filter");
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
