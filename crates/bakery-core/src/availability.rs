//! Shop open/closed tracking.
//!
//! The tracker owns the availability flag, the active session and the
//! append-only history of completed sessions. Every transition is persisted
//! through a [`KeyValueStore`]; reads fail open to "closed, empty history".

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::{ActiveSession, ShopSession};
use crate::ports::{KeyValueStore, KeyValueStoreError};

pub const STATUS_KEY: &str = "shopStatus";
pub const CURRENT_SESSION_KEY: &str = "currentSession";
pub const HISTORY_KEY: &str = "shopHistory";

const STATUS_OPEN: &str = "open";
const STATUS_CLOSED: &str = "closed";

#[derive(Error, Debug)]
pub enum AvailabilityError {
    #[error("availability could not be persisted: {0}")]
    Storage(#[from] KeyValueStoreError),

    #[error("availability could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityState {
    pub is_open: bool,
    pub current_session: Option<ActiveSession>,
    pub history: Vec<ShopSession>,
}

/// Outcome of an `open`/`close` request. Requests that do not apply to the
/// current state are no-ops and report `AlreadyOpen` / `AlreadyClosed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Opened(ActiveSession),
    AlreadyOpen,
    Closed(ShopSession),
    AlreadyClosed,
}

impl Transition {
    pub fn changed_state(&self) -> bool {
        matches!(self, Transition::Opened(_) | Transition::Closed(_))
    }
}

pub struct AvailabilityTracker {
    store: Arc<dyn KeyValueStore>,
    state: AvailabilityState,
}

impl AvailabilityTracker {
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let state = read_state(store.as_ref());
        debug!(
            is_open = state.is_open,
            sessions = state.history.len(),
            "availability loaded"
        );
        Self { store, state }
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open
    }

    pub fn current_session(&self) -> Option<&ActiveSession> {
        self.state.current_session.as_ref()
    }

    /// Completed sessions, oldest first.
    pub fn history(&self) -> &[ShopSession] {
        &self.state.history
    }

    /// At most `limit` completed sessions, most recent first.
    pub fn recent_history(&self, limit: usize) -> Vec<ShopSession> {
        self.state.history.iter().rev().take(limit).cloned().collect()
    }

    pub fn state(&self) -> &AvailabilityState {
        &self.state
    }

    pub fn open(&mut self) -> Result<Transition, AvailabilityError> {
        self.open_at(Utc::now())
    }

    pub fn close(&mut self) -> Result<Transition, AvailabilityError> {
        self.close_at(Utc::now())
    }

    pub fn open_at(&mut self, now: DateTime<Utc>) -> Result<Transition, AvailabilityError> {
        if self.state.is_open {
            debug!("open requested while the shop is already open");
            return Ok(Transition::AlreadyOpen);
        }

        let session = ActiveSession::start(now);
        let encoded = serde_json::to_string(&session)?;

        self.store.set(CURRENT_SESSION_KEY, &encoded)?;
        if let Err(error) = self.store.set(STATUS_KEY, STATUS_OPEN) {
            self.restore(CURRENT_SESSION_KEY, None);
            return Err(error.into());
        }

        self.state.is_open = true;
        self.state.current_session = Some(session.clone());
        info!(opened_at = %session.opened_at, "shop opened");

        Ok(Transition::Opened(session))
    }

    pub fn close_at(&mut self, now: DateTime<Utc>) -> Result<Transition, AvailabilityError> {
        let Some(active) = self.state.current_session.clone() else {
            warn!("close requested without an active session, ignoring");
            return Ok(Transition::AlreadyClosed);
        };

        let completed = active.end(now);
        let mut history = self.state.history.clone();
        history.push(completed.clone());
        let encoded_history = serde_json::to_string(&history)?;
        let previous_history = serde_json::to_string(&self.state.history)?;

        self.store.set(STATUS_KEY, STATUS_CLOSED)?;
        if let Err(error) = self.store.set(HISTORY_KEY, &encoded_history) {
            self.restore(STATUS_KEY, Some(STATUS_OPEN));
            self.restore(HISTORY_KEY, Some(&previous_history));
            return Err(error.into());
        }
        // A leftover session record next to a closed flag is ignored on load.
        if let Err(error) = self.store.remove(CURRENT_SESSION_KEY) {
            warn!(%error, "failed to remove the active session record");
        }

        self.state.history = history;
        self.state.current_session = None;
        self.state.is_open = false;
        info!(
            opened_at = %completed.opened_at,
            closed_at = %completed.closed_at,
            duration_minutes = completed.duration_minutes,
            "shop closed"
        );

        Ok(Transition::Closed(completed))
    }

    fn restore(&self, key: &str, previous: Option<&str>) {
        let result = match previous {
            Some(value) => self.store.set(key, value),
            None => self.store.remove(key),
        };
        if let Err(error) = result {
            warn!(%error, key, "failed to roll back availability record");
        }
    }
}

fn read_state(store: &dyn KeyValueStore) -> AvailabilityState {
    let history = read_history(store);

    let flagged_open = match store.get(STATUS_KEY) {
        Ok(Some(value)) => value == STATUS_OPEN,
        Ok(None) => false,
        Err(error) => {
            warn!(%error, "failed to read shop status, assuming closed");
            false
        }
    };

    let session = read_json::<ActiveSession>(store, CURRENT_SESSION_KEY)
        .filter(|session| session.is_active);

    match (flagged_open, session) {
        (true, Some(session)) => AvailabilityState {
            is_open: true,
            current_session: Some(session),
            history,
        },
        (true, None) => {
            warn!("shop flagged open without an active session, loading as closed");
            AvailabilityState {
                history,
                ..AvailabilityState::default()
            }
        }
        (false, Some(_)) => {
            debug!("ignoring active session record left next to a closed flag");
            AvailabilityState {
                history,
                ..AvailabilityState::default()
            }
        }
        (false, None) => AvailabilityState {
            history,
            ..AvailabilityState::default()
        },
    }
}

fn read_history(store: &dyn KeyValueStore) -> Vec<ShopSession> {
    let mut history: Vec<ShopSession> = read_json(store, HISTORY_KEY).unwrap_or_default();

    let ordered = history
        .windows(2)
        .all(|pair| pair[0].opened_at <= pair[1].opened_at);
    if !ordered {
        warn!("shop history out of order, sorting by opening time");
        history.sort_by_key(|session| session.opened_at);
    }

    history
}

fn read_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    match store.get(key) {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(error) => {
                warn!(%error, key, "corrupt availability record, ignoring");
                None
            }
        },
        Ok(None) => None,
        Err(error) => {
            warn!(%error, key, "failed to read availability record");
            None
        }
    }
}
