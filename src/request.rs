//! Last-request-wins bookkeeping for views that reload on every filter change.
//!
//! Each reload takes a [RequestToken] from a [RequestTracker] before querying.
//! When the response arrives, [LatestView::apply] only keeps it if no newer
//! request was issued in the meantime and the signed-in user is unchanged.
//!
//! The server keeps one tracker per user in [RequestTrackers] and sends each
//! token's generation in the [REQUEST_GENERATION_HEADER] of the dashboard and
//! transaction list responses.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use axum::http::{HeaderMap, HeaderValue};

use crate::session::{Session, UserId};

/// The response header holding the generation of the request it answers.
pub const REQUEST_GENERATION_HEADER: &str = "x-request-generation";

#[derive(Debug, Default)]
struct TrackerState {
    generation: u64,
    user_id: Option<UserId>,
}

/// Issues request tokens and decides which one is current.
///
/// Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct RequestTracker {
    state: Arc<Mutex<TrackerState>>,
}

/// Identifies one issued request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestToken {
    generation: u64,
    user_id: UserId,
}

impl RequestToken {
    /// The position of this request in the order requests were issued.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl RequestTracker {
    /// Create a tracker with no requests issued.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, TrackerState> {
        // Every update leaves the state consistent, even if a holder panicked.
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Issue a token for a new request on behalf of `session`.
    ///
    /// Every previously issued token stops being current.
    pub fn issue(&self, session: &Session) -> RequestToken {
        let mut state = self.lock();
        state.generation += 1;

        if state.user_id.as_ref() != Some(session.user_id()) {
            tracing::debug!("request tracker now following user {}", session.user_id());
            state.user_id = Some(session.user_id().clone());
        }

        RequestToken {
            generation: state.generation,
            user_id: session.user_id().clone(),
        }
    }

    /// Whether `token` belongs to the latest request for the current user.
    pub fn is_current(&self, token: &RequestToken) -> bool {
        let state = self.lock();

        state.generation == token.generation && state.user_id.as_ref() == Some(&token.user_id)
    }

    /// Invalidate every outstanding token.
    ///
    /// Call this whenever the signed-in user changes.
    pub fn reset_identity(&self) {
        let mut state = self.lock();
        state.generation += 1;
        state.user_id = None;
    }
}

/// The request trackers of every user, shared by the request handlers.
///
/// Clones share the same trackers.
#[derive(Debug, Clone, Default)]
pub struct RequestTrackers {
    trackers: Arc<Mutex<HashMap<UserId, RequestTracker>>>,
}

impl RequestTrackers {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<UserId, RequestTracker>> {
        self.trackers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// The tracker for `user_id`, created on first use.
    pub fn tracker_for(&self, user_id: &UserId) -> RequestTracker {
        self.lock().entry(user_id.clone()).or_default().clone()
    }

    /// Issue a token for a request made on behalf of `session`.
    pub fn issue(&self, session: &Session) -> RequestToken {
        self.tracker_for(session.user_id()).issue(session)
    }

    /// Whether `token` is still the latest request of its user.
    pub fn is_current(&self, token: &RequestToken) -> bool {
        self.lock()
            .get(&token.user_id)
            .is_some_and(|tracker| tracker.is_current(token))
    }

    /// Invalidate every outstanding token of `user_id`.
    ///
    /// Call this when `user_id` signs in or out.
    pub fn reset_identity(&self, user_id: &UserId) {
        if let Some(tracker) = self.lock().get(user_id) {
            tracker.reset_identity();
            tracing::debug!("invalidated outstanding requests of user {user_id}");
        }
    }
}

/// Response headers carrying the generation of `token`, if there is one.
///
/// Anonymous requests are not tracked and get no header.
pub fn generation_headers(token: Option<&RequestToken>) -> HeaderMap {
    let mut headers = HeaderMap::new();

    if let Some(token) = token {
        headers.insert(
            REQUEST_GENERATION_HEADER,
            HeaderValue::from(token.generation()),
        );
    }

    headers
}

/// Whether a response was kept by [LatestView::apply].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The response replaced the view.
    Current,
    /// The response was stale and thrown away.
    Stale,
}

/// A view that only ever shows the response to the latest request.
#[derive(Debug)]
pub struct LatestView<T> {
    tracker: RequestTracker,
    value: Option<T>,
}

impl<T> LatestView<T> {
    /// Create an empty view whose requests are issued by `tracker`.
    pub fn new(tracker: RequestTracker) -> Self {
        Self {
            tracker,
            value: None,
        }
    }

    /// Issue a token for a new request on behalf of `session`.
    pub fn begin(&self, session: &Session) -> RequestToken {
        self.tracker.issue(session)
    }

    /// Show `value` if `token` is still the latest request.
    pub fn apply(&mut self, token: &RequestToken, value: T) -> Applied {
        if self.tracker.is_current(token) {
            self.value = Some(value);
            Applied::Current
        } else {
            tracing::debug!(
                "discarding stale response for request {}",
                token.generation()
            );
            Applied::Stale
        }
    }

    /// Clear the view and invalidate any request in flight.
    pub fn reset(&mut self) {
        self.tracker.reset_identity();
        self.value = None;
    }

    /// The value currently shown, if any.
    pub fn current(&self) -> Option<&T> {
        self.value.as_ref()
    }
}
