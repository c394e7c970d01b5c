//! Notification deduplication: per-sender debounce and album correlation.
//!
//! Decides, for each file-bearing event, whether the recipient gets a
//! "new photo" notification. Albums arrive as bursts of separate events; the first
//! observed part decides for the whole album and every sibling is folded into it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use photodrop_core::{AlbumId, ExpiryTimer, SenderId};
use tracing::{debug, trace};

/// Debounce window between notifications for one sender. Also the retention window
/// of album tracking records.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_secs(15);

/// Why a decision came out the way it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionReason {
    /// Outside the sender's debounce window (or the sender's first notification).
    Fresh,
    /// Within the sender's debounce window.
    Debounced,
    /// A later part of an album that is already tracked.
    AlbumSibling,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub emit: bool,
    pub reason: DecisionReason,
}

impl Decision {
    fn debounce(emit: bool) -> Self {
        Self {
            emit,
            reason: if emit {
                DecisionReason::Fresh
            } else {
                DecisionReason::Debounced
            },
        }
    }

    fn sibling() -> Self {
        Self {
            emit: false,
            reason: DecisionReason::AlbumSibling,
        }
    }

    /// False only for album parts folded into an earlier part's decision.
    pub fn is_first_observed(&self) -> bool {
        self.reason != DecisionReason::AlbumSibling
    }
}

/// Tracking state for one album id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlbumTracking {
    pub notification_emitted: bool,
    pub first_seen_at: DateTime<Utc>,
}

#[derive(Default)]
struct DedupState {
    /// Last emitted notification per sender. Never evicted.
    last_notified: HashMap<SenderId, DateTime<Utc>>,
    albums: HashMap<AlbumId, AlbumTracking>,
}

impl DedupState {
    /// Apply the debounce rule and record the notification if it is emitted.
    fn debounce(&mut self, sender: SenderId, now: DateTime<Utc>, window: Duration) -> bool {
        let emit = match self.last_notified.get(&sender) {
            None => true,
            // A negative elapsed time fails `to_std` and counts as inside the window.
            Some(last) => (now - *last).to_std().is_ok_and(|elapsed| elapsed > window),
        };
        if emit {
            self.last_notified.insert(sender, now);
        }
        emit
    }
}

/// Decides when to notify the recipient.
///
/// `decide` is synchronous and runs under one lock, so the check-then-create on album
/// records cannot interleave with another event's decision.
pub struct NotificationDeduplicator {
    window: Duration,
    state: Arc<Mutex<DedupState>>,
    timer: Arc<dyn ExpiryTimer>,
}

impl NotificationDeduplicator {
    pub fn new(timer: Arc<dyn ExpiryTimer>) -> Self {
        Self::with_window(DEBOUNCE_WINDOW, timer)
    }

    pub fn with_window(window: Duration, timer: Arc<dyn ExpiryTimer>) -> Self {
        Self {
            window,
            state: Arc::new(Mutex::new(DedupState::default())),
            timer,
        }
    }

    fn lock(&self) -> MutexGuard<'_, DedupState> {
        lock_state(&self.state)
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Decide whether an event from `sender` arriving at `now` should notify.
    pub fn decide(&self, sender: SenderId, album: Option<&AlbumId>, now: DateTime<Utc>) -> Decision {
        let Some(album) = album else {
            let decision = Decision::debounce(self.lock().debounce(sender, now, self.window));
            debug!(sender = %sender, emit = decision.emit, reason = ?decision.reason, "Notification decided");
            return decision;
        };

        let decision = {
            let mut state = self.lock();
            if state.albums.contains_key(album) {
                Decision::sibling()
            } else {
                let emit = state.debounce(sender, now, self.window);
                state.albums.insert(
                    album.clone(),
                    AlbumTracking {
                        notification_emitted: emit,
                        first_seen_at: now,
                    },
                );
                Decision::debounce(emit)
            }
        };

        if decision.is_first_observed() {
            self.schedule_expiry(album.clone());
        }

        debug!(
            sender = %sender,
            album = %album,
            emit = decision.emit,
            reason = ?decision.reason,
            "Notification decided"
        );
        decision
    }

    fn schedule_expiry(&self, album: AlbumId) {
        let state = Arc::downgrade(&self.state);
        self.timer.schedule(
            self.window,
            Box::new(move || {
                // The deduplicator may be gone by the time this fires.
                if let Some(state) = state.upgrade() {
                    lock_state(&state).albums.remove(&album);
                    trace!(album = %album, "Album tracking expired");
                }
            }),
        );
    }

    /// Time of the last notification emitted for `sender`.
    pub fn last_notified(&self, sender: SenderId) -> Option<DateTime<Utc>> {
        self.lock().last_notified.get(&sender).copied()
    }

    /// Tracking record for `album`, if still retained.
    pub fn album(&self, album: &AlbumId) -> Option<AlbumTracking> {
        self.lock().albums.get(album).copied()
    }

    pub fn tracked_albums(&self) -> usize {
        self.lock().albums.len()
    }
}

fn lock_state(state: &Mutex<DedupState>) -> MutexGuard<'_, DedupState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
