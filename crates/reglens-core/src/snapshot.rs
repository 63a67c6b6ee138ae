//! Generation-guarded holder for the last loaded snapshot of a fetch.
//!
//! Independent triggers (mount, refresh, upload) may start overlapping
//! fetches. Each fetch takes a [`Ticket`] when it starts; its result is
//! committed only if that ticket is still the newest one issued, so a slow
//! earlier response can never overwrite a later one.
//!
//! A failed fetch records its error (again, only for the newest ticket) and
//! leaves the last good snapshot in place.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use tracing::debug;

/// Generation number handed out when a fetch starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// A committed value with its provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<T> {
    pub value: T,
    pub generation: u64,
    pub loaded_at: DateTime<Utc>,
}

#[derive(Debug)]
struct State<T> {
    snapshot: Option<Snapshot<T>>,
    error: Option<String>,
    committed: u64,
}

/// Shared, last-initiated-wins slot for one kind of fetched data.
#[derive(Debug)]
pub struct SnapshotCell<T> {
    name: &'static str,
    issued: AtomicU64,
    state: Mutex<State<T>>,
}

impl<T: Clone> SnapshotCell<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            issued: AtomicU64::new(0),
            state: Mutex::new(State {
                snapshot: None,
                error: None,
                committed: 0,
            }),
        }
    }

    /// Start a fetch. Later tickets supersede earlier ones.
    pub fn begin(&self) -> Ticket {
        Ticket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether `ticket` is still the newest issued.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.issued.load(Ordering::SeqCst) == ticket.0
    }

    /// Commit a fetched value. Returns `false` if the ticket is stale and the
    /// value was discarded.
    pub fn commit(&self, ticket: Ticket, value: T) -> bool {
        let mut state = self.lock();
        if !self.is_current(ticket) || ticket.0 <= state.committed {
            debug!(
                cell = self.name,
                generation = ticket.0,
                "discarding stale response"
            );
            return false;
        }
        state.snapshot = Some(Snapshot {
            value,
            generation: ticket.0,
            loaded_at: Utc::now(),
        });
        state.error = None;
        state.committed = ticket.0;
        true
    }

    /// Record a failed fetch. The last good snapshot stays visible.
    /// Returns `false` if the ticket is stale and the error was ignored.
    pub fn fail(&self, ticket: Ticket, error: impl Into<String>) -> bool {
        let mut state = self.lock();
        if !self.is_current(ticket) {
            debug!(
                cell = self.name,
                generation = ticket.0,
                "discarding stale failure"
            );
            return false;
        }
        state.error = Some(error.into());
        true
    }

    /// The last committed snapshot, if any.
    pub fn snapshot(&self) -> Option<Snapshot<T>> {
        self.lock().snapshot.clone()
    }

    /// The last committed value, or `T::default()` when nothing loaded yet.
    pub fn value_or_default(&self) -> T
    where
        T: Default,
    {
        self.lock()
            .snapshot
            .as_ref()
            .map(|s| s.value.clone())
            .unwrap_or_default()
    }

    /// Error from the newest fetch, cleared by the next successful commit.
    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    fn lock(&self) -> MutexGuard<'_, State<T>> {
        // Poisoned locks are recovered; the state is replaced wholesale on commit.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}
