use crate::domain::model::{InterpretationStatus, RequestId};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

#[derive(Debug, Clone)]
enum EntryState {
    Pending,
    Ready(String),
    Failed(String),
}

#[derive(Debug, Clone)]
struct Entry {
    state: EntryState,
    updated_at: DateTime<Utc>,
}

impl Entry {
    fn new(state: EntryState) -> Self {
        Self {
            state,
            updated_at: Utc::now(),
        }
    }
}

/// Interpretations keyed by request id.
///
/// Each id is written by exactly one background task, so only the map
/// itself is synchronized. Readers only ever observe complete text: an entry
/// is either pending, ready with its final text, or failed.
#[derive(Debug, Default)]
pub struct ResultStore {
    entries: DashMap<RequestId, Entry>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that an interpretation is being computed. Never downgrades an
    /// entry that has already settled.
    pub fn mark_pending(&self, id: RequestId) {
        self.entries
            .entry(id)
            .or_insert_with(|| Entry::new(EntryState::Pending));
    }

    pub fn set(&self, id: RequestId, text: impl Into<String>) {
        self.entries
            .insert(id, Entry::new(EntryState::Ready(text.into())));
    }

    pub fn mark_failed(&self, id: RequestId, reason: impl Into<String>) {
        self.entries
            .insert(id, Entry::new(EntryState::Failed(reason.into())));
    }

    /// Final text for `id`, or `None` when it is unknown, pending or failed.
    pub fn get(&self, id: &RequestId) -> Option<String> {
        self.entries.get(id).and_then(|entry| match &entry.state {
            EntryState::Ready(text) => Some(text.clone()),
            EntryState::Pending | EntryState::Failed(_) => None,
        })
    }

    pub fn status(&self, id: &RequestId) -> InterpretationStatus {
        match self.entries.get(id).map(|entry| entry.state.clone()) {
            Some(EntryState::Pending) => InterpretationStatus::Pending,
            Some(EntryState::Ready(_)) => InterpretationStatus::Ready,
            Some(EntryState::Failed(_)) => InterpretationStatus::Failed,
            None => InterpretationStatus::Unknown,
        }
    }

    pub fn failure_reason(&self, id: &RequestId) -> Option<String> {
        self.entries.get(id).and_then(|entry| match &entry.state {
            EntryState::Failed(reason) => Some(reason.clone()),
            _ => None,
        })
    }

    pub fn updated_at(&self, id: &RequestId) -> Option<DateTime<Utc>> {
        self.entries.get(id).map(|entry| entry.updated_at)
    }

    /// Drops every entry last touched before `cutoff`. Returns how many
    /// entries were removed.
    pub fn purge_older_than(&self, cutoff: DateTime<Utc>) -> usize {
        let mut removed = 0;
        self.entries.retain(|_, entry| {
            let keep = entry.updated_at >= cutoff;
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }

    pub fn purge_expired(&self, ttl: Duration) -> usize {
        match chrono::Duration::from_std(ttl) {
            Ok(ttl) => self.purge_older_than(Utc::now() - ttl),
            Err(_) => 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// How often the sweeper runs for a given ttl: a quarter of the ttl,
/// clamped to between one second and five minutes.
pub fn sweep_interval(ttl: Duration) -> Duration {
    (ttl / 4).clamp(Duration::from_secs(1), Duration::from_secs(300))
}

/// Periodically evicts entries older than `ttl`. Runs until aborted.
pub fn spawn_expiry_sweeper(store: Arc<ResultStore>, ttl: Duration, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let removed = store.purge_expired(ttl);
            if removed > 0 {
                tracing::debug!(removed, remaining = store.len(), "Expired interpretations purged");
            }
        }
    })
}
