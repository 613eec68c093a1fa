//! Per-fingerprint serialization of saves.
//!
//! `save_note` is a query followed by an insert. Two identical notes
//! saved at the same moment would both see an empty neighbourhood and
//! both report "saved". The guard hands out one async mutex per content
//! id so identical saves run one after the other. Saves of different
//! content never wait on each other, which also means two near-duplicate
//! notes with different bytes can still both get in when they race.

use crate::notes::NoteId;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Debug, Default)]
pub struct SaveGuard {
    locks: DashMap<NoteId, Arc<Mutex<()>>>,
}

/// Held for the duration of one save. Dropping it releases the id.
#[derive(Debug)]
pub struct SavePermit<'a> {
    guard: &'a SaveGuard,
    id: NoteId,
    permit: Option<OwnedMutexGuard<()>>,
}

impl SaveGuard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until no other save of `id` is in flight.
    pub async fn acquire(&self, id: &NoteId) -> SavePermit<'_> {
        let lock = self
            .locks
            .entry(id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        let permit = lock.lock_owned().await;
        SavePermit {
            guard: self,
            id: id.clone(),
            permit: Some(permit),
        }
    }

    /// Number of ids with a save in flight or queued.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.locks.len()
    }
}

impl Drop for SavePermit<'_> {
    fn drop(&mut self) {
        drop(self.permit.take());
        // Forget the lock once nobody else holds or waits on it
        self.guard
            .locks
            .remove_if(&self.id, |_, lock| Arc::strong_count(lock) == 1);
    }
}
