use crate::domain::ports::{
    AdmissionStore, CAPACITY_EXCEEDED, DUPLICATE_USER, OrderSequencer,
};
use crate::domain::record::AdmittedRecord;
use crate::error::{AdmissionError, Result};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

#[derive(Default)]
struct SequencerState {
    counter: i64,
    members: HashSet<u64>,
}

/// In-process sequencer backend.
///
/// A single `tokio::sync::Mutex` over the counter and membership set is the
/// atomic check-and-mutate primitive: no caller can observe the counter and
/// the set out of step. Any backend offering the same atomic transitions
/// (a scripted counter store, a serializable transaction) can stand in
/// behind the `OrderSequencer` trait.
#[derive(Default, Clone)]
pub struct InMemorySequencer {
    state: Arc<Mutex<SequencerState>>,
}

impl InMemorySequencer {
    /// Creates a sequencer for a fresh admission window (counter at zero,
    /// no members).
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderSequencer for InMemorySequencer {
    async fn assign_order(&self, user_id: u64, capacity: u64) -> Result<i64> {
        let mut state = self.state.lock().await;

        if state.members.contains(&user_id) {
            return Ok(DUPLICATE_USER);
        }
        if state.counter >= capacity as i64 {
            return Ok(CAPACITY_EXCEEDED);
        }

        state.counter += 1;
        state.members.insert(user_id);
        Ok(state.counter)
    }

    async fn rollback_assignment(&self, user_id: u64, order: i64) -> Result<bool> {
        let mut state = self.state.lock().await;

        if !state.members.contains(&user_id) {
            return Ok(false);
        }
        // Only the tail assignment may be revoked; a stale order leaves the
        // sequence untouched and strands the slot.
        if state.counter != order {
            return Ok(false);
        }

        state.counter -= 1;
        state.members.remove(&user_id);
        Ok(true)
    }
}

/// A thread-safe in-memory admission store.
///
/// The write lock scopes the existence check and insert together, mirroring
/// the single transaction a SQL-backed recorder would use per call.
#[derive(Default, Clone)]
pub struct InMemoryAdmissionStore {
    records: Arc<RwLock<HashMap<u64, AdmittedRecord>>>,
}

impl InMemoryAdmissionStore {
    /// Creates a new, empty in-memory admission store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AdmissionStore for InMemoryAdmissionStore {
    async fn record(&self, user_id: u64, order: i64, amount: i64) -> Result<AdmittedRecord> {
        let mut records = self.records.write().await;
        if records.contains_key(&user_id) {
            return Err(AdmissionError::DuplicateUser(user_id));
        }
        let record = AdmittedRecord::new(user_id, order, amount);
        records.insert(user_id, record.clone());
        Ok(record)
    }

    async fn get(&self, user_id: u64) -> Result<Option<AdmittedRecord>> {
        let records = self.records.read().await;
        Ok(records.get(&user_id).cloned())
    }

    async fn all_records(&self) -> Result<Vec<AdmittedRecord>> {
        let records = self.records.read().await;
        Ok(records.values().cloned().collect())
    }
}
