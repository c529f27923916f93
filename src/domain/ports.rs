use super::record::AdmittedRecord;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Sentinel returned by [`OrderSequencer::assign_order`] when the user
/// already holds a live order.
pub const DUPLICATE_USER: i64 = -1;
/// Sentinel returned when the counter has reached capacity.
pub const CAPACITY_EXCEEDED: i64 = -2;

/// The atomic counter + membership backend.
///
/// This is the only component allowed to grant or revoke order numbers.
/// `assign_order` returns the raw code (a positive order or one of the two
/// reserved sentinels); classifying that code is the coordinator's job.
#[async_trait]
pub trait OrderSequencer: Send + Sync {
    /// Executes duplicate-check, capacity-check and increment+register as a
    /// single atomic unit. No caller may observe an intermediate state.
    async fn assign_order(&self, user_id: u64, capacity: u64) -> Result<i64>;

    /// Revokes an assignment, but only if it is still the tail (the counter
    /// currently equals `order`). Returns `false` without mutating anything
    /// when the tail has moved on; the slot is then permanently stranded
    /// rather than reused out of order.
    async fn rollback_assignment(&self, user_id: u64, order: i64) -> Result<bool>;
}

/// The durable store for admitted records.
///
/// `record` performs an existence check and insert within a single isolation
/// scope of its own; the uniqueness of `user_id` is the last line of defense
/// against double-insert, never the primary concurrency control.
#[async_trait]
pub trait AdmissionStore: Send + Sync {
    async fn record(&self, user_id: u64, order: i64, amount: i64) -> Result<AdmittedRecord>;
    async fn get(&self, user_id: u64) -> Result<Option<AdmittedRecord>>;
    async fn all_records(&self) -> Result<Vec<AdmittedRecord>>;
}

pub type SequencerHandle = Arc<dyn OrderSequencer>;
pub type AdmissionStoreHandle = Arc<dyn AdmissionStore>;
