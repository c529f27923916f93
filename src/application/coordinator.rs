use crate::application::retry::RetryPolicy;
use crate::domain::ports::{
    AdmissionStoreHandle, CAPACITY_EXCEEDED, DUPLICATE_USER, SequencerHandle,
};
use crate::domain::record::AdmittedRecord;
use crate::domain::reward::reward_amount;
use crate::error::{AdmissionError, Result};
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_APPLY_TIMEOUT: Duration = Duration::from_secs(10);

/// Orchestrates a single admission attempt:
/// sequencer -> reward calculation -> durable record (with retry), falling
/// back to a tail rollback of the granted slot when persistence fails for
/// good.
///
/// `AdmissionCoordinator` is the only entry point for inbound callers; many
/// `apply` calls may run concurrently, with the sequencer's atomic step as
/// the sole serialization point between them.
pub struct AdmissionCoordinator {
    sequencer: SequencerHandle,
    store: AdmissionStoreHandle,
    capacity: u64,
    retry: RetryPolicy,
    timeout: Duration,
}

impl AdmissionCoordinator {
    /// Creates a coordinator for an admission window of `capacity` slots.
    pub fn new(sequencer: SequencerHandle, store: AdmissionStoreHandle, capacity: u64) -> Self {
        Self {
            sequencer,
            store,
            capacity,
            retry: RetryPolicy::default(),
            timeout: DEFAULT_APPLY_TIMEOUT,
        }
    }

    /// Overrides the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Overrides the persistence retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Processes one registration request.
    ///
    /// The pipeline runs on its own task: a timed-out caller gets
    /// [`AdmissionError::Timeout`] but the dispatched work is not cancelled
    /// and runs to completion on its own, so a granted slot stays granted
    /// even when the caller has stopped waiting.
    pub async fn apply(&self, user_id: u64) -> Result<AdmittedRecord> {
        let sequencer = Arc::clone(&self.sequencer);
        let store = Arc::clone(&self.store);
        let retry = self.retry.clone();
        let capacity = self.capacity;

        let pipeline =
            tokio::spawn(
                async move { Self::run_pipeline(sequencer, store, retry, capacity, user_id).await },
            );

        match tokio::time::timeout(self.timeout, pipeline).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(join_err)) => {
                tracing::error!(user_id, error = %join_err, "admission pipeline panicked");
                Err(AdmissionError::Internal(Box::new(join_err)))
            }
            Err(_) => {
                tracing::error!(user_id, "admission attempt timed out");
                Err(AdmissionError::Timeout)
            }
        }
    }

    async fn run_pipeline(
        sequencer: SequencerHandle,
        store: AdmissionStoreHandle,
        retry: RetryPolicy,
        capacity: u64,
        user_id: u64,
    ) -> Result<AdmittedRecord> {
        let code = sequencer.assign_order(user_id, capacity).await?;
        let order = classify_order(code, user_id)?;
        let amount = reward_amount(order);
        tracing::debug!(user_id, order, amount, "order assigned");

        match retry.run(|| store.record(user_id, order, amount)).await {
            Ok(record) => {
                tracing::info!(user_id, order, amount, "admission recorded");
                Ok(record)
            }
            Err(cause) => {
                match sequencer.rollback_assignment(user_id, order).await {
                    Ok(true) => {
                        tracing::warn!(user_id, order, "assignment rolled back after persistence failure");
                    }
                    Ok(false) => {
                        // The tail moved on; the slot stays stranded.
                        let signal = AdmissionError::RollbackFailed { user_id, order };
                        tracing::error!(code = signal.code(), "{signal}");
                    }
                    Err(err) => {
                        tracing::error!(user_id, order, error = %err, "rollback errored");
                    }
                }
                Err(AdmissionError::Internal(Box::new(cause)))
            }
        }
    }
}

/// Classifies the raw code returned by the sequencer.
fn classify_order(code: i64, user_id: u64) -> Result<i64> {
    match code {
        DUPLICATE_USER => {
            tracing::warn!(user_id, "duplicate application rejected");
            Err(AdmissionError::DuplicateUser(user_id))
        }
        CAPACITY_EXCEEDED => {
            tracing::warn!(user_id, "application rejected: registration closed");
            Err(AdmissionError::ApplicationClosed)
        }
        code if code <= 0 => {
            tracing::error!(user_id, code, "sequencer returned invalid order value");
            Err(AdmissionError::InvalidSequencerState(code))
        }
        order => Ok(order),
    }
}
