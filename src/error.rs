use thiserror::Error;

pub type Result<T> = std::result::Result<T, AdmissionError>;

/// The closed set of failure outcomes for an admission attempt.
///
/// Every rejection carries a distinct variant so callers can branch on the
/// kind of failure without matching on display strings.
#[derive(Error, Debug)]
pub enum AdmissionError {
    #[error("user {0} has already applied")]
    DuplicateUser(u64),
    #[error("registration is closed")]
    ApplicationClosed,
    #[error("sequencer returned invalid order value {0}")]
    InvalidSequencerState(i64),
    #[error("transient persistence failure: {0}")]
    TransientPersistence(String),
    #[error("persistence failure: {0}")]
    FatalPersistence(String),
    #[error("rollback failed for user {user_id} at order {order}")]
    RollbackFailed { user_id: u64, order: i64 },
    #[error("request timed out")]
    Timeout,
    #[error("internal failure")]
    Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AdmissionError {
    /// Classifies a raw store failure message. Connectivity and timeout
    /// class failures are eligible for retry; everything else is fatal.
    pub fn persistence(message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_lowercase();
        if lower.contains("timeout") || lower.contains("connection") {
            Self::TransientPersistence(message)
        } else {
            Self::FatalPersistence(message)
        }
    }

    /// Whether a retry of the failed operation may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::TransientPersistence(_))
    }

    /// Stable machine-readable error kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::DuplicateUser(_) => "DUPLICATE_USER",
            Self::ApplicationClosed => "APPLICATION_CLOSED",
            Self::InvalidSequencerState(_) => "INVALID_SEQUENCER_STATE",
            Self::TransientPersistence(_) => "TRANSIENT_PERSISTENCE_ERROR",
            Self::FatalPersistence(_) => "FATAL_PERSISTENCE_ERROR",
            Self::RollbackFailed { .. } => "ROLLBACK_FAILED",
            Self::Timeout => "TIMEOUT",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Csv(_) => "CSV_ERROR",
            Self::Io(_) => "IO_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persistence_classification() {
        assert!(AdmissionError::persistence("connection refused").is_transient());
        assert!(AdmissionError::persistence("statement timeout").is_transient());
        assert!(!AdmissionError::persistence("constraint violation").is_transient());
    }

    #[test]
    fn test_codes_are_distinct_for_rejections() {
        let duplicate = AdmissionError::DuplicateUser(1);
        let closed = AdmissionError::ApplicationClosed;
        let timeout = AdmissionError::Timeout;
        assert_ne!(duplicate.code(), closed.code());
        assert_ne!(closed.code(), timeout.code());
    }
}
