use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An inbound registration request. Transient; never persisted on its own.
#[derive(Debug, Deserialize, PartialEq, Eq, Clone, Copy)]
pub struct RegistrationRequest {
    pub user_id: u64,
}

/// A durably recorded admission.
///
/// Created by the admission store only after the sequencer granted a valid
/// order. `user_id` is unique across all records for the window; `created_at`
/// is assigned by the store at insert time.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct AdmittedRecord {
    pub user_id: u64,
    #[serde(rename = "order_num")]
    pub order: i64,
    pub amount: i64,
    pub created_at: DateTime<Utc>,
}

impl AdmittedRecord {
    pub fn new(user_id: u64, order: i64, amount: i64) -> Self {
        Self {
            user_id,
            order,
            amount,
            created_at: Utc::now(),
        }
    }
}
