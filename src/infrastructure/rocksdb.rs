use crate::domain::ports::AdmissionStore;
use crate::domain::record::AdmittedRecord;
use crate::error::{AdmissionError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, Options};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Column Family holding admitted records, keyed by user id.
pub const CF_ADMISSIONS: &str = "admissions";

/// A persistent admission store backed by RocksDB.
///
/// Records are keyed by `user_id` (big-endian bytes) and serialized as JSON.
/// The key space itself enforces the per-user uniqueness constraint; the
/// `write_guard` serializes the existence check with the insert so each
/// `record` call is its own isolation scope.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDbAdmissionStore {
    db: Arc<DB>,
    write_guard: Arc<Mutex<()>>,
}

impl RocksDbAdmissionStore {
    /// Opens or creates a RocksDB instance at the specified path, ensuring
    /// the admissions column family exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_admissions = ColumnFamilyDescriptor::new(CF_ADMISSIONS, Options::default());
        let db = DB::open_cf_descriptors(&opts, path, vec![cf_admissions])
            .map_err(|e| AdmissionError::persistence(e.to_string()))?;

        Ok(Self {
            db: Arc::new(db),
            write_guard: Arc::new(Mutex::new(())),
        })
    }

    fn cf_handle(&self) -> Result<&rocksdb::ColumnFamily> {
        self.db.cf_handle(CF_ADMISSIONS).ok_or_else(|| {
            AdmissionError::Internal(Box::new(std::io::Error::other(
                "Admissions column family not found",
            )))
        })
    }
}

#[async_trait]
impl AdmissionStore for RocksDbAdmissionStore {
    async fn record(&self, user_id: u64, order: i64, amount: i64) -> Result<AdmittedRecord> {
        let _guard = self.write_guard.lock().await;
        let cf = self.cf_handle()?;
        let key = user_id.to_be_bytes();

        let existing = self
            .db
            .get_pinned_cf(&cf, key)
            .map_err(|e| AdmissionError::persistence(e.to_string()))?;
        if existing.is_some() {
            return Err(AdmissionError::DuplicateUser(user_id));
        }

        let record = AdmittedRecord::new(user_id, order, amount);
        let value = serde_json::to_vec(&record)
            .map_err(|e| AdmissionError::Internal(Box::new(e)))?;
        self.db
            .put_cf(&cf, key, value)
            .map_err(|e| AdmissionError::persistence(e.to_string()))?;

        Ok(record)
    }

    async fn get(&self, user_id: u64) -> Result<Option<AdmittedRecord>> {
        let cf = self.cf_handle()?;
        let key = user_id.to_be_bytes();

        let result = self
            .db
            .get_cf(&cf, key)
            .map_err(|e| AdmissionError::persistence(e.to_string()))?;

        match result {
            Some(bytes) => {
                let record = serde_json::from_slice(&bytes)
                    .map_err(|e| AdmissionError::Internal(Box::new(e)))?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    async fn all_records(&self) -> Result<Vec<AdmittedRecord>> {
        let cf = self.cf_handle()?;

        let mut records = Vec::new();
        let iter = self.db.iterator_cf(cf, rocksdb::IteratorMode::Start);
        for item in iter {
            let (_key, value) = item.map_err(|e| AdmissionError::persistence(e.to_string()))?;
            let record: AdmittedRecord = serde_json::from_slice(&value)
                .map_err(|e| AdmissionError::Internal(Box::new(e)))?;
            records.push(record);
        }

        Ok(records)
    }
}
