use clap::Parser;
use miette::{IntoDiagnostic, Result};
use pointgate::application::coordinator::AdmissionCoordinator;
use pointgate::domain::ports::{AdmissionStoreHandle, SequencerHandle};
use pointgate::domain::record::AdmittedRecord;
use pointgate::infrastructure::in_memory::{InMemoryAdmissionStore, InMemorySequencer};
use pointgate::interfaces::csv::record_writer::RecordWriter;
use pointgate::interfaces::csv::request_reader::RequestReader;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input registration requests CSV file (user_id column)
    input: PathBuf,

    /// Maximum number of admissions for this window
    #[arg(long, default_value_t = 10_000)]
    capacity: u64,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,
}

#[cfg(feature = "storage-rocksdb")]
fn build_store(db_path: Option<PathBuf>) -> Result<AdmissionStoreHandle> {
    use pointgate::infrastructure::rocksdb::RocksDbAdmissionStore;

    match db_path {
        Some(path) => {
            let store = RocksDbAdmissionStore::open(path).into_diagnostic()?;
            Ok(Arc::new(store))
        }
        None => Ok(Arc::new(InMemoryAdmissionStore::new())),
    }
}

#[cfg(not(feature = "storage-rocksdb"))]
fn build_store(db_path: Option<PathBuf>) -> Result<AdmissionStoreHandle> {
    if db_path.is_some() {
        tracing::warn!(
            "persistent storage requested via --db-path, but 'storage-rocksdb' feature \
             is not enabled; falling back to in-memory storage"
        );
    }
    Ok(Arc::new(InMemoryAdmissionStore::new()))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let store = build_store(cli.db_path)?;
    let sequencer: SequencerHandle = Arc::new(InMemorySequencer::new());
    let coordinator = Arc::new(AdmissionCoordinator::new(sequencer, store, cli.capacity));

    // One concurrent apply task per request, first come first served.
    let file = File::open(&cli.input).into_diagnostic()?;
    let reader = RequestReader::new(file);
    let mut tasks = Vec::new();
    for request in reader.requests() {
        match request {
            Ok(request) => {
                let coordinator = Arc::clone(&coordinator);
                tasks.push(tokio::spawn(
                    async move { coordinator.apply(request.user_id).await },
                ));
            }
            Err(e) => {
                tracing::error!(error = %e, "error reading request");
            }
        }
    }

    let mut admitted: Vec<AdmittedRecord> = Vec::new();
    let mut rejected = 0usize;
    for task in tasks {
        match task.await.into_diagnostic()? {
            Ok(record) => admitted.push(record),
            Err(e) => {
                rejected += 1;
                tracing::debug!(code = e.code(), error = %e, "request rejected");
            }
        }
    }

    tracing::info!(
        admitted = admitted.len(),
        rejected,
        capacity = cli.capacity,
        "admission window processed"
    );

    admitted.sort_by_key(|record| record.order);
    let stdout = io::stdout();
    let mut writer = RecordWriter::new(stdout.lock());
    writer.write_records(admitted).into_diagnostic()?;

    Ok(())
}
