use crate::domain::record::AdmittedRecord;
use crate::error::Result;
use std::io::Write;

/// Writes admitted records as CSV (`user_id,order_num,amount,created_at`).
pub struct RecordWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> RecordWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    /// Serializes the records in the order given and flushes the sink.
    pub fn write_records(&mut self, records: Vec<AdmittedRecord>) -> Result<()> {
        for record in records {
            self.writer.serialize(record)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
