use crate::domain::record::RegistrationRequest;
use crate::error::{AdmissionError, Result};
use std::io::Read;

/// Reads registration requests from a CSV source.
///
/// Wraps `csv::Reader` and provides an iterator over
/// `Result<RegistrationRequest>`, trimming whitespace and tolerating
/// flexible record lengths.
pub struct RequestReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> RequestReader<R> {
    /// Creates a new `RequestReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes requests,
    /// allowing large inputs to be streamed without buffering everything.
    pub fn requests(self) -> impl Iterator<Item = Result<RegistrationRequest>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(AdmissionError::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_valid_stream() {
        let data = "user_id\n1\n2\n3";
        let reader = RequestReader::new(data.as_bytes());
        let results: Vec<Result<RegistrationRequest>> = reader.requests().collect();

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().user_id, 1);
        assert_eq!(results[2].as_ref().unwrap().user_id, 3);
    }

    #[test]
    fn test_reader_malformed_line() {
        let data = "user_id\nnot_a_number";
        let reader = RequestReader::new(data.as_bytes());
        let results: Vec<Result<RegistrationRequest>> = reader.requests().collect();

        assert!(results[0].is_err());
    }
}
