use crate::error::Result;
use serde_json::Value;
use std::io::Read;

/// Reads a webhook delivery body from any `Read` source (file, stdin).
///
/// Only the JSON syntax is checked here; the provider decides what the
/// contents mean, including payloads that are not objects.
pub struct PayloadReader<R: Read> {
    source: R,
}

impl<R: Read> PayloadReader<R> {
    pub fn new(source: R) -> Self {
        Self { source }
    }

    /// Parses the whole source as one JSON document.
    pub fn payload(self) -> Result<Value> {
        Ok(serde_json::from_reader(self.source)?)
    }
}
