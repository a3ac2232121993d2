//! Destinations for failure log records.

use std::sync::Mutex;

use crate::exceptions::failure::Failure;
use crate::http::request::RequestContext;

/// Classification tag attached to every record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    /// Known exception whose policy asks for logging.
    Exception,
    /// Unchecked error.
    Error,
}

impl Classification {
    pub fn tag(self) -> &'static str {
        match self {
            Classification::Exception => "EXCEPTION",
            Classification::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// One failure worth recording.
#[derive(Debug)]
pub struct FailureRecord<'a> {
    pub classification: Classification,
    pub failure: &'a Failure,
    pub request: &'a RequestContext,
}

/// Operational log sink. Implementations must not panic.
pub trait FailureSink: Send + Sync + 'static {
    fn record(&self, record: &FailureRecord<'_>);
}

/// Writes records as `tracing` error events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl FailureSink for TracingSink {
    fn record(&self, record: &FailureRecord<'_>) {
        let cause = record.failure.cause_chain();
        tracing::error!(
            classification = %record.classification,
            error = %record.failure,
            cause = cause.as_deref().unwrap_or("none"),
            details = ?record.failure,
            request_id = record.request.request_id.as_deref().unwrap_or("unknown"),
            method = %record.request.method,
            path = %record.request.path,
            "Request failed"
        );
    }
}

/// Owned copy of a record, kept by [`MemorySink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedFailure {
    pub classification: Classification,
    pub identifier: String,
    pub cause: Option<String>,
    pub request_id: Option<String>,
    pub path: String,
}

/// Keeps records in memory for inspection.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<RecordedFailure>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<RecordedFailure> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FailureSink for MemorySink {
    fn record(&self, record: &FailureRecord<'_>) {
        let recorded = RecordedFailure {
            classification: record.classification,
            identifier: record.failure.identifier().to_string(),
            cause: record.failure.cause_chain(),
            request_id: record.request.request_id.clone(),
            path: record.request.path.clone(),
        };
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(recorded);
    }
}
