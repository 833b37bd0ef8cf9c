use thiserror::Error;

/// Errors that abort a whole dispatch call. Everything else a pass runs into
/// is absorbed and only shows up in the returned counts.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("enqueue messages payload exceeded the limit {limit} ({len} entries)")]
    PayloadLimitExceeded { limit: usize, len: usize },
    #[error("non-retriable provider error: {0}")]
    NonRetriable(String),
}

impl DispatchError {
    pub fn is_payload_limit(&self) -> bool {
        matches!(self, DispatchError::PayloadLimitExceeded { .. })
    }
}
