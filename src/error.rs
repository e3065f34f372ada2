//! Error types for the seat allocation engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur during an allocation run.

use thiserror::Error;

use crate::store::StoreError;

/// The main error type for the seat allocation engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use seat_allocator::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/scoring.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/scoring.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Invalid or missing setup: no seats configured, a designation without
    /// a WFH limit, a negative capacity. Not retried.
    #[error("Configuration error: {message}")]
    Configuration {
        /// An actionable description of what must be fixed.
        message: String,
    },

    /// An employee record was invalid or contained inconsistent data.
    #[error("Invalid employee '{employee_id}' field '{field}': {message}")]
    InvalidEmployee {
        /// The employee identifier.
        employee_id: String,
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A referenced company, branch or seat does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity that was looked up.
        entity: String,
        /// The identifier that was not found.
        id: String,
    },

    /// A read from the persistence layer kept failing after retries.
    #[error("Data unavailable during {operation} after {attempts} attempt(s): {message}")]
    DataUnavailable {
        /// The read operation that failed.
        operation: String,
        /// How many attempts were made.
        attempts: u32,
        /// The last underlying failure.
        message: String,
    },

    /// Some seat or WFH record writes failed mid-run. Re-running the whole
    /// allocation is safe and converges.
    #[error(
        "Partial write: seats {seat_writes_succeeded} ok / {seat_writes_failed} failed, \
         wfh records {wfh_writes_succeeded} ok / {wfh_writes_failed} failed"
    )]
    PartialWrite {
        /// Seat writes (clears and assignments) that succeeded.
        seat_writes_succeeded: usize,
        /// Seat writes that failed.
        seat_writes_failed: usize,
        /// WFH record upserts that succeeded.
        wfh_writes_succeeded: usize,
        /// WFH record upserts that failed.
        wfh_writes_failed: usize,
        /// One line per failed write.
        failures: Vec<String>,
    },
}

impl EngineError {
    /// Shorthand for a [`EngineError::Configuration`] error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Stable machine-readable code for the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => {
                "CONFIG_FILE_ERROR"
            }
            EngineError::Configuration { .. } => "CONFIGURATION_ERROR",
            EngineError::InvalidEmployee { .. } => "INVALID_EMPLOYEE",
            EngineError::NotFound { .. } => "NOT_FOUND",
            EngineError::DataUnavailable { .. } => "DATA_UNAVAILABLE",
            EngineError::PartialWrite { .. } => "PARTIAL_WRITE",
        }
    }

    /// Returns true when re-running the allocation is the recovery path.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            EngineError::DataUnavailable { .. } | EngineError::PartialWrite { .. }
        )
    }
}

impl From<StoreError> for EngineError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound { entity, id } => EngineError::NotFound {
                entity: entity.to_string(),
                id,
            },
            StoreError::Unavailable(message) => EngineError::DataUnavailable {
                operation: "read".to_string(),
                attempts: 1,
                message,
            },
            StoreError::WriteRejected(message) => EngineError::DataUnavailable {
                operation: "write".to_string(),
                attempts: 1,
                message,
            },
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
