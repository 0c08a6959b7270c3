//! Error types for the lock bridge

use core::fmt;

/// Failure reported by the preference store collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistenceError {
    /// Store is busy with another operation
    Busy,
    /// Underlying storage driver failed
    DriverError,
}

/// Error type for bridge operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeError {
    /// Configured topic prefix does not fit the topic bound
    PrefixTooLong { len: usize, max: usize },
    /// Rendered payload does not fit the publish buffer
    BufferTooSmall,
    /// JSON serialization error
    Serialization,
    /// Preference store error
    Persistence(PersistenceError),
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistenceError::Busy => write!(f, "Preference store busy"),
            PersistenceError::DriverError => write!(f, "Preference store driver error"),
        }
    }
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BridgeError::PrefixTooLong { len, max } => {
                write!(f, "Topic prefix too long ({} > {} bytes)", len, max)
            }
            BridgeError::BufferTooSmall => write!(f, "Publish buffer too small"),
            BridgeError::Serialization => write!(f, "JSON serialization error"),
            BridgeError::Persistence(e) => write!(f, "Persistence error: {}", e),
        }
    }
}

impl From<PersistenceError> for BridgeError {
    fn from(e: PersistenceError) -> Self {
        BridgeError::Persistence(e)
    }
}

impl From<serde_json_core::ser::Error> for BridgeError {
    fn from(e: serde_json_core::ser::Error) -> Self {
        match e {
            serde_json_core::ser::Error::BufferFull => BridgeError::BufferTooSmall,
            #[allow(unreachable_patterns)]
            _ => BridgeError::Serialization,
        }
    }
}
