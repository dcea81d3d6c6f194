//! Error types for cx-contacts

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use tracing::error;

/// Error code delivered by every failed contact operation.
///
/// The set is closed and the numeric codes are stable; callers may persist
/// or compare them directly.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactError {
    #[error("unknown error")]
    Unknown = 0,

    #[error("invalid argument")]
    InvalidArgument = 1,

    #[error("operation timed out")]
    Timeout = 2,

    #[error("another operation is pending")]
    PendingOperation = 3,

    #[error("I/O error")]
    Io = 4,

    #[error("contacts are not supported on this platform")]
    NotSupported = 5,

    #[error("operation cancelled")]
    OperationCancelled = 6,

    #[error("permission denied")]
    PermissionDenied = 20,
}

impl ContactError {
    /// Every variant, in code order.
    pub const ALL: [ContactError; 8] = [
        ContactError::Unknown,
        ContactError::InvalidArgument,
        ContactError::Timeout,
        ContactError::PendingOperation,
        ContactError::Io,
        ContactError::NotSupported,
        ContactError::OperationCancelled,
        ContactError::PermissionDenied,
    ];

    /// Numeric code of this error
    pub const fn code(self) -> u16 {
        self as u16
    }

    /// Look up an error by its numeric code
    pub fn from_code(code: u16) -> Option<Self> {
        Self::ALL.iter().copied().find(|e| e.code() == code)
    }

    /// Stable upper-case constant name, e.g. `TIMEOUT_ERROR`
    pub const fn name(self) -> &'static str {
        match self {
            ContactError::Unknown => "UNKNOWN_ERROR",
            ContactError::InvalidArgument => "INVALID_ARGUMENT_ERROR",
            ContactError::Timeout => "TIMEOUT_ERROR",
            ContactError::PendingOperation => "PENDING_OPERATION_ERROR",
            ContactError::Io => "IO_ERROR",
            ContactError::NotSupported => "NOT_SUPPORTED_ERROR",
            ContactError::OperationCancelled => "OPERATION_CANCELLED_ERROR",
            ContactError::PermissionDenied => "PERMISSION_DENIED_ERROR",
        }
    }

    /// Human readable message for end users
    pub fn describe(self, action: &str) -> String {
        match self {
            ContactError::NotSupported => format!("{} contacts is not supported.", action),
            ContactError::OperationCancelled => format!("{} cancelled", action),
            ContactError::PermissionDenied => {
                format!("{} failed: access to contacts was not granted", action)
            }
            ContactError::Timeout => format!("{} timed out", action),
            other => format!("{} failed: error {}", action, other.code()),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct WireError {
    code: u16,
}

impl Serialize for ContactError {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        WireError { code: self.code() }.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ContactError {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let wire = WireError::deserialize(deserializer)?;
        Ok(ContactError::from_code(wire.code).unwrap_or(ContactError::Unknown))
    }
}

/// Failures raised by a store backend before they are reduced to a `ContactError`
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store lock poisoned: {0}")]
    Poisoned(String),

    #[error("Store task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Corrupt record {id}: {reason}")]
    Corrupt { id: String, reason: String },
}

impl From<StoreError> for ContactError {
    fn from(err: StoreError) -> Self {
        let mapped = match &err {
            StoreError::Database(rusqlite::Error::SqliteFailure(failure, _)) => {
                match failure.code {
                    rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked => {
                        ContactError::PendingOperation
                    }
                    rusqlite::ErrorCode::CannotOpen
                    | rusqlite::ErrorCode::SystemIoFailure
                    | rusqlite::ErrorCode::DiskFull => ContactError::Io,
                    _ => ContactError::Unknown,
                }
            }
            StoreError::Io(_) => ContactError::Io,
            _ => ContactError::Unknown,
        };
        error!("Store failure reported as {}: {}", mapped.name(), err);
        mapped
    }
}

/// Programmer errors detected before any store interaction
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContractViolation {
    #[error("{operation}: a success callback is required")]
    MissingSuccessCallback { operation: &'static str },
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {key}: {value}")]
    Invalid { key: String, value: String },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ContactError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(ContactError::Unknown.code(), 0);
        assert_eq!(ContactError::InvalidArgument.code(), 1);
        assert_eq!(ContactError::Timeout.code(), 2);
        assert_eq!(ContactError::PendingOperation.code(), 3);
        assert_eq!(ContactError::Io.code(), 4);
        assert_eq!(ContactError::NotSupported.code(), 5);
        assert_eq!(ContactError::OperationCancelled.code(), 6);
        assert_eq!(ContactError::PermissionDenied.code(), 20);
    }

    #[test]
    fn test_from_code() {
        for err in ContactError::ALL {
            assert_eq!(ContactError::from_code(err.code()), Some(err));
        }
        assert_eq!(ContactError::from_code(7), None);
        assert_eq!(ContactError::from_code(19), None);
    }

    #[test]
    fn test_serialize_as_code_object() {
        let json = serde_json::to_string(&ContactError::PermissionDenied).unwrap();
        assert_eq!(json, r#"{"code":20}"#);

        let back: ContactError = serde_json::from_str(r#"{"code":5}"#).unwrap();
        assert_eq!(back, ContactError::NotSupported);

        let unmapped: ContactError = serde_json::from_str(r#"{"code":99}"#).unwrap();
        assert_eq!(unmapped, ContactError::Unknown);
    }

    #[test]
    fn test_store_error_mapping() {
        let io = StoreError::Io(std::io::Error::other("disk"));
        assert_eq!(ContactError::from(io), ContactError::Io);

        let poisoned = StoreError::Poisoned("lock".to_string());
        assert_eq!(ContactError::from(poisoned), ContactError::Unknown);

        let busy = StoreError::Database(rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_BUSY),
            None,
        ));
        assert_eq!(ContactError::from(busy), ContactError::PendingOperation);
    }

    #[test]
    fn test_describe() {
        assert_eq!(
            ContactError::NotSupported.describe("Searching"),
            "Searching contacts is not supported."
        );
        assert_eq!(ContactError::OperationCancelled.describe("Pick"), "Pick cancelled");
        assert_eq!(ContactError::Io.describe("Search"), "Search failed: error 4");
    }
}
