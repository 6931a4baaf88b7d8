//! Error types and status translation for the bridge.
//!
//! Accessors are the only translation points. Dispatch and teardown never
//! produce errors.

use crate::config::ErrorPolicy;
use crate::status::Status;
use thiserror::Error;

/// A foreign failure passed through without classification.
///
/// The status is exactly what the foreign call returned.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("foreign call returned {0}")]
pub struct PlatformError(pub Status);

impl PlatformError {
    pub fn status(&self) -> Status {
        self.0
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{operation} failed: {status}")]
    OperationFailed {
        operation: &'static str,
        status: Status,
    },

    #[error("{interface} is not supported by this object")]
    NotSupported { interface: &'static str },

    #[error(transparent)]
    Platform(#[from] PlatformError),
}

impl Error {
    /// The foreign status behind this error, if it came from a foreign call.
    pub fn status(&self) -> Option<Status> {
        match self {
            Error::OperationFailed { status, .. } => Some(*status),
            Error::Platform(e) => Some(e.status()),
            Error::InvalidArgument(_) | Error::NotSupported { .. } => None,
        }
    }

    pub fn is_operation_failed(&self) -> bool {
        matches!(self, Error::OperationFailed { .. })
    }

    pub fn is_platform(&self) -> bool {
        matches!(self, Error::Platform(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Map a foreign status to the taxonomy.
///
/// Success statuses always pass.
pub fn translate(status: Status, operation: &'static str, policy: ErrorPolicy) -> Result<()> {
    if status.is_success() {
        return Ok(());
    }
    Err(classify(status, operation, policy))
}

/// [`translate`] for calls that produce a value.
pub fn translate_value<T>(
    result: std::result::Result<T, Status>,
    operation: &'static str,
    policy: ErrorPolicy,
) -> Result<T> {
    match result {
        Ok(value) => Ok(value),
        // A success code in the error slot is a foreign contract violation;
        // report it as unclassified rather than pretending it succeeded.
        Err(status) if status.is_success() => Err(PlatformError(status).into()),
        Err(status) => Err(classify(status, operation, policy)),
    }
}

fn classify(status: Status, operation: &'static str, policy: ErrorPolicy) -> Error {
    match policy {
        ErrorPolicy::Narrow => match status {
            Status::FAIL => Error::OperationFailed { operation, status },
            _ => PlatformError(status).into(),
        },
        ErrorPolicy::Classify => match status {
            Status::FAIL | Status::ABORT | Status::UNEXPECTED => {
                Error::OperationFailed { operation, status }
            }
            Status::INVALID_ARG | Status::POINTER => {
                Error::InvalidArgument(format!("{operation} rejected its argument ({status})"))
            }
            Status::NO_INTERFACE | Status::NOT_IMPL => Error::NotSupported {
                interface: operation,
            },
            _ => PlatformError(status).into(),
        },
    }
}
