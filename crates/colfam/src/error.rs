use colfam_core::error::{
    ErrorKind as CoreErrorKind, ErrorOrigin as CoreErrorOrigin, Error as CoreError,
};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// Error
/// Public error type with a stable kind + origin taxonomy, serializable
/// for application boundaries.
///

#[derive(Clone, Debug, Deserialize, Serialize, ThisError)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            kind,
            origin,
            message: message.into(),
        }
    }
}

impl From<CoreError> for Error {
    fn from(err: CoreError) -> Self {
        Self::new(err.kind.into(), err.origin.into(), err.message)
    }
}

///
/// ErrorKind
/// Public error taxonomy for callers.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ErrorKind {
    /// Malformed predicate, rejected before any wire call.
    InvalidPredicate,

    /// Translated wire/protocol failure.
    Domain,

    /// Failure raised by a caller-supplied row mapper.
    Mapper,

    /// Serializer failure for a key, column name, or value.
    Serialize,

    /// The caller cannot remediate this.
    Internal,
}

impl From<CoreErrorKind> for ErrorKind {
    fn from(kind: CoreErrorKind) -> Self {
        match kind {
            CoreErrorKind::InvalidPredicate => Self::InvalidPredicate,
            CoreErrorKind::Domain => Self::Domain,
            CoreErrorKind::Mapper => Self::Mapper,
            CoreErrorKind::Serialize => Self::Serialize,
            CoreErrorKind::Internal => Self::Internal,
        }
    }
}

///
/// ErrorOrigin
/// Public origin taxonomy for callers.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ErrorOrigin {
    Predicate,
    Serialize,
    Executor,
    Wire,
    Mapper,
}

impl From<CoreErrorOrigin> for ErrorOrigin {
    fn from(origin: CoreErrorOrigin) -> Self {
        match origin {
            CoreErrorOrigin::Predicate => Self::Predicate,
            CoreErrorOrigin::Serialize => Self::Serialize,
            CoreErrorOrigin::Executor => Self::Executor,
            CoreErrorOrigin::Wire => Self::Wire,
            CoreErrorOrigin::Mapper => Self::Mapper,
        }
    }
}
