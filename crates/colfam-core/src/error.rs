use std::fmt;
use thiserror::Error as ThisError;

///
/// Error
///
/// Structured runtime error with a stable kind + origin classification.
/// Every failure surfaced by this layer is one of these; nothing is
/// swallowed or retried below this boundary.
///

#[derive(Debug, ThisError)]
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

    /// Construct an executor-origin internal error.
    pub(crate) fn executor_internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, ErrorOrigin::Executor, message.into())
    }

    #[must_use]
    pub const fn is_invalid_predicate(&self) -> bool {
        matches!(self.kind, ErrorKind::InvalidPredicate)
    }

    #[must_use]
    pub const fn is_domain(&self) -> bool {
        matches!(self.kind, ErrorKind::Domain)
    }

    #[must_use]
    pub const fn is_mapper(&self) -> bool {
        matches!(self.kind, ErrorKind::Mapper)
    }

    #[must_use]
    pub fn display_with_kind(&self) -> String {
        format!("{}:{}: {}", self.origin, self.kind, self.message)
    }
}

///
/// ErrorKind
/// Stable error taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// Malformed predicate, rejected locally before any wire call.
    InvalidPredicate,

    /// Wire/protocol failure, produced only via the error translator.
    Domain,

    /// Failure raised by a caller-supplied row mapper, passed through.
    Mapper,

    /// Serializer failure for a key, column name, or value.
    Serialize,

    /// The caller cannot remediate this.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::InvalidPredicate => "invalid_predicate",
            Self::Domain => "domain",
            Self::Mapper => "mapper",
            Self::Serialize => "serialize",
            Self::Internal => "internal",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
/// Origin taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Predicate,
    Serialize,
    Executor,
    Wire,
    Mapper,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Predicate => "predicate",
            Self::Serialize => "serialize",
            Self::Executor => "executor",
            Self::Wire => "wire",
            Self::Mapper => "mapper",
        };
        write!(f, "{label}")
    }
}

///
/// TESTS
///
