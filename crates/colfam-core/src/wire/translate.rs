use crate::{
    error::{Error, ErrorKind, ErrorOrigin},
    wire::WireError,
};
use thiserror::Error as ThisError;

///
/// DomainError
///
/// This layer's view of a wire failure, produced only by an
/// [`ErrorTranslator`]. The raw error is never interpreted here.
///

#[derive(Debug, ThisError)]
pub enum DomainError {
    #[error("store timeout: {0}")]
    Timeout(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("transport error: {0}")]
    Transport(String),
}

impl From<DomainError> for Error {
    fn from(err: DomainError) -> Self {
        Self::new(ErrorKind::Domain, ErrorOrigin::Wire, err.to_string())
    }
}

///
/// ErrorTranslator
///
/// Capability turning opaque wire failures into the layer's domain error
/// taxonomy. Injected at construction; immutable for the instance lifetime.
///

pub trait ErrorTranslator {
    fn translate(&self, err: WireError) -> DomainError;
}

///
/// PassthroughTranslator
///
/// Default translator: every wire failure becomes a transport error with
/// the original message preserved. Clients with richer failure surfaces
/// supply their own translator.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct PassthroughTranslator;

impl ErrorTranslator for PassthroughTranslator {
    fn translate(&self, err: WireError) -> DomainError {
        DomainError::Transport(err.message)
    }
}

///
/// TESTS
///
