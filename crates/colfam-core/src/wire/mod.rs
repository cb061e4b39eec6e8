mod consistency;
mod translate;

pub use consistency::{ConsistencyLevel, ConsistencyPolicy, OnePolicy, OperationKind, QuorumPolicy};
pub use translate::{DomainError, ErrorTranslator, PassthroughTranslator};

use thiserror::Error as ThisError;

/// Boundary to the store's wire protocol.
///
/// Everything here is consumed, never reimplemented: the client owns
/// connections, pooling, and timeouts. This layer issues exactly one
/// blocking call per operation and hands any failure to the translator.

///
/// WireError
///
/// Opaque failure raised by the wire client. This layer never inspects it;
/// it is passed to an [`ErrorTranslator`] unmodified.
///

#[derive(Debug, ThisError)]
#[error("wire error: {message}")]
pub struct WireError {
    pub message: String,
}

impl WireError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

///
/// RawColumn
///
/// One column as returned by the store: serialized name, serialized value,
/// and optional write metadata. Query output only; never mutated here.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RawColumn {
    pub name: Vec<u8>,
    pub value: Vec<u8>,
    pub timestamp: Option<i64>,
    pub ttl_seconds: Option<u32>,
}

impl RawColumn {
    #[must_use]
    pub const fn new(name: Vec<u8>, value: Vec<u8>) -> Self {
        Self {
            name,
            value,
            timestamp: None,
            ttl_seconds: None,
        }
    }
}

///
/// WireSlicePredicate
///
/// Wire-level form of a slice predicate: an explicit ordered name list, or
/// a byte range where an empty bound means "unbounded on that side".
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum WireSlicePredicate {
    Names(Vec<Vec<u8>>),
    Range {
        start: Vec<u8>,
        end: Vec<u8>,
        reversed: bool,
        limit: u32,
    },
}

///
/// WireClient
///
/// The store's raw read protocol. A multi-key fetch is one wire call, not
/// N parallel ones; result ordering is the client's own and carries no
/// guarantee. Absent rows may be omitted entirely.
///

pub trait WireClient {
    /// Fetch the selected columns of a single row.
    fn get_slice(
        &self,
        family: &str,
        key: &[u8],
        predicate: &WireSlicePredicate,
        consistency: ConsistencyLevel,
    ) -> Result<Vec<RawColumn>, WireError>;

    /// Fetch the selected columns of many rows in one call.
    fn multiget_slice(
        &self,
        family: &str,
        keys: &[Vec<u8>],
        predicate: &WireSlicePredicate,
        consistency: ConsistencyLevel,
    ) -> Result<Vec<(Vec<u8>, Vec<RawColumn>)>, WireError>;

    /// Count the columns a predicate would select, without materializing them.
    fn count_columns(
        &self,
        family: &str,
        key: &[u8],
        predicate: &WireSlicePredicate,
        consistency: ConsistencyLevel,
    ) -> Result<u64, WireError>;
}

///
/// Mutator
///
/// Row-level mutation batch supplied by the caller. This layer only hands
/// work to it and flushes it; batching strategy is the mutator's business.
///

pub trait Mutator {
    /// Flush all accumulated mutations to the store.
    fn execute(&mut self) -> Result<(), WireError>;
}
