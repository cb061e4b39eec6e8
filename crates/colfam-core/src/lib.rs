//! Core runtime for ColFam: typed slice predicates, the column-family
//! executor, result wrappers, serializer adapters, and the wire boundary
//! consumed from an external store client.
#![warn(unreachable_pub)]

pub mod error;
pub mod family;
pub mod obs;
pub mod predicate;
pub mod result;
pub mod serialize;
pub mod wire;

// test
#[cfg(test)]
pub(crate) mod test_support;

///
/// CONSTANTS
///

/// Default maximum number of columns returned by an unbounded slice.
///
/// Applied whenever a range predicate is built without an explicit limit
/// (`SlicePredicate::all`) and by the default column-count bounds. Keeps
/// "give me everything" queries bounded at the wire level.
pub const DEFAULT_SLICE_LIMIT: u32 = 100;

/// Maximum serialized bytes accepted for a single decoded value.
///
/// Decode-side cap only; the store may enforce its own write-side limits.
pub const MAX_VALUE_BYTES: usize = 4 * 1024 * 1024;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, wire types, or metrics helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        family::ColumnFamily,
        predicate::{ColumnRange, SlicePredicate},
        result::{RowSlice, SliceColumn, SliceResult, TypedColumn},
        serialize::{NameSerializer, Serializer},
    };
}
