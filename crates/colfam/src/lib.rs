//! ## Crate layout
//! - `core`: predicate model, column-family executor, result wrappers,
//!   serializer adapters, and the wire boundary.
//! - `error`: public error taxonomy for application boundaries.
//!
//! The `prelude` module mirrors the surface used by application code.

pub use colfam_core as core;

mod error;

pub use error::{Error, ErrorKind, ErrorOrigin};

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
/// the surface application code imports in one line
///

pub mod prelude {
    pub use crate::core::{
        DEFAULT_SLICE_LIMIT,
        family::{ColumnFamily, MapperError},
        predicate::{ColumnRange, SlicePredicate},
        result::{RowSlice, SliceColumn, SliceResult, TypedColumn},
        serialize::{
            BytesSerializer, CborSerializer, NameSerializer, Serializer, UintSerializer,
            Utf8Serializer,
        },
        wire::{
            ConsistencyLevel, ConsistencyPolicy, ErrorTranslator, Mutator, OperationKind,
            QuorumPolicy, RawColumn, WireClient, WireError, WireSlicePredicate,
        },
    };
    pub use serde::{Deserialize, Serialize};
}
