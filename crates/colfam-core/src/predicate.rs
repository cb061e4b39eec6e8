use crate::{
    DEFAULT_SLICE_LIMIT,
    error::{Error, ErrorKind, ErrorOrigin},
    serialize::{SerializeError, Serializer},
    wire::WireSlicePredicate,
};
use thiserror::Error as ThisError;

///
/// PredicateError
/// Malformed predicates are rejected locally, before any wire call.
///

#[derive(Debug, ThisError)]
pub enum PredicateError {
    #[error("range limit must be greater than zero")]
    InvalidLimit,
}

impl From<PredicateError> for Error {
    fn from(err: PredicateError) -> Self {
        Self::new(
            ErrorKind::InvalidPredicate,
            ErrorOrigin::Predicate,
            err.to_string(),
        )
    }
}

///
/// ColumnRange
///
/// `[start, end)` over the column-name order defined by the name
/// serializer's comparator. `None` bounds are unbounded. When `reversed`,
/// the caller supplies `(upper, lower)` and iteration runs descending,
/// with the limit applied to the tail of the ascending equivalent.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ColumnRange<N> {
    start: Option<N>,
    end: Option<N>,
    limit: u32,
    reversed: bool,
}

impl<N> ColumnRange<N> {
    pub fn new(start: Option<N>, end: Option<N>, limit: u32) -> Result<Self, PredicateError> {
        if limit == 0 {
            return Err(PredicateError::InvalidLimit);
        }

        Ok(Self {
            start,
            end,
            limit,
            reversed: false,
        })
    }

    #[must_use]
    pub fn reversed(mut self) -> Self {
        self.reversed = true;
        self
    }

    #[must_use]
    pub const fn start(&self) -> Option<&N> {
        self.start.as_ref()
    }

    #[must_use]
    pub const fn end(&self) -> Option<&N> {
        self.end.as_ref()
    }

    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    #[must_use]
    pub const fn is_reversed(&self) -> bool {
        self.reversed
    }
}

///
/// SlicePredicate
///
/// Selection criteria for a slice query: an explicit ordered name list, or
/// a bounded range. Exactly one variant is active per query.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SlicePredicate<N> {
    Names(Vec<N>),
    Range(ColumnRange<N>),
}

impl<N> SlicePredicate<N> {
    /// Select exactly the given columns, in the given order. Duplicates are
    /// passed through to the store unmodified.
    #[must_use]
    pub fn by_names(names: impl Into<Vec<N>>) -> Self {
        Self::Names(names.into())
    }

    /// Select columns in `[start, end)`, capped at `limit` results.
    pub fn by_range(start: Option<N>, end: Option<N>, limit: u32) -> Result<Self, PredicateError> {
        ColumnRange::new(start, end, limit).map(Self::Range)
    }

    /// All columns up to [`DEFAULT_SLICE_LIMIT`].
    #[must_use]
    pub fn all() -> Self {
        // Unbounded range with the default limit; cannot fail.
        Self::Range(ColumnRange {
            start: None,
            end: None,
            limit: DEFAULT_SLICE_LIMIT,
            reversed: false,
        })
    }

    /// Translate to the wire form using the column-name serializer.
    /// Unbounded range ends become the empty-bytes sentinel.
    pub fn to_wire(
        &self,
        names: &dyn Serializer<N>,
    ) -> Result<WireSlicePredicate, SerializeError> {
        match self {
            Self::Names(list) => {
                let mut encoded = Vec::with_capacity(list.len());
                for name in list {
                    encoded.push(names.to_bytes(name)?);
                }
                Ok(WireSlicePredicate::Names(encoded))
            }

            Self::Range(range) => {
                let bound = |name: Option<&N>| -> Result<Vec<u8>, SerializeError> {
                    name.map_or_else(|| Ok(Vec::new()), |n| names.to_bytes(n))
                };

                Ok(WireSlicePredicate::Range {
                    start: bound(range.start())?,
                    end: bound(range.end())?,
                    reversed: range.is_reversed(),
                    limit: range.limit(),
                })
            }
        }
    }
}

///
/// TESTS
///
