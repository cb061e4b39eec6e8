use crate::{
    serialize::{SerializeError, Serializer},
    wire::RawColumn,
};
use derive_more::{Deref, IntoIterator};

///
/// SliceColumn
///
/// One decoded column: typed name, raw value bytes, write metadata. Value
/// decoding is deferred because the value type is not statically known to
/// the access layer; callers decode via a serializer when they consume it.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SliceColumn<N> {
    name: N,
    value: Vec<u8>,
    timestamp: Option<i64>,
    ttl_seconds: Option<u32>,
}

impl<N> SliceColumn<N> {
    pub(crate) fn decode(
        raw: RawColumn,
        names: &dyn Serializer<N>,
    ) -> Result<Self, SerializeError> {
        Ok(Self {
            name: names.from_bytes(&raw.name)?,
            value: raw.value,
            timestamp: raw.timestamp,
            ttl_seconds: raw.ttl_seconds,
        })
    }

    #[must_use]
    pub const fn name(&self) -> &N {
        &self.name
    }

    #[must_use]
    pub fn raw_value(&self) -> &[u8] {
        &self.value
    }

    #[must_use]
    pub const fn timestamp(&self) -> Option<i64> {
        self.timestamp
    }

    #[must_use]
    pub const fn ttl_seconds(&self) -> Option<u32> {
        self.ttl_seconds
    }

    /// Decode the value with the given serializer.
    pub fn value_as<V>(&self, values: &dyn Serializer<V>) -> Result<V, SerializeError> {
        values.from_bytes(&self.value)
    }
}

///
/// TypedColumn
/// A column whose value has already been decoded to a concrete type.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TypedColumn<N, V> {
    pub name: N,
    pub value: V,
    pub timestamp: Option<i64>,
    pub ttl_seconds: Option<u32>,
}

impl<N, V> TypedColumn<N, V> {
    pub(crate) fn from_slice_column(
        column: &SliceColumn<N>,
        values: &dyn Serializer<V>,
    ) -> Result<Self, SerializeError>
    where
        N: Clone,
    {
        Ok(Self {
            name: column.name.clone(),
            value: column.value_as(values)?,
            timestamp: column.timestamp,
            ttl_seconds: column.ttl_seconds,
        })
    }
}

///
/// RowSlice
///
/// One row of a slice result: the caller-supplied key plus the selected
/// columns in wire order. A requested-but-absent row is present with an
/// empty column list, so "row absent" and "column absent" stay
/// distinguishable.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RowSlice<K, N> {
    key: K,
    columns: Vec<SliceColumn<N>>,
}

impl<K, N> RowSlice<K, N> {
    pub(crate) fn decode(
        key: K,
        raw: Vec<RawColumn>,
        names: &dyn Serializer<N>,
    ) -> Result<Self, SerializeError> {
        let mut columns = Vec::with_capacity(raw.len());
        for column in raw {
            columns.push(SliceColumn::decode(column, names)?);
        }

        Ok(Self { key, columns })
    }

    #[must_use]
    pub const fn key(&self) -> &K {
        &self.key
    }

    #[must_use]
    pub fn columns(&self) -> &[SliceColumn<N>] {
        &self.columns
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.columns.len()
    }

    /// True when the row was requested but holds no matching columns.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// First column with the given name, in wire order. Absent is a normal
    /// value, not an error.
    #[must_use]
    pub fn column(&self, name: &N) -> Option<&SliceColumn<N>>
    where
        N: PartialEq,
    {
        self.columns.iter().find(|c| &c.name == name)
    }

    /// Restore the caller's requested name order after an explicit-names
    /// fetch. Stable, so store order survives among duplicates.
    pub(crate) fn align_to_names(&mut self, requested: &[N])
    where
        N: PartialEq,
    {
        self.columns.sort_by_key(|column| {
            requested
                .iter()
                .position(|name| name == &column.name)
                .unwrap_or(usize::MAX)
        });
    }
}

///
/// SliceResult
///
/// Read-only snapshot of a slice query: one row per requested key, in the
/// caller's key order, regardless of the order the store answered in.
///

#[derive(Clone, Debug, Deref, Eq, IntoIterator, PartialEq)]
pub struct SliceResult<K, N> {
    #[deref]
    #[into_iterator(owned, ref)]
    rows: Vec<RowSlice<K, N>>,
}

impl<K, N> SliceResult<K, N> {
    pub(crate) const fn new(rows: Vec<RowSlice<K, N>>) -> Self {
        Self { rows }
    }

    /// Decode a single-key response into a one-row result.
    pub(crate) fn decode_single(
        key: K,
        raw: Vec<RawColumn>,
        names: &dyn Serializer<N>,
    ) -> Result<Self, SerializeError> {
        Ok(Self::new(vec![RowSlice::decode(key, raw, names)?]))
    }

    /// Decode a multi-key response, re-keyed to the caller's order.
    ///
    /// Keys the store omitted decode to empty rows; every requested key is
    /// present exactly once, in request order.
    pub(crate) fn decode_multi(
        keys: Vec<K>,
        raw: Vec<(Vec<u8>, Vec<RawColumn>)>,
        keys_serializer: &dyn Serializer<K>,
        names: &dyn Serializer<N>,
    ) -> Result<Self, SerializeError> {
        let mut raw: Vec<(Vec<u8>, Option<Vec<RawColumn>>)> =
            raw.into_iter().map(|(k, cols)| (k, Some(cols))).collect();

        let mut rows = Vec::with_capacity(keys.len());
        for key in keys {
            let key_bytes = keys_serializer.to_bytes(&key)?;
            let columns = raw
                .iter_mut()
                .find(|(k, cols)| *k == key_bytes && cols.is_some())
                .and_then(|(_, cols)| cols.take())
                .unwrap_or_default();

            rows.push(RowSlice::decode(key, columns, names)?);
        }

        Ok(Self::new(rows))
    }

    #[must_use]
    pub fn rows(&self) -> &[RowSlice<K, N>] {
        &self.rows
    }

    /// Row for the given key, if it was part of the request.
    #[must_use]
    pub fn row(&self, key: &K) -> Option<&RowSlice<K, N>>
    where
        K: PartialEq,
    {
        self.rows.iter().find(|row| row.key() == key)
    }

    /// The single row of a single-key query.
    #[must_use]
    pub fn single(&self) -> Option<&RowSlice<K, N>> {
        self.rows.first()
    }

    /// Column lookup across the key and name dimensions.
    #[must_use]
    pub fn column(&self, key: &K, name: &N) -> Option<&SliceColumn<N>>
    where
        K: PartialEq,
        N: PartialEq,
    {
        self.row(key).and_then(|row| row.column(name))
    }

    /// Keys in iteration order (the caller's request order).
    #[must_use]
    pub fn keys(&self) -> Vec<&K> {
        self.rows.iter().map(RowSlice::key).collect()
    }

    pub(crate) fn align_rows_to_names(&mut self, requested: &[N])
    where
        N: PartialEq,
    {
        for row in &mut self.rows {
            row.align_to_names(requested);
        }
    }
}

///
/// TESTS
///
