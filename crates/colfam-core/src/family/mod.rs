#[cfg(test)]
mod tests;

use crate::{
    DEFAULT_SLICE_LIMIT,
    error::{Error, ErrorKind, ErrorOrigin},
    obs::{self, MetricsEvent},
    predicate::{ColumnRange, SlicePredicate},
    result::{SliceResult, TypedColumn},
    serialize::{NameSerializer, Serializer},
    wire::{
        ConsistencyLevel, ConsistencyPolicy, ErrorTranslator, Mutator, OperationKind,
        PassthroughTranslator, QuorumPolicy, WireClient, WireError,
    },
};
use std::{borrow::Cow, sync::Arc};
use thiserror::Error as ThisError;

///
/// MapperError
///
/// Failure raised by a caller-supplied row mapper. Propagated to the
/// caller unchanged; this layer adds no handling of its own.
///

#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct MapperError {
    pub message: String,
}

impl MapperError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<MapperError> for Error {
    fn from(err: MapperError) -> Self {
        Self::new(ErrorKind::Mapper, ErrorOrigin::Mapper, err.message)
    }
}

///
/// ColumnFamily
///
/// Long-lived typed access point for one column family: holds the wire
/// client, serializers, and policy so individual calls do not. Generic
/// over the row-key type `K` and column-name type `N`; value types are
/// deferred to each call.
///
/// Construction-time fields are immutable. The only mutable state is the
/// batched/unbatched mutation toggle and the attached mutator, which must
/// not be swapped concurrently with an in-flight call using them.
///

pub struct ColumnFamily<K, N> {
    family: String,
    client: Arc<dyn WireClient>,
    keys: Arc<dyn Serializer<K>>,
    names: Arc<dyn NameSerializer<N>>,
    translator: Arc<dyn ErrorTranslator>,
    policy: Arc<dyn ConsistencyPolicy>,
    expected_columns: Option<Vec<N>>,
    batched: bool,
    mutator: Option<Box<dyn Mutator>>,
    debug: bool,
}

impl<K, N> ColumnFamily<K, N> {
    pub fn new(
        client: Arc<dyn WireClient>,
        family: impl Into<String>,
        keys: Arc<dyn Serializer<K>>,
        names: Arc<dyn NameSerializer<N>>,
    ) -> Self {
        Self {
            family: family.into(),
            client,
            keys,
            names,
            translator: Arc::new(PassthroughTranslator),
            policy: Arc::new(QuorumPolicy),
            expected_columns: None,
            batched: false,
            mutator: None,
            debug: false,
        }
    }

    #[must_use]
    pub fn with_translator(mut self, translator: Arc<dyn ErrorTranslator>) -> Self {
        self.translator = translator;
        self
    }

    #[must_use]
    pub fn with_policy(mut self, policy: Arc<dyn ConsistencyPolicy>) -> Self {
        self.policy = policy;
        self
    }

    /// Statically expected column names. A query issued without a
    /// predicate is restricted to these instead of the full default range.
    #[must_use]
    pub fn with_expected_columns(mut self, names: Vec<N>) -> Self {
        self.expected_columns = Some(names);
        self
    }

    #[must_use]
    pub const fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    #[must_use]
    pub fn family(&self) -> &str {
        &self.family
    }

    #[must_use]
    pub const fn is_batched(&self) -> bool {
        self.batched
    }

    //
    // Mutation hand-off
    //
    // The write path itself lives in the mutator; this layer only toggles
    // batching and invokes it.
    //

    pub const fn set_batched(&mut self, batched: bool) -> &mut Self {
        self.batched = batched;
        self
    }

    pub fn set_mutator(&mut self, mutator: Box<dyn Mutator>) -> &mut Self {
        self.mutator = Some(mutator);
        self
    }

    /// Apply mutations through the attached mutator, flushing immediately
    /// unless the instance is batched.
    pub fn update<F>(&mut self, apply: F) -> Result<(), Error>
    where
        F: FnOnce(&mut dyn Mutator) -> Result<(), WireError>,
    {
        let applied = match self.mutator.as_mut() {
            Some(mutator) => apply(mutator.as_mut()),
            None => {
                return Err(Error::executor_internal("update requires an attached mutator"));
            }
        };

        if let Err(err) = applied {
            return Err(self.translate(err));
        }

        if self.batched {
            return Ok(());
        }

        self.execute_batch()
    }

    /// Flush the attached mutator explicitly (the batched-mode companion
    /// to [`Self::update`]).
    pub fn execute_batch(&mut self) -> Result<(), Error> {
        let flushed = match self.mutator.as_mut() {
            Some(mutator) => mutator.execute(),
            None => {
                return Err(Error::executor_internal("no mutator attached"));
            }
        };

        match flushed {
            Ok(()) => {
                obs::record(MetricsEvent::MutationFlush);
                Ok(())
            }
            Err(err) => Err(self.translate(err)),
        }
    }

    //
    // Internal plumbing shared by every read operation
    //

    fn read_consistency(&self) -> ConsistencyLevel {
        // Resolved per call, never cached on the instance.
        self.policy.resolve(OperationKind::Read)
    }

    fn translate(&self, err: WireError) -> Error {
        self.translator.translate(err).into()
    }

    fn debug_log(&self, s: impl AsRef<str>) {
        if self.debug {
            println!("[debug] {}", s.as_ref());
        }
    }

    fn resolve_predicate<'a>(
        &self,
        predicate: Option<&'a SlicePredicate<N>>,
    ) -> Cow<'a, SlicePredicate<N>>
    where
        N: Clone,
    {
        match predicate {
            Some(p) => Cow::Borrowed(p),
            None => Cow::Owned(match &self.expected_columns {
                Some(names) => SlicePredicate::by_names(names.clone()),
                None => SlicePredicate::all(),
            }),
        }
    }
}

impl<K, N> ColumnFamily<K, N>
where
    K: Clone,
    N: Clone + PartialEq,
{
    /// Fetch the selected columns of one row.
    ///
    /// `None` selects the expected-column set when one is configured,
    /// otherwise all columns up to the default limit. The result always
    /// holds exactly one row; an absent row decodes as an empty row.
    pub fn query_columns(
        &self,
        key: &K,
        predicate: Option<&SlicePredicate<N>>,
    ) -> Result<SliceResult<K, N>, Error> {
        let predicate = self.resolve_predicate(predicate);
        let wire_predicate = predicate.to_wire(self.names.as_ref())?;
        let wire_key = self.keys.to_bytes(key)?;
        let consistency = self.read_consistency();

        self.debug_log(format!(
            "get_slice on {} (consistency={consistency})",
            self.family
        ));

        let columns = self
            .client
            .get_slice(&self.family, &wire_key, &wire_predicate, consistency)
            .map_err(|e| self.translate(e))?;

        obs::record(MetricsEvent::SliceFetch {
            columns: columns.len() as u64,
        });

        let mut result = SliceResult::decode_single(key.clone(), columns, self.names.as_ref())?;
        if let SlicePredicate::Names(requested) = predicate.as_ref() {
            result.align_rows_to_names(requested);
        }

        Ok(result)
    }

    /// Fetch the same slice of many rows in one wire call.
    ///
    /// The result holds one row per requested key, in request order, no
    /// matter how the store ordered its answer or which rows it omitted.
    pub fn query_multi(
        &self,
        keys: &[K],
        predicate: Option<&SlicePredicate<N>>,
    ) -> Result<SliceResult<K, N>, Error> {
        let predicate = self.resolve_predicate(predicate);
        let wire_predicate = predicate.to_wire(self.names.as_ref())?;

        let mut wire_keys = Vec::with_capacity(keys.len());
        for key in keys {
            wire_keys.push(self.keys.to_bytes(key)?);
        }
        let consistency = self.read_consistency();

        self.debug_log(format!(
            "multiget_slice on {} ({} keys, consistency={consistency})",
            self.family,
            keys.len()
        ));

        let raw = self
            .client
            .multiget_slice(&self.family, &wire_keys, &wire_predicate, consistency)
            .map_err(|e| self.translate(e))?;

        obs::record(MetricsEvent::MultigetFetch {
            keys: keys.len() as u64,
            columns: raw.iter().map(|(_, cols)| cols.len() as u64).sum(),
        });

        let mut result = SliceResult::decode_multi(
            keys.to_vec(),
            raw,
            self.keys.as_ref(),
            self.names.as_ref(),
        )?;
        if let SlicePredicate::Names(requested) = predicate.as_ref() {
            result.align_rows_to_names(requested);
        }

        Ok(result)
    }

    /// Fetch one column of one row, decoding the value with the supplied
    /// serializer. Absent column (or row) is `None`, not an error.
    pub fn query_single_column<V>(
        &self,
        key: &K,
        name: &N,
        values: &dyn Serializer<V>,
    ) -> Result<Option<TypedColumn<N, V>>, Error> {
        let predicate = SlicePredicate::by_names(vec![name.clone()]);
        let result = self.query_columns(key, Some(&predicate))?;

        obs::record(MetricsEvent::SingleColumn);

        match result.single().and_then(|row| row.column(name)) {
            Some(column) => Ok(Some(TypedColumn::from_slice_column(column, values)?)),
            None => Ok(None),
        }
    }

    //
    // Mapped queries
    //

    /// Build the result wrapper and thread it through a caller-supplied
    /// mapper, returning the mapper's output unchanged.
    pub fn query_columns_mapped<T, F>(
        &self,
        key: &K,
        predicate: Option<&SlicePredicate<N>>,
        mapper: F,
    ) -> Result<T, Error>
    where
        F: FnOnce(&SliceResult<K, N>) -> Result<T, MapperError>,
    {
        let result = self.query_columns(key, predicate)?;
        mapper(&result).map_err(Error::from)
    }

    /// Convenience form of [`Self::query_columns_mapped`] selecting an
    /// explicit name list.
    pub fn query_names_mapped<T, F>(
        &self,
        key: &K,
        names: Vec<N>,
        mapper: F,
    ) -> Result<T, Error>
    where
        F: FnOnce(&SliceResult<K, N>) -> Result<T, MapperError>,
    {
        let predicate = SlicePredicate::by_names(names);
        self.query_columns_mapped(key, Some(&predicate), mapper)
    }

    /// Convenience form of [`Self::query_columns_mapped`] selecting a
    /// `[start, end)` range.
    pub fn query_range_mapped<T, F>(
        &self,
        key: &K,
        start: Option<N>,
        end: Option<N>,
        limit: u32,
        mapper: F,
    ) -> Result<T, Error>
    where
        F: FnOnce(&SliceResult<K, N>) -> Result<T, MapperError>,
    {
        let predicate = SlicePredicate::by_range(start, end, limit)?;
        self.query_columns_mapped(key, Some(&predicate), mapper)
    }

    /// Multi-key variant of [`Self::query_columns_mapped`].
    pub fn query_multi_mapped<T, F>(
        &self,
        keys: &[K],
        predicate: Option<&SlicePredicate<N>>,
        mapper: F,
    ) -> Result<T, Error>
    where
        F: FnOnce(&SliceResult<K, N>) -> Result<T, MapperError>,
    {
        let result = self.query_multi(keys, predicate)?;
        mapper(&result).map_err(Error::from)
    }

    //
    // Count / exists
    //

    /// Count columns in `[start, end)`, saturating at `max`.
    pub fn count_columns_range(
        &self,
        key: &K,
        start: Option<N>,
        end: Option<N>,
        max: u32,
    ) -> Result<u64, Error> {
        let range = ColumnRange::new(start, end, max)?;
        let wire_predicate = SlicePredicate::Range(range).to_wire(self.names.as_ref())?;
        let wire_key = self.keys.to_bytes(key)?;
        let consistency = self.read_consistency();

        let count = self
            .client
            .count_columns(&self.family, &wire_key, &wire_predicate, consistency)
            .map_err(|e| self.translate(e))?;

        obs::record(MetricsEvent::Count);

        Ok(count)
    }

    /// Count over the full default bounds.
    pub fn count_columns(&self, key: &K) -> Result<u64, Error> {
        self.count_columns_range(key, None, None, DEFAULT_SLICE_LIMIT)
    }

    /// Whether the row holds any columns. Defined as `count > 0`; no wire
    /// short-circuit.
    pub fn columns_exist(&self, key: &K) -> Result<bool, Error> {
        Ok(self.count_columns(key)? > 0)
    }
}
