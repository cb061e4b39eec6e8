//! In-memory wire client for unit tests.
//!
//! Behaves like a real store would: columns held in comparator order,
//! multiget responses in its own order (not the caller's), absent rows
//! omitted from responses entirely.

use crate::wire::{ConsistencyLevel, RawColumn, WireClient, WireError, WireSlicePredicate};
use std::{cell::RefCell, collections::BTreeMap};

type Row = BTreeMap<Vec<u8>, RawColumn>;
type Family = BTreeMap<Vec<u8>, Row>;

///
/// MemoryClient
///

#[derive(Default)]
pub(crate) struct MemoryClient {
    families: RefCell<BTreeMap<String, Family>>,
    seen_consistency: RefCell<Vec<ConsistencyLevel>>,
    fail_next: RefCell<Option<String>>,
}

impl MemoryClient {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn put(&self, family: &str, key: &str, name: &str, value: &str) {
        let column = RawColumn::new(name.as_bytes().to_vec(), value.as_bytes().to_vec());
        self.families
            .borrow_mut()
            .entry(family.to_string())
            .or_default()
            .entry(key.as_bytes().to_vec())
            .or_default()
            .insert(column.name.clone(), column);
    }

    /// Make the next wire call fail with the given message.
    pub(crate) fn fail_next(&self, message: &str) {
        *self.fail_next.borrow_mut() = Some(message.to_string());
    }

    pub(crate) fn seen_consistency(&self) -> Vec<ConsistencyLevel> {
        self.seen_consistency.borrow().clone()
    }

    fn observe(&self, consistency: ConsistencyLevel) -> Result<(), WireError> {
        if let Some(message) = self.fail_next.borrow_mut().take() {
            return Err(WireError::new(message));
        }
        self.seen_consistency.borrow_mut().push(consistency);
        Ok(())
    }

    fn slice(row: &Row, predicate: &WireSlicePredicate) -> Vec<RawColumn> {
        match predicate {
            // Explicit names come back in the store's comparator order, not
            // the requested order; request duplicates collapse.
            WireSlicePredicate::Names(names) => row
                .values()
                .filter(|c| names.contains(&c.name))
                .cloned()
                .collect(),

            WireSlicePredicate::Range {
                start,
                end,
                reversed,
                limit,
            } => {
                let (lo, hi) = if *reversed { (end, start) } else { (start, end) };
                let mut columns: Vec<RawColumn> = row
                    .values()
                    .filter(|c| {
                        (lo.is_empty() || c.name >= *lo) && (hi.is_empty() || c.name < *hi)
                    })
                    .cloned()
                    .collect();

                if *reversed {
                    columns.reverse();
                }
                columns.truncate(*limit as usize);
                columns
            }
        }
    }
}

impl WireClient for MemoryClient {
    fn get_slice(
        &self,
        family: &str,
        key: &[u8],
        predicate: &WireSlicePredicate,
        consistency: ConsistencyLevel,
    ) -> Result<Vec<RawColumn>, WireError> {
        self.observe(consistency)?;

        let families = self.families.borrow();
        let columns = families
            .get(family)
            .and_then(|f| f.get(key))
            .map(|row| Self::slice(row, predicate))
            .unwrap_or_default();

        Ok(columns)
    }

    fn multiget_slice(
        &self,
        family: &str,
        keys: &[Vec<u8>],
        predicate: &WireSlicePredicate,
        consistency: ConsistencyLevel,
    ) -> Result<Vec<(Vec<u8>, Vec<RawColumn>)>, WireError> {
        self.observe(consistency)?;

        let families = self.families.borrow();
        let mut response: Vec<(Vec<u8>, Vec<RawColumn>)> = keys
            .iter()
            .filter_map(|key| {
                families
                    .get(family)
                    .and_then(|f| f.get(key))
                    .map(|row| (key.clone(), Self::slice(row, predicate)))
            })
            .collect();

        // The store answers in its own order; absent keys are omitted.
        response.reverse();

        Ok(response)
    }

    fn count_columns(
        &self,
        family: &str,
        key: &[u8],
        predicate: &WireSlicePredicate,
        consistency: ConsistencyLevel,
    ) -> Result<u64, WireError> {
        self.observe(consistency)?;

        let families = self.families.borrow();
        let count = families
            .get(family)
            .and_then(|f| f.get(key))
            .map_or(0, |row| Self::slice(row, predicate).len());

        Ok(count as u64)
    }
}
