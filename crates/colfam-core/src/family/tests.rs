use super::*;
use crate::{
    obs::{metrics_report, metrics_reset_all},
    predicate::SlicePredicate,
    result::RowSlice,
    serialize::Utf8Serializer,
    test_support::MemoryClient,
    wire::DomainError,
};
use std::{cell::Cell, rc::Rc, sync::Arc};

const FAMILY: &str = "profiles";

fn template(client: &Arc<MemoryClient>) -> ColumnFamily<String, String> {
    let wire: Arc<dyn WireClient> = client.clone();
    ColumnFamily::new(
        wire,
        FAMILY,
        Arc::new(Utf8Serializer),
        Arc::new(Utf8Serializer),
    )
}

fn seed_abc(client: &MemoryClient, key: &str) {
    client.put(FAMILY, key, "a", "1");
    client.put(FAMILY, key, "b", "2");
    client.put(FAMILY, key, "c", "3");
}

fn column_names(result: &SliceResult<String, String>, key: &str) -> Vec<String> {
    result
        .row(&key.to_string())
        .expect("row should be present")
        .columns()
        .iter()
        .map(|c| c.name().clone())
        .collect()
}

#[test]
fn single_key_query_returns_one_row_in_store_order() {
    let client = Arc::new(MemoryClient::new());
    seed_abc(&client, "r1");

    let cf = template(&client);
    let result = cf.query_columns(&"r1".to_string(), None).unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(column_names(&result, "r1"), vec!["a", "b", "c"]);
    assert_eq!(
        result
            .column(&"r1".to_string(), &"b".to_string())
            .unwrap()
            .raw_value(),
        b"2"
    );
}

#[test]
fn absent_row_decodes_as_single_empty_row() {
    let client = Arc::new(MemoryClient::new());
    let cf = template(&client);

    let result = cf.query_columns(&"missing".to_string(), None).unwrap();

    assert_eq!(result.len(), 1);
    assert!(result.single().unwrap().is_empty());
}

#[test]
fn explicit_name_list_preserves_request_order() {
    let client = Arc::new(MemoryClient::new());
    seed_abc(&client, "r1");

    let cf = template(&client);
    let predicate = SlicePredicate::by_names(vec!["c".to_string(), "a".to_string()]);
    let result = cf.query_columns(&"r1".to_string(), Some(&predicate)).unwrap();

    // The store answers in comparator order; the layer restores request order.
    assert_eq!(column_names(&result, "r1"), vec!["c", "a"]);
    let row = result.single().unwrap();
    assert_eq!(row.columns()[0].raw_value(), b"3");
    assert_eq!(row.columns()[1].raw_value(), b"1");
}

#[test]
fn multiget_preserves_caller_key_order_and_fills_absent_rows() {
    let client = Arc::new(MemoryClient::new());
    seed_abc(&client, "r1");
    client.put(FAMILY, "r2", "a", "9");

    let cf = template(&client);
    let keys = vec!["r1".to_string(), "rX".to_string(), "r2".to_string()];
    let predicate =
        SlicePredicate::by_range(Some("a".to_string()), Some("c".to_string()), 10).unwrap();
    let result = cf.query_multi(&keys, Some(&predicate)).unwrap();

    assert_eq!(result.keys(), vec!["r1", "rX", "r2"]);
    assert!(result.row(&"rX".to_string()).unwrap().is_empty());
    assert_eq!(column_names(&result, "r1"), vec!["a", "b"]);
    assert_eq!(column_names(&result, "r2"), vec!["a"]);
}

#[test]
fn range_query_respects_bounds_and_limit() {
    let client = Arc::new(MemoryClient::new());
    seed_abc(&client, "r1");

    let cf = template(&client);
    let predicate =
        SlicePredicate::by_range(Some("a".to_string()), Some("c".to_string()), 1).unwrap();
    let result = cf.query_columns(&"r1".to_string(), Some(&predicate)).unwrap();

    assert_eq!(column_names(&result, "r1"), vec!["a"]);
}

#[test]
fn reversed_range_returns_same_set_in_reverse_order() {
    let client = Arc::new(MemoryClient::new());
    seed_abc(&client, "r1");

    let cf = template(&client);

    let forward =
        SlicePredicate::by_range(Some("a".to_string()), Some("c".to_string()), 10).unwrap();
    let forward_names = column_names(
        &cf.query_columns(&"r1".to_string(), Some(&forward)).unwrap(),
        "r1",
    );

    let range = ColumnRange::new(Some("c".to_string()), Some("a".to_string()), 10)
        .unwrap()
        .reversed();
    let reversed_names = column_names(
        &cf.query_columns(&"r1".to_string(), Some(&SlicePredicate::Range(range)))
            .unwrap(),
        "r1",
    );

    let mut expected = forward_names.clone();
    expected.reverse();
    assert_eq!(reversed_names, expected);
    assert_eq!(forward_names, vec!["a", "b"]);
}

#[test]
fn reversed_range_cap_applies_to_the_tail() {
    let client = Arc::new(MemoryClient::new());
    seed_abc(&client, "r1");

    let cf = template(&client);
    let range = ColumnRange::new(Some("c".to_string()), Some("a".to_string()), 1)
        .unwrap()
        .reversed();
    let result = cf
        .query_columns(&"r1".to_string(), Some(&SlicePredicate::Range(range)))
        .unwrap();

    // Ascending [a, c) is {a, b}; the reversed cap keeps the tail.
    assert_eq!(column_names(&result, "r1"), vec!["b"]);
}

#[test]
fn default_predicate_uses_expected_columns_when_configured() {
    let client = Arc::new(MemoryClient::new());
    seed_abc(&client, "r1");

    let cf = template(&client).with_expected_columns(vec!["c".to_string(), "a".to_string()]);
    let result = cf.query_columns(&"r1".to_string(), None).unwrap();

    assert_eq!(column_names(&result, "r1"), vec!["c", "a"]);
}

#[test]
fn default_predicate_caps_at_default_limit() {
    let client = Arc::new(MemoryClient::new());
    for i in 0..(DEFAULT_SLICE_LIMIT + 20) {
        client.put(FAMILY, "wide", &format!("c{i:04}"), "v");
    }

    let cf = template(&client);
    let result = cf.query_columns(&"wide".to_string(), None).unwrap();

    assert_eq!(result.single().unwrap().len(), DEFAULT_SLICE_LIMIT as usize);
}

#[test]
fn count_matches_fetch_below_cap() {
    let client = Arc::new(MemoryClient::new());
    seed_abc(&client, "r1");

    let cf = template(&client);
    let fetched = cf.query_columns(&"r1".to_string(), None).unwrap();
    let counted = cf.count_columns(&"r1".to_string()).unwrap();

    assert_eq!(counted, fetched.single().unwrap().len() as u64);
    assert_eq!(counted, 3);
}

#[test]
fn count_saturates_at_the_default_cap() {
    let client = Arc::new(MemoryClient::new());
    for i in 0..(DEFAULT_SLICE_LIMIT + 20) {
        client.put(FAMILY, "wide", &format!("c{i:04}"), "v");
    }

    let cf = template(&client);
    assert_eq!(
        cf.count_columns(&"wide".to_string()).unwrap(),
        u64::from(DEFAULT_SLICE_LIMIT)
    );
}

#[test]
fn exists_iff_count_is_positive() {
    let client = Arc::new(MemoryClient::new());
    seed_abc(&client, "r1");

    let cf = template(&client);
    assert!(cf.columns_exist(&"r1".to_string()).unwrap());
    assert_eq!(cf.count_columns(&"empty".to_string()).unwrap(), 0);
    assert!(!cf.columns_exist(&"empty".to_string()).unwrap());
}

#[test]
fn zero_max_count_fails_before_any_wire_call() {
    let client = Arc::new(MemoryClient::new());
    let cf = template(&client);

    let err = cf
        .count_columns_range(&"r1".to_string(), None, None, 0)
        .unwrap_err();

    assert!(err.is_invalid_predicate());
    assert!(client.seen_consistency().is_empty());
}

#[test]
fn wire_errors_surface_through_the_default_translator() {
    let client = Arc::new(MemoryClient::new());
    let cf = template(&client);

    client.fail_next("socket closed");
    let err = cf.query_columns(&"r1".to_string(), None).unwrap_err();

    assert!(err.is_domain());
    assert_eq!(err.message, "transport error: socket closed");
}

#[test]
fn custom_translator_decides_the_domain_error() {
    struct TimeoutTranslator;

    impl ErrorTranslator for TimeoutTranslator {
        fn translate(&self, err: WireError) -> DomainError {
            DomainError::Timeout(err.message)
        }
    }

    let client = Arc::new(MemoryClient::new());
    let cf = template(&client).with_translator(Arc::new(TimeoutTranslator));

    client.fail_next("no reply in 2s");
    let err = cf.count_columns(&"r1".to_string()).unwrap_err();

    assert!(err.is_domain());
    assert_eq!(err.message, "store timeout: no reply in 2s");
}

#[test]
fn consistency_is_resolved_from_policy_per_call() {
    struct AlternatingPolicy {
        calls: Cell<u32>,
    }

    impl ConsistencyPolicy for AlternatingPolicy {
        fn resolve(&self, _kind: OperationKind) -> ConsistencyLevel {
            let n = self.calls.get();
            self.calls.set(n + 1);
            if n % 2 == 0 {
                ConsistencyLevel::One
            } else {
                ConsistencyLevel::All
            }
        }
    }

    let client = Arc::new(MemoryClient::new());
    let cf = template(&client).with_policy(Arc::new(AlternatingPolicy {
        calls: Cell::new(0),
    }));

    cf.query_columns(&"r1".to_string(), None).unwrap();
    cf.count_columns(&"r1".to_string()).unwrap();

    assert_eq!(
        client.seen_consistency(),
        vec![ConsistencyLevel::One, ConsistencyLevel::All]
    );
}

#[test]
fn single_column_lookup_decodes_value_or_returns_none() {
    let client = Arc::new(MemoryClient::new());
    seed_abc(&client, "r1");

    let cf = template(&client);

    let column = cf
        .query_single_column(&"r1".to_string(), &"b".to_string(), &Utf8Serializer)
        .unwrap()
        .expect("column b should exist");
    assert_eq!(column.name, "b");
    assert_eq!(column.value, "2");

    // Absent column and absent row are both None, never errors.
    assert!(
        cf.query_single_column(&"r1".to_string(), &"zz".to_string(), &Utf8Serializer)
            .unwrap()
            .is_none()
    );
    assert!(
        cf.query_single_column(&"nope".to_string(), &"a".to_string(), &Utf8Serializer)
            .unwrap()
            .is_none()
    );
}

#[test]
fn mapper_receives_the_result_and_its_output_passes_through() {
    let client = Arc::new(MemoryClient::new());
    seed_abc(&client, "r1");

    let cf = template(&client);
    let total: usize = cf
        .query_columns_mapped(&"r1".to_string(), None, |result| {
            Ok(result.single().map_or(0, RowSlice::len))
        })
        .unwrap();

    assert_eq!(total, 3);
}

#[test]
fn mapped_convenience_forms_build_the_predicate() {
    let client = Arc::new(MemoryClient::new());
    seed_abc(&client, "r1");

    let cf = template(&client);

    let names: Vec<String> = cf
        .query_names_mapped(
            &"r1".to_string(),
            vec!["c".to_string(), "a".to_string()],
            |result| Ok(column_names(result, "r1")),
        )
        .unwrap();
    assert_eq!(names, vec!["c", "a"]);

    let names: Vec<String> = cf
        .query_range_mapped(
            &"r1".to_string(),
            Some("b".to_string()),
            None,
            10,
            |result| Ok(column_names(result, "r1")),
        )
        .unwrap();
    assert_eq!(names, vec!["b", "c"]);

    // Range validation fires before the mapper or any wire call.
    let err = cf
        .query_range_mapped::<(), _>(&"r1".to_string(), None, None, 0, |_| Ok(()))
        .unwrap_err();
    assert!(err.is_invalid_predicate());
}

#[test]
fn mapper_failures_propagate_unchanged() {
    let client = Arc::new(MemoryClient::new());
    seed_abc(&client, "r1");

    let cf = template(&client);
    let err = cf
        .query_multi_mapped::<(), _>(&["r1".to_string()], None, |_| {
            Err(MapperError::new("row shape not recognized"))
        })
        .unwrap_err();

    assert!(err.is_mapper());
    assert_eq!(err.message, "row shape not recognized");
}

#[test]
fn update_flushes_immediately_unless_batched() {
    struct RecordingMutator {
        flushes: Rc<Cell<u32>>,
    }

    impl Mutator for RecordingMutator {
        fn execute(&mut self) -> Result<(), WireError> {
            self.flushes.set(self.flushes.get() + 1);
            Ok(())
        }
    }

    let client = Arc::new(MemoryClient::new());
    let mut cf = template(&client);

    let flushes = Rc::new(Cell::new(0));
    cf.set_mutator(Box::new(RecordingMutator {
        flushes: flushes.clone(),
    }));

    cf.update(|_| Ok(())).unwrap();
    assert_eq!(flushes.get(), 1);

    cf.set_batched(true);
    cf.update(|_| Ok(())).unwrap();
    assert_eq!(flushes.get(), 1);

    cf.execute_batch().unwrap();
    assert_eq!(flushes.get(), 2);
    assert!(cf.is_batched());
}

#[test]
fn update_without_a_mutator_is_an_executor_error() {
    let client = Arc::new(MemoryClient::new());
    let mut cf = template(&client);

    let err = cf.update(|_| Ok(())).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Internal);
    assert_eq!(err.origin, ErrorOrigin::Executor);
}

#[test]
fn read_path_records_metrics_events() {
    let client = Arc::new(MemoryClient::new());
    seed_abc(&client, "r1");

    let cf = template(&client);

    metrics_reset_all();
    cf.query_columns(&"r1".to_string(), None).unwrap();
    cf.query_multi(&["r1".to_string(), "r2".to_string()], None).unwrap();
    cf.count_columns(&"r1".to_string()).unwrap();

    let m = metrics_report();
    assert_eq!(m.slice_calls, 1);
    assert_eq!(m.multiget_calls, 1);
    assert_eq!(m.multiget_keys, 2);
    assert_eq!(m.count_calls, 1);
    assert_eq!(m.columns_returned, 6);
}
