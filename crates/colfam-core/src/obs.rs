//! Observability: process-local counters for the read path.
//!
//! Executor logic never touches counter state directly; all
//! instrumentation flows through [`MetricsEvent`] and [`record`]. Tests
//! install a scoped sink override to observe events in isolation.

use std::{cell::RefCell, rc::Rc};

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug)]
pub enum MetricsEvent {
    SliceFetch { columns: u64 },
    MultigetFetch { keys: u64, columns: u64 },
    Count,
    SingleColumn,
    MutationFlush,
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent);
}

///
/// MetricsState
/// Saturating counters; never a correctness surface.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct MetricsState {
    pub slice_calls: u64,
    pub multiget_calls: u64,
    pub multiget_keys: u64,
    pub count_calls: u64,
    pub single_column_calls: u64,
    pub columns_returned: u64,
    pub mutation_flushes: u64,
}

thread_local! {
    static STATE: RefCell<MetricsState> = RefCell::new(MetricsState::default());
    static SINK_OVERRIDE: RefCell<Option<Rc<dyn MetricsSink>>> = const { RefCell::new(None) };
}

struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent) {
        STATE.with(|cell| {
            let mut m = cell.borrow_mut();
            match event {
                MetricsEvent::SliceFetch { columns } => {
                    m.slice_calls = m.slice_calls.saturating_add(1);
                    m.columns_returned = m.columns_returned.saturating_add(columns);
                }
                MetricsEvent::MultigetFetch { keys, columns } => {
                    m.multiget_calls = m.multiget_calls.saturating_add(1);
                    m.multiget_keys = m.multiget_keys.saturating_add(keys);
                    m.columns_returned = m.columns_returned.saturating_add(columns);
                }
                MetricsEvent::Count => {
                    m.count_calls = m.count_calls.saturating_add(1);
                }
                MetricsEvent::SingleColumn => {
                    m.single_column_calls = m.single_column_calls.saturating_add(1);
                }
                MetricsEvent::MutationFlush => {
                    m.mutation_flushes = m.mutation_flushes.saturating_add(1);
                }
            }
        });
    }
}

pub(crate) fn record(event: MetricsEvent) {
    let sink = SINK_OVERRIDE.with(|cell| cell.borrow().clone());
    match sink {
        Some(sink) => sink.record(event),
        None => GlobalMetricsSink.record(event),
    }
}

/// Snapshot the current counters.
#[must_use]
pub fn metrics_report() -> MetricsState {
    STATE.with(|cell| *cell.borrow())
}

/// Reset all counters.
pub fn metrics_reset_all() {
    STATE.with(|cell| *cell.borrow_mut() = MetricsState::default());
}

/// Run a closure with a temporary metrics sink override.
///
/// The previous sink is restored on all exits, including unwind.
pub fn with_metrics_sink<T>(sink: Rc<dyn MetricsSink>, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<Rc<dyn MetricsSink>>);

    impl Drop for Guard {
        fn drop(&mut self) {
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = self.0.take();
            });
        }
    }

    let prev = SINK_OVERRIDE.with(|cell| cell.borrow_mut().replace(sink));
    let _guard = Guard(prev);

    f()
}

///
/// TESTS
///
