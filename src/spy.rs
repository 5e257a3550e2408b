//! Per-method call recording.

use std::sync::{Arc, Mutex};

use crate::method::Method;
use crate::sink::Args;

// =============================================================================
// CallRecord
// =============================================================================

/// One recorded invocation: its arguments, rendered in order.
///
/// Arguments are captured at call time, so later mutation of whatever the
/// caller logged cannot change the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRecord {
    args: Vec<String>,
}

impl CallRecord {
    pub(crate) fn capture(args: Args<'_>) -> Self {
        Self {
            args: args.iter().map(|arg| arg.to_string()).collect(),
        }
    }

    /// The recorded arguments, in the order they were passed.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// The call as a single space-joined line.
    #[must_use]
    pub fn line(&self) -> String {
        self.args.join(" ")
    }
}

// =============================================================================
// MethodSpy
// =============================================================================

/// Recording handle for a single intercepted method.
///
/// Cheap to clone; clones share the same record. A handle kept across
/// teardown keeps its records as a frozen snapshot once interception ends.
#[derive(Debug, Clone, Default)]
pub struct MethodSpy {
    calls: Arc<Mutex<Vec<CallRecord>>>,
}

impl MethodSpy {
    pub(crate) fn record(&self, args: Args<'_>) {
        self.calls
            .lock()
            .expect("spy mutex poisoned")
            .push(CallRecord::capture(args));
    }

    /// All recorded calls, in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<CallRecord> {
        self.calls.lock().expect("spy mutex poisoned").clone()
    }

    /// Number of recorded calls.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("spy mutex poisoned").len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.call_count() == 0
    }

    /// The most recent call, if any.
    #[must_use]
    pub fn last_call(&self) -> Option<CallRecord> {
        self.calls
            .lock()
            .expect("spy mutex poisoned")
            .last()
            .cloned()
    }

    /// Recorded output as one string: arguments space-joined within each
    /// call, calls newline-joined in order, leading and trailing whitespace
    /// trimmed.
    ///
    /// A method that was never invoked yields the empty string.
    #[must_use]
    pub fn lines(&self) -> String {
        self.calls
            .lock()
            .expect("spy mutex poisoned")
            .iter()
            .map(CallRecord::line)
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string()
    }

    /// Whether any recorded call contains `needle` in its rendered line.
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.calls
            .lock()
            .expect("spy mutex poisoned")
            .iter()
            .any(|call| call.line().contains(needle))
    }

    /// Assert that a call containing `needle` was recorded.
    ///
    /// # Panics
    ///
    /// Panics with the recorded lines when no call matches.
    pub fn assert_logged(&self, needle: &str) {
        assert!(
            self.contains(needle),
            "Expected a recorded call containing {:?}. Recorded: {:#?}",
            needle,
            self.rendered()
        );
    }

    /// Assert that no recorded call contains `needle`.
    ///
    /// # Panics
    ///
    /// Panics with the recorded lines when a call matches.
    pub fn assert_not_logged(&self, needle: &str) {
        assert!(
            !self.contains(needle),
            "Expected no recorded call containing {:?}. Recorded: {:#?}",
            needle,
            self.rendered()
        );
    }

    /// Drop all recorded calls.
    pub fn clear(&self) {
        self.calls.lock().expect("spy mutex poisoned").clear();
    }

    fn rendered(&self) -> Vec<String> {
        self.calls
            .lock()
            .expect("spy mutex poisoned")
            .iter()
            .map(CallRecord::line)
            .collect()
    }
}

// =============================================================================
// SpyTable
// =============================================================================

/// One spy per intercepted method.
#[derive(Debug, Clone, Default)]
pub(crate) struct SpyTable {
    log: MethodSpy,
    warn: MethodSpy,
    error: MethodSpy,
}

impl SpyTable {
    pub(crate) fn get(&self, method: Method) -> &MethodSpy {
        match method {
            Method::Log => &self.log,
            Method::Warn => &self.warn,
            Method::Error => &self.error,
        }
    }

    pub(crate) fn clear_all(&self) {
        for method in Method::ALL {
            self.get(method).clear();
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_args_verbatim_in_order() {
        let spy = MethodSpy::default();
        spy.record(&[&"connect", &"db", &5]);
        spy.record(&[&"retry"]);

        let calls = spy.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].args(), ["connect", "db", "5"]);
        assert_eq!(calls[0].line(), "connect db 5");
        assert_eq!(spy.last_call().unwrap().line(), "retry");
    }

    #[test]
    fn lines_joins_calls_with_newlines() {
        let spy = MethodSpy::default();
        assert_eq!(spy.lines(), "");

        spy.record(&[&"first"]);
        spy.record(&[&"second", &"half"]);
        assert_eq!(spy.lines(), "first\nsecond half");
    }

    #[test]
    fn lines_trims_the_joined_result() {
        let spy = MethodSpy::default();
        spy.record(&[&" padded "]);
        assert_eq!(spy.lines(), "padded");
    }

    #[test]
    fn empty_calls_collapse_at_the_edges() {
        let spy = MethodSpy::default();
        spy.record(&[]);
        spy.record(&[&"middle"]);
        spy.record(&[]);
        assert_eq!(spy.lines(), "middle");
    }

    #[test]
    fn clear_empties_the_record() {
        let spy = MethodSpy::default();
        spy.record(&[&"gone"]);
        spy.clear();
        assert!(spy.is_empty());
        assert_eq!(spy.call_count(), 0);
        assert_eq!(spy.lines(), "");
        assert_eq!(spy.last_call(), None);
    }

    #[test]
    fn clones_share_the_record() {
        let spy = MethodSpy::default();
        let alias = spy.clone();
        spy.record(&[&"shared"]);
        assert_eq!(alias.call_count(), 1);
        assert!(alias.contains("shared"));
    }

    #[test]
    #[should_panic(expected = "Expected a recorded call containing")]
    fn assert_logged_panics_when_missing() {
        MethodSpy::default().assert_logged("absent");
    }

    #[test]
    #[should_panic(expected = "Expected no recorded call containing")]
    fn assert_not_logged_panics_when_present() {
        let spy = MethodSpy::default();
        spy.record(&[&"present"]);
        spy.assert_not_logged("present");
    }

    #[test]
    fn spy_table_clears_every_method() {
        let table = SpyTable::default();
        table.get(Method::Log).record(&[&"a"]);
        table.get(Method::Error).record(&[&"b"]);
        table.clear_all();
        for method in Method::ALL {
            assert!(table.get(method).is_empty());
        }
    }
}
