//! Suite-scoped console interception.
//!
//! [`LogInterceptor::install`] swaps a console's dispatch for a recording
//! layer. The returned guard exposes the per-method spies, the unwrapped
//! sink, the per-test override, and the recorded-output query; dropping it
//! restores the original dispatch.
//!
//! Lifecycle mapping for a plain test suite:
//!
//! ```rust,ignore
//! // suite setup: install once
//! let interceptor = LogInterceptor::install(&console, Options::default());
//!
//! // each test: the scope guard clears records and the override on drop
//! {
//!     let _scope = interceptor.test_scope();
//!     console_log!(console, "only this test sees it");
//!     assert_eq!(interceptor.mock_lines(Method::Log), "only this test sees it");
//! }
//!
//! // suite teardown: drop restores the console
//! drop(interceptor);
//! ```

use std::sync::{Arc, Mutex};

use tracing::{debug, trace};

use crate::console::Console;
use crate::method::Method;
use crate::options::{self, Options};
use crate::sink::{Args, ConsoleSink};
use crate::spy::{MethodSpy, SpyTable};

// =============================================================================
// InterceptState
// =============================================================================

/// State shared between an installed interceptor and its console.
#[derive(Debug)]
pub(crate) struct InterceptState {
    spies: SpyTable,
    global: Options,
    override_options: Mutex<Option<Options>>,
}

impl InterceptState {
    fn new(global: Options) -> Self {
        Self {
            spies: SpyTable::default(),
            global,
            override_options: Mutex::new(None),
        }
    }

    /// One intercepted call: record first, then forward if the active
    /// policy allows it.
    pub(crate) fn handle(&self, method: Method, args: Args<'_>, real: &dyn ConsoleSink) {
        self.spies.get(method).record(args);
        if self.passes_through(method) {
            real.write(method, args);
        }
    }

    /// Pass-through decision for one call: the environment flag wins, then
    /// the per-test override, then the install-time options.
    fn passes_through(&self, method: Method) -> bool {
        if options::passthrough_forced() {
            return true;
        }
        let active = self
            .override_options
            .lock()
            .expect("override mutex poisoned")
            .unwrap_or(self.global);
        active.pass_through.allows(method)
    }

    fn set_override(&self, options: Options) {
        *self
            .override_options
            .lock()
            .expect("override mutex poisoned") = Some(options);
    }

    fn clear_override(&self) {
        *self
            .override_options
            .lock()
            .expect("override mutex poisoned") = None;
    }
}

// =============================================================================
// LogInterceptor
// =============================================================================

/// Records console output for one suite, suppressing the real output unless
/// a pass-through policy or the [`PASSTHROUGH_ENV`](crate::PASSTHROUGH_ENV)
/// flag says otherwise.
///
/// The guard restores the console on drop. Installing over a live
/// interception replaces it; the superseded guard's drop then leaves the
/// new interception alone.
#[derive(Debug)]
pub struct LogInterceptor {
    console: Console,
    state: Arc<InterceptState>,
}

impl LogInterceptor {
    /// Install recording over `console`'s methods.
    ///
    /// `options` fixes the suite-wide pass-through policy for the lifetime
    /// of the interceptor. Anything convertible is accepted: `true` (all
    /// methods), `false` (nothing), `[Method::Warn]` (a subset), or an
    /// explicit [`Options`].
    #[must_use = "dropping the interceptor immediately restores the console"]
    pub fn install(console: &Console, options: impl Into<Options>) -> Self {
        let options = options.into();
        let state = Arc::new(InterceptState::new(options));
        console.set_intercept(Arc::clone(&state));
        debug!(policy = ?options.pass_through, "console interception installed");
        Self {
            console: console.clone(),
            state,
        }
    }

    /// The spy recording `method`'s calls.
    ///
    /// The returned handle shares the live record; it keeps working across
    /// [`reset`](Self::reset) and survives teardown as a frozen snapshot.
    #[must_use]
    pub fn spy(&self, method: Method) -> MethodSpy {
        self.state.spies.get(method).clone()
    }

    /// Recorded output for `method`: arguments space-joined within each
    /// call, calls newline-joined in order, trimmed. Empty if the method
    /// was never called.
    #[must_use]
    pub fn mock_lines(&self, method: Method) -> String {
        self.state.spies.get(method).lines()
    }

    /// A console bound directly to the original sink, bypassing recording.
    ///
    /// Output written through it is real output even while interception is
    /// active.
    #[must_use]
    pub fn real_console(&self) -> Console {
        Console::with_sink(self.console.real_sink())
    }

    /// Replace the pass-through policy for the current test only.
    ///
    /// Fully supersedes the install-time options until [`reset`](Self::reset)
    /// (or the enclosing [`TestScope`]) clears it. Calling it again replaces
    /// the previous override: last write wins.
    pub fn set_override(&self, options: impl Into<Options>) {
        let options = options.into();
        trace!(policy = ?options.pass_through, "pass-through override set");
        self.state.set_override(options);
    }

    /// Drop the per-test override, reverting to the install-time options.
    pub fn clear_override(&self) {
        trace!("pass-through override cleared");
        self.state.clear_override();
    }

    /// After-each-test reset: clear every spy's records and the override.
    pub fn reset(&self) {
        trace!("spy records and override cleared");
        self.state.spies.clear_all();
        self.state.clear_override();
    }

    /// RAII handle for one test: calls [`reset`](Self::reset) when dropped.
    #[must_use]
    pub fn test_scope(&self) -> TestScope<'_> {
        TestScope { interceptor: self }
    }

    /// Restore the console and drop the interceptor.
    ///
    /// Equivalent to dropping it; provided for call sites where the restore
    /// should be explicit.
    pub fn uninstall(self) {
        drop(self);
    }
}

impl Drop for LogInterceptor {
    fn drop(&mut self) {
        if self.console.clear_intercept(&self.state) {
            debug!("console interception removed");
        }
    }
}

// =============================================================================
// TestScope
// =============================================================================

/// Per-test guard: resets spy records and the pass-through override when
/// dropped, so the next test starts clean.
#[must_use = "the reset happens when the scope is dropped"]
#[derive(Debug)]
pub struct TestScope<'a> {
    interceptor: &'a LogInterceptor,
}

impl Drop for TestScope<'_> {
    fn drop(&mut self) {
        self.interceptor.reset();
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;
    use crate::{console_error, console_log, console_warn};

    fn capture() -> (Console, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let console = Console::with_sink(Arc::clone(&sink) as Arc<dyn ConsoleSink>);
        (console, sink)
    }

    #[test]
    fn suppresses_with_default_options() {
        let (console, sink) = capture();
        let interceptor = LogInterceptor::install(&console, Options::default());

        console_error!(console, "hidden");
        assert_eq!(interceptor.mock_lines(Method::Error), "hidden");
        assert!(sink.is_empty());
    }

    #[test]
    fn records_and_forwards_with_all_policy() {
        let (console, sink) = capture();
        let interceptor = LogInterceptor::install(&console, true);

        console_log!(console, "both");
        assert_eq!(interceptor.mock_lines(Method::Log), "both");
        assert_eq!(sink.lines(Method::Log), vec!["both".to_string()]);
    }

    #[test]
    fn subset_policy_forwards_only_members() {
        let (console, sink) = capture();
        let interceptor = LogInterceptor::install(&console, [Method::Warn]);

        console_log!(console, "held");
        console_warn!(console, "through");

        assert_eq!(sink.entries(), vec![(Method::Warn, "through".to_string())]);
        assert_eq!(interceptor.spy(Method::Log).call_count(), 1);
    }

    #[test]
    fn override_supersedes_global_entirely() {
        let (console, sink) = capture();
        let interceptor = LogInterceptor::install(&console, [Method::Warn]);
        interceptor.set_override([Method::Log]);

        console_warn!(console, "held");
        console_log!(console, "through");

        assert_eq!(sink.entries(), vec![(Method::Log, "through".to_string())]);

        interceptor.clear_override();
        console_warn!(console, "now through");
        assert_eq!(sink.len(), 2);
    }

    #[test]
    fn override_is_last_write_wins() {
        let (console, sink) = capture();
        let interceptor = LogInterceptor::install(&console, false);

        interceptor.set_override(true);
        interceptor.set_override([Method::Error]);

        console_log!(console, "nope");
        console_error!(console, "yes");

        assert_eq!(sink.entries(), vec![(Method::Error, "yes".to_string())]);
    }

    #[test]
    fn reset_clears_records_and_override() {
        let (console, sink) = capture();
        let interceptor = LogInterceptor::install(&console, false);
        interceptor.set_override(true);
        console_log!(console, "one");
        interceptor.reset();

        assert!(interceptor.spy(Method::Log).is_empty());
        console_log!(console, "two");
        assert_eq!(sink.len(), 1, "override must not survive reset");
        assert_eq!(interceptor.mock_lines(Method::Log), "two");
    }

    #[test]
    fn test_scope_resets_on_drop() {
        let (console, _sink) = capture();
        let interceptor = LogInterceptor::install(&console, false);
        {
            let _scope = interceptor.test_scope();
            console_log!(console, "scoped");
            assert_eq!(interceptor.spy(Method::Log).call_count(), 1);
        }
        assert!(interceptor.spy(Method::Log).is_empty());
    }

    #[test]
    fn drop_restores_the_console() {
        let (console, sink) = capture();
        let interceptor = LogInterceptor::install(&console, false);
        console_log!(console, "recorded");
        drop(interceptor);

        assert!(!console.is_intercepted());
        console_log!(console, "real");
        assert_eq!(sink.lines(Method::Log), vec!["real".to_string()]);
    }

    #[test]
    fn stale_guard_drop_leaves_replacement_installed() {
        let (console, _sink) = capture();
        let first = LogInterceptor::install(&console, false);
        let second = LogInterceptor::install(&console, false);

        drop(first);
        assert!(console.is_intercepted());

        console_log!(console, "second sees this");
        assert_eq!(second.spy(Method::Log).call_count(), 1);
    }

    #[test]
    fn real_console_is_unwrapped() {
        let (console, sink) = capture();
        let interceptor = LogInterceptor::install(&console, false);

        let real = interceptor.real_console();
        real.warn(&[&"direct"]);

        assert!(interceptor.spy(Method::Warn).is_empty());
        assert_eq!(sink.lines(Method::Warn), vec!["direct".to_string()]);
    }

    #[test]
    fn uninstall_is_equivalent_to_drop() {
        let (console, _sink) = capture();
        let interceptor = LogInterceptor::install(&console, false);
        interceptor.uninstall();
        assert!(!console.is_intercepted());
    }
}
