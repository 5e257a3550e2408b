//! The shared console handle and its dispatch.

use std::fmt;
use std::sync::{Arc, RwLock};

use crate::interceptor::InterceptState;
use crate::method::Method;
use crate::sink::{Args, ConsoleSink, StdioSink};

// =============================================================================
// Console
// =============================================================================

/// A console-style output handle with three methods: `log`, `warn`, `error`.
///
/// Cloning is cheap; clones share the same sink and interception state, so a
/// console handed to code under test and the one a test installs an
/// interceptor on are the same console.
///
/// # Examples
///
/// ```
/// use console_spy::{Console, LogInterceptor, Method, Options, console_log};
///
/// let console = Console::new();
/// let interceptor = LogInterceptor::install(&console, Options::default());
///
/// console_log!(console, "starting", 3, "workers");
/// assert!(interceptor.spy(Method::Log).contains("3 workers"));
/// ```
#[derive(Clone)]
pub struct Console {
    inner: Arc<ConsoleInner>,
}

struct ConsoleInner {
    real: Arc<dyn ConsoleSink>,
    intercept: RwLock<Option<Arc<InterceptState>>>,
}

impl Console {
    /// A console over the process's standard streams.
    #[must_use]
    pub fn new() -> Self {
        Self::with_sink(Arc::new(StdioSink))
    }

    /// A console over a custom sink.
    #[must_use]
    pub fn with_sink(sink: Arc<dyn ConsoleSink>) -> Self {
        Self {
            inner: Arc::new(ConsoleInner {
                real: sink,
                intercept: RwLock::new(None),
            }),
        }
    }

    /// Informational output.
    pub fn log(&self, args: Args<'_>) {
        self.call(Method::Log, args);
    }

    /// Warning output.
    pub fn warn(&self, args: Args<'_>) {
        self.call(Method::Warn, args);
    }

    /// Error output.
    pub fn error(&self, args: Args<'_>) {
        self.call(Method::Error, args);
    }

    /// Dispatch a call against `method`.
    ///
    /// While intercepted the call is recorded first and forwarded to the
    /// real sink only if the active pass-through policy allows it; otherwise
    /// it goes straight to the real sink.
    pub fn call(&self, method: Method, args: Args<'_>) {
        let intercept = self
            .inner
            .intercept
            .read()
            .expect("console lock poisoned")
            .clone();
        match intercept {
            Some(state) => state.handle(method, args, self.inner.real.as_ref()),
            None => self.inner.real.write(method, args),
        }
    }

    /// Whether an interceptor is currently installed on this console.
    #[must_use]
    pub fn is_intercepted(&self) -> bool {
        self.inner
            .intercept
            .read()
            .expect("console lock poisoned")
            .is_some()
    }

    /// The sink this console was built over.
    pub(crate) fn real_sink(&self) -> Arc<dyn ConsoleSink> {
        Arc::clone(&self.inner.real)
    }

    /// Swap in an interception layer, replacing any previous one.
    pub(crate) fn set_intercept(&self, state: Arc<InterceptState>) {
        *self.inner.intercept.write().expect("console lock poisoned") = Some(state);
    }

    /// Clear the interception layer if it is still `state`.
    ///
    /// Returns `false` when a later install already replaced it; the slot is
    /// left untouched in that case.
    pub(crate) fn clear_intercept(&self, state: &Arc<InterceptState>) -> bool {
        let mut slot = self.inner.intercept.write().expect("console lock poisoned");
        if slot
            .as_ref()
            .is_some_and(|current| Arc::ptr_eq(current, state))
        {
            *slot = None;
            true
        } else {
            false
        }
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Console {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Console")
            .field("intercepted", &self.is_intercepted())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Call macros
// =============================================================================

/// Invoke [`Console::log`] with a variadic argument list.
///
/// Each argument only needs to implement [`std::fmt::Display`].
///
/// # Examples
///
/// ```
/// # use console_spy::{Console, LogInterceptor, Options, console_log};
/// # let console = Console::new();
/// # let _interceptor = LogInterceptor::install(&console, Options::default());
/// console_log!(console, "loaded", 42, "entries");
/// ```
#[macro_export]
macro_rules! console_log {
    ($console:expr $(, $arg:expr)* $(,)?) => {
        $console.log(&[$(&$arg as &dyn ::std::fmt::Display),*])
    };
}

/// Invoke [`Console::warn`] with a variadic argument list.
#[macro_export]
macro_rules! console_warn {
    ($console:expr $(, $arg:expr)* $(,)?) => {
        $console.warn(&[$(&$arg as &dyn ::std::fmt::Display),*])
    };
}

/// Invoke [`Console::error`] with a variadic argument list.
#[macro_export]
macro_rules! console_error {
    ($console:expr $(, $arg:expr)* $(,)?) => {
        $console.error(&[$(&$arg as &dyn ::std::fmt::Display),*])
    };
}

// =============================================================================
// Tests
// =============================================================================
