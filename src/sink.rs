//! Output sinks: where console calls ultimately land.

use std::fmt;
use std::io::Write;
use std::sync::Mutex;

use crate::method::Method;

/// Borrowed argument list of a single console call.
///
/// Console methods are variadic in spirit; callers hand over a slice of
/// displayable values, usually built by the [`console_log!`](crate::console_log)
/// family of macros.
pub type Args<'a> = &'a [&'a dyn fmt::Display];

/// Destination for console output.
///
/// A [`Console`](crate::Console) owns one of these as its real sink; the
/// interceptor forwards to it when pass-through applies. Implementations
/// must not panic on write failure.
pub trait ConsoleSink: Send + Sync {
    /// Write one call: the method it was issued against and its arguments.
    fn write(&self, method: Method, args: Args<'_>);
}

/// Render an argument list the way terminals show it: space-joined.
#[must_use]
pub fn render_args(args: Args<'_>) -> String {
    args.iter()
        .map(|arg| arg.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

// =============================================================================
// StdioSink
// =============================================================================

/// The process's standard streams: `log` writes to stdout, `warn` and
/// `error` to stderr. Write errors are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdioSink;

impl ConsoleSink for StdioSink {
    fn write(&self, method: Method, args: Args<'_>) {
        let line = render_args(args);
        match method {
            Method::Log => {
                let _ = writeln!(std::io::stdout(), "{line}");
            }
            Method::Warn | Method::Error => {
                let _ = writeln!(std::io::stderr(), "{line}");
            }
        }
    }
}

// =============================================================================
// MemorySink
// =============================================================================

/// In-memory sink that captures every write.
///
/// Useful for asserting on pass-through behavior, or anywhere real output
/// is unwanted. Entries are `(method, rendered line)` pairs in write order.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<(Method, String)>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All captured entries, in write order.
    #[must_use]
    pub fn entries(&self) -> Vec<(Method, String)> {
        self.entries.lock().expect("sink mutex poisoned").clone()
    }

    /// Rendered lines captured for `method`, in write order.
    #[must_use]
    pub fn lines(&self, method: Method) -> Vec<String> {
        self.entries
            .lock()
            .expect("sink mutex poisoned")
            .iter()
            .filter(|(m, _)| *m == method)
            .map(|(_, line)| line.clone())
            .collect()
    }

    /// Number of captured writes across all methods.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().expect("sink mutex poisoned").len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all captured entries.
    pub fn clear(&self) {
        self.entries.lock().expect("sink mutex poisoned").clear();
    }
}

impl ConsoleSink for MemorySink {
    fn write(&self, method: Method, args: Args<'_>) {
        let line = render_args(args);
        self.entries
            .lock()
            .expect("sink mutex poisoned")
            .push((method, line));
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_joins_args_with_spaces() {
        let args: &[&dyn fmt::Display] = &[&"a", &1, &true];
        assert_eq!(render_args(args), "a 1 true");
        assert_eq!(render_args(&[]), "");
        assert_eq!(render_args(&[&"solo"]), "solo");
    }

    #[test]
    fn memory_sink_captures_in_order() {
        let sink = MemorySink::new();
        sink.write(Method::Log, &[&"one"]);
        sink.write(Method::Error, &[&"two"]);
        sink.write(Method::Log, &[&"three", &3]);

        assert_eq!(sink.len(), 3);
        assert_eq!(
            sink.lines(Method::Log),
            vec!["one".to_string(), "three 3".to_string()]
        );
        assert_eq!(sink.lines(Method::Warn), Vec::<String>::new());
        assert_eq!(sink.entries()[1], (Method::Error, "two".to_string()));
    }

    #[test]
    fn memory_sink_clears() {
        let sink = MemorySink::new();
        sink.write(Method::Warn, &[&"gone"]);
        sink.clear();
        assert!(sink.is_empty());
        assert_eq!(sink.len(), 0);
    }

    #[test]
    fn stdio_sink_writes_without_panicking() {
        let sink = StdioSink;
        for method in Method::ALL {
            sink.write(method, &[&"smoke", &method]);
        }
    }
}
