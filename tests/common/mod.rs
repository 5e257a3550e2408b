//! Shared helpers for integration tests.

use std::sync::Arc;

use console_spy::{Console, ConsoleSink, MemorySink};

/// A console whose real sink is an in-memory capture, so forwarding can be
/// asserted on without touching the process streams.
pub fn capture_console() -> (Console, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    let console = Console::with_sink(Arc::clone(&sink) as Arc<dyn ConsoleSink>);
    (console, sink)
}
