//! console-spy - console interception for tests
//!
//! Wraps the three console-style output methods (`log`, `warn`, `error`) of
//! a shared [`Console`] with recording spies, so tests can assert on
//! diagnostic output without that output reaching the test runner's own
//! stream. Pass-through to the real sink can be enabled suite-wide at
//! install time, per test via an override, or process-wide with the
//! [`PASSTHROUGH_ENV`] environment flag.
//!
//! # Example
//!
//! ```
//! use console_spy::{Console, LogInterceptor, Method, Options, console_log, console_warn};
//!
//! let console = Console::new();
//! let interceptor = LogInterceptor::install(&console, Options::default());
//!
//! console_log!(console, "ingested", 3, "records");
//! console_warn!(console, "retrying");
//!
//! assert_eq!(interceptor.mock_lines(Method::Log), "ingested 3 records");
//! assert_eq!(interceptor.mock_lines(Method::Warn), "retrying");
//! // nothing above reached stdout or stderr
//! ```

// Note: deny (not forbid) to allow #[allow(unsafe_code)] in test helpers for env var manipulation
#![deny(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod console;
pub mod interceptor;
pub mod method;
pub mod options;
pub mod sink;
pub mod spy;

pub use console::Console;
pub use interceptor::{LogInterceptor, TestScope};
pub use method::{Method, MethodSet, ParseMethodError};
pub use options::{Options, PASSTHROUGH_ENV, PassThrough, passthrough_forced};
pub use sink::{Args, ConsoleSink, MemorySink, StdioSink, render_args};
pub use spy::{CallRecord, MethodSpy};
