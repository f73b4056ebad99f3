//! Minimal transaction logging for integration flows.
//!
//! Stamps requests with a transaction id and logs entry/exit of units of
//! work with elapsed time, as single structured lines of the form
//! `<tag> <json properties>`.
//!
//! # Components
//!
//! ```text
//! inbound headers ──► CorrelationContext ──► PropertyMap
//!                                               │
//!                  unit of work ──► TimedExecutor ──► "enter {...}"
//!                                               └──► "exit {..., "elapsedMS":"5"}"
//! ```
//!
//! # Usage
//!
//! 1. Use `CorrelationContext::derive_properties` (or the `TransactionProperties`
//!    extractor in Axum handlers) to obtain the request's properties.
//! 2. Pass them with the work to `TimedExecutor::run_timed` or
//!    `TimedExecutor::run_timed_future`.
//! 3. Both components write through an injected `LogSink`; `TracingSink`
//!    forwards to `tracing`.

pub mod clock;
pub mod config;
pub mod correlation;
pub mod error;
pub mod extract;
pub mod format;
pub mod headers;
pub mod info;
pub mod properties;
pub mod sink;
pub mod telemetry;
pub mod timed;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConnectionInfo, MinLogConfig};
pub use correlation::{CorrelationContext, CorrelationId};
pub use error::{ConfigError, SerializationError};
pub use extract::TransactionProperties;
pub use headers::{HeaderLookup, InboundHeaders};
pub use info::retrieve_info;
pub use properties::{PropertyMap, CLIENT_ID, ELAPSED_MS, TRANSACTION_ID};
pub use sink::{LogSink, MemorySink, TracingSink};
pub use telemetry::init_tracing;
pub use timed::{Completion, Outcome, TimedExecutor, WorkUnit};
