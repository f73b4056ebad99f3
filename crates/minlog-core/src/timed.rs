//! Timed execution with entry/exit logging.
//!
//! `TimedExecutor` logs `enter` before a unit of work starts and `exit` (or
//! `exit with error <message>`) when it completes, with `elapsedMS` added to
//! the logged properties. The outcome reaches the caller unchanged.
//!
//! Work is callback-style: a [`WorkUnit`] receives a one-shot [`Completion`]
//! and may signal it inline or later from another thread. Futures returning
//! `Result` can use [`TimedExecutor::run_timed_future`] instead.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use minlog_core::{Completion, MemorySink, Outcome, PropertyMap, TimedExecutor};
//!
//! let sink = MemorySink::new();
//! let executor = TimedExecutor::new(Arc::new(sink.clone()));
//! let props = PropertyMap::new().with("client_id", "abc");
//!
//! executor.run_timed(
//!     Some(&props),
//!     |done: Completion<&'static str, String>| done.success("OK"),
//!     |outcome| assert!(matches!(outcome, Outcome::Success("OK"))),
//! );
//! assert_eq!(sink.len(), 2);
//! ```

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::format::format;
use crate::properties::{PropertyMap, ELAPSED_MS};
use crate::sink::{LogSink, TracingSink};

/// Tag logged before work starts.
pub const ENTER_TAG: &str = "enter";
/// Tag logged after successful completion.
pub const EXIT_TAG: &str = "exit";
/// Prefix of the tag logged after failed completion.
pub const EXIT_WITH_ERROR_TAG: &str = "exit with error";

/// Result of a unit of work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T, E> {
    Success(T),
    /// Failure, optionally carrying the last value produced before the error
    Failure { error: E, previous: Option<T> },
}

impl<T, E> Outcome<T, E> {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// Drop any previous value and convert into a `Result`.
    pub fn into_result(self) -> Result<T, E> {
        match self {
            Outcome::Success(value) => Ok(value),
            Outcome::Failure { error, .. } => Err(error),
        }
    }
}

impl<T, E> From<Result<T, E>> for Outcome<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Outcome::Success(value),
            Err(error) => Outcome::Failure {
                error,
                previous: None,
            },
        }
    }
}

type Finisher<T, E> = Box<dyn FnOnce(Outcome<T, E>) + Send>;

/// One-shot continuation handed to a unit of work.
///
/// Signalling consumes the completion, so an outcome is delivered at most
/// once. Dropping it without signalling logs a warning and delivers nothing.
pub struct Completion<T, E> {
    finish: Option<Finisher<T, E>>,
}

impl<T, E> Completion<T, E> {
    pub fn new(finish: impl FnOnce(Outcome<T, E>) + Send + 'static) -> Self {
        Self {
            finish: Some(Box::new(finish)),
        }
    }

    pub fn success(self, value: T) {
        self.complete(Outcome::Success(value));
    }

    pub fn failure(self, error: E, previous: Option<T>) {
        self.complete(Outcome::Failure { error, previous });
    }

    pub fn complete(mut self, outcome: Outcome<T, E>) {
        if let Some(finish) = self.finish.take() {
            finish(outcome);
        }
    }
}

impl<T, E> Drop for Completion<T, E> {
    fn drop(&mut self) {
        if self.finish.is_some() {
            tracing::warn!("Work unit dropped its completion without signalling an outcome");
        }
    }
}

impl<T, E> fmt::Debug for Completion<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion")
            .field("pending", &self.finish.is_some())
            .finish()
    }
}

/// Caller-supplied work that signals its outcome through a [`Completion`].
pub trait WorkUnit<T, E> {
    fn process(self, completion: Completion<T, E>);
}

impl<F, T, E> WorkUnit<T, E> for F
where
    F: FnOnce(Completion<T, E>),
{
    fn process(self, completion: Completion<T, E>) {
        self(completion)
    }
}

/// One timed invocation: the working copy of the properties plus the start
/// reading. Consumed by the exit log.
struct Timing {
    sink: Arc<dyn LogSink>,
    clock: Arc<dyn Clock>,
    started_ms: u64,
    properties: PropertyMap,
}

impl Timing {
    fn enter(executor: &TimedExecutor, properties: Option<&PropertyMap>) -> Self {
        let started_ms = executor.clock.now_ms();
        let properties = properties.cloned().unwrap_or_default();
        executor.sink.info(&format(ENTER_TAG, &properties));
        Self {
            sink: Arc::clone(&executor.sink),
            clock: Arc::clone(&executor.clock),
            started_ms,
            properties,
        }
    }

    fn exit(self) {
        self.finish(EXIT_TAG.to_string());
    }

    fn exit_with_error(self, error: &dyn fmt::Display) {
        self.finish(format!("{} {}", EXIT_WITH_ERROR_TAG, error));
    }

    fn finish(mut self, tag: String) {
        let elapsed = self.clock.elapsed_since(self.started_ms);
        self.properties.insert(ELAPSED_MS, elapsed.to_string());
        tracing::debug!(elapsed_ms = elapsed, "Timed operation finished");
        self.sink.info(&format(&tag, &self.properties));
    }
}

/// Logs entry and exit around units of work.
#[derive(Clone)]
pub struct TimedExecutor {
    sink: Arc<dyn LogSink>,
    clock: Arc<dyn Clock>,
}

impl TimedExecutor {
    /// Create an executor timing with the system monotonic clock.
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self::with_clock(sink, Arc::new(SystemClock::new()))
    }

    pub fn with_clock(sink: Arc<dyn LogSink>, clock: Arc<dyn Clock>) -> Self {
        Self { sink, clock }
    }

    /// Run `work`, logging entry now and exit when it signals completion.
    ///
    /// `properties` is copied; `None` is treated as empty. `callback`
    /// receives the outcome unchanged, after the exit line has been logged.
    /// If `work` signals synchronously the callback runs before this returns;
    /// otherwise it runs on whichever thread signals.
    pub fn run_timed<T, E, W, C>(&self, properties: Option<&PropertyMap>, work: W, callback: C)
    where
        T: Send + 'static,
        E: fmt::Display + Send + 'static,
        W: WorkUnit<T, E>,
        C: FnOnce(Outcome<T, E>) + Send + 'static,
    {
        let timing = Timing::enter(self, properties);
        let completion = Completion::new(move |outcome: Outcome<T, E>| {
            match &outcome {
                Outcome::Success(_) => timing.exit(),
                Outcome::Failure { error, .. } => timing.exit_with_error(error),
            }
            callback(outcome);
        });
        work.process(completion);
    }

    /// Await `work`, logging entry before it is first polled and exit before
    /// returning its result unchanged.
    pub async fn run_timed_future<T, E, F>(
        &self,
        properties: Option<&PropertyMap>,
        work: F,
    ) -> Result<T, E>
    where
        E: fmt::Display,
        F: Future<Output = Result<T, E>>,
    {
        let timing = Timing::enter(self, properties);
        let result = work.await;
        match &result {
            Ok(_) => timing.exit(),
            Err(error) => timing.exit_with_error(error),
        }
        result
    }
}

impl Default for TimedExecutor {
    fn default() -> Self {
        Self::new(Arc::new(TracingSink::new()))
    }
}

impl fmt::Debug for TimedExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimedExecutor").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::sink::MemorySink;
    use std::sync::mpsc;
    use std::sync::Mutex;

    fn executor() -> (TimedExecutor, MemorySink, ManualClock) {
        let sink = MemorySink::new();
        let clock = ManualClock::new();
        let exec = TimedExecutor::with_clock(Arc::new(sink.clone()), Arc::new(clock.clone()));
        (exec, sink, clock)
    }

    /// Collects the outcome delivered to the caller.
    fn capture<T: Send + 'static, E: Send + 'static>(
    ) -> (Arc<Mutex<Option<Outcome<T, E>>>>, impl FnOnce(Outcome<T, E>) + Send + 'static) {
        let slot = Arc::new(Mutex::new(None));
        let writer = Arc::clone(&slot);
        (slot, move |outcome| {
            *writer.lock().unwrap() = Some(outcome);
        })
    }

    #[test]
    fn test_success_with_simulated_clock() {
        let (exec, sink, clock) = executor();
        let props = PropertyMap::new().with("client_id", "abc");
        let (slot, callback) = capture::<&'static str, String>();

        exec.run_timed(
            Some(&props),
            |done: Completion<&'static str, String>| {
                clock.advance(5);
                done.success("OK");
            },
            callback,
        );

        assert_eq!(
            sink.lines(),
            vec![
                r#"enter {"client_id":"abc"}"#.to_string(),
                r#"exit {"client_id":"abc","elapsedMS":"5"}"#.to_string(),
            ]
        );
        assert_eq!(slot.lock().unwrap().take(), Some(Outcome::Success("OK")));
    }

    #[test]
    fn test_failure_logs_message_and_forwards_error() {
        let (exec, sink, clock) = executor();
        let (slot, callback) = capture::<u32, String>();

        exec.run_timed(
            None,
            |done: Completion<u32, String>| {
                clock.advance(12);
                done.failure("connection refused".to_string(), Some(7));
            },
            callback,
        );

        assert_eq!(
            sink.lines(),
            vec![
                "enter {}".to_string(),
                r#"exit with error connection refused {"elapsedMS":"12"}"#.to_string(),
            ]
        );
        assert_eq!(
            slot.lock().unwrap().take(),
            Some(Outcome::Failure {
                error: "connection refused".to_string(),
                previous: Some(7),
            })
        );
    }

    #[test]
    fn test_caller_properties_not_mutated() {
        let (exec, _sink, _clock) = executor();
        let props = PropertyMap::new().with("client_id", "abc");

        exec.run_timed(
            Some(&props),
            |done: Completion<(), String>| done.success(()),
            |_| {},
        );

        assert_eq!(props, PropertyMap::new().with("client_id", "abc"));
    }

    #[test]
    fn test_caller_elapsed_value_is_overwritten() {
        let (exec, sink, clock) = executor();
        let props = PropertyMap::new().with(ELAPSED_MS, "999").with("k", "v");

        exec.run_timed(
            Some(&props),
            |done: Completion<(), String>| {
                clock.advance(3);
                done.success(());
            },
            |_| {},
        );

        assert_eq!(sink.lines()[1], r#"exit {"elapsedMS":"3","k":"v"}"#);
    }

    #[test]
    fn test_enter_logged_before_work_and_exit_before_callback() {
        let (exec, sink, _clock) = executor();
        let seen_by_work = Arc::new(Mutex::new(Vec::new()));
        let seen_by_callback = Arc::new(Mutex::new(Vec::new()));

        let work_sink = sink.clone();
        let work_seen = Arc::clone(&seen_by_work);
        let callback_sink = sink.clone();
        let callback_seen = Arc::clone(&seen_by_callback);

        exec.run_timed(
            None,
            move |done: Completion<(), String>| {
                *work_seen.lock().unwrap() = work_sink.lines();
                done.success(());
            },
            move |_| {
                *callback_seen.lock().unwrap() = callback_sink.lines();
            },
        );

        assert_eq!(*seen_by_work.lock().unwrap(), vec!["enter {}".to_string()]);
        let at_callback = seen_by_callback.lock().unwrap().clone();
        assert_eq!(at_callback.len(), 2);
        assert!(at_callback[1].starts_with("exit {"));
    }

    #[test]
    fn test_deferred_completion_on_another_thread() {
        let (exec, sink, clock) = executor();
        let (tx, rx) = mpsc::channel();
        let worker_clock = clock.clone();

        exec.run_timed(
            Some(&PropertyMap::new().with("x-transaction-id", "T1")),
            move |done: Completion<String, String>| {
                std::thread::spawn(move || {
                    worker_clock.advance(40);
                    done.success("late".to_string());
                });
            },
            move |outcome| {
                tx.send(outcome).unwrap();
            },
        );

        let outcome = rx.recv().unwrap();
        assert_eq!(outcome, Outcome::Success("late".to_string()));
        assert_eq!(
            sink.lines(),
            vec![
                r#"enter {"x-transaction-id":"T1"}"#.to_string(),
                r#"exit {"x-transaction-id":"T1","elapsedMS":"40"}"#.to_string(),
            ]
        );
    }

    #[test]
    fn test_dropped_completion_logs_no_exit() {
        let (exec, sink, _clock) = executor();
        let (slot, callback) = capture::<(), String>();

        exec.run_timed(None, |done: Completion<(), String>| drop(done), callback);

        assert_eq!(sink.lines(), vec!["enter {}".to_string()]);
        assert!(slot.lock().unwrap().is_none());
    }

    #[test]
    fn test_outcome_conversions() {
        let ok: Outcome<u8, String> = Ok(1).into();
        assert!(ok.is_success());
        assert_eq!(ok.into_result(), Ok(1));

        let failed = Outcome::<u8, &str>::Failure {
            error: "boom",
            previous: Some(3),
        };
        assert!(!failed.is_success());
        assert_eq!(failed.into_result(), Err("boom"));
    }

    #[tokio::test]
    async fn test_future_success() {
        let (exec, sink, clock) = executor();
        let props = PropertyMap::new().with("client_id", "abc");

        let result: Result<&str, String> = exec
            .run_timed_future(Some(&props), async {
                clock.advance(5);
                Ok("OK")
            })
            .await;

        assert_eq!(result, Ok("OK"));
        assert_eq!(sink.lines()[1], r#"exit {"client_id":"abc","elapsedMS":"5"}"#);
    }

    #[tokio::test]
    async fn test_future_failure_is_forwarded() {
        let (exec, sink, _clock) = executor();

        let result: Result<(), String> = exec
            .run_timed_future(None, async { Err("timeout talking to SAP".to_string()) })
            .await;

        assert_eq!(result, Err("timeout talking to SAP".to_string()));
        assert_eq!(
            sink.lines()[1],
            r#"exit with error timeout talking to SAP {"elapsedMS":"0"}"#
        );
    }

    #[tokio::test]
    async fn test_future_enter_logged_before_first_poll() {
        let (exec, sink, _clock) = executor();
        let probe = sink.clone();

        let result: Result<usize, String> = exec
            .run_timed_future(None, async move { Ok(probe.len()) })
            .await;

        assert_eq!(result, Ok(1));
    }
}
