//! Host test-runner bindings.
//!
//! Rust's test harness fails a test only when it panics, while assertions
//! here must never halt the test. A [`Reporter`] therefore only records that
//! the test failed and receives the failure text; [`TestRun`] turns recorded
//! failures into a panic when the test's scope ends.

use once_cell::sync::Lazy;
use parking_lot::ReentrantMutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;

/// Serializes failure messages and diffs across concurrently running tests.
///
/// Reentrant: a post-failure callback runs under the lock and may itself
/// print a diff or fail another assertion.
static OUTPUT_LOCK: Lazy<ReentrantMutex<()>> = Lazy::new(|| ReentrantMutex::new(()));

/// Run `write` while holding the process-wide output lock.
///
/// Everything one failure prints, including a multi-line diff, must be
/// written inside a single call so that lines from other threads never
/// interleave with it.
pub fn with_output_lock<R>(write: impl FnOnce() -> R) -> R {
    let _guard = OUTPUT_LOCK.lock();
    write()
}

/// The fail-signal and output sink of the test being run.
pub trait Reporter: Send + Sync {
    /// Mark the test as failed without stopping it. May be called many times.
    fn fail(&self);

    /// Write failure output. Callers hold the output lock.
    fn write(&self, text: &str);
}

/// Reporter for a single `#[test]` function.
///
/// Output goes through `print!`, so the harness shows it only for failing
/// tests. Dropping a run that recorded failures panics, which is what fails
/// the test.
///
/// ```ignore
/// #[test]
/// fn test_answer() {
///     let t = TestRun::new();
///     assert::for_test(&t).that_actual(answer()).equals(42);
///     assert::for_test(&t).that_actual_string(&question()).is_empty();
/// }
/// ```
#[derive(Debug, Default)]
pub struct TestRun {
    failures: AtomicUsize,
}

impl TestRun {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failed(&self) -> bool {
        self.failure_count() > 0
    }

    pub fn failure_count(&self) -> usize {
        self.failures.load(Ordering::SeqCst)
    }
}

impl Reporter for TestRun {
    fn fail(&self) {
        self.failures.fetch_add(1, Ordering::SeqCst);
    }

    fn write(&self, text: &str) {
        print!("{}", text);
    }
}

impl Drop for TestRun {
    fn drop(&mut self) {
        let failures = self.failure_count();
        if failures > 0 && !thread::panicking() {
            panic!("{} assertion(s) failed", failures);
        }
    }
}

/// Reporter that keeps failure output in memory.
///
/// Useful for testing assertion helpers: run them against a recorder and
/// inspect what they reported.
#[derive(Debug, Default)]
pub struct Recorder {
    output: Mutex<String>,
    failures: AtomicUsize,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far.
    pub fn output(&self) -> String {
        self.output
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Number of fail signals received.
    pub fn failure_count(&self) -> usize {
        self.failures.load(Ordering::SeqCst)
    }

    pub fn failed(&self) -> bool {
        self.failure_count() > 0
    }
}

impl Reporter for Recorder {
    fn fail(&self) {
        self.failures.fetch_add(1, Ordering::SeqCst);
    }

    fn write(&self, text: &str) {
        self.output
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push_str(text);
    }
}
