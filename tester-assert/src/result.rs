//! Outcome of an assertion and the actions that may follow it.

use crate::diff::render_diff;
use crate::reporter::{with_output_lock, Reporter};
use std::fmt;

/// What an assertion returns, whether it passed or not.
///
/// The outcome is fixed when the assertion runs; the chained actions only
/// read it:
///
/// ```ignore
/// assert::for_test(&t).that_actual(value).equals(expected).then_diff_on_fail();
///
/// if assert::for_test(&t).that_actual(found).is_not_nil().passed() {
///     assert::for_test(&t).that_actual(found.unwrap().name).equals("foo");
/// }
///
/// assert::for_test(&t).that_actual(value).equals(expected).then_run_on_fail(analyze);
/// ```
pub struct AssertionResult<'t, A, E> {
    passed: bool,
    actual: A,
    expected: E,
    output: &'t dyn Reporter,
}

impl<'t, A, E> AssertionResult<'t, A, E> {
    pub(crate) fn new(passed: bool, actual: A, expected: E, output: &'t dyn Reporter) -> Self {
        tracing::trace!(passed, "assertion evaluated");
        Self {
            passed,
            actual,
            expected,
            output,
        }
    }

    pub fn passed(&self) -> bool {
        self.passed
    }

    pub fn actual(&self) -> &A {
        &self.actual
    }

    pub fn expected(&self) -> &E {
        &self.expected
    }

    /// Consume the result, returning the asserted values.
    pub fn into_values(self) -> (A, E) {
        (self.actual, self.expected)
    }

    /// On failure, call `action` once with the actual and expected values.
    pub fn then_run_on_fail<F>(self, action: F) -> Self
    where
        F: FnOnce(&A, &E),
    {
        if !self.passed {
            with_output_lock(|| action(&self.actual, &self.expected));
        }
        self
    }
}

impl<'t, A, E> AssertionResult<'t, A, E>
where
    A: fmt::Debug,
    E: fmt::Debug,
{
    /// On failure, write a diff of the actual and expected values.
    pub fn then_diff_on_fail(self) -> Self {
        if !self.passed {
            let diff = render_diff(&self.actual, &self.expected);
            with_output_lock(|| self.output.write(&format!("Diff:\n{}", diff)));
        }
        self
    }

    /// On failure, write pretty renderings of the actual and expected values.
    pub fn then_pretty_print_on_fail(self) -> Self {
        if !self.passed {
            let text = format!(
                "Pretty:\nActual: {:#?}\nExpected: {:#?}\n",
                self.actual, self.expected
            );
            with_output_lock(|| self.output.write(&text));
        }
        self
    }
}

impl<'t, A: fmt::Debug, E: fmt::Debug> fmt::Debug for AssertionResult<'t, A, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssertionResult")
            .field("passed", &self.passed)
            .field("actual", &self.actual)
            .field("expected", &self.expected)
            .finish()
    }
}
