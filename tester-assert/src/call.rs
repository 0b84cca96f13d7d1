use crate::context::AssertionContext;
use crate::result::AssertionResult;
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

/// Assertions on what a call does when run.
#[must_use = "call an assertion such as `panics_reporting` on the call"]
pub struct AssertableCall<'t, F> {
    ctx: AssertionContext<'t>,
    call: F,
}

impl<'t, F: FnOnce()> AssertableCall<'t, F> {
    pub(crate) fn new(ctx: AssertionContext<'t>, call: F) -> Self {
        Self { ctx, call }
    }

    /// Run the call and assert that it panics with the `expected` message.
    ///
    /// The result holds the panic message, or `None` when the call returned.
    pub fn panics_reporting(self, expected: impl fmt::Display) -> AssertionResult<'t, Option<String>, String> {
        // Resolved before the call so the unwinding frames never show up.
        let site = self.ctx.call_site();
        let expected = expected.to_string();

        let actual = panic::catch_unwind(AssertUnwindSafe(self.call))
            .err()
            .map(|payload| panic_message(payload.as_ref()));

        let passed = match &actual {
            None => {
                self.ctx.report_at(
                    &site,
                    format_args!("Function call did not panic as expected.\nExpected: {}\n", expected),
                );
                false
            }
            Some(actual) if *actual != expected => {
                self.ctx.report_at(
                    &site,
                    format_args!("Panic message mismatch.\nActual: {}\nExpected: {}\n", actual, expected),
                );
                false
            }
            Some(_) => true,
        };
        AssertionResult::new(passed, actual, expected, self.ctx.reporter())
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "<non-string panic payload>".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use crate::callsite::CallSite;
    use crate::context::testing::mock_context;
    use crate::reporter::Recorder;
    use std::cell::Cell;

    #[test]
    fn test_expected_panic() {
        let recorder = Recorder::new();
        let result = mock_context(&recorder, &[])
            .that_calling(|| panic!("expected {}", "error"))
            .panics_reporting("expected error");

        assert!(result.passed());
        assert_eq!(result.actual().as_deref(), Some("expected error"));
        assert_eq!(recorder.output(), "");
    }

    #[test]
    fn test_call_did_not_panic() {
        let recorder = Recorder::new();
        let passed = mock_context(&recorder, &[])
            .that_calling(|| {})
            .panics_reporting("expected error")
            .passed();

        assert!(!passed);
        insta::assert_snapshot!(recorder.output(), @r###"
        file:3: Function call did not panic as expected.
        Expected: expected error
        "###);
    }

    #[test]
    fn test_panic_message_mismatch() {
        let recorder = Recorder::new();
        let passed = mock_context(&recorder, &[])
            .that_calling(|| panic!("unexpected error"))
            .panics_reporting("expected error")
            .passed();

        assert!(!passed);
        insta::assert_snapshot!(recorder.output(), @r###"
        file:3: Panic message mismatch.
        Actual: unexpected error
        Expected: expected error
        "###);
        assert_eq!(recorder.failure_count(), 1);
    }

    #[test]
    fn test_call_site_resolved_before_call() {
        let recorder = Recorder::new();
        let resolutions = Cell::new(0);
        let called_after = Cell::new(false);

        let _ = mock_context(&recorder, &[])
            .with_caller(|| {
                resolutions.set(resolutions.get() + 1);
                CallSite::new("file", 3)
            })
            .that_calling(|| {
                called_after.set(resolutions.get() == 1);
                panic!("boom")
            })
            .panics_reporting("other");

        assert!(called_after.get());
        assert_eq!(resolutions.get(), 1);
    }
}
