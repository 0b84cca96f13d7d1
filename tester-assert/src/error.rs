use crate::compare::{AnyOtherValue, ErrorString, ErrorText};
use crate::context::AssertionContext;
use crate::result::AssertionResult;

/// Assertions on a possibly absent error, compared by message only.
///
/// ```ignore
/// assert::for_test(&t).that_actual_error(parse("x")).formats_as("invalid digit found in string");
/// assert::for_test(&t).that_actual_error(parse("1")).is_nil();
/// ```
#[must_use = "call an assertion such as `equals` on the error"]
pub struct AssertableError<'t> {
    ctx: AssertionContext<'t>,
    actual: Option<String>,
}

impl<'t> AssertableError<'t> {
    pub(crate) fn new(ctx: AssertionContext<'t>, actual: Option<String>) -> Self {
        Self { ctx, actual }
    }

    /// Assert that the error renders the same message as `expected`. An
    /// absent `expected` means the error must be absent too.
    pub fn equals(self, expected: impl ErrorText) -> AssertionResult<'t, Option<String>, Option<String>> {
        let expected = match expected.error_text() {
            Some(expected) => expected,
            None => return self.is_nil(),
        };

        let passed = match &self.actual {
            None => {
                self.ctx.report(format_args!(
                    "Error mismatch.\nActual was <nil>.\nExpected: {}\n",
                    expected
                ));
                false
            }
            Some(actual) if *actual != expected => {
                self.ctx.report(format_args!(
                    "Error mismatch.\nActual: {}\nExpected: {}\n",
                    actual, expected
                ));
                false
            }
            Some(_) => true,
        };
        AssertionResult::new(passed, self.actual, Some(expected), self.ctx.reporter())
    }

    /// Assert that the error's message is `text`.
    pub fn formats_as(self, text: &str) -> AssertionResult<'t, Option<String>, Option<String>> {
        self.equals(ErrorString::new(text))
    }

    pub fn is_nil(self) -> AssertionResult<'t, Option<String>, Option<String>> {
        if let Some(actual) = &self.actual {
            self.ctx
                .report(format_args!("Actual error was not <nil>.\nActual: {}\n", actual));
        }
        AssertionResult::new(self.actual.is_none(), self.actual, None, self.ctx.reporter())
    }

    pub fn is_not_nil(self) -> AssertionResult<'t, Option<String>, AnyOtherValue> {
        if self.actual.is_none() {
            self.ctx.report(format_args!("Actual error was <nil>.\n"));
        }
        AssertionResult::new(self.actual.is_some(), self.actual, AnyOtherValue, self.ctx.reporter())
    }
}

#[cfg(test)]
mod tests {
    use crate::compare::ErrorString;
    use crate::context::testing::mock_context;
    use crate::reporter::Recorder;
    use std::io;

    fn parse(text: &str) -> Result<i32, std::num::ParseIntError> {
        text.parse()
    }

    #[test]
    fn test_errors_compare_by_message() {
        let recorder = Recorder::new();
        let actual = io::Error::new(io::ErrorKind::Other, "boom");
        let passed = mock_context(&recorder, &[])
            .that_actual_error(&actual)
            .equals(ErrorString::new("boom"))
            .passed();

        assert!(passed);
        assert_eq!(recorder.output(), "");
    }

    #[test]
    fn test_error_mismatch() {
        let recorder = Recorder::new();
        let _ = mock_context(&recorder, &[]).that_actual_error(parse("x")).formats_as("boom");

        insta::assert_snapshot!(recorder.output(), @r###"
        file:3: Error mismatch.
        Actual: invalid digit found in string
        Expected: boom
        "###);
    }

    #[test]
    fn test_missing_error() {
        let recorder = Recorder::new();
        let result = mock_context(&recorder, &[]).that_actual_error(parse("1")).formats_as("boom");

        assert!(!result.passed());
        insta::assert_snapshot!(recorder.output(), @r###"
        file:3: Error mismatch.
        Actual was <nil>.
        Expected: boom
        "###);
    }

    #[test]
    fn test_absent_expected_means_nil() {
        let recorder = Recorder::new();
        let passed = mock_context(&recorder, &[])
            .that_actual_error(parse("1"))
            .equals(None::<ErrorString>)
            .passed();
        assert!(passed);

        let passed = mock_context(&recorder, &[])
            .that_actual_error(parse("x"))
            .equals(None::<ErrorString>)
            .passed();
        assert!(!passed);
        insta::assert_snapshot!(recorder.output(), @r###"
        file:3: Actual error was not <nil>.
        Actual: invalid digit found in string
        "###);
    }

    #[test]
    fn test_wrapped_absent_error_is_nil() {
        let recorder = Recorder::new();
        let wrapped: Option<Option<ErrorString>> = Some(None);

        assert!(mock_context(&recorder, &[]).that_actual_error(&wrapped).is_nil().passed());
        assert!(mock_context(&recorder, &[])
            .that_actual_error(None::<ErrorString>)
            .equals(&wrapped)
            .passed());
        assert_eq!(recorder.output(), "");
    }

    #[test]
    fn test_is_not_nil() {
        let recorder = Recorder::new();
        assert!(mock_context(&recorder, &[]).that_actual_error(parse("x")).is_not_nil().passed());
        assert!(!mock_context(&recorder, &[]).that_actual_error(parse("1")).is_not_nil().passed());
        assert_eq!(recorder.output(), "file:3: Actual error was <nil>.\n");
    }
}
