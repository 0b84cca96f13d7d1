use crate::context::AssertionContext;
use crate::result::AssertionResult;

/// Assertions on a string. Comparisons are byte-wise and case-sensitive.
#[must_use = "call an assertion such as `equals` on the string"]
pub struct AssertableString<'t> {
    ctx: AssertionContext<'t>,
    actual: String,
}

impl<'t> AssertableString<'t> {
    pub(crate) fn new(ctx: AssertionContext<'t>, actual: &str) -> Self {
        Self {
            ctx,
            actual: actual.to_owned(),
        }
    }

    pub fn equals(self, expected: &str) -> AssertionResult<'t, String, String> {
        let passed = self.actual == expected;
        if !passed {
            self.ctx.report(format_args!(
                "String mismatch.\nActual: {:?}\nExpected: {:?}\n",
                self.actual, expected,
            ));
        }
        AssertionResult::new(passed, self.actual, expected.to_owned(), self.ctx.reporter())
    }

    pub fn is_empty(self) -> AssertionResult<'t, String, String> {
        let passed = self.actual.is_empty();
        if !passed {
            self.ctx
                .report(format_args!("String is not empty.\nActual: {:?}\n", self.actual));
        }
        AssertionResult::new(passed, self.actual, String::new(), self.ctx.reporter())
    }
}
