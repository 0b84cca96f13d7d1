use crate::compare::AnyOtherValue;
use crate::context::AssertionContext;
use crate::result::AssertionResult;
use chrono::{DateTime, TimeZone};
use std::fmt;

/// Assertions on a possibly absent instant.
///
/// Instants compare by the point in time they denote, so the same moment in
/// two time zones is equal.
#[must_use = "call an assertion such as `equals` on the time"]
pub struct AssertableTime<'t, Tz: TimeZone> {
    ctx: AssertionContext<'t>,
    actual: Option<DateTime<Tz>>,
}

impl<'t, Tz> AssertableTime<'t, Tz>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    pub(crate) fn new(ctx: AssertionContext<'t>, actual: Option<DateTime<Tz>>) -> Self {
        Self { ctx, actual }
    }

    pub fn equals<Tz2>(
        self,
        expected: Option<DateTime<Tz2>>,
    ) -> AssertionResult<'t, Option<DateTime<Tz>>, Option<DateTime<Tz2>>>
    where
        Tz2: TimeZone,
        Tz2::Offset: fmt::Display,
    {
        let passed = match (&self.actual, &expected) {
            (None, None) => true,
            (None, Some(expected)) => {
                self.ctx.report(format_args!(
                    "Time mismatch.\nActual was <nil>.\nExpected: {}\n",
                    expected
                ));
                false
            }
            (Some(actual), None) => {
                self.ctx
                    .report(format_args!("Actual time was not <nil>.\nActual: {}\n", actual));
                false
            }
            (Some(actual), Some(expected)) if actual != expected => {
                self.ctx.report(format_args!(
                    "Time mismatch.\nActual: {}\nExpected: {}\n",
                    actual, expected
                ));
                false
            }
            (Some(_), Some(_)) => true,
        };
        AssertionResult::new(passed, self.actual, expected, self.ctx.reporter())
    }

    pub fn is_nil(self) -> AssertionResult<'t, Option<DateTime<Tz>>, Option<DateTime<Tz>>> {
        if let Some(actual) = &self.actual {
            self.ctx
                .report(format_args!("Actual time was not <nil>.\nActual: {}\n", actual));
        }
        AssertionResult::new(self.actual.is_none(), self.actual, None, self.ctx.reporter())
    }

    pub fn is_not_nil(self) -> AssertionResult<'t, Option<DateTime<Tz>>, AnyOtherValue> {
        if self.actual.is_none() {
            self.ctx.report(format_args!("Actual time was <nil>.\n"));
        }
        AssertionResult::new(self.actual.is_some(), self.actual, AnyOtherValue, self.ctx.reporter())
    }
}
