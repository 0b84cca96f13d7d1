use crate::compare::{compare, deep_equal, equivalent_json, render, type_name_of, AnyOtherValue, Mismatch};
use crate::context::AssertionContext;
use crate::result::AssertionResult;
use serde::Serialize;
use std::any::type_name;
use std::fmt;

/// Assertions on an arbitrary value.
#[must_use = "call an assertion such as `equals` on the value"]
pub struct AssertableValue<'t, T> {
    ctx: AssertionContext<'t>,
    actual: T,
}

impl<'t, T> AssertableValue<'t, T> {
    pub(crate) fn new(ctx: AssertionContext<'t>, actual: T) -> Self {
        Self { ctx, actual }
    }
}

impl<'t, T> AssertableValue<'t, T>
where
    T: PartialEq + fmt::Debug + 'static,
{
    /// Assert that the value equals `expected`, including its type.
    pub fn equals<E>(self, expected: E) -> AssertionResult<'t, T, E>
    where
        E: fmt::Debug + 'static,
    {
        let mismatch = compare(&self.actual, &expected);
        match mismatch {
            Mismatch::Equal => {}
            Mismatch::TypeMismatch => self.ctx.report(format_args!(
                "Type mismatch.\nActual: {}={}\nExpected: {}={}\n",
                type_name_of(&self.actual),
                render(&self.actual),
                type_name::<E>(),
                render(&expected),
            )),
            Mismatch::ValueMismatch => self.ctx.report(format_args!(
                "Value mismatch.\nActual: {}\nExpected: {}\n",
                render(&self.actual),
                render(&expected),
            )),
        }
        AssertionResult::new(mismatch.is_equal(), self.actual, expected, self.ctx.reporter())
    }

    /// Assert that the value differs from `disallowed`.
    pub fn does_not_equal<E>(self, disallowed: E) -> AssertionResult<'t, T, AnyOtherValue>
    where
        E: fmt::Debug + 'static,
    {
        let equal = deep_equal(&self.actual, &disallowed);
        if equal {
            self.ctx
                .report(format_args!("Values are equal.\nActual: {}\n", render(&self.actual)));
        }
        AssertionResult::new(!equal, self.actual, AnyOtherValue, self.ctx.reporter())
    }

    pub fn is_true(self) -> AssertionResult<'t, T, bool> {
        self.equals(true)
    }

    pub fn is_false(self) -> AssertionResult<'t, T, bool> {
        self.equals(false)
    }
}

impl<'t, T> AssertableValue<'t, Option<T>>
where
    T: fmt::Debug + 'static,
{
    /// Assert that the value is absent.
    pub fn is_nil(self) -> AssertionResult<'t, Option<T>, Option<T>> {
        let passed = self.actual.is_none();
        if !passed {
            self.ctx.report(format_args!(
                "Value mismatch.\nActual: {}\nExpected: None\n",
                render(&self.actual),
            ));
        }
        AssertionResult::new(passed, self.actual, None, self.ctx.reporter())
    }

    /// Assert that the value is present.
    pub fn is_not_nil(self) -> AssertionResult<'t, Option<T>, AnyOtherValue> {
        let passed = self.actual.is_some();
        if !passed {
            self.ctx.report(format_args!("Values are equal.\nActual: None\n"));
        }
        AssertionResult::new(passed, self.actual, AnyOtherValue, self.ctx.reporter())
    }
}

impl<'t, T: Serialize> AssertableValue<'t, T> {
    /// Assert that the value encodes to the same JSON as `expected`,
    /// whatever the types of the two.
    pub fn marshals_equivalent_json<E: Serialize>(self, expected: E) -> AssertionResult<'t, T, E> {
        let comparison = equivalent_json(&self.actual, &expected);
        if !comparison.equivalent {
            self.ctx.report(format_args!(
                "JSON mismatch.\nActual: {}\nExpected: {}\n",
                comparison.actual, comparison.expected,
            ));
        }
        AssertionResult::new(comparison.equivalent, self.actual, expected, self.ctx.reporter())
    }
}
