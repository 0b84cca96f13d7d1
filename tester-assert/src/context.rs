//! Per-assertion context: case labels, call-site attribution and failure
//! reporting.

use crate::call::AssertableCall;
use crate::callsite::{resolve_call_site, CallSite};
use crate::compare::ErrorText;
use crate::error::AssertableError;
use crate::hooks::{AssertableType, Describe, FieldDescriptor, TypeDescriptor};
use crate::reporter::{with_output_lock, Reporter};
use crate::string::AssertableString;
use crate::time::AssertableTime;
use crate::value::AssertableValue;
use chrono::{DateTime, TimeZone};
use std::fmt;

/// Start an assertion chain for the test behind `reporter`.
pub fn for_test(reporter: &dyn Reporter) -> AssertionContext<'_> {
    AssertionContext::new(reporter)
}

/// Start an assertion chain for one case of a table-driven test; `label`
/// prefixes every failure message as `[label]`.
pub fn for_case(reporter: &dyn Reporter, label: impl fmt::Display) -> AssertionContext<'_> {
    AssertionContext::new(reporter).case(label)
}

/// Binds one fluent assertion chain to its test.
///
/// Created fresh for each chain and consumed by the assertion it starts.
pub struct AssertionContext<'t> {
    reporter: &'t dyn Reporter,
    labels: Vec<String>,
    caller: Box<dyn Fn() -> CallSite + 't>,
    fail: Box<dyn Fn() + 't>,
}

impl<'t> AssertionContext<'t> {
    pub fn new(reporter: &'t dyn Reporter) -> Self {
        Self {
            reporter,
            labels: Vec::new(),
            caller: Box::new(resolve_call_site),
            fail: Box::new(move || reporter.fail()),
        }
    }

    /// Append a case-identifying label.
    pub fn case(mut self, label: impl fmt::Display) -> Self {
        self.labels.push(label.to_string());
        self
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    #[cfg(test)]
    pub(crate) fn with_caller(mut self, caller: impl Fn() -> CallSite + 't) -> Self {
        self.caller = Box::new(caller);
        self
    }

    #[cfg(test)]
    pub(crate) fn with_fail(mut self, fail: impl Fn() + 't) -> Self {
        self.fail = Box::new(fail);
        self
    }

    /// Assert on a value.
    ///
    /// Equality checks compare concrete types, so the value must be
    /// `'static`: owned, or a reference with a `'static` lifetime. Use
    /// [`that_actual_string`](Self::that_actual_string) for borrowed strings.
    pub fn that_actual<T>(self, value: T) -> AssertableValue<'t, T> {
        AssertableValue::new(self, value)
    }

    /// Assert on a string; comparisons are byte-wise.
    pub fn that_actual_string(self, value: &str) -> AssertableString<'t> {
        AssertableString::new(self, value)
    }

    /// Assert on a possibly absent error, by its message.
    pub fn that_actual_error(self, error: impl ErrorText) -> AssertableError<'t> {
        AssertableError::new(self, error.error_text())
    }

    /// Assert on a possibly absent instant.
    pub fn that_actual_time<Tz>(self, time: Option<DateTime<Tz>>) -> AssertableTime<'t, Tz>
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        AssertableTime::new(self, time)
    }

    /// Assert on the shape of a type that describes itself.
    pub fn that_type<T: Describe>(self) -> AssertableType<'t> {
        AssertableType::new(self, T::describe())
    }

    /// Assert on an explicit type description.
    pub fn that_type_descriptor(self, descriptor: TypeDescriptor) -> AssertableType<'t> {
        AssertableType::new(self, descriptor)
    }

    /// Assert on what calling `call` does.
    pub fn that_calling<F: FnOnce()>(self, call: F) -> AssertableCall<'t, F> {
        AssertableCall::new(self, call)
    }

    pub(crate) fn reporter(&self) -> &'t dyn Reporter {
        self.reporter
    }

    /// Resolve where the test invoked this assertion.
    pub(crate) fn call_site(&self) -> CallSite {
        (self.caller)()
    }

    /// Report a failure attributed to the resolved call site.
    pub(crate) fn report(&self, message: fmt::Arguments<'_>) {
        let site = self.call_site();
        self.report_at(&site, message);
    }

    /// Report a failure attributed to an already resolved call site.
    ///
    /// The whole message is written under the output lock and the fail
    /// signal fires exactly once.
    pub(crate) fn report_at(&self, site: &CallSite, message: fmt::Arguments<'_>) {
        let text = self.format_failure(site, message);
        with_output_lock(|| {
            self.reporter.write(&text);
            (self.fail)();
        });
    }

    fn format_failure(&self, site: &CallSite, message: fmt::Arguments<'_>) -> String {
        let mut text = String::new();
        if site.is_known() {
            text.push_str(&format!("{}: ", site));
        }
        if !self.labels.is_empty() {
            text.push_str(&format!("[{}] ", self.labels.join(" ")));
        }
        text.push_str(&message.to_string());
        text
    }
}

impl<'t> fmt::Debug for AssertionContext<'t> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssertionContext")
            .field("labels", &self.labels)
            .finish_non_exhaustive()
    }
}

impl<'t> Describe for AssertionContext<'t> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::exported("AssertionContext")
            .field(FieldDescriptor::private("reporter", "&dyn Reporter"))
            .field(FieldDescriptor::private("labels", "Vec<String>"))
            .field(FieldDescriptor::private("caller", "Box<dyn Fn() -> CallSite>").hook("verify-unexported"))
            .field(FieldDescriptor::private("fail", "Box<dyn Fn()>").hook("verify-unexported"))
    }
}


#[cfg(test)]
mod tests {
    use super::testing::mock_context;
    use super::*;
    use crate::reporter::Recorder;
    use std::cell::Cell;

    #[test]
    fn test_hooks_are_hidden() {
        let recorder = Recorder::new();
        let passed = for_test(&recorder).that_type::<AssertionContext<'_>>().hides_test_hooks().passed();
        assert!(passed);
        assert_eq!(recorder.output(), "");
    }

    #[test]
    fn test_failure_message_prefixes() {
        let recorder = Recorder::new();
        mock_context(&recorder, &[]).report(format_args!("Boom.\n"));
        mock_context(&recorder, &["case one"]).report(format_args!("Boom.\n"));
        mock_context(&recorder, &["a", "b"]).report(format_args!("Boom.\n"));

        insta::assert_snapshot!(recorder.output(), @r###"
        file:3: Boom.
        file:3: [case one] Boom.
        file:3: [a b] Boom.
        "###);
        assert_eq!(recorder.failure_count(), 3);
    }

    #[test]
    fn test_unknown_call_site_omits_location() {
        let recorder = Recorder::new();
        for_case(&recorder, "detached")
            .with_caller(|| CallSite::Unknown)
            .report(format_args!("Boom.\n"));

        assert_eq!(recorder.output(), "[detached] Boom.\n");
    }

    #[test]
    fn test_fail_signal_fires_once_per_report() {
        let recorder = Recorder::new();
        let fails = Cell::new(0);
        for_test(&recorder)
            .with_caller(|| CallSite::Unknown)
            .with_fail(|| fails.set(fails.get() + 1))
            .report(format_args!("Boom.\n"));

        assert_eq!(fails.get(), 1);
        assert_eq!(recorder.failure_count(), 0);
    }

    #[test]
    fn test_labels_accumulate() {
        let recorder = Recorder::new();
        let ctx = for_case(&recorder, 42).case("answer");
        assert_eq!(ctx.labels(), ["42".to_string(), "answer".to_string()]);
    }
}
