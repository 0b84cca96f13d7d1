//! Structural comparison and mismatch classification.
//!
//! Two values are equal only when they have the same concrete type and that
//! type's `PartialEq` says so; `[42]` and `vec![42]` are never equal. When
//! the check fails the mismatch is classified: if both values render to the
//! same text the difference can only be their type.

use serde::Serialize;
use std::any::{type_name, Any};
use std::error::Error;
use std::fmt;

/// Indent used for the serialization-equivalence encoding.
pub const JSON_INDENT: &str = "  ";

/// Outcome of comparing an actual value with an expected one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mismatch {
    Equal,
    /// Same textual rendering, different underlying types.
    TypeMismatch,
    ValueMismatch,
}

impl Mismatch {
    pub fn is_equal(self) -> bool {
        self == Mismatch::Equal
    }
}

/// Structural equality across possibly different types.
pub fn deep_equal<A, E>(actual: &A, expected: &E) -> bool
where
    A: PartialEq + 'static,
    E: 'static,
{
    (expected as &dyn Any)
        .downcast_ref::<A>()
        .map_or(false, |expected| actual == expected)
}

/// Compare two values, classifying any mismatch.
pub fn compare<A, E>(actual: &A, expected: &E) -> Mismatch
where
    A: PartialEq + fmt::Debug + 'static,
    E: fmt::Debug + 'static,
{
    if deep_equal(actual, expected) {
        Mismatch::Equal
    } else {
        classify(actual, expected)
    }
}

/// Classify two values already known to differ.
pub fn classify<A, E>(actual: &A, expected: &E) -> Mismatch
where
    A: fmt::Debug + 'static,
    E: fmt::Debug + 'static,
{
    if render(actual) == render(expected) {
        Mismatch::TypeMismatch
    } else {
        Mismatch::ValueMismatch
    }
}

/// Default textual rendering of a value.
///
/// This is the `Debug` rendering, except that floating-point scalars use
/// `Display` so that an integral float reads like the integer it equals.
/// Only a top-level `f32` or `f64` is rendered this way; floats nested in
/// an `Option` or a container keep their `Debug` form.
pub fn render<T>(value: &T) -> String
where
    T: fmt::Debug + 'static,
{
    let any = value as &dyn Any;
    if let Some(v) = any.downcast_ref::<f64>() {
        return v.to_string();
    }
    if let Some(v) = any.downcast_ref::<f32>() {
        return v.to_string();
    }
    format!("{:?}", value)
}

/// Name of a value's concrete type, as used in type-mismatch messages.
pub fn type_name_of<T: ?Sized>(_: &T) -> &'static str {
    type_name::<T>()
}

/// Both sides of a serialization-equivalence comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonComparison {
    pub equivalent: bool,
    /// Encoded actual value; empty when encoding failed.
    pub actual: String,
    /// Encoded expected value; empty when encoding failed.
    pub expected: String,
}

/// Compare two values by their pretty-printed JSON encodings.
///
/// Values of different types that encode identically are equivalent. A value
/// that fails to encode is never equivalent to anything.
pub fn equivalent_json<A, E>(actual: &A, expected: &E) -> JsonComparison
where
    A: Serialize + ?Sized,
    E: Serialize + ?Sized,
{
    let actual = encode_json(actual);
    let expected = encode_json(expected);
    let equivalent = matches!((&actual, &expected), (Ok(a), Ok(e)) if a == e);

    JsonComparison {
        equivalent,
        actual: actual.unwrap_or_default(),
        expected: expected.unwrap_or_default(),
    }
}

fn encode_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(JSON_INDENT.as_bytes());
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Rendered message of a possibly absent error.
///
/// Errors are compared by message only. `Option` and `Result` delegate to
/// what they hold, so `Some(None)` is as absent as `None`.
pub trait ErrorText {
    fn error_text(&self) -> Option<String>;
}

impl<E: ErrorText> ErrorText for Option<E> {
    fn error_text(&self) -> Option<String> {
        self.as_ref().and_then(ErrorText::error_text)
    }
}

impl<T, E: ErrorText> ErrorText for Result<T, E> {
    fn error_text(&self) -> Option<String> {
        self.as_ref().err().and_then(ErrorText::error_text)
    }
}

impl<E: ErrorText + ?Sized> ErrorText for &E {
    fn error_text(&self) -> Option<String> {
        (**self).error_text()
    }
}

impl<E: ErrorText + ?Sized> ErrorText for Box<E> {
    fn error_text(&self) -> Option<String> {
        (**self).error_text()
    }
}

impl<'a> ErrorText for dyn Error + 'a {
    fn error_text(&self) -> Option<String> {
        Some(self.to_string())
    }
}

impl<'a> ErrorText for dyn Error + Send + Sync + 'a {
    fn error_text(&self) -> Option<String> {
        Some(self.to_string())
    }
}

impl ErrorText for str {
    fn error_text(&self) -> Option<String> {
        Some(self.to_string())
    }
}

/// Implement [`ErrorText`] for error types through their `Display` output.
///
/// ```ignore
/// tester_assert::error_text!(MyError, OtherError);
/// ```
#[macro_export]
macro_rules! error_text {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::ErrorText for $ty {
                fn error_text(&self) -> ::std::option::Option<::std::string::String> {
                    ::std::option::Option::Some(::std::string::ToString::to_string(self))
                }
            }
        )+
    };
}

error_text!(
    String,
    ErrorString,
    std::io::Error,
    std::fmt::Error,
    std::num::ParseIntError,
    std::num::ParseFloatError,
    serde_json::Error,
    crate::ConfigError,
);

/// Whether two possibly absent errors render the same message.
pub fn errors_equal(actual: &impl ErrorText, expected: &impl ErrorText) -> bool {
    actual.error_text() == expected.error_text()
}

/// A trivial error holding only its message.
///
/// ```ignore
/// assert::for_test(&t).that_actual_error(&result).equals(Some(ErrorString::new("boom")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ErrorString(pub String);

impl ErrorString {
    pub fn new(message: impl Into<String>) -> Self {
        ErrorString(message.into())
    }
}

impl fmt::Display for ErrorString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Error for ErrorString {}

/// Stand-in for "any value other than the one that was disallowed".
///
/// Used as the expected side of `does_not_equal` and `is_not_nil` results so
/// that diff rendering has something printable. No other value ever equals it.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyOtherValue;

impl fmt::Display for AnyOtherValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<any other value>")
    }
}
