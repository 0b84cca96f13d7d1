//! Diff rendering for failed assertions.
//!
//! Values are rendered with pretty `Debug` output and compared line by line.

use crate::reporter::with_output_lock;
use similar::{ChangeTag, TextDiff};
use std::any::type_name;
use std::fmt;

/// Render the difference between an actual and an expected value.
///
/// Values of different types render as `actual type != expected type`;
/// single-line values as `actual != expected`; anything longer as a line
/// diff where `-` marks actual-only lines and `+` expected-only lines.
pub fn render_diff<A, E>(actual: &A, expected: &E) -> String
where
    A: fmt::Debug + ?Sized,
    E: fmt::Debug + ?Sized,
{
    let (actual_type, expected_type) = (type_name::<A>(), type_name::<E>());
    if actual_type != expected_type {
        return format!("{} != {}\n", actual_type, expected_type);
    }

    let actual = format!("{:#?}", actual);
    let expected = format!("{:#?}", expected);
    if !actual.contains('\n') && !expected.contains('\n') {
        return format!("{} != {}\n", actual, expected);
    }

    let mut output = String::new();
    for change in TextDiff::from_lines(&actual, &expected).iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Equal => "  ",
            ChangeTag::Delete => "- ",
            ChangeTag::Insert => "+ ",
        };
        output.push_str(sign);
        output.push_str(change.value());
        if change.missing_newline() {
            output.push('\n');
        }
    }
    output
}

/// Write a diff of the two values to stdout under the output lock.
///
/// Suitable as a `then_run_on_fail` callback.
pub fn print_diff<A, E>(actual: &A, expected: &E)
where
    A: fmt::Debug + ?Sized,
    E: fmt::Debug + ?Sized,
{
    let diff = render_diff(actual, expected);
    with_output_lock(|| print!("Diff:\n{}", diff));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Address {
        name: &'static str,
        address: &'static str,
    }

    #[test]
    fn test_single_line_values() {
        assert_eq!(render_diff(&"foo", &""), "\"foo\" != \"\"\n");
        assert_eq!(render_diff(&42, &13), "42 != 13\n");
    }

    #[test]
    fn test_different_types_show_type_names() {
        assert_eq!(render_diff(&42_i32, &42_i64), "i32 != i64\n");
    }

    #[test]
    fn test_struct_diff() {
        let actual = Address {
            name: "Richard Hendricks",
            address: "richard@pp.io",
        };
        let expected = Address {
            name: "Erlich Bachman",
            address: "richard@pp.io",
        };

        insta::assert_snapshot!(render_diff(&actual, &expected), @r###"
          Address {
        -     name: "Richard Hendricks",
        +     name: "Erlich Bachman",
              address: "richard@pp.io",
          }
        "###);
    }

    #[test]
    fn test_trailing_actual_lines() {
        insta::assert_snapshot!(render_diff(&vec![1, 2, 3], &vec![1]), @r###"
          [
              1,
        -     2,
        -     3,
          ]
        "###);
    }
}
