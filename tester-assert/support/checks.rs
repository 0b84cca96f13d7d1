//! Assertion helpers shared by integration tests. They live outside
//! `tests/` so their frames are library frames, not test code.

use tester_assert::{self as assert, Reporter};

/// Assert that `n` is positive, through two layers of helpers.
pub fn assert_positive(reporter: &dyn Reporter, n: i32) -> bool {
    assert_sign(reporter, n, |n| n > 0)
}

fn assert_sign(reporter: &dyn Reporter, n: i32, check: impl Fn(i32) -> bool) -> bool {
    let run = || assert::for_case(reporter, n).that_actual(check(n)).is_true().passed();
    run()
}
