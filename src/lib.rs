//! Fluent test assertions and data-driven test fixtures.
//!
//! - [`assert`] - Assertions that report the calling test's file and line
//! - [`ddt`] - Test cases loaded from a JSON fixture named after the test
//!
//! ```ignore
//! use tester::assert;
//!
//! #[derive(serde::Deserialize)]
//! struct Case { id: String, input: i32, expected: i32 }
//!
//! #[test]
//! fn test_double() {
//!     let t = assert::TestRun::new();
//!     let cases: Vec<Case> = tester::ddt::load_test_cases().unwrap();
//!     for case in cases {
//!         assert::for_case(&t, &case.id).that_actual(double(case.input)).equals(case.expected);
//!     }
//! }
//! ```

pub use tester_assert as assert;
pub use tester_ddt as ddt;
