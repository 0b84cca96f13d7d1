//! Data-driven test cases loaded from JSON fixtures.
//!
//! A test asks for its cases without naming a file; the fixture is found
//! from the name of the test function that asked:
//!
//! ```ignore
//! #[derive(Deserialize)]
//! struct Case { id: String, input: String, expected: String }
//!
//! #[test]
//! fn test_shout() {
//!     let t = tester_assert::TestRun::new();
//!     let cases: Vec<Case> = tester_ddt::load_test_cases().unwrap(); // _ddt/test_shout.json
//!     for case in cases {
//!         tester_assert::for_case(&t, &case.id)
//!             .that_actual_string(&shout(&case.input))
//!             .equals(&case.expected);
//!     }
//! }
//! ```
//!
//! ## Modules
//!
//! - [`loader`] - Fixture path derivation and case decoding
//! - [`config`] - The `[fixtures]` configuration table
//! - [`errors`] - Fixture loading errors

pub mod config;
pub mod errors;
pub mod loader;

pub use config::FixtureConfig;
pub use errors::{FixtureError, FixtureResult};
pub use loader::{calling_test_function, load_test_cases, load_test_cases_from, parse_test_cases};
