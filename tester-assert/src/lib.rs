//! Fluent test assertions that report the test's own call site.
//!
//! Assertions are usually wrapped in helpers, and helpers in other helpers.
//! However deep the nesting, a failure is attributed to the first frame on
//! the stack that lives in a test file, so the message points at the test
//! and not at the helper that happened to run the check.
//!
//! ```ignore
//! use tester_assert as assert;
//!
//! #[test]
//! fn test_parse() {
//!     let t = assert::TestRun::new();
//!     assert::for_test(&t).that_actual("42".parse::<i32>().ok()).is_not_nil();
//!     assert::for_case(&t, "empty").that_actual_error("".parse::<i32>()).is_not_nil();
//!     assert::for_test(&t).that_actual(vec![1, 2]).equals(vec![1, 2]).then_diff_on_fail();
//! }
//! ```
//!
//! Assertions never stop the test. Each failure is written to the test's
//! [`Reporter`] and marks it failed; a [`TestRun`] panics at the end of
//! its scope if anything failed.
//!
//! ## Modules
//!
//! - [`callsite`] - Stack walking and call-site attribution
//! - [`compare`] - Structural comparison and mismatch classification
//! - [`context`] - Per-assertion context and entry points
//! - [`result`] - Assertion results and post-failure actions
//! - [`reporter`] - Host test-runner bindings and the output lock
//! - [`diff`] - Diff rendering
//! - [`hooks`] - Test-hook visibility checks
//! - [`config`] - Optional `tester.toml` configuration
//! - [`errors`] - Configuration errors

pub mod call;
pub mod callsite;
pub mod compare;
pub mod config;
pub mod context;
pub mod diff;
pub mod error;
pub mod errors;
pub mod hooks;
pub mod reporter;
pub mod result;
pub mod string;
pub mod time;
pub mod value;

pub use call::AssertableCall;
pub use callsite::{CallSite, Frame, FrameSource, LiveStack, StackWalker};
pub use compare::{errors_equal, AnyOtherValue, ErrorString, ErrorText, Mismatch};
pub use config::AttributionConfig;
pub use context::{for_case, for_test, AssertionContext};
pub use diff::{print_diff, render_diff};
pub use error::AssertableError;
pub use errors::{ConfigError, ConfigResult};
pub use hooks::{AssertableType, Describe, FieldDescriptor, TypeDescriptor, TEST_HOOK_KEY};
pub use reporter::{with_output_lock, Recorder, Reporter, TestRun};
pub use result::AssertionResult;
pub use string::AssertableString;
pub use time::AssertableTime;
pub use value::AssertableValue;
