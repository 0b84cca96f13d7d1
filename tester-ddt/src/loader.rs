//! Fixture files derived from the calling test's name.

use crate::config::FixtureConfig;
use crate::errors::{FixtureError, FixtureResult};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tester_assert::{FrameSource, StackWalker};

/// Load the test cases of the calling test function.
///
/// The nearest function on the stack named like a test, e.g. `test_answer`,
/// names the fixture: `_ddt/test_answer.json` relative to the working
/// directory. The file holds one object whose `testCases` array is decoded
/// into the caller's case type:
///
/// ```json
/// {
///   "testCases": [
///     { "id": "The Ultimate Question", "input": { "question": "6 x 9?" }, "expected": "42" }
///   ]
/// }
/// ```
///
/// ```ignore
/// #[test]
/// fn test_answer() {
///     let cases: Vec<AnswerCase> = tester_ddt::load_test_cases().unwrap();
///     for case in cases { /* ... */ }
/// }
/// ```
///
/// The file is read afresh on every call.
pub fn load_test_cases<C: DeserializeOwned>() -> FixtureResult<Vec<C>> {
    let config = FixtureConfig::global();
    let function = calling_test_function(&StackWalker::new(), config).ok_or_else(|| {
        FixtureError::NoCaller {
            prefixes: config.function_prefixes.join("|"),
        }
    })?;

    let path = config.fixture_path(&function);
    tracing::debug!(function = %function, path = %path.display(), "derived fixture path");
    read_test_cases(&path, &config.cases_key)
}

/// Load test cases from an explicit fixture file.
pub fn load_test_cases_from<C: DeserializeOwned>(path: impl AsRef<Path>) -> FixtureResult<Vec<C>> {
    read_test_cases(path.as_ref(), &FixtureConfig::global().cases_key)
}

/// Name of the nearest function on the stack named like a test function.
pub fn calling_test_function<S: FrameSource>(
    walker: &StackWalker<S>,
    config: &FixtureConfig,
) -> Option<String> {
    let frame = walker.find_frame(0, |frame| {
        frame
            .function_name()
            .map_or(false, |name| config.is_test_function(name))
    })?;
    frame.function_name().map(str::to_owned)
}

/// Decode the cases under `cases_key` of a fixture document. `file` names
/// the document in errors.
pub fn parse_test_cases<C: DeserializeOwned>(
    content: &str,
    file: &str,
    cases_key: &str,
) -> FixtureResult<Vec<C>> {
    let mut document: Map<String, Value> = serde_json::from_str(content).map_err(FixtureError::Parse)?;

    match document.remove(cases_key) {
        None | Some(Value::Null) => Err(no_cases(file)),
        Some(Value::Array(cases)) if cases.is_empty() => Err(no_cases(file)),
        Some(cases) => serde_json::from_value(cases).map_err(|source| FixtureError::Decode {
            file: file.to_owned(),
            source,
        }),
    }
}

fn read_test_cases<C: DeserializeOwned>(path: &Path, cases_key: &str) -> FixtureResult<Vec<C>> {
    let content = fs::read_to_string(path).map_err(|source| FixtureError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let file = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    parse_test_cases(&content, &file, cases_key)
}

fn no_cases(file: &str) -> FixtureError {
    FixtureError::NoCases {
        file: file.to_owned(),
    }
}
