//! The `[fixtures]` table of `tester.toml`.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tester_assert::config::{load_or_default, load_section};
use tester_assert::ConfigResult;

static GLOBAL_FIXTURES: Lazy<FixtureConfig> = Lazy::new(|| load_or_default("fixtures"));

/// Where fixture files live and how they are laid out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixtureConfig {
    /// Directory holding fixture files, relative to the working directory.
    pub directory: String,
    /// Extension of fixture files, without the dot.
    pub extension: String,
    /// Top-level key holding the array of cases.
    pub cases_key: String,
    /// Name prefixes identifying test functions on the call stack.
    pub function_prefixes: Vec<String>,
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            directory: "_ddt".to_string(),
            extension: "json".to_string(),
            cases_key: "testCases".to_string(),
            function_prefixes: vec!["test_".to_string(), "bench_".to_string(), "example_".to_string()],
        }
    }
}

impl FixtureConfig {
    pub fn load(path: &Path) -> ConfigResult<Self> {
        load_section(path, "fixtures")
    }

    /// Process-wide configuration, loaded on first use.
    pub fn global() -> &'static FixtureConfig {
        &GLOBAL_FIXTURES
    }

    /// Fixture file for the test function `function`.
    pub fn fixture_path(&self, function: &str) -> PathBuf {
        Path::new(&self.directory).join(format!("{}.{}", function, self.extension))
    }

    /// Whether `function` is named like a test function.
    pub fn is_test_function(&self, function: &str) -> bool {
        self.function_prefixes
            .iter()
            .any(|prefix| function.starts_with(prefix.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_fixture_path() {
        let config = FixtureConfig::default();
        assert_eq!(
            config.fixture_path("test_deep_thought"),
            Path::new("_ddt").join("test_deep_thought.json")
        );
    }

    #[test]
    fn test_function_prefixes() {
        let config = FixtureConfig::default();
        assert!(config.is_test_function("test_load"));
        assert!(config.is_test_function("bench_load"));
        assert!(config.is_test_function("example_load"));
        assert!(!config.is_test_function("load_test_cases"));
        assert!(!config.is_test_function("run_test"));
    }

    #[test]
    fn test_load_fixtures_table() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[attribution]
skip_frames = 1

[fixtures]
directory = "testdata"
cases_key = "cases"
"#
        )
        .unwrap();

        let config = FixtureConfig::load(file.path()).unwrap();
        assert_eq!(config.directory, "testdata");
        assert_eq!(config.cases_key, "cases");
        assert_eq!(config.extension, "json");
        assert_eq!(config.function_prefixes.len(), 3);
    }
}
