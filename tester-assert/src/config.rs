//! Toolkit configuration.
//!
//! Settings live in an optional TOML file, one table per concern:
//!
//! ```toml
//! [attribution]
//! test_file_pattern = '(^|[/\\])tests[/\\]|_test\.rs$'
//! test_modules = ["tests"]
//! skip_frames = 0
//!
//! [fixtures]
//! directory = "_ddt"
//! ```
//!
//! The file is located through the `TESTER_CONFIG` environment variable,
//! falling back to `tester.toml` in the working directory. Without a file,
//! every section uses its defaults.

use crate::errors::{ConfigError, ConfigResult};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming the configuration file.
pub const CONFIG_ENV_VAR: &str = "TESTER_CONFIG";

/// Configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "tester.toml";

/// Files under a `tests/` directory, `*_test.rs` files and `tests.rs` modules.
pub const DEFAULT_TEST_FILE_PATTERN: &str = r"(^|[/\\])tests[/\\]|_test\.rs$|(^|[/\\])tests\.rs$";

static DEFAULT_TEST_FILE_MATCHER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(DEFAULT_TEST_FILE_PATTERN).expect("default test-file pattern is a valid regex")
});

static GLOBAL_ATTRIBUTION: Lazy<AttributionConfig> = Lazy::new(|| load_or_default("attribution"));

static GLOBAL_TEST_FILE_MATCHER: Lazy<Regex> = Lazy::new(|| {
    match GLOBAL_ATTRIBUTION.test_file_matcher() {
        Ok(matcher) => matcher,
        Err(e) => {
            tracing::warn!("{}; using the default test-file pattern", e);
            DEFAULT_TEST_FILE_MATCHER.clone()
        }
    }
});

/// How failing assertions are attributed to a source location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributionConfig {
    /// Regex matched against a frame's source path, taken relative to the
    /// root of the package under test.
    pub test_file_pattern: String,
    /// Module names marking test code inside ordinary source files; a frame
    /// whose function path has one of these as a segment is test code.
    pub test_modules: Vec<String>,
    /// Frames to skip before the walk starts testing frames.
    pub skip_frames: usize,
}

impl Default for AttributionConfig {
    fn default() -> Self {
        Self {
            test_file_pattern: DEFAULT_TEST_FILE_PATTERN.to_string(),
            test_modules: vec!["tests".to_string()],
            skip_frames: 0,
        }
    }
}

impl AttributionConfig {
    /// Load the `[attribution]` table from a TOML file.
    ///
    /// A missing file or a missing table yields the defaults.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        load_section(path, "attribution")
    }

    /// Process-wide configuration, loaded on first use.
    pub fn global() -> &'static AttributionConfig {
        &GLOBAL_ATTRIBUTION
    }

    /// Compile [`test_file_pattern`](Self::test_file_pattern).
    pub fn test_file_matcher(&self) -> ConfigResult<Regex> {
        Regex::new(&self.test_file_pattern).map_err(|source| ConfigError::Pattern {
            pattern: self.test_file_pattern.clone(),
            source,
        })
    }
}

/// The compiled test-file matcher of the [global](AttributionConfig::global)
/// configuration.
pub fn global_test_file_matcher() -> &'static Regex {
    &GLOBAL_TEST_FILE_MATCHER
}

/// Path of the configuration file for this process, if there is one.
pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
        return Some(PathBuf::from(path));
    }
    let local = PathBuf::from(DEFAULT_CONFIG_FILE);
    local.exists().then_some(local)
}

/// Load one table of a TOML configuration file.
///
/// Returns `T::default()` when the file or the table is absent.
pub fn load_section<T>(path: &Path, section: &str) -> ConfigResult<T>
where
    T: DeserializeOwned + Default,
{
    if !path.exists() {
        return Ok(T::default());
    }

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let mut table: toml::Table = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })?;

    match table.remove(section) {
        Some(value) => value.try_into().map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        }),
        None => Ok(T::default()),
    }
}

/// Load a section from the process configuration file, logging and falling
/// back to defaults when the file is unusable.
pub fn load_or_default<T>(section: &str) -> T
where
    T: DeserializeOwned + Default,
{
    let Some(path) = config_path() else {
        return T::default();
    };

    match load_section(&path, section) {
        Ok(config) => {
            tracing::debug!(path = %path.display(), section, "loaded tester configuration");
            config
        }
        Err(e) => {
            tracing::warn!("{}; using default [{}] settings", e, section);
            T::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_pattern_matches_test_files() {
        let matcher = AttributionConfig::default().test_file_matcher().unwrap();

        assert!(matcher.is_match("/work/crate/tests/attribution_test.rs"));
        assert!(matcher.is_match("tests/common/mod.rs"));
        assert!(matcher.is_match("src/parser_test.rs"));
        assert!(matcher.is_match("src/tests.rs"));
        assert!(matcher.is_match(r"C:\work\crate\tests\it.rs"));

        assert!(!matcher.is_match("src/context.rs"));
        assert!(!matcher.is_match("src/contests.rs"));
        assert!(!matcher.is_match("/rustc/abc/library/core/src/ops/function.rs"));
    }

    #[test]
    fn test_load_missing_file_returns_default() {
        let config = AttributionConfig::load(Path::new("/nonexistent/tester.toml")).unwrap();
        assert_eq!(config, AttributionConfig::default());
    }

    #[test]
    fn test_load_missing_section_returns_default() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[fixtures]\ndirectory = \"data\"").unwrap();

        let config = AttributionConfig::load(file.path()).unwrap();
        assert_eq!(config, AttributionConfig::default());
    }

    #[test]
    fn test_load_from_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[attribution]
test_file_pattern = 'spec\.rs$'
skip_frames = 2
"#
        )
        .unwrap();

        let config = AttributionConfig::load(file.path()).unwrap();
        assert_eq!(config.skip_frames, 2);
        assert!(config.test_file_matcher().unwrap().is_match("src/parser_spec.rs"));
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[attribution]\nskip_frames = 1").unwrap();

        let config = AttributionConfig::load(file.path()).unwrap();
        assert_eq!(config.skip_frames, 1);
        assert_eq!(config.test_file_pattern, DEFAULT_TEST_FILE_PATTERN);
        assert_eq!(config.test_modules, vec!["tests".to_string()]);
    }

    #[test]
    fn test_load_test_modules() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[attribution]\ntest_modules = [\"tests\", \"checks\"]").unwrap();

        let config = AttributionConfig::load(file.path()).unwrap();
        assert_eq!(config.test_modules, vec!["tests".to_string(), "checks".to_string()]);
    }

    #[test]
    fn test_load_malformed_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[attribution\nskip_frames = ").unwrap();

        let err = AttributionConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_invalid_pattern() {
        let config = AttributionConfig {
            test_file_pattern: "(unclosed".to_string(),
            ..AttributionConfig::default()
        };

        let err = config.test_file_matcher().unwrap_err();
        assert!(err.to_string().starts_with("invalid pattern `(unclosed`"));
    }
}
