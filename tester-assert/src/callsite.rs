//! Call-site attribution.
//!
//! Assertion helpers can be nested arbitrarily deep, so a fixed number of
//! frames to skip never finds the test reliably. Instead the stack is walked
//! outward and every frame is tested against a predicate; the first frame
//! that satisfies it is the call site. The stack itself comes from a
//! [`FrameSource`], which is the live stack in production and a fixed list
//! of frames in tests.

use crate::config::{global_test_file_matcher, AttributionConfig};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::path::{Path, PathBuf};

static PACKAGE_ROOT: Lazy<Option<PathBuf>> = Lazy::new(|| {
    std::env::var_os("CARGO_MANIFEST_DIR")
        .map(PathBuf::from)
        .or_else(|| std::env::current_dir().ok())
});

/// Where test code invoked an assertion, if it could be determined.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CallSite {
    /// A file and 1-based line.
    Known { file: String, line: u32 },
    /// No frame on the stack belonged to test code.
    Unknown,
}

impl CallSite {
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        CallSite::Known {
            file: file.into(),
            line,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, CallSite::Known { .. })
    }

    pub fn file(&self) -> Option<&str> {
        match self {
            CallSite::Known { file, .. } => Some(file),
            CallSite::Unknown => None,
        }
    }

    pub fn line(&self) -> Option<u32> {
        match self {
            CallSite::Known { line, .. } => Some(*line),
            CallSite::Unknown => None,
        }
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallSite::Known { file, line } => write!(f, "{}:{}", file, line),
            CallSite::Unknown => write!(f, "<unknown>"),
        }
    }
}

/// One resolved frame of a call stack.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    /// Demangled function path, without the symbol hash.
    pub function: Option<String>,
    /// Source file of the frame.
    pub file: Option<PathBuf>,
    /// 1-based source line of the frame.
    pub line: Option<u32>,
}

impl Frame {
    pub fn new(function: impl Into<String>, file: impl Into<PathBuf>, line: u32) -> Self {
        Self {
            function: Some(function.into()),
            file: Some(file.into()),
            line: Some(line),
        }
    }

    /// The frame's function name without its module path, closures or
    /// generic arguments; e.g. `test_load` for `suite::test_load::{{closure}}`.
    pub fn function_name(&self) -> Option<&str> {
        self.function.as_deref().map(short_function_name)
    }
}

/// Supplies call-stack frames, innermost first.
pub trait FrameSource {
    fn frames(&self) -> Vec<Frame>;
}

impl FrameSource for Vec<Frame> {
    fn frames(&self) -> Vec<Frame> {
        self.clone()
    }
}

/// The live call stack of the current thread.
///
/// Frames belonging to the capture itself are dropped, so the first frame is
/// the code that asked for the stack. Inlined calls appear as separate frames.
#[derive(Debug, Clone, Copy, Default)]
pub struct LiveStack;

impl FrameSource for LiveStack {
    fn frames(&self) -> Vec<Frame> {
        let backtrace = backtrace::Backtrace::new();
        backtrace
            .frames()
            .iter()
            .flat_map(|frame| frame.symbols())
            .map(|symbol| Frame {
                function: symbol.name().map(|name| format!("{:#}", name)),
                file: symbol.filename().map(Path::to_path_buf),
                line: symbol.lineno(),
            })
            .skip_while(is_capture_frame)
            .collect()
    }
}

fn is_capture_frame(frame: &Frame) -> bool {
    frame.function.as_deref().map_or(false, |name| {
        name.starts_with("backtrace::") || name.contains("LiveStack as ")
    })
}

/// Walks frames from a [`FrameSource`] looking for the first frame that
/// satisfies a predicate.
#[derive(Debug, Clone, Default)]
pub struct StackWalker<S = LiveStack> {
    source: S,
}

impl StackWalker<LiveStack> {
    /// A walker over the live stack.
    pub fn new() -> Self {
        Self { source: LiveStack }
    }
}

impl<S: FrameSource> StackWalker<S> {
    pub fn with_source(source: S) -> Self {
        Self { source }
    }

    /// The first frame, after skipping `skip` frames, for which `predicate`
    /// returns true.
    pub fn find_frame<P>(&self, skip: usize, predicate: P) -> Option<Frame>
    where
        P: Fn(&Frame) -> bool,
    {
        let frames = self.source.frames();
        let inspected = frames.len().saturating_sub(skip);
        let found = frames.into_iter().skip(skip).find(|frame| predicate(frame));
        tracing::trace!(inspected, found = found.is_some(), "walked call stack");
        found
    }

    /// Resolve the call site: the first frame with a known file and line
    /// that satisfies `predicate`, or [`CallSite::Unknown`] when the stack
    /// is exhausted.
    pub fn resolve_call_site<P>(&self, skip: usize, predicate: P) -> CallSite
    where
        P: Fn(&Frame) -> bool,
    {
        let found = self.find_frame(skip, |frame| {
            frame.file.is_some() && frame.line.is_some() && predicate(frame)
        });

        match found {
            Some(Frame {
                file: Some(file),
                line: Some(line),
                ..
            }) => {
                let site = CallSite::new(display_path(&file), line);
                tracing::debug!(call_site = %site, "resolved call site");
                site
            }
            _ => {
                tracing::debug!("no test frame on the call stack");
                CallSite::Unknown
            }
        }
    }
}

/// Root of the package under test: `CARGO_MANIFEST_DIR` as set by cargo
/// when it runs tests, else the working directory.
pub fn package_root() -> Option<&'static Path> {
    PACKAGE_ROOT.as_deref()
}

/// `file` relative to `root`.
///
/// Relative paths are already rooted at the workspace and come back as
/// they are. Absolute paths outside `root` belong to other packages and
/// give `None`.
pub fn package_relative(file: &Path, root: Option<&Path>) -> Option<PathBuf> {
    if file.is_relative() {
        return Some(file.to_path_buf());
    }
    root.and_then(|root| file.strip_prefix(root).ok()).map(Path::to_path_buf)
}

/// Whether the frame's file, relative to `root`, matches `matcher`.
pub fn is_test_file_under(frame: &Frame, root: Option<&Path>, matcher: &Regex) -> bool {
    frame
        .file
        .as_deref()
        .and_then(|file| package_relative(file, root))
        .map_or(false, |relative| matcher.is_match(&relative.to_string_lossy()))
}

/// The frame's file follows the test-file naming convention of the
/// [global configuration](AttributionConfig::global).
pub fn is_test_file(frame: &Frame) -> bool {
    is_test_file_under(frame, package_root(), global_test_file_matcher())
}

/// The frame's function lives in one of the `modules`, such as a
/// `#[cfg(test)] mod tests` block. Generic arguments and trait
/// qualifications are not searched.
pub fn is_test_module(frame: &Frame, modules: &[String]) -> bool {
    frame.function.as_deref().map_or(false, |path| {
        top_level_segments(path)
            .iter()
            .any(|segment| modules.iter().any(|module| module == segment))
    })
}

/// Default call-site predicate: a test file, or a test module inside an
/// ordinary source file.
pub fn is_test_code(frame: &Frame) -> bool {
    is_test_file(frame) || is_test_module(frame, &AttributionConfig::global().test_modules)
}

/// Resolve the call site of the current thread's test code with the global
/// configuration.
pub fn resolve_call_site() -> CallSite {
    StackWalker::new().resolve_call_site(AttributionConfig::global().skip_frames, is_test_code)
}

/// Strip the module path, closure markers, generic arguments and symbol hash
/// from a demangled function path.
pub fn short_function_name(path: &str) -> &str {
    let segments = top_level_segments(path);
    segments
        .iter()
        .rev()
        .copied()
        .find(|segment| !is_decoration(segment))
        .unwrap_or(path)
}

fn top_level_segments(path: &str) -> Vec<&str> {
    let bytes = path.as_bytes();
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'<' => depth += 1,
            b'>' => depth = depth.saturating_sub(1),
            b':' if depth == 0 && bytes.get(i + 1) == Some(&b':') => {
                segments.push(&path[start..i]);
                i += 2;
                start = i;
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    segments.push(&path[start..]);
    segments
}

fn is_decoration(segment: &str) -> bool {
    segment.is_empty()
        || segment.starts_with('<')
        || segment.starts_with("{{")
        || segment.starts_with("{closure")
        || is_symbol_hash(segment)
}

fn is_symbol_hash(segment: &str) -> bool {
    segment.len() == 17
        && segment.starts_with('h')
        && segment[1..].chars().all(|c| c.is_ascii_hexdigit())
}

/// Render a path relative to the package root when it lies beneath it.
fn display_path(file: &Path) -> String {
    package_relative(file, package_root())
        .unwrap_or_else(|| file.to_path_buf())
        .display()
        .to_string()
}
