//! Parser configuration.
//!
//! [`ParserConfig`] names the file being parsed, the line its first source
//! line is numbered with, and how deeply constructs may nest before the
//! grammar engine gives up.
//!
//! # Example
//!
//! ```rust
//! use garnet_parser::ParserConfig;
//!
//! let config = ParserConfig::new("lib/point.rb").with_line(10);
//! assert_eq!(config.file(), "lib/point.rb");
//! assert_eq!(config.line(), 10);
//! assert_eq!(ParserConfig::default().file(), "-");
//! ```

/// Nesting limit used when none is configured.
///
/// Each nested expression, each unary operator and each link of an operator,
/// call or modifier chain adds a level. The limit keeps input like
/// `((((((...` or `1 + 1 + ... + 1` from producing trees too deep to walk or
/// drop on the stack.
pub const DEFAULT_MAX_DEPTH: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    file: String,
    line: usize,
    max_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            file: "-".to_string(),
            line: 1,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParserConfig {
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            ..Self::default()
        }
    }

    /// File name reported in diagnostics and `__FILE__`.
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = file.into();
        self
    }

    /// Number of the first source line. Lines are 1-based; 0 is read as 1.
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = line.max(1);
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}
