//! Syntax diagnostics for the Garnet front end.
//!
//! Every malformed-input condition the scanner or the grammar engine detects is
//! reported as a [`Diagnostic`]: a [`SyntaxErrorKind`] with a stable symbolic
//! identifier, the originating file, a 1-based line and a free-text message.
//!
//! Callers match on the kind, never on the message. The message is written by
//! whoever raises the diagnostic and describes the specific offending input.
//!
//! # Examples
//!
//! ```rust
//! use garnet_syntax::error::{error_at, Diagnostic, Result, SyntaxErrorKind};
//!
//! fn check_escape(c: char, line: usize) -> Result<char> {
//!     match c {
//!         'n' => Ok('\n'),
//!         other => error_at(
//!             SyntaxErrorKind::InvalidEscapeSyntax,
//!             "demo.rb",
//!             line,
//!             format!("invalid escape '\\{}'", other),
//!         ),
//!     }
//! }
//!
//! let err = check_escape('q', 3).unwrap_err();
//! assert_eq!(err.kind(), SyntaxErrorKind::InvalidEscapeSyntax);
//! assert_eq!(err.kind().id(), "INVALID_ESCAPE_SYNTAX");
//! assert_eq!(err.to_string(), "demo.rb:3: invalid escape '\\q'");
//! ```

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Closed set of syntax error categories.
///
/// Each kind carries an explicit identifier returned by [`id`](Self::id).
/// Identifiers are part of the public contract: they never change, and they
/// do not depend on where a kind sits in this enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxErrorKind {
    BadHexNumber,
    BadIdentifier,
    BadOctalDigit,
    BlockArgUnexpected,
    BlockArgAndBlockGiven,
    CharacterBad,
    CvarBadName,
    EmptyBinaryNumber,
    FloatMissingZero,
    /// Catch-all for unexpected input that no other kind describes.
    GrammarError,
    IncompleteCharSyntax,
    InvalidAssignment,
    InvalidEscapeSyntax,
    IvarBadName,
    MultipleAssignmentInConditional,
    RegexpUnknownOption,
    StringHitsEof,
    StringUnknownType,
    TrailingUnderscoreInNumber,
    BlockGivenToYield,
    VoidValueExpression,
    UnknownEncoding,
    NotAsciiCompatible,
    MixedEncoding,
    RegexpEncodingMismatch,
    InvalidMultibyteChar,
    RationalOutOfRange,
    TopLevelReturn,
}

impl SyntaxErrorKind {
    pub const ALL: [SyntaxErrorKind; 28] = [
        Self::BadHexNumber,
        Self::BadIdentifier,
        Self::BadOctalDigit,
        Self::BlockArgUnexpected,
        Self::BlockArgAndBlockGiven,
        Self::CharacterBad,
        Self::CvarBadName,
        Self::EmptyBinaryNumber,
        Self::FloatMissingZero,
        Self::GrammarError,
        Self::IncompleteCharSyntax,
        Self::InvalidAssignment,
        Self::InvalidEscapeSyntax,
        Self::IvarBadName,
        Self::MultipleAssignmentInConditional,
        Self::RegexpUnknownOption,
        Self::StringHitsEof,
        Self::StringUnknownType,
        Self::TrailingUnderscoreInNumber,
        Self::BlockGivenToYield,
        Self::VoidValueExpression,
        Self::UnknownEncoding,
        Self::NotAsciiCompatible,
        Self::MixedEncoding,
        Self::RegexpEncodingMismatch,
        Self::InvalidMultibyteChar,
        Self::RationalOutOfRange,
        Self::TopLevelReturn,
    ];

    /// Stable symbolic identifier used for programmatic matching.
    pub fn id(self) -> &'static str {
        match self {
            Self::BadHexNumber => "BAD_HEX_NUMBER",
            Self::BadIdentifier => "BAD_IDENTIFIER",
            Self::BadOctalDigit => "BAD_OCTAL_DIGIT",
            Self::BlockArgUnexpected => "BLOCK_ARG_UNEXPECTED",
            Self::BlockArgAndBlockGiven => "BLOCK_ARG_AND_BLOCK_GIVEN",
            Self::CharacterBad => "CHARACTER_BAD",
            Self::CvarBadName => "CVAR_BAD_NAME",
            Self::EmptyBinaryNumber => "EMPTY_BINARY_NUMBER",
            Self::FloatMissingZero => "FLOAT_MISSING_ZERO",
            Self::GrammarError => "GRAMMAR_ERROR",
            Self::IncompleteCharSyntax => "INCOMPLETE_CHAR_SYNTAX",
            Self::InvalidAssignment => "INVALID_ASSIGNMENT",
            Self::InvalidEscapeSyntax => "INVALID_ESCAPE_SYNTAX",
            Self::IvarBadName => "IVAR_BAD_NAME",
            Self::MultipleAssignmentInConditional => "MULTIPLE_ASSIGNMENT_IN_CONDITIONAL",
            Self::RegexpUnknownOption => "REGEXP_UNKNOWN_OPTION",
            Self::StringHitsEof => "STRING_HITS_EOF",
            Self::StringUnknownType => "STRING_UNKNOWN_TYPE",
            Self::TrailingUnderscoreInNumber => "TRAILING_UNDERSCORE_IN_NUMBER",
            Self::BlockGivenToYield => "BLOCK_GIVEN_TO_YIELD",
            Self::VoidValueExpression => "VOID_VALUE_EXPRESSION",
            Self::UnknownEncoding => "UNKNOWN_ENCODING",
            Self::NotAsciiCompatible => "NOT_ASCII_COMPATIBLE",
            Self::MixedEncoding => "MIXED_ENCODING",
            Self::RegexpEncodingMismatch => "REGEXP_ENCODING_MISMATCH",
            Self::InvalidMultibyteChar => "INVALID_MULTIBYTE_CHAR",
            Self::RationalOutOfRange => "RATIONAL_OUT_OF_RANGE",
            Self::TopLevelReturn => "TOP_LEVEL_RETURN",
        }
    }

    /// Short human description of the category, independent of any message.
    pub fn summary(self) -> &'static str {
        match self {
            Self::BadHexNumber => "hexadecimal literal without digits",
            Self::BadIdentifier => "illegal identifier",
            Self::BadOctalDigit => "invalid octal digit",
            Self::BlockArgUnexpected => "block argument not allowed here",
            Self::BlockArgAndBlockGiven => "both block argument and literal block given",
            Self::CharacterBad => "invalid character",
            Self::CvarBadName => "illegal class variable name",
            Self::EmptyBinaryNumber => "binary literal without digits",
            Self::FloatMissingZero => "float literal missing leading zero",
            Self::GrammarError => "syntax error",
            Self::IncompleteCharSyntax => "incomplete character literal",
            Self::InvalidAssignment => "invalid assignment target",
            Self::InvalidEscapeSyntax => "invalid escape sequence",
            Self::IvarBadName => "illegal instance variable name",
            Self::MultipleAssignmentInConditional => "multiple assignment in conditional",
            Self::RegexpUnknownOption => "unknown regexp option",
            Self::StringHitsEof => "string hits end of input",
            Self::StringUnknownType => "unknown type of %string",
            Self::TrailingUnderscoreInNumber => "trailing '_' in number",
            Self::BlockGivenToYield => "block given to yield",
            Self::VoidValueExpression => "void value expression",
            Self::UnknownEncoding => "unknown encoding",
            Self::NotAsciiCompatible => "encoding is not ASCII compatible",
            Self::MixedEncoding => "mixed encodings",
            Self::RegexpEncodingMismatch => "regexp encoding mismatch",
            Self::InvalidMultibyteChar => "invalid multibyte character",
            Self::RationalOutOfRange => "rational literal out of range",
            Self::TopLevelReturn => "return outside of a method",
        }
    }
}

impl fmt::Display for SyntaxErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Returned when parsing an identifier that names no [`SyntaxErrorKind`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown syntax error kind '{0}'")]
pub struct UnknownSyntaxErrorKind(pub String);

impl FromStr for SyntaxErrorKind {
    type Err = UnknownSyntaxErrorKind;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.id() == s)
            .ok_or_else(|| UnknownSyntaxErrorKind(s.to_string()))
    }
}

/// One malformed-input condition, raised by the scanner or the grammar engine.
///
/// All four fields are fixed at construction and only readable afterwards.
///
/// ```rust
/// use garnet_syntax::error::{Diagnostic, SyntaxErrorKind};
///
/// let diag = Diagnostic::new(
///     SyntaxErrorKind::StringHitsEof,
///     "-e",
///     1,
///     "unterminated string meets end of file",
/// );
/// assert_eq!(diag.kind(), SyntaxErrorKind::StringHitsEof);
/// assert_eq!(diag.file(), "-e");
/// assert_eq!(diag.line(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{file}:{line}: {message}")]
pub struct Diagnostic {
    kind: SyntaxErrorKind,
    file: String,
    line: usize,
    message: String,
}

impl Diagnostic {
    pub fn new(
        kind: SyntaxErrorKind,
        file: impl Into<String>,
        line: usize,
        message: impl Into<String>,
    ) -> Self {
        debug_assert!(line >= 1, "diagnostic lines are 1-based");
        Self {
            kind,
            file: file.into(),
            line,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> SyntaxErrorKind {
        self.kind
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    /// 1-based line the problem was detected on.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A specialized `Result` whose error is a [`Diagnostic`].
pub type Result<T, E = Diagnostic> = std::result::Result<T, E>;

/// Shorthand for `Err(Diagnostic::new(kind, file, line, message))`.
pub fn error_at<T>(
    kind: SyntaxErrorKind,
    file: impl Into<String>,
    line: usize,
    message: impl Into<String>,
) -> Result<T> {
    Err(Diagnostic::new(kind, file, line, message))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use test_case::test_case;

    #[test]
    fn diagnostic_keeps_its_fields() {
        for kind in SyntaxErrorKind::ALL {
            let diag = Diagnostic::new(kind, "lib/foo.rb", 42, "boom");
            assert_eq!(diag.kind(), kind);
            assert_eq!(diag.file(), "lib/foo.rb");
            assert_eq!(diag.line(), 42);
            assert_eq!(diag.message(), "boom");
        }
    }

    #[test]
    fn ids_are_pairwise_distinct() {
        let ids: HashSet<&str> = SyntaxErrorKind::ALL.iter().map(|k| k.id()).collect();
        assert_eq!(ids.len(), SyntaxErrorKind::ALL.len());
    }

    #[test]
    fn all_lists_every_kind_once() {
        let kinds: HashSet<SyntaxErrorKind> = SyntaxErrorKind::ALL.into_iter().collect();
        assert_eq!(kinds.len(), SyntaxErrorKind::ALL.len());
    }

    // Identifiers are a public contract; these literals must never change.
    #[test_case(SyntaxErrorKind::BadHexNumber, "BAD_HEX_NUMBER")]
    #[test_case(SyntaxErrorKind::CharacterBad, "CHARACTER_BAD")]
    #[test_case(SyntaxErrorKind::GrammarError, "GRAMMAR_ERROR")]
    #[test_case(SyntaxErrorKind::MultipleAssignmentInConditional, "MULTIPLE_ASSIGNMENT_IN_CONDITIONAL")]
    #[test_case(SyntaxErrorKind::StringHitsEof, "STRING_HITS_EOF")]
    #[test_case(SyntaxErrorKind::UnknownEncoding, "UNKNOWN_ENCODING")]
    #[test_case(SyntaxErrorKind::InvalidMultibyteChar, "INVALID_MULTIBYTE_CHAR")]
    #[test_case(SyntaxErrorKind::TopLevelReturn, "TOP_LEVEL_RETURN")]
    fn pinned_ids(kind: SyntaxErrorKind, id: &str) {
        assert_eq!(kind.id(), id);
        assert_eq!(kind.to_string(), id);
        assert_eq!(id.parse::<SyntaxErrorKind>(), Ok(kind));
    }

    #[test]
    fn ids_parse_back() {
        for kind in SyntaxErrorKind::ALL {
            assert_eq!(kind.id().parse::<SyntaxErrorKind>(), Ok(kind));
        }
    }

    #[test]
    fn unknown_id_is_rejected() {
        let err = "NOT_A_KIND".parse::<SyntaxErrorKind>().unwrap_err();
        assert_eq!(err, UnknownSyntaxErrorKind("NOT_A_KIND".to_string()));
        assert_eq!(err.to_string(), "unknown syntax error kind 'NOT_A_KIND'");
    }

    #[test]
    fn display_includes_location() {
        let diag = Diagnostic::new(SyntaxErrorKind::GrammarError, "a.rb", 7, "unexpected 'end'");
        assert_eq!(diag.to_string(), "a.rb:7: unexpected 'end'");
    }

    #[test]
    fn error_at_builds_an_err() {
        let res: Result<()> = error_at(SyntaxErrorKind::BadOctalDigit, "x.rb", 2, "Invalid octal digit");
        let diag = res.unwrap_err();
        assert_eq!(diag.kind(), SyntaxErrorKind::BadOctalDigit);
        assert_eq!(diag.line(), 2);
    }
}
