//! Source encoding selection and decoding.

use garnet_syntax::error::SyntaxErrorKind;

const BOM: &[u8] = b"\xEF\xBB\xBF";

/// Encodings a source file may declare in its magic comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceEncoding {
    #[default]
    Utf8,
    UsAscii,
    /// `ASCII-8BIT`: every byte is one character.
    Binary,
}

/// Why the declared encoding or the source bytes were rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct EncodingError {
    pub kind: SyntaxErrorKind,
    pub line: usize,
    pub message: String,
}

impl SourceEncoding {
    pub fn name(self) -> &'static str {
        match self {
            SourceEncoding::Utf8 => "UTF-8",
            SourceEncoding::UsAscii => "US-ASCII",
            SourceEncoding::Binary => "ASCII-8BIT",
        }
    }

    /// Resolves an encoding name as written in a magic comment.
    pub fn from_label(label: &str) -> Result<Self, SyntaxErrorKind> {
        let label = label.to_ascii_lowercase();
        match label.as_str() {
            "utf-8" | "utf8" => Ok(SourceEncoding::Utf8),
            "us-ascii" | "ascii" | "ansi_x3.4-1968" | "646" => Ok(SourceEncoding::UsAscii),
            "ascii-8bit" | "binary" => Ok(SourceEncoding::Binary),
            _ if label.starts_with("utf-16")
                || label.starts_with("utf-32")
                || label.starts_with("ucs-2")
                || label.starts_with("ucs-4") =>
            {
                Err(SyntaxErrorKind::NotAsciiCompatible)
            }
            _ => Err(SyntaxErrorKind::UnknownEncoding),
        }
    }

    /// Picks the encoding declared on the first two lines, UTF-8 when none is.
    pub(crate) fn detect(raw: &[u8], first_line: usize) -> Result<Self, EncodingError> {
        let Some((label, offset)) = magic_comment(raw) else {
            return Ok(SourceEncoding::Utf8);
        };
        SourceEncoding::from_label(&label).map_err(|kind| EncodingError {
            kind,
            line: first_line + offset,
            message: match kind {
                SyntaxErrorKind::NotAsciiCompatible => {
                    format!("{} is not ASCII compatible", label)
                }
                _ => format!("unknown encoding name: {}", label),
            },
        })
    }

    /// Turns raw source bytes into characters.
    pub(crate) fn decode(self, raw: &[u8], first_line: usize) -> Result<Vec<char>, EncodingError> {
        match self {
            SourceEncoding::Utf8 => {
                let raw = raw.strip_prefix(BOM).unwrap_or(raw);
                match std::str::from_utf8(raw) {
                    Ok(text) => Ok(text.chars().collect()),
                    Err(err) => Err(EncodingError {
                        kind: SyntaxErrorKind::InvalidMultibyteChar,
                        line: line_at(raw, err.valid_up_to(), first_line),
                        message: "invalid multibyte char (UTF-8)".to_string(),
                    }),
                }
            }
            SourceEncoding::UsAscii => match raw.iter().position(|b| !b.is_ascii()) {
                Some(index) => Err(EncodingError {
                    kind: SyntaxErrorKind::InvalidMultibyteChar,
                    line: line_at(raw, index, first_line),
                    message: "invalid multibyte char (US-ASCII)".to_string(),
                }),
                None => Ok(raw.iter().map(|&b| char::from(b)).collect()),
            },
            SourceEncoding::Binary => Ok(raw.iter().map(|&b| char::from(b)).collect()),
        }
    }
}

fn line_at(raw: &[u8], index: usize, first_line: usize) -> usize {
    first_line + raw[..index].iter().filter(|&&b| b == b'\n').count()
}

fn trim_start(bytes: &[u8]) -> &[u8] {
    let skip = bytes.iter().take_while(|b| matches!(b, b' ' | b'\t')).count();
    &bytes[skip..]
}

/// Finds a `coding: name` / `coding=name` magic comment on the first two
/// lines, returning the name and the zero-based line offset it was found on.
fn magic_comment(raw: &[u8]) -> Option<(String, usize)> {
    let raw = raw.strip_prefix(BOM).unwrap_or(raw);
    for (offset, line) in raw.split(|&b| b == b'\n').take(2).enumerate() {
        let trimmed = trim_start(line);
        if !trimmed.starts_with(b"#") {
            continue;
        }
        if let Some(label) = coding_label(trimmed) {
            return Some((label, offset));
        }
    }
    None
}

fn coding_label(line: &[u8]) -> Option<String> {
    let at = line
        .windows(6)
        .position(|w| w.eq_ignore_ascii_case(b"coding"))?;
    let rest = &line[at + 6..];
    let rest = match rest.first() {
        Some(b':') | Some(b'=') => &rest[1..],
        _ => return None,
    };
    let rest = trim_start(rest);
    let len = rest
        .iter()
        .take_while(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'))
        .count();
    if len == 0 {
        return None;
    }
    Some(String::from_utf8_lossy(&rest[..len]).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(b"# coding: utf-8\n", Some(("utf-8", 0)); "first line")]
    #[test_case(b"#!/usr/bin/env ruby\n# -*- coding: binary -*-\n", Some(("binary", 1)); "after shebang")]
    #[test_case(b"# encoding=US-ASCII\n", Some(("US-ASCII", 0)); "equals sign")]
    #[test_case(b"\n\n# coding: utf-8\n", None; "third line is ignored")]
    #[test_case(b"x = 1 # coding: utf-8\n", None; "not a comment line")]
    #[test_case(b"# coding utf-8\n", None; "missing separator")]
    fn finds_magic_comment(src: &[u8], expected: Option<(&str, usize)>) {
        let found = magic_comment(src);
        assert_eq!(
            found.as_ref().map(|(label, line)| (label.as_str(), *line)),
            expected
        );
    }

    #[test_case("UTF-8", Ok(SourceEncoding::Utf8))]
    #[test_case("ascii-8bit", Ok(SourceEncoding::Binary))]
    #[test_case("us-ascii", Ok(SourceEncoding::UsAscii))]
    #[test_case("UTF-16LE", Err(SyntaxErrorKind::NotAsciiCompatible))]
    #[test_case("utf-32", Err(SyntaxErrorKind::NotAsciiCompatible))]
    #[test_case("klingon", Err(SyntaxErrorKind::UnknownEncoding))]
    fn resolves_labels(label: &str, expected: Result<SourceEncoding, SyntaxErrorKind>) {
        assert_eq!(SourceEncoding::from_label(label), expected);
    }

    #[test]
    fn reports_line_of_bad_byte() {
        let err = SourceEncoding::Utf8
            .decode(b"a = 1\nb = \"\xff\"\n", 1)
            .unwrap_err();
        assert_eq!(err.kind, SyntaxErrorKind::InvalidMultibyteChar);
        assert_eq!(err.line, 2);

        let err = SourceEncoding::UsAscii
            .decode("x = 'é'".as_bytes(), 10)
            .unwrap_err();
        assert_eq!(err.line, 10);
    }

    #[test]
    fn binary_maps_bytes_to_chars() {
        let chars = SourceEncoding::Binary.decode(b"\xff\n", 1).unwrap();
        assert_eq!(chars, vec!['\u{ff}', '\n']);
    }

    #[test]
    fn utf8_bom_is_skipped() {
        let chars = SourceEncoding::Utf8.decode(b"\xEF\xBB\xBFnil", 1).unwrap();
        assert_eq!(chars.iter().collect::<String>(), "nil");
    }
}
