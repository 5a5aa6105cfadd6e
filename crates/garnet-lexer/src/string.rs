//! String, symbol, word-list and character literals.

use garnet_syntax::error::{Result, SyntaxErrorKind};
use garnet_syntax::token::TokenKind;

use crate::{is_ident_char, is_ident_start, Lexer};

impl Lexer {
    /// Reads a quoted literal starting at its opening quote.
    pub(crate) fn read_quoted(&mut self, quote: char) -> Result<TokenKind> {
        let line = self.line;
        self.advance();
        match quote {
            '"' => Ok(TokenKind::String(self.read_escaped_body(None, '"', line)?)),
            '\'' => Ok(TokenKind::String(self.read_plain_body(None, '\'', line)?)),
            _ => self.unsupported(line, "command strings are"),
        }
    }

    /// Reads `%q(..)`, `%Q(..)`, `%(..)`, `%w(..)`, `%i(..)` and `%s(..)`.
    pub(crate) fn read_percent_literal(&mut self) -> Result<TokenKind> {
        let line = self.line;
        self.advance();
        let kind = match self.peek() {
            Some(c) if c.is_ascii_alphanumeric() => {
                if !"qQwWiIsrx".contains(c) {
                    return self.unknown_percent_type(line);
                }
                self.advance();
                Some(c)
            }
            _ => None,
        };
        let delim = match self.peek() {
            None => return self.unterminated(line),
            Some(d) if d.is_ascii_alphanumeric() => return self.unknown_percent_type(line),
            Some(d) if d.is_whitespace() => {
                return self.unsupported(line, "whitespace-delimited percent literals are")
            }
            Some(d) => d,
        };
        self.advance();
        let (open, close) = match delim {
            '(' => (Some('('), ')'),
            '[' => (Some('['), ']'),
            '{' => (Some('{'), '}'),
            '<' => (Some('<'), '>'),
            other => (None, other),
        };
        match kind {
            None | Some('Q') => Ok(TokenKind::String(self.read_escaped_body(open, close, line)?)),
            Some('q') => Ok(TokenKind::String(self.read_plain_body(open, close, line)?)),
            Some('s') => Ok(TokenKind::Symbol(self.read_plain_body(open, close, line)?)),
            Some('w') => Ok(TokenKind::Words(self.read_word_list(open, close, line)?)),
            Some('i') => Ok(TokenKind::Symbols(self.read_word_list(open, close, line)?)),
            Some('W' | 'I') => self.unsupported(line, "interpolated word lists are"),
            Some('r') => self.unsupported(line, "regular expressions are"),
            _ => self.unsupported(line, "command strings are"),
        }
    }

    /// Reads `?a` or `?\n`.
    pub(crate) fn read_char_literal(&mut self) -> Result<TokenKind> {
        let line = self.line;
        if !self.at_operand_start() {
            return self.unsupported(line, "the ternary operator is");
        }
        self.advance();
        match self.peek() {
            None => self.incomplete_char(line),
            Some(c) if c.is_whitespace() => self.incomplete_char(line),
            Some('\\') => {
                if self.peek_at(1).is_none() {
                    return self.incomplete_char(line);
                }
                self.advance();
                let mut text = String::new();
                self.read_escape(&mut text, line)?;
                if text.is_empty() {
                    return self.incomplete_char(line);
                }
                Ok(TokenKind::String(text))
            }
            Some(c) => {
                if is_ident_char(c) && self.peek_at(1).is_some_and(is_ident_char) {
                    return self.unsupported(line, "the ternary operator is");
                }
                self.advance();
                Ok(TokenKind::String(c.to_string()))
            }
        }
    }

    /// Body of a double-quoted literal: escapes are processed and
    /// interpolation is rejected. `open` enables bracket nesting.
    fn read_escaped_body(&mut self, open: Option<char>, close: char, line: usize) -> Result<String> {
        let mut text = String::new();
        let mut depth = 0usize;
        loop {
            let Some(c) = self.advance() else {
                return self.unterminated(line);
            };
            match c {
                '\\' => self.read_escape(&mut text, line)?,
                '#' if self.starts_interpolation() => {
                    return self.unsupported(self.line, "string interpolation is");
                }
                c if Some(c) == open => {
                    depth += 1;
                    text.push(c);
                }
                c if c == close => {
                    if depth == 0 {
                        return Ok(text);
                    }
                    depth -= 1;
                    text.push(c);
                }
                c => text.push(c),
            }
        }
    }

    /// Body of a single-quoted literal: only `\\` and escaped delimiters.
    fn read_plain_body(&mut self, open: Option<char>, close: char, line: usize) -> Result<String> {
        let mut text = String::new();
        let mut depth = 0usize;
        loop {
            let Some(c) = self.advance() else {
                return self.unterminated(line);
            };
            match c {
                '\\' => match self.advance() {
                    None => return self.unterminated(line),
                    Some(e) if e == '\\' || e == close || Some(e) == open => text.push(e),
                    Some(e) => {
                        text.push('\\');
                        text.push(e);
                    }
                },
                c if Some(c) == open => {
                    depth += 1;
                    text.push(c);
                }
                c if c == close => {
                    if depth == 0 {
                        return Ok(text);
                    }
                    depth -= 1;
                    text.push(c);
                }
                c => text.push(c),
            }
        }
    }

    fn read_word_list(&mut self, open: Option<char>, close: char, line: usize) -> Result<Vec<String>> {
        let mut words = Vec::new();
        let mut word = String::new();
        let mut depth = 0usize;
        loop {
            let Some(c) = self.advance() else {
                return self.unterminated(line);
            };
            match c {
                '\\' => match self.advance() {
                    None => return self.unterminated(line),
                    Some(e) if e.is_whitespace() || e == '\\' || e == close || Some(e) == open => {
                        word.push(e)
                    }
                    Some(e) => {
                        word.push('\\');
                        word.push(e);
                    }
                },
                c if c.is_whitespace() => {
                    if !word.is_empty() {
                        words.push(std::mem::take(&mut word));
                    }
                }
                c if Some(c) == open => {
                    depth += 1;
                    word.push(c);
                }
                c if c == close => {
                    if depth == 0 {
                        if !word.is_empty() {
                            words.push(word);
                        }
                        return Ok(words);
                    }
                    depth -= 1;
                    word.push(c);
                }
                c => word.push(c),
            }
        }
    }

    fn starts_interpolation(&self) -> bool {
        match self.peek() {
            Some('{') => true,
            Some('@') => match self.peek_at(1) {
                Some('@') => self.peek_at(2).is_some_and(is_ident_start),
                next => next.is_some_and(is_ident_start),
            },
            Some('$') => self.peek_at(1).is_some_and(is_ident_start),
            _ => false,
        }
    }

    /// Decodes the escape after a backslash into `text`.
    fn read_escape(&mut self, text: &mut String, line: usize) -> Result<()> {
        let Some(c) = self.advance() else {
            return self.unterminated(line);
        };
        match c {
            'n' => text.push('\n'),
            't' => text.push('\t'),
            'r' => text.push('\r'),
            's' => text.push(' '),
            'a' => text.push('\x07'),
            'b' => text.push('\x08'),
            'e' => text.push('\x1b'),
            'f' => text.push('\x0c'),
            'v' => text.push('\x0b'),
            // escaped newline joins the lines
            '\n' => {}
            '0'..='7' => {
                let mut value = c.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match self.peek().and_then(|d| d.to_digit(8)) {
                        Some(d) => {
                            value = value * 8 + d;
                            self.advance();
                        }
                        None => break,
                    }
                }
                text.push(char::from((value & 0xff) as u8));
            }
            'x' => {
                let value = self.read_hex(2);
                match value {
                    Some((value, _)) => text.push(char::from(value as u8)),
                    None => return self.invalid_escape("invalid hex escape"),
                }
            }
            'u' => self.read_unicode_escape(text)?,
            'c' => text.push(self.read_control(line)?),
            'C' => {
                if !self.eat('-') {
                    return self.invalid_escape("invalid control escape");
                }
                text.push(self.read_control(line)?);
            }
            'M' => {
                if !self.eat('-') {
                    return self.invalid_escape("invalid meta escape");
                }
                match self.advance() {
                    None => return self.unterminated(line),
                    Some(m) if m.is_ascii() && m != '\\' => text.push(char::from(m as u8 | 0x80)),
                    Some(_) => return self.invalid_escape("invalid meta escape"),
                }
            }
            other => text.push(other),
        }
        Ok(())
    }

    /// Up to `max` hex digits, returning the value and how many were read.
    fn read_hex(&mut self, max: usize) -> Option<(u32, usize)> {
        let mut value = 0u32;
        let mut count = 0;
        while count < max {
            let Some(d) = self.peek().and_then(|c| c.to_digit(16)) else {
                break;
            };
            value = value * 16 + d;
            count += 1;
            self.advance();
        }
        (count > 0).then_some((value, count))
    }

    fn read_unicode_escape(&mut self, text: &mut String) -> Result<()> {
        if !self.eat('{') {
            return match self.read_hex(4) {
                Some((value, 4)) => self.push_codepoint(text, value),
                _ => self.invalid_escape("invalid Unicode escape"),
            };
        }
        let mut any = false;
        loop {
            while matches!(self.peek(), Some(' ' | '\t')) {
                self.advance();
            }
            if self.eat('}') {
                break;
            }
            match self.read_hex(6) {
                Some((value, _)) => {
                    self.push_codepoint(text, value)?;
                    any = true;
                }
                None => return self.invalid_escape("unterminated Unicode escape"),
            }
        }
        if !any {
            return self.invalid_escape("invalid Unicode escape");
        }
        Ok(())
    }

    fn push_codepoint(&self, text: &mut String, value: u32) -> Result<()> {
        match char::from_u32(value) {
            Some(c) => {
                text.push(c);
                Ok(())
            }
            None => self.invalid_escape("invalid Unicode codepoint"),
        }
    }

    fn read_control(&mut self, line: usize) -> Result<char> {
        match self.advance() {
            None => self.unterminated(line),
            Some('?') => Ok('\x7f'),
            Some(c) if c.is_ascii() && c != '\\' => Ok(char::from(c as u8 & 0x9f)),
            Some(_) => self.invalid_escape("invalid control escape"),
        }
    }

    fn invalid_escape<T>(&self, message: &str) -> Result<T> {
        self.fail(SyntaxErrorKind::InvalidEscapeSyntax, self.line, message)
    }

    fn unterminated<T>(&self, line: usize) -> Result<T> {
        self.fail(
            SyntaxErrorKind::StringHitsEof,
            line,
            "unterminated string meets end of file",
        )
    }

    fn unknown_percent_type<T>(&self, line: usize) -> Result<T> {
        self.fail(SyntaxErrorKind::StringUnknownType, line, "unknown type of %string")
    }

    fn incomplete_char<T>(&self, line: usize) -> Result<T> {
        self.fail(
            SyntaxErrorKind::IncompleteCharSyntax,
            line,
            "incomplete character syntax",
        )
    }
}
