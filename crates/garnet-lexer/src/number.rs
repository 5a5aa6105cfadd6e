//! Numeric literals.

use garnet_syntax::error::{Result, SyntaxErrorKind};
use garnet_syntax::token::TokenKind;

use crate::{is_ident_char, Lexer};

impl Lexer {
    /// Reads an integer or float literal. A leading sign, if any, has already
    /// been consumed and is passed as `negative`.
    pub(crate) fn read_number(&mut self, negative: bool) -> Result<TokenKind> {
        let line = self.line;
        if self.peek() == Some('0') {
            match self.peek_at(1) {
                Some('x' | 'X') => {
                    self.advance();
                    self.advance();
                    let digits = self.read_digits(|c| c.is_ascii_hexdigit())?;
                    if digits.is_empty() {
                        return self.fail(
                            SyntaxErrorKind::BadHexNumber,
                            line,
                            "numeric literal without digits",
                        );
                    }
                    return self.finish_integer(&digits, 16, negative, line);
                }
                Some('b' | 'B') => {
                    self.advance();
                    self.advance();
                    let digits = self.read_digits(|c| c == '0' || c == '1')?;
                    if digits.is_empty() {
                        return self.fail(
                            SyntaxErrorKind::EmptyBinaryNumber,
                            line,
                            "numeric literal without digits",
                        );
                    }
                    return self.finish_integer(&digits, 2, negative, line);
                }
                Some('d' | 'D') => {
                    self.advance();
                    self.advance();
                    let digits = self.read_digits(|c| c.is_ascii_digit())?;
                    if digits.is_empty() {
                        return self.fail(
                            SyntaxErrorKind::GrammarError,
                            line,
                            "numeric literal without digits",
                        );
                    }
                    return self.finish_integer(&digits, 10, negative, line);
                }
                Some('o' | 'O' | '_' | '0'..='9') => {
                    let prefixed = matches!(self.peek_at(1), Some('o' | 'O'));
                    if prefixed {
                        self.advance();
                        self.advance();
                    }
                    let digits = self.read_digits(|c| c.is_ascii_digit())?;
                    if digits.is_empty() {
                        return self.fail(
                            SyntaxErrorKind::GrammarError,
                            line,
                            "numeric literal without digits",
                        );
                    }
                    if digits.contains(|c: char| c == '8' || c == '9') {
                        return self.fail(SyntaxErrorKind::BadOctalDigit, line, "Invalid octal digit");
                    }
                    return self.finish_integer(&digits, 8, negative, line);
                }
                _ => {}
            }
        }

        let whole = self.read_digits(|c| c.is_ascii_digit())?;
        let mut fraction = None;
        let mut exponent = None;
        if self.peek() == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            fraction = Some(self.read_digits(|c| c.is_ascii_digit())?);
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            let signed = matches!(self.peek_at(1), Some('+' | '-'));
            let first = if signed { self.peek_at(2) } else { self.peek_at(1) };
            if first.is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
                let sign = if signed { self.advance() } else { None };
                let digits = self.read_digits(|c| c.is_ascii_digit())?;
                exponent = Some(format!("{}{}", sign.map(String::from).unwrap_or_default(), digits));
            }
        }
        self.check_number_end(line)?;

        if fraction.is_none() && exponent.is_none() {
            return self.finish_integer(&whole, 10, negative, line);
        }
        let mut text = String::new();
        if negative {
            text.push('-');
        }
        text.push_str(&whole);
        if let Some(fraction) = fraction {
            text.push('.');
            text.push_str(&fraction);
        }
        if let Some(exponent) = exponent {
            text.push('e');
            text.push_str(&exponent);
        }
        match text.parse::<f64>() {
            Ok(value) => Ok(TokenKind::Float(value)),
            Err(_) => self.fail(
                SyntaxErrorKind::GrammarError,
                line,
                format!("malformed float literal '{}'", text),
            ),
        }
    }

    /// Reads digits accepted by `valid`, allowing single underscores between
    /// them. The underscores are dropped.
    fn read_digits(&mut self, valid: impl Fn(char) -> bool) -> Result<String> {
        let line = self.line;
        let mut digits = String::new();
        let mut after_underscore = false;
        while let Some(c) = self.peek() {
            if valid(c) {
                digits.push(c);
                after_underscore = false;
            } else if c == '_' {
                if after_underscore || digits.is_empty() {
                    return self.trailing_underscore(line);
                }
                after_underscore = true;
            } else {
                break;
            }
            self.advance();
        }
        if after_underscore {
            return self.trailing_underscore(line);
        }
        Ok(digits)
    }

    fn trailing_underscore<T>(&self, line: usize) -> Result<T> {
        self.fail(
            SyntaxErrorKind::TrailingUnderscoreInNumber,
            line,
            "trailing '_' in number",
        )
    }

    fn finish_integer(&mut self, digits: &str, radix: u32, negative: bool, line: usize) -> Result<TokenKind> {
        self.check_number_end(line)?;
        let text = if negative {
            format!("-{}", digits)
        } else {
            digits.to_string()
        };
        match i64::from_str_radix(&text, radix) {
            Ok(value) => Ok(TokenKind::Integer(value)),
            Err(_) => self.fail(
                SyntaxErrorKind::GrammarError,
                line,
                format!("integer literal {} does not fit in 64 bits", text),
            ),
        }
    }

    /// A number must not run straight into a name.
    fn check_number_end(&self, line: usize) -> Result<()> {
        match self.peek() {
            Some('r' | 'i') if !self.peek_at(1).is_some_and(is_ident_char) => {
                self.unsupported(line, "rational and imaginary literals are")
            }
            Some(c) if is_ident_char(c) => self.fail(
                SyntaxErrorKind::GrammarError,
                line,
                format!("unexpected '{}' after numeric literal", c),
            ),
            _ => Ok(()),
        }
    }
}
