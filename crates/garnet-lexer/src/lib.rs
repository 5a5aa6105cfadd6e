//! Garnet lexer: converts source bytes into tokens.
//!
//! The scanner decodes the source according to its magic comment, then walks
//! the characters once, producing [`Token`]s with spans. Newlines are emitted
//! only where they can end a statement, so the grammar never sees a newline
//! after a binary operator, a comma or an opening bracket.

mod encoding;
mod number;
mod string;

use garnet_syntax::error::{Diagnostic, Result, SyntaxErrorKind};
use garnet_syntax::span::Span;
use garnet_syntax::token::{Token, TokenKind};
use log::{debug, trace};

pub use encoding::SourceEncoding;

/// Character scanner that produces tokens with positions.
pub struct Lexer {
    file: String,
    raw: Vec<u8>,
    first_line: usize,
    src: Vec<char>,
    pos: usize,
    line: usize,
    tokens: Vec<Token>,
}

impl Lexer {
    /// Create a lexer over `source`, numbering lines from 1.
    pub fn new(file: impl Into<String>, source: &[u8]) -> Self {
        Self::with_line(file, source, 1)
    }

    /// Create a lexer whose first source line is numbered `line`.
    pub fn with_line(file: impl Into<String>, source: &[u8], line: usize) -> Self {
        let line = line.max(1);
        Self {
            file: file.into(),
            raw: source.to_vec(),
            first_line: line,
            src: Vec::new(),
            pos: 0,
            line,
            tokens: Vec::new(),
        }
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    fn peek(&self) -> Option<char> {
        self.src.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.src.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.src.get(self.pos).copied();
        if let Some(c) = ch {
            self.pos += 1;
            if c == '\n' {
                self.line += 1;
            }
        }
        ch
    }

    /// Consumes `c` if it is next.
    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn starts_with(&self, text: &str) -> bool {
        text.chars()
            .enumerate()
            .all(|(i, c)| self.peek_at(i) == Some(c))
    }

    fn diagnostic(&self, kind: SyntaxErrorKind, line: usize, message: impl Into<String>) -> Diagnostic {
        let diag = Diagnostic::new(kind, self.file.clone(), line, message);
        debug!("scan failed: {} ({})", diag, kind);
        diag
    }

    fn fail<T>(&self, kind: SyntaxErrorKind, line: usize, message: impl Into<String>) -> Result<T> {
        Err(self.diagnostic(kind, line, message))
    }

    fn unsupported<T>(&self, line: usize, what: &str) -> Result<T> {
        self.fail(
            SyntaxErrorKind::GrammarError,
            line,
            format!("{} not supported", what),
        )
    }

    fn push(&mut self, kind: TokenKind, start: usize, line: usize) {
        self.tokens.push(Token::new(kind, Span::new(start, self.pos, line)));
    }

    fn last_kind(&self) -> Option<&TokenKind> {
        self.tokens.last().map(|tk| &tk.kind)
    }

    /// True at the start of an expression, where `-1`, `%w()`, `?a`, `::Foo`
    /// and `/` read as literals or prefixes rather than binary operators.
    fn expecting_operand(&self) -> bool {
        self.last_kind().map_or(true, TokenKind::expects_operand)
    }

    /// `puts -1`, `p %w(a)`, `p ?a`: a spaced prefix character glued to what
    /// follows after a bare identifier starts a command argument.
    fn at_command_arg(&self) -> bool {
        matches!(self.last_kind(), Some(TokenKind::Ident(_)))
            && self.pos > 0
            && self.src[self.pos - 1].is_whitespace()
            && self.peek_at(1).is_some_and(|c| !c.is_whitespace())
    }

    fn at_operand_start(&self) -> bool {
        self.expecting_operand() || self.at_command_arg()
    }

    /// `x %2` stays a modulo even after a bare identifier.
    fn at_percent_literal(&self) -> bool {
        self.expecting_operand()
            || (self.at_command_arg() && !self.peek_at(1).is_some_and(|c| c.is_ascii_digit()))
    }

    /// Whether the previous token was `def`, or `def recv.`: the next name is
    /// a method name, not a keyword.
    fn in_def_name(&self) -> bool {
        let n = self.tokens.len();
        match self.last_kind() {
            Some(TokenKind::Def) => true,
            Some(TokenKind::Dot) if n >= 3 => self.tokens[n - 3].kind == TokenKind::Def,
            _ => false,
        }
    }

    /// Tokenize the entire input into a vector of tokens ending with Eof.
    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        let encoding = SourceEncoding::detect(&self.raw, self.first_line)
            .and_then(|enc| {
                let chars = enc.decode(&self.raw, self.first_line)?;
                Ok((enc, chars))
            })
            .map_err(|err| self.diagnostic(err.kind, err.line, err.message));
        let (encoding, chars) = encoding?;
        trace!("{}: decoding {} bytes as {}", self.file, self.raw.len(), encoding.name());
        self.src = chars;
        self.pos = 0;
        self.line = self.first_line;
        self.tokens.clear();

        let mut at_line_start = true;
        loop {
            if at_line_start {
                at_line_start = false;
                if self.line_start()? {
                    break;
                }
            }
            let start = self.pos;
            let line = self.line;
            let Some(c) = self.peek() else { break };
            match c {
                ' ' | '\t' | '\r' | '\x0b' | '\x0c' => {
                    self.advance();
                }
                // ^D, ^Z and NUL end the program
                '\0' | '\x04' | '\x1a' => break,
                '\\' => {
                    self.advance();
                    if !self.eat('\n') && !(self.eat('\r') && self.eat('\n')) {
                        return self.fail(SyntaxErrorKind::GrammarError, line, "stray backslash");
                    }
                }
                '\n' => {
                    self.advance();
                    self.newline(start, line);
                    at_line_start = true;
                }
                '#' => self.skip_comment(),
                ';' => {
                    self.advance();
                    self.push(TokenKind::Semicolon, start, line);
                }
                ',' => self.single(TokenKind::Comma, start, line),
                '(' => self.single(TokenKind::LParen, start, line),
                ')' => self.single(TokenKind::RParen, start, line),
                '[' => self.single(TokenKind::LBracket, start, line),
                ']' => self.single(TokenKind::RBracket, start, line),
                '"' | '\'' | '`' => {
                    let kind = self.read_quoted(c)?;
                    self.push(kind, start, line);
                }
                '@' => {
                    let kind = self.read_instance_or_class_var()?;
                    self.push(kind, start, line);
                }
                '$' => {
                    let kind = self.read_global_var()?;
                    self.push(kind, start, line);
                }
                ':' => {
                    let kind = self.read_colon()?;
                    self.push(kind, start, line);
                }
                '?' => {
                    let kind = self.read_char_literal()?;
                    self.push(kind, start, line);
                }
                '%' if self.at_percent_literal() => {
                    let kind = self.read_percent_literal()?;
                    self.push(kind, start, line);
                }
                '.' => {
                    let kind = self.read_dot()?;
                    self.push(kind, start, line);
                }
                // `puts -1` passes a negative literal; `a +1` stays an addition
                '-' | '+'
                    if self.peek_at(1).is_some_and(|d| d.is_ascii_digit())
                        && (self.expecting_operand() || (c == '-' && self.at_command_arg())) =>
                {
                    self.advance();
                    let kind = self.read_number(c == '-')?;
                    self.push(kind, start, line);
                }
                '0'..='9' => {
                    let kind = self.read_number(false)?;
                    self.push(kind, start, line);
                }
                c if is_ident_start(c) => {
                    let kind = self.read_name();
                    self.push(kind, start, line);
                }
                '=' | '!' | '<' | '>' | '+' | '-' | '*' | '/' | '%' | '&' | '|' => {
                    let kind = self.read_operator(c)?;
                    self.push(kind, start, line);
                }
                '{' | '}' => return self.unsupported(line, "blocks and hash literals are"),
                '^' | '~' => {
                    return self.unsupported(line, &format!("the '{}' operator is", c));
                }
                c => {
                    return self.fail(
                        SyntaxErrorKind::CharacterBad,
                        line,
                        format!("invalid character '{}'", c.escape_default()),
                    );
                }
            }
        }

        let end = self.src.len().min(self.pos);
        if !matches!(self.last_kind(), None | Some(TokenKind::Newline)) {
            self.tokens
                .push(Token::new(TokenKind::Newline, Span::empty(end, self.line)));
        }
        self.tokens
            .push(Token::new(TokenKind::Eof, Span::empty(end, self.line)));
        trace!("{}: scanned {} tokens", self.file, self.tokens.len());
        Ok(std::mem::take(&mut self.tokens))
    }

    fn single(&mut self, kind: TokenKind, start: usize, line: usize) {
        self.advance();
        self.push(kind, start, line);
    }

    fn skip_comment(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
    }

    /// Handles `=begin`/`=end` blocks and `__END__` at the start of a line.
    /// Returns true when the rest of the input is not program text.
    fn line_start(&mut self) -> Result<bool> {
        loop {
            if self.starts_with("__END__") && self.ends_line_at(7) {
                return Ok(true);
            }
            if !(self.starts_with("=begin") && self.ends_word_at(6)) {
                return Ok(false);
            }
            let line = self.line;
            loop {
                self.skip_comment();
                if !self.eat('\n') {
                    return self.fail(
                        SyntaxErrorKind::GrammarError,
                        line,
                        "embedded document meets end of file",
                    );
                }
                if self.starts_with("=end") && self.ends_word_at(4) {
                    self.skip_comment();
                    if self.eat('\n') {
                        break;
                    }
                    return Ok(false);
                }
            }
        }
    }

    fn ends_line_at(&self, offset: usize) -> bool {
        match self.peek_at(offset) {
            None | Some('\n') => true,
            Some('\r') => matches!(self.peek_at(offset + 1), None | Some('\n')),
            _ => false,
        }
    }

    fn ends_word_at(&self, offset: usize) -> bool {
        self.peek_at(offset).map_or(true, char::is_whitespace)
    }

    /// Emits a statement-terminating newline unless the statement obviously
    /// continues, either because the last token needs a right-hand side or
    /// because the next line starts with `.foo` or `&.foo`.
    fn newline(&mut self, start: usize, line: usize) {
        let significant = match self.last_kind() {
            None => false,
            Some(kind) => !continues_line(kind),
        };
        if significant && !self.next_line_continues() {
            self.tokens
                .push(Token::new(TokenKind::Newline, Span::new(start, start + 1, line)));
        }
    }

    fn next_line_continues(&self) -> bool {
        let mut i = self.pos;
        while let Some(&c) = self.src.get(i) {
            if c.is_whitespace() {
                i += 1;
                continue;
            }
            let next = self.src.get(i + 1).copied();
            return match c {
                '.' => next != Some('.'),
                '&' => next == Some('.'),
                _ => false,
            };
        }
        false
    }

    fn read_dot(&mut self) -> Result<TokenKind> {
        let line = self.line;
        self.advance();
        match self.peek() {
            Some('.') => self.unsupported(line, "ranges are"),
            Some(d) if d.is_ascii_digit() && self.expecting_operand() => self.fail(
                SyntaxErrorKind::FloatMissingZero,
                line,
                "no .<digit> floating literal anymore; put 0 before dot",
            ),
            _ => Ok(TokenKind::Dot),
        }
    }

    fn read_operator(&mut self, c: char) -> Result<TokenKind> {
        let line = self.line;
        let operand_start = self.at_operand_start();
        self.advance();
        let kind = match c {
            '=' => match self.peek() {
                Some('=') if self.peek_at(1) == Some('=') => {
                    return self.unsupported(line, "the '===' operator is")
                }
                Some('=') => self.then(TokenKind::EqEq),
                Some('~') => return self.unsupported(line, "regular expressions are"),
                Some('>') => return self.unsupported(line, "hash literals are"),
                _ => TokenKind::Equal,
            },
            '!' => match self.peek() {
                Some('=') => self.then(TokenKind::NotEq),
                Some('~') => return self.unsupported(line, "regular expressions are"),
                _ => TokenKind::Bang,
            },
            '<' => match self.peek() {
                Some('=') if self.peek_at(1) == Some('>') => {
                    return self.unsupported(line, "the '<=>' operator is")
                }
                Some('=') => self.then(TokenKind::LessEq),
                Some('<') => return self.unsupported(line, "heredocs and shift operators are"),
                _ => TokenKind::Less,
            },
            '>' => match self.peek() {
                Some('=') => self.then(TokenKind::GreaterEq),
                Some('>') => return self.unsupported(line, "shift operators are"),
                _ => TokenKind::Greater,
            },
            '&' => match self.peek() {
                Some('&') => self.then(TokenKind::AndAnd),
                Some('.') => self.then(TokenKind::AndDot),
                _ => TokenKind::Amp,
            },
            '|' => match self.peek() {
                Some('|') => self.then(TokenKind::OrOr),
                _ => TokenKind::Pipe,
            },
            '*' => match self.peek() {
                Some('*') => self.then(TokenKind::Pow),
                _ => TokenKind::Star,
            },
            '-' if self.peek() == Some('>') => return self.unsupported(line, "lambda literals are"),
            '-' => TokenKind::Minus,
            '+' => TokenKind::Plus,
            '/' if operand_start => {
                return self.unsupported(line, "regular expressions are")
            }
            '/' => TokenKind::Slash,
            _ => TokenKind::Percent,
        };
        let compound = matches!(
            kind,
            TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::Star
                | TokenKind::Pow
                | TokenKind::Slash
                | TokenKind::Percent
                | TokenKind::Amp
                | TokenKind::Pipe
                | TokenKind::AndAnd
                | TokenKind::OrOr
        );
        if compound && self.peek() == Some('=') && self.peek_at(1) != Some('=') {
            return self.unsupported(line, "operator assignment is");
        }
        Ok(kind)
    }

    /// Consumes the second character of a two-character operator.
    fn then(&mut self, kind: TokenKind) -> TokenKind {
        self.advance();
        kind
    }

    fn read_colon(&mut self) -> Result<TokenKind> {
        let line = self.line;
        self.advance();
        match self.peek() {
            Some(':') => {
                self.advance();
                Ok(TokenKind::Colon2)
            }
            Some(q @ ('"' | '\'')) => match self.read_quoted(q)? {
                TokenKind::String(text) => Ok(TokenKind::Symbol(text)),
                _ => self.unsupported(line, "this symbol form is"),
            },
            Some(c) if is_ident_start(c) => Ok(TokenKind::Symbol(self.read_symbol_name())),
            Some('@') => match self.read_instance_or_class_var()? {
                TokenKind::IVar(name) | TokenKind::CVar(name) => Ok(TokenKind::Symbol(name)),
                _ => self.unsupported(line, "this symbol form is"),
            },
            Some('$') => match self.read_global_var()? {
                TokenKind::GVar(name) => Ok(TokenKind::Symbol(name)),
                _ => self.unsupported(line, "this symbol form is"),
            },
            _ => match self.read_operator_symbol() {
                Some(op) => Ok(TokenKind::Symbol(op.to_string())),
                None => self.unsupported(line, "the ternary operator and hash labels are"),
            },
        }
    }

    fn read_symbol_name(&mut self) -> String {
        let mut name = self.read_word();
        if matches!(self.peek(), Some('?' | '!')) && self.peek_at(1) != Some('=') {
            name.extend(self.advance());
        } else if self.peek() == Some('=') && !matches!(self.peek_at(1), Some('=' | '~' | '>')) {
            name.extend(self.advance());
        }
        name
    }

    fn read_operator_symbol(&mut self) -> Option<&'static str> {
        const OPERATORS: [&str; 27] = [
            "[]=", "[]", "<=>", "===", "==", "=~", "!=", "!~", "**", "+@", "-@", "<=", ">=",
            "<<", ">>", "+", "-", "*", "/", "%", "<", ">", "!", "&", "|", "^", "~",
        ];
        let op = OPERATORS.into_iter().find(|op| self.starts_with(op))?;
        for _ in 0..op.len() {
            self.advance();
        }
        Some(op)
    }

    /// Reads `[A-Za-z0-9_]` and non-ASCII characters.
    fn read_word(&mut self) -> String {
        let mut word = String::new();
        while let Some(c) = self.peek() {
            if !is_ident_char(c) {
                break;
            }
            word.push(c);
            self.advance();
        }
        word
    }

    fn read_name(&mut self) -> TokenKind {
        let mut name = self.read_word();
        let after_dot = matches!(self.last_kind(), Some(TokenKind::Dot | TokenKind::AndDot));
        let def_name = self.in_def_name();

        if matches!(self.peek(), Some('?' | '!'))
            && !matches!(self.peek_at(1), Some('=') | Some(':'))
        {
            name.extend(self.advance());
        } else if def_name
            && self.peek() == Some('=')
            && matches!(self.peek_at(1), Some('(') | Some(' ') | Some('\t'))
        {
            self.advance();
            name.push('=');
            return TokenKind::SetterName(name);
        }

        if !after_dot {
            if let Some(keyword) = TokenKind::keyword(&name) {
                // `def end` and friends name methods; `def self.x` keeps `self`
                if !def_name || keyword == TokenKind::SelfKw {
                    return keyword;
                }
            }
        }
        if name.starts_with(|c: char| c.is_ascii_uppercase()) {
            TokenKind::Constant(name)
        } else {
            TokenKind::Ident(name)
        }
    }

    fn read_instance_or_class_var(&mut self) -> Result<TokenKind> {
        let line = self.line;
        self.advance();
        let class_var = self.eat('@');
        let (sigil, noun, kind) = if class_var {
            ("@@", "a class", SyntaxErrorKind::CvarBadName)
        } else {
            ("@", "an instance", SyntaxErrorKind::IvarBadName)
        };
        match self.peek() {
            Some(c) if c.is_ascii_digit() => {
                return self.fail(
                    kind,
                    line,
                    format!("'{}{}' is not allowed as {} variable name", sigil, c, noun),
                );
            }
            Some(c) if is_ident_start(c) => {}
            _ => {
                return self.fail(
                    kind,
                    line,
                    format!("'{}' without identifiers is not allowed as {} variable name", sigil, noun),
                );
            }
        }
        let name = format!("{}{}", sigil, self.read_word());
        Ok(if class_var {
            TokenKind::CVar(name)
        } else {
            TokenKind::IVar(name)
        })
    }

    fn read_global_var(&mut self) -> Result<TokenKind> {
        let line = self.line;
        self.advance();
        let name = match self.peek() {
            Some(c) if is_ident_start(c) => self.read_word(),
            Some(c) if c.is_ascii_digit() => self.read_word(),
            Some('-') if self.peek_at(1).is_some_and(is_ident_char) => {
                self.advance();
                let mut name = String::from("-");
                name.extend(self.advance());
                name
            }
            Some(c) if "~*$?!@/\\;,.=:<>\"&`'+".contains(c) => {
                self.advance();
                c.to_string()
            }
            _ => {
                return self.fail(
                    SyntaxErrorKind::BadIdentifier,
                    line,
                    "'$' without identifiers is not allowed as a global variable name",
                );
            }
        };
        Ok(TokenKind::GVar(format!("${}", name)))
    }
}

/// Tokens after which a newline cannot end the statement.
fn continues_line(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Newline
            | TokenKind::Semicolon
            | TokenKind::Comma
            | TokenKind::LParen
            | TokenKind::LBracket
            | TokenKind::Dot
            | TokenKind::AndDot
            | TokenKind::Colon2
            | TokenKind::Equal
            | TokenKind::EqEq
            | TokenKind::NotEq
            | TokenKind::Less
            | TokenKind::LessEq
            | TokenKind::Greater
            | TokenKind::GreaterEq
            | TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Star
            | TokenKind::Pow
            | TokenKind::Slash
            | TokenKind::Percent
            | TokenKind::Amp
            | TokenKind::Pipe
            | TokenKind::AndAnd
            | TokenKind::OrOr
            | TokenKind::Bang
            | TokenKind::And
            | TokenKind::Or
            | TokenKind::Not
    )
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || !c.is_ascii()
}

/// Scans a complete UTF-8 source string named `file`.
pub fn tokenize(file: &str, source: &str) -> Result<Vec<Token>> {
    Lexer::new(file, source.as_bytes()).tokenize()
}
