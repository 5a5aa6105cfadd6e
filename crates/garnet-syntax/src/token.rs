//! Token definitions shared by the Garnet scanner and grammar engine.
//!
//! Tokens are the smallest meaningful units of source text: names, literals,
//! keywords, operators and punctuation. Each [`Token`] pairs a [`TokenKind`]
//! with the [`Span`] it was read from.
//!
//! # Token Categories
//!
//! - **Names**: identifiers (`foo`, `empty?`), constants (`Foo`), instance,
//!   class and global variables (`@a`, `@@b`, `$c`)
//! - **Literals**: integers, floats, strings, symbols and word lists
//! - **Keywords**: reserved words such as `def`, `if`, `self`, `__FILE__`
//! - **Operators and punctuation**: `+`, `==`, `&.`, `::`, `(`, `,` ...
//! - **Layout**: statement-terminating newlines and the end-of-file marker
//!
//! # Examples
//!
//! ```rust
//! use garnet_syntax::{Span, Token, TokenKind};
//!
//! let tk = Token::new(TokenKind::Ident("puts".to_string()), Span::new(0, 4, 1));
//! assert_eq!(tk.kind.to_string(), "identifier 'puts'");
//! assert!(TokenKind::Def.is_keyword());
//! ```

use std::fmt;

use crate::span::Span;

/// Token types produced by the scanner.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // === Names ===
    /// Lower-case name, possibly ending in `?` or `!`
    Ident(String),
    /// Capitalized name
    Constant(String),
    /// `@name`, stored with its sigil
    IVar(String),
    /// `@@name`, stored with its sigil
    CVar(String),
    /// `$name`, stored with its sigil
    GVar(String),
    /// `name=` right after `def`, the name of a setter method
    SetterName(String),

    // === Literals ===
    Integer(i64),
    Float(f64),
    String(String),
    /// `:name` or `:"text"`, stored without the colon
    Symbol(String),
    /// `%w(...)`
    Words(Vec<String>),
    /// `%i(...)`
    Symbols(Vec<String>),

    // === Keywords ===
    Def,
    End,
    If,
    Elsif,
    Else,
    Unless,
    While,
    Until,
    Do,
    Then,
    Return,
    Yield,
    Class,
    Module,
    SelfKw,
    Nil,
    True,
    False,
    And,
    Or,
    Not,
    /// `__FILE__`
    FileKw,
    /// `__LINE__`
    LineKw,

    // === Punctuation ===
    Comma,
    Semicolon,
    LParen,
    RParen,
    LBracket,
    RBracket,
    /// `.`
    Dot,
    /// `&.`
    AndDot,
    /// `::`
    Colon2,

    // === Operators ===
    Equal,
    EqEq,
    NotEq,
    Less,
    LessEq,
    Greater,
    GreaterEq,
    Plus,
    Minus,
    Star,
    Pow,
    Slash,
    Percent,
    Amp,
    Pipe,
    AndAnd,
    OrOr,
    Bang,

    // === Layout ===
    /// Statement-terminating newline
    Newline,
    /// End-of-file marker
    Eof,
}

impl TokenKind {
    /// Maps a reserved word to its keyword token.
    pub fn keyword(word: &str) -> Option<TokenKind> {
        let kind = match word {
            "def" => TokenKind::Def,
            "end" => TokenKind::End,
            "if" => TokenKind::If,
            "elsif" => TokenKind::Elsif,
            "else" => TokenKind::Else,
            "unless" => TokenKind::Unless,
            "while" => TokenKind::While,
            "until" => TokenKind::Until,
            "do" => TokenKind::Do,
            "then" => TokenKind::Then,
            "return" => TokenKind::Return,
            "yield" => TokenKind::Yield,
            "class" => TokenKind::Class,
            "module" => TokenKind::Module,
            "self" => TokenKind::SelfKw,
            "nil" => TokenKind::Nil,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "and" => TokenKind::And,
            "or" => TokenKind::Or,
            "not" => TokenKind::Not,
            "__FILE__" => TokenKind::FileKw,
            "__LINE__" => TokenKind::LineKw,
            _ => return None,
        };
        Some(kind)
    }

    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::Def
                | TokenKind::End
                | TokenKind::If
                | TokenKind::Elsif
                | TokenKind::Else
                | TokenKind::Unless
                | TokenKind::While
                | TokenKind::Until
                | TokenKind::Do
                | TokenKind::Then
                | TokenKind::Return
                | TokenKind::Yield
                | TokenKind::Class
                | TokenKind::Module
                | TokenKind::SelfKw
                | TokenKind::Nil
                | TokenKind::True
                | TokenKind::False
                | TokenKind::And
                | TokenKind::Or
                | TokenKind::Not
                | TokenKind::FileKw
                | TokenKind::LineKw
        )
    }

    /// Whether a token of this kind leaves the scanner expecting an operand,
    /// which is when newlines are insignificant and `-1`, `%w()` or `?a` are
    /// read as literals rather than operators.
    pub fn expects_operand(&self) -> bool {
        match self {
            TokenKind::Ident(_)
            | TokenKind::Constant(_)
            | TokenKind::IVar(_)
            | TokenKind::CVar(_)
            | TokenKind::GVar(_)
            | TokenKind::SetterName(_)
            | TokenKind::Integer(_)
            | TokenKind::Float(_)
            | TokenKind::String(_)
            | TokenKind::Symbol(_)
            | TokenKind::Words(_)
            | TokenKind::Symbols(_)
            | TokenKind::End
            | TokenKind::SelfKw
            | TokenKind::Nil
            | TokenKind::True
            | TokenKind::False
            | TokenKind::FileKw
            | TokenKind::LineKw
            | TokenKind::RParen
            | TokenKind::RBracket => false,
            _ => true,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TokenKind::Ident(name) => return write!(f, "identifier '{}'", name),
            TokenKind::Constant(name) => return write!(f, "constant '{}'", name),
            TokenKind::IVar(name)
            | TokenKind::CVar(name)
            | TokenKind::GVar(name)
            | TokenKind::SetterName(name) => return write!(f, "'{}'", name),
            TokenKind::Integer(value) => return write!(f, "integer {}", value),
            TokenKind::Float(value) => return write!(f, "float {}", value),
            TokenKind::String(_) => "string literal",
            TokenKind::Symbol(name) => return write!(f, "symbol :{}", name),
            TokenKind::Words(_) | TokenKind::Symbols(_) => "word list",
            TokenKind::Def => "'def'",
            TokenKind::End => "'end'",
            TokenKind::If => "'if'",
            TokenKind::Elsif => "'elsif'",
            TokenKind::Else => "'else'",
            TokenKind::Unless => "'unless'",
            TokenKind::While => "'while'",
            TokenKind::Until => "'until'",
            TokenKind::Do => "'do'",
            TokenKind::Then => "'then'",
            TokenKind::Return => "'return'",
            TokenKind::Yield => "'yield'",
            TokenKind::Class => "'class'",
            TokenKind::Module => "'module'",
            TokenKind::SelfKw => "'self'",
            TokenKind::Nil => "'nil'",
            TokenKind::True => "'true'",
            TokenKind::False => "'false'",
            TokenKind::And => "'and'",
            TokenKind::Or => "'or'",
            TokenKind::Not => "'not'",
            TokenKind::FileKw => "'__FILE__'",
            TokenKind::LineKw => "'__LINE__'",
            TokenKind::Comma => "','",
            TokenKind::Semicolon => "';'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::Dot => "'.'",
            TokenKind::AndDot => "'&.'",
            TokenKind::Colon2 => "'::'",
            TokenKind::Equal => "'='",
            TokenKind::EqEq => "'=='",
            TokenKind::NotEq => "'!='",
            TokenKind::Less => "'<'",
            TokenKind::LessEq => "'<='",
            TokenKind::Greater => "'>'",
            TokenKind::GreaterEq => "'>='",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::Pow => "'**'",
            TokenKind::Slash => "'/'",
            TokenKind::Percent => "'%'",
            TokenKind::Amp => "'&'",
            TokenKind::Pipe => "'|'",
            TokenKind::AndAnd => "'&&'",
            TokenKind::OrOr => "'||'",
            TokenKind::Bang => "'!'",
            TokenKind::Newline => "newline",
            TokenKind::Eof => "end-of-input",
        };
        f.write_str(text)
    }
}

/// A token with the source span it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The type and semantic content of this token
    pub kind: TokenKind,

    /// Where the token was read from
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// 1-based line the token starts on.
    pub fn line(&self) -> usize {
        self.span.line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_round_trip_through_lookup() {
        for word in ["def", "end", "self", "nil", "__FILE__", "__LINE__", "yield"] {
            let kind = TokenKind::keyword(word).unwrap();
            assert!(kind.is_keyword(), "{word} should be a keyword");
        }
        assert_eq!(TokenKind::keyword("puts"), None);
    }

    #[test]
    fn operands_end_expressions() {
        assert!(!TokenKind::Integer(1).expects_operand());
        assert!(!TokenKind::RParen.expects_operand());
        assert!(!TokenKind::End.expects_operand());
        assert!(TokenKind::Plus.expects_operand());
        assert!(TokenKind::Comma.expects_operand());
        assert!(TokenKind::If.expects_operand());
        assert!(TokenKind::Newline.expects_operand());
    }
}
