//! Recursive-descent grammar engine.
//!
//! The parser consumes the scanner's token vector and builds a [`Node`] tree
//! rooted at a `Root` node. It stops at the first problem and reports it as a
//! [`Diagnostic`]; no partial tree is ever returned.
//!
//! Precedence, loosest first:
//!
//! | level            | operators                          |
//! |------------------|------------------------------------|
//! | statement        | `if` `unless` `while` `until` (modifiers) |
//! | expression       | `and` `or`                         |
//! | negation         | `not`                              |
//! | assignment       | `=` (right-associative), `a, b =`  |
//! | logical          | `\|\|`, then `&&`                  |
//! | equality         | `==` `!=`                          |
//! | comparison       | `<` `<=` `>` `>=`                  |
//! | bitwise          | `\|`, then `&`                     |
//! | additive         | `+` `-`                            |
//! | multiplicative   | `*` `/` `%`                        |
//! | unary            | `-` `+` `!`                        |
//! | power            | `**` (right-associative)           |
//! | postfix          | `.name` `&.name` `::Name` `[index]` |
//!
//! Binary operators other than `&&`/`||` become method calls: `a + b` is
//! `Call(a, "+", [b])`.

use std::collections::HashSet;

use garnet_syntax::ast::*;
use garnet_syntax::error::{Diagnostic, Result, SyntaxErrorKind};
use garnet_syntax::span::Span;
use garnet_syntax::token::{Token, TokenKind};
use garnet_syntax::walk;
use log::{debug, trace};

use crate::config::DEFAULT_MAX_DEPTH;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScopeKind {
    Top,
    Def,
    Class,
    Module,
}

/// Local variables visible in one `def`, `class` or `module` body.
#[derive(Debug)]
struct Scope {
    kind: ScopeKind,
    locals: HashSet<String>,
}

impl Scope {
    fn new(kind: ScopeKind) -> Self {
        Self {
            kind,
            locals: HashSet::new(),
        }
    }
}

/// The storage an assignment writes to, resolved from its left-hand side.
enum Target {
    Local(Span, String),
    Inst(Span, String),
    Global(Span, String),
    ClassVar(Span, String),
    /// A plain constant name, or a `Foo::BAR` / `::BAR` path.
    Const(Span, Option<String>, Option<Node>),
    /// `recv.name` (no index) or `recv[index]`.
    Attr(PendingAttrAssign, Option<ListNode>),
}

#[derive(Default)]
struct Params {
    required: Vec<String>,
    optional: Vec<Node>,
    rest: Option<String>,
}

pub struct Parser {
    file: String,
    tokens: Vec<Token>,
    pos: usize,
    scopes: Vec<Scope>,
    /// Greater than zero inside argument lists and array literals, where a
    /// comma separates items instead of starting a multiple assignment.
    arg_depth: usize,
    depth: usize,
    max_depth: usize,
}

impl Parser {
    /// Creates a parser over `tokens`. An `Eof` token is appended when the
    /// vector does not already end with one.
    pub fn new(file: impl Into<String>, mut tokens: Vec<Token>) -> Self {
        if !matches!(tokens.last(), Some(tk) if tk.kind == TokenKind::Eof) {
            let span = tokens
                .last()
                .map_or(Span::empty(0, 1), |tk| Span::empty(tk.span.end, tk.span.line));
            tokens.push(Token::new(TokenKind::Eof, span));
        }
        Self {
            file: file.into(),
            tokens,
            pos: 0,
            scopes: vec![Scope::new(ScopeKind::Top)],
            arg_depth: 0,
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Parses the whole token stream into a `Root` node.
    pub fn parse_program(&mut self) -> Result<Node> {
        let start = self.peek().span;
        let body = self.parse_statements(&[])?;
        if !self.check(&TokenKind::Eof) {
            return self.unexpected("end-of-input");
        }
        let root: Node = RootNode::new(start.to(self.peek().span), self.file.clone(), body).into();
        trace!("{}: parsed {} nodes", self.file, walk::count(&root));
        Ok(root)
    }

    /// Parses a single statement that must make up the whole input.
    pub fn parse_expr(&mut self) -> Result<Node> {
        self.skip_terms();
        let node = self.parse_statement()?;
        self.skip_terms();
        if !self.check(&TokenKind::Eof) {
            return self.unexpected("end-of-input");
        }
        Ok(node)
    }

    // === Token cursor ===

    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn kind(&self) -> &TokenKind {
        &self.peek().kind
    }

    fn kind_at(&self, offset: usize) -> &TokenKind {
        self.tokens
            .get(self.pos + offset)
            .map_or(&TokenKind::Eof, |tk| &tk.kind)
    }

    /// Consumes the current token. The cursor never moves past `Eof`.
    fn advance(&mut self) -> Token {
        let token = self.tokens[self.pos].clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn check(&self, kind: &TokenKind) -> bool {
        self.kind() == kind
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind, expecting: &str) -> Result<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            self.unexpected(expecting)
        }
    }

    fn line(&self) -> usize {
        self.peek().line()
    }

    fn prev_span(&self) -> Span {
        self.tokens[self.pos.saturating_sub(1)].span
    }

    fn span_from(&self, start: Span) -> Span {
        start.to(self.prev_span())
    }

    /// No whitespace between the previous token and the current one.
    fn adjacent(&self) -> bool {
        self.pos > 0 && self.tokens[self.pos - 1].span.end == self.peek().span.start
    }

    /// No whitespace between the current token and the next one.
    fn glued_to_next(&self) -> bool {
        self.tokens
            .get(self.pos + 1)
            .is_some_and(|next| next.span.start == self.peek().span.end)
    }

    fn at_term(&self) -> bool {
        matches!(self.kind(), TokenKind::Newline | TokenKind::Semicolon)
    }

    fn skip_terms(&mut self) {
        while self.at_term() {
            self.advance();
        }
    }

    fn skip_newlines(&mut self) {
        while self.check(&TokenKind::Newline) {
            self.advance();
        }
    }

    // === Diagnostics ===

    fn error<T>(&self, kind: SyntaxErrorKind, line: usize, message: impl Into<String>) -> Result<T> {
        let diag = Diagnostic::new(kind, self.file.clone(), line, message);
        debug!("parse failed: {} ({})", diag, kind);
        Err(diag)
    }

    fn unexpected<T>(&self, expecting: &str) -> Result<T> {
        self.error(
            SyntaxErrorKind::GrammarError,
            self.line(),
            format!("syntax error, unexpected {}, expecting {}", self.kind(), expecting),
        )
    }

    fn unexpected_token<T>(&self) -> Result<T> {
        self.error(
            SyntaxErrorKind::GrammarError,
            self.line(),
            format!("syntax error, unexpected {}", self.kind()),
        )
    }

    /// `x = return` and friends: a jump used where a value is needed.
    fn check_value(&self, node: &Node) -> Result<()> {
        match node {
            Node::Return(_) => self.error(
                SyntaxErrorKind::VoidValueExpression,
                node.span().line,
                "void value expression",
            ),
            _ => Ok(()),
        }
    }

    // === Scopes and nesting ===

    fn scope_kind(&self) -> ScopeKind {
        self.scopes.last().map_or(ScopeKind::Top, |scope| scope.kind)
    }

    fn in_def(&self) -> bool {
        self.scope_kind() == ScopeKind::Def
    }

    fn is_local(&self, name: &str) -> bool {
        self.scopes
            .last()
            .is_some_and(|scope| scope.locals.contains(name))
    }

    fn declare(&mut self, name: &str) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.locals.insert(name.to_string());
        }
    }

    fn in_scope<T>(&mut self, kind: ScopeKind, parse: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.scopes.push(Scope::new(kind));
        let result = parse(self);
        self.scopes.pop();
        result
    }

    /// Runs `parse` with commas separating list items.
    fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.arg_depth += 1;
        let result = parse(self);
        self.arg_depth -= 1;
        result
    }

    /// Takes one nesting level, failing past the limit.
    fn enter(&mut self) -> Result<()> {
        if self.depth >= self.max_depth {
            return self.error(
                SyntaxErrorKind::GrammarError,
                self.line(),
                format!("nesting deeper than {} levels", self.max_depth),
            );
        }
        self.depth += 1;
        Ok(())
    }

    /// Runs `parse` one nesting level deeper.
    fn descend<T>(&mut self, parse: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.enter()?;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    /// Runs a loop that wraps its node once per iteration. Each wrap calls
    /// `enter`, and the levels are given back when the loop is done, so long
    /// chains like `a + b + c` or `a.b.c` count towards the limit too.
    fn chain<T>(&mut self, parse: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let saved = self.depth;
        let result = parse(self);
        self.depth = saved;
        result
    }

    // === Statements ===

    /// Statements up to `Eof` or one of `terminators`, which is left
    /// unconsumed. No statements is `None`, one is the statement itself and
    /// more are wrapped in a `Block`.
    fn parse_statements(&mut self, terminators: &[TokenKind]) -> Result<Option<Node>> {
        let saved = std::mem::replace(&mut self.arg_depth, 0);
        let mut statements = Vec::new();
        loop {
            self.skip_terms();
            if self.at_end_of(terminators) {
                break;
            }
            statements.push(self.parse_statement()?);
            if !self.at_term() && !self.at_end_of(terminators) {
                return self.unexpected(&expecting_after_statement(terminators));
            }
        }
        self.arg_depth = saved;

        Ok(match statements.len() {
            0 => None,
            1 => statements.pop(),
            _ => {
                let span = statements[0].span().to(statements[statements.len() - 1].span());
                Some(BlockNode::new(span, statements).into())
            }
        })
    }

    fn at_end_of(&self, terminators: &[TokenKind]) -> bool {
        self.check(&TokenKind::Eof) || terminators.contains(self.kind())
    }

    /// An expression followed by any number of modifiers: `a if b`,
    /// `a unless b`, `a while b`, `a until b`.
    fn parse_statement(&mut self) -> Result<Node> {
        self.chain(|p| {
            let mut node = p.parse_expr_value()?;
            loop {
                if !matches!(
                    p.kind(),
                    TokenKind::If | TokenKind::Unless | TokenKind::While | TokenKind::Until
                ) {
                    return Ok(node);
                }
                p.enter()?;
                let modifier = p.advance().kind;
                let condition = p.parse_condition()?;
                let span = node.span().to(condition.span());
                node = match modifier {
                    TokenKind::If => IfNode::new(span, condition, Some(node), None).into(),
                    TokenKind::Unless => IfNode::new(span, condition, None, Some(node)).into(),
                    TokenKind::While => WhileNode::new(span, condition, Some(node)).into(),
                    _ => UntilNode::new(span, condition, Some(node)).into(),
                };
            }
        })
    }

    fn parse_condition(&mut self) -> Result<Node> {
        let line = self.line();
        let condition = self.parse_expr_value()?;
        if condition.is(NodeType::MultipleAsgn) {
            return self.error(
                SyntaxErrorKind::MultipleAssignmentInConditional,
                line,
                "multiple assignment in conditional",
            );
        }
        self.check_value(&condition)?;
        Ok(condition)
    }

    /// `a and b`, `a or b`, left-associative at equal precedence.
    fn parse_expr_value(&mut self) -> Result<Node> {
        self.chain(|p| {
            let mut left = p.parse_not()?;
            loop {
                let and = match p.kind() {
                    TokenKind::And => true,
                    TokenKind::Or => false,
                    _ => return Ok(left),
                };
                p.enter()?;
                p.advance();
                let right = p.parse_not()?;
                let span = left.span().to(right.span());
                left = if and {
                    AndNode::new(span, left, right).into()
                } else {
                    OrNode::new(span, left, right).into()
                };
            }
        })
    }

    fn parse_not(&mut self) -> Result<Node> {
        if !self.check(&TokenKind::Not) {
            return self.parse_arg();
        }
        let start = self.advance().span;
        let value = self.descend(Self::parse_not)?;
        Ok(NotNode::new(start.to(value.span()), value).into())
    }

    // === Assignment ===

    fn parse_arg(&mut self) -> Result<Node> {
        self.descend(Self::parse_assignment)
    }

    fn parse_assignment(&mut self) -> Result<Node> {
        let start = self.pos;
        let left = self.parse_oror()?;
        match self.kind() {
            TokenKind::Equal => {
                let target = self.assignment_target(start, left)?;
                self.advance();
                let value = self.parse_rhs()?;
                self.assign(target, value)
            }
            TokenKind::Comma if self.arg_depth == 0 => self.parse_masgn(start, left),
            _ => Ok(left),
        }
    }

    /// Right-hand side of `=`. At statement level `a = 1, 2` assigns an
    /// array.
    fn parse_rhs(&mut self) -> Result<Node> {
        if self.arg_depth == 0 {
            return self.parse_values();
        }
        let value = self.parse_arg()?;
        self.check_value(&value)?;
        Ok(value)
    }

    /// One value, or several separated by commas collected into an `Array`.
    fn parse_values(&mut self) -> Result<Node> {
        let first = self.nested(Self::parse_arg)?;
        self.check_value(&first)?;
        if !self.check(&TokenKind::Comma) {
            return Ok(first);
        }
        let mut items = vec![first];
        while self.eat(&TokenKind::Comma) {
            let item = self.nested(Self::parse_arg)?;
            self.check_value(&item)?;
            items.push(item);
        }
        let span = items[0].span().to(items[items.len() - 1].span());
        Ok(ArrayNode::new(span, items).into())
    }

    /// Resolves what the expression parsed from token `start` assigns to.
    /// Locals are declared here, before the value is parsed.
    fn assignment_target(&mut self, start: usize, node: Node) -> Result<Target> {
        let line = self.tokens[start].line();
        if self.pos == start + 1 {
            if let Some(message) = keyword_assignment(&self.tokens[start].kind) {
                return self.error(SyntaxErrorKind::InvalidAssignment, line, message);
            }
        }
        match node {
            Node::VCall(call) if is_local_name(call.name()) => {
                let name = call.name().to_string();
                self.declare(&name);
                Ok(Target::Local(call.span(), name))
            }
            Node::LocalVar(var) => Ok(Target::Local(var.span(), var.name().to_string())),
            Node::InstVar(var) => Ok(Target::Inst(var.span(), var.name().to_string())),
            Node::GlobalVar(var) => Ok(Target::Global(var.span(), var.name().to_string())),
            Node::ClassVar(var) => Ok(Target::ClassVar(var.span(), var.name().to_string())),
            Node::Const(_) | Node::Colon2(_) | Node::Colon3(_) if self.in_def() => self.error(
                SyntaxErrorKind::InvalidAssignment,
                line,
                "dynamic constant assignment",
            ),
            Node::Const(constant) => Ok(Target::Const(
                constant.span(),
                Some(constant.name().to_string()),
                None,
            )),
            Node::Colon2(_) | Node::Colon3(_) => Ok(Target::Const(node.span(), None, Some(node))),
            Node::Call(call) => {
                let (span, receiver, name, args, lazy) = call.into_parts();
                if name == "[]" {
                    let index = match args {
                        Some(Node::List(list)) => Some(list),
                        _ => None,
                    };
                    let pending = AttrAssignNode::builder(span, receiver, "[]=", lazy);
                    Ok(Target::Attr(pending, index))
                } else if args.is_none() && is_attr_name(&name) {
                    let pending = AttrAssignNode::builder(span, receiver, format!("{}=", name), lazy);
                    Ok(Target::Attr(pending, None))
                } else {
                    self.error(
                        SyntaxErrorKind::GrammarError,
                        line,
                        format!("syntax error, cannot assign to method call '{}'", name),
                    )
                }
            }
            _ => self.unexpected_token(),
        }
    }

    fn assign(&self, target: Target, value: Node) -> Result<Node> {
        let value_span = value.span();
        let node: Node = match target {
            Target::Local(span, name) => LocalAsgnNode::new(span.to(value_span), name, value).into(),
            Target::Inst(span, name) => InstAsgnNode::new(span.to(value_span), name, value).into(),
            Target::Global(span, name) => GlobalAsgnNode::new(span.to(value_span), name, value).into(),
            Target::ClassVar(span, name) => {
                ClassVarAsgnNode::new(span.to(value_span), name, value).into()
            }
            Target::Const(span, name, path) => {
                ConstDeclNode::new(span.to(value_span), name, path, value)
                    .map_err(|err| {
                        Diagnostic::new(SyntaxErrorKind::GrammarError, self.file.clone(), span.line, err.to_string())
                    })?
                    .into()
            }
            Target::Attr(pending, index) => {
                let mut items = index.map(ListNode::into_items).unwrap_or_default();
                let list_start = items.first().map_or(value_span, Node::span);
                items.push(value);
                pending
                    .with_args(ListNode::new(list_start.to(value_span), items))
                    .into()
            }
        };
        Ok(node)
    }

    /// `a, b.c, d[0] = 1, 2, 3`. `first` is the already parsed first target.
    fn parse_masgn(&mut self, start: usize, first: Node) -> Result<Node> {
        let start_span = first.span();
        let mut targets = vec![self.masgn_target(start, first)?];
        while self.eat(&TokenKind::Comma) {
            // `a, = list`
            if self.check(&TokenKind::Equal) {
                break;
            }
            let item_start = self.pos;
            let item = self.parse_postfix()?;
            targets.push(self.masgn_target(item_start, item)?);
        }
        self.expect(&TokenKind::Equal, "'='")?;
        let value = self.parse_values()?;
        let span = start_span.to(value.span());
        Ok(MultipleAsgnNode::new(span, targets, value).into())
    }

    /// Multiple-assignment targets are the nodes that would read the target
    /// back; attribute targets get no arguments since the value arrives at
    /// run time.
    fn masgn_target(&mut self, start: usize, node: Node) -> Result<Node> {
        Ok(match self.assignment_target(start, node)? {
            Target::Local(span, name) => LocalVarNode::new(span, name).into(),
            Target::Inst(span, name) => InstVarNode::new(span, name).into(),
            Target::Global(span, name) => GlobalVarNode::new(span, name).into(),
            Target::ClassVar(span, name) => ClassVarNode::new(span, name).into(),
            Target::Const(_, _, Some(path)) => path,
            Target::Const(span, name, None) => ConstNode::new(span, name.unwrap_or_default()).into(),
            Target::Attr(pending, Some(index)) => pending.with_args(index).into(),
            Target::Attr(pending, None) => pending.without_args().into(),
        })
    }

    // === Operators ===

    fn parse_oror(&mut self) -> Result<Node> {
        self.chain(|p| {
            let mut left = p.parse_andand()?;
            while p.eat(&TokenKind::OrOr) {
                p.enter()?;
                let right = p.parse_andand()?;
                left = OrNode::new(left.span().to(right.span()), left, right).into();
            }
            Ok(left)
        })
    }

    fn parse_andand(&mut self) -> Result<Node> {
        self.chain(|p| {
            let mut left = p.parse_equality()?;
            while p.eat(&TokenKind::AndAnd) {
                p.enter()?;
                let right = p.parse_equality()?;
                left = AndNode::new(left.span().to(right.span()), left, right).into();
            }
            Ok(left)
        })
    }

    fn parse_binary(
        &mut self,
        operand: fn(&mut Self) -> Result<Node>,
        operator: fn(&TokenKind) -> Option<&'static str>,
    ) -> Result<Node> {
        self.chain(|p| {
            let mut left = operand(p)?;
            while let Some(name) = operator(p.kind()) {
                p.enter()?;
                p.advance();
                let right = operand(p)?;
                left = binary_call(left, name, right);
            }
            Ok(left)
        })
    }

    fn parse_equality(&mut self) -> Result<Node> {
        self.parse_binary(Self::parse_comparison, |kind| match kind {
            TokenKind::EqEq => Some("=="),
            TokenKind::NotEq => Some("!="),
            _ => None,
        })
    }

    fn parse_comparison(&mut self) -> Result<Node> {
        self.parse_binary(Self::parse_bit_or, |kind| match kind {
            TokenKind::Less => Some("<"),
            TokenKind::LessEq => Some("<="),
            TokenKind::Greater => Some(">"),
            TokenKind::GreaterEq => Some(">="),
            _ => None,
        })
    }

    fn parse_bit_or(&mut self) -> Result<Node> {
        self.parse_binary(Self::parse_bit_and, |kind| match kind {
            TokenKind::Pipe => Some("|"),
            _ => None,
        })
    }

    fn parse_bit_and(&mut self) -> Result<Node> {
        self.parse_binary(Self::parse_additive, |kind| match kind {
            TokenKind::Amp => Some("&"),
            _ => None,
        })
    }

    fn parse_additive(&mut self) -> Result<Node> {
        self.chain(|p| {
            let mut left = p.parse_multiplicative()?;
            loop {
                let name = match p.kind() {
                    TokenKind::Plus => "+",
                    TokenKind::Minus => "-",
                    _ => "",
                };
                if !name.is_empty() {
                    p.advance();
                } else if !p.split_negative_literal() {
                    return Ok(left);
                }
                p.enter()?;
                let right = p.parse_multiplicative()?;
                // `a -1` after a local reads as a subtraction
                left = binary_call(left, if name.is_empty() { "-" } else { name }, right);
            }
        })
    }

    /// Turns a negative literal in operator position into its positive
    /// counterpart, leaving the cursor on it. The sign becomes the operator.
    fn split_negative_literal(&mut self) -> bool {
        let token = &mut self.tokens[self.pos];
        let positive = match token.kind {
            TokenKind::Integer(value) if value < 0 => match value.checked_neg() {
                Some(value) => TokenKind::Integer(value),
                None => return false,
            },
            TokenKind::Float(value) if value.is_sign_negative() => TokenKind::Float(-value),
            _ => return false,
        };
        token.kind = positive;
        token.span.start += 1;
        true
    }

    fn parse_multiplicative(&mut self) -> Result<Node> {
        self.parse_binary(Self::parse_unary, |kind| match kind {
            TokenKind::Star => Some("*"),
            TokenKind::Slash => Some("/"),
            TokenKind::Percent => Some("%"),
            _ => None,
        })
    }

    fn parse_unary(&mut self) -> Result<Node> {
        self.descend(Self::parse_unary_operand)
    }

    fn parse_unary_operand(&mut self) -> Result<Node> {
        let start = self.peek().span;
        match self.kind() {
            TokenKind::Minus | TokenKind::Plus => {
                let negate = self.advance().kind == TokenKind::Minus;
                let operand = self.parse_unary()?;
                // `+1` is just the literal
                if !negate && matches!(operand, Node::Fixnum(_) | Node::Float(_)) {
                    return Ok(operand);
                }
                let name = if negate { "-@" } else { "+@" };
                Ok(CallNode::new(start.to(operand.span()), operand, name, None, false).into())
            }
            TokenKind::Bang => {
                self.advance();
                let operand = self.parse_unary()?;
                Ok(NotNode::new(start.to(operand.span()), operand).into())
            }
            _ => self.parse_pow(),
        }
    }

    fn parse_pow(&mut self) -> Result<Node> {
        let start = self.pos;
        let base = self.parse_postfix()?;
        let single_token = self.pos == start + 1;
        if !self.eat(&TokenKind::Pow) {
            return Ok(base);
        }
        let exponent = self.parse_unary()?;
        // `-2 ** 2` is `-(2 ** 2)`
        if single_token {
            if let Some(positive) = positive_literal(&self.tokens[start], &base) {
                let span = base.span().to(exponent.span());
                let power = binary_call(positive, "**", exponent);
                return Ok(CallNode::new(span, power, "-@", None, false).into());
            }
        }
        Ok(binary_call(base, "**", exponent))
    }

    // === Postfix ===

    fn parse_postfix(&mut self) -> Result<Node> {
        self.chain(Self::parse_postfix_chain)
    }

    fn parse_postfix_chain(&mut self) -> Result<Node> {
        let mut node = self.parse_primary()?;
        loop {
            if matches!(
                self.kind(),
                TokenKind::Dot | TokenKind::AndDot | TokenKind::Colon2 | TokenKind::LBracket
            ) {
                self.enter()?;
            }
            match self.kind() {
                TokenKind::Dot | TokenKind::AndDot => {
                    let lazy = self.advance().kind == TokenKind::AndDot;
                    let name = self.parse_call_name()?;
                    let args = self.parse_call_args()?;
                    let span = node.span().to(self.prev_span());
                    node = CallNode::new(span, node, name, args, lazy).into();
                }
                TokenKind::Colon2 => {
                    self.advance();
                    node = match self.kind() {
                        TokenKind::Constant(name) => {
                            let name = name.clone();
                            self.advance();
                            if self.check(&TokenKind::LParen) && self.adjacent() {
                                let args = self.parse_paren_args()?;
                                let span = node.span().to(self.prev_span());
                                CallNode::new(span, node, name, args, false).into()
                            } else {
                                let span = node.span().to(self.prev_span());
                                Colon2Node::new(span, node, name).into()
                            }
                        }
                        TokenKind::Ident(name) => {
                            let name = name.clone();
                            self.advance();
                            let args = self.parse_call_args()?;
                            let span = node.span().to(self.prev_span());
                            CallNode::new(span, node, name, args, false).into()
                        }
                        _ => return self.unexpected("constant or method name"),
                    };
                }
                TokenKind::LBracket => {
                    self.advance();
                    let items = self.parse_arg_list(&TokenKind::RBracket, "']'")?;
                    let span = node.span().to(self.prev_span());
                    let args = list_of(items);
                    node = CallNode::new(span, node, "[]", args, false).into();
                }
                _ => return Ok(node),
            }
        }
    }

    fn parse_call_name(&mut self) -> Result<String> {
        match self.kind() {
            TokenKind::Ident(name) | TokenKind::Constant(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            _ => self.unexpected("method name"),
        }
    }

    /// Arguments after a method name: `(a, b)` glued to the name, or a
    /// command argument list without parentheses.
    fn parse_call_args(&mut self) -> Result<Option<ListNode>> {
        if self.check(&TokenKind::LParen) && self.adjacent() {
            return self.parse_paren_args();
        }
        if self.at_command_arg(false) {
            return self.parse_command_args().map(Some);
        }
        Ok(None)
    }

    /// `(a, b)`; empty parentheses give no argument list at all.
    fn parse_paren_args(&mut self) -> Result<Option<ListNode>> {
        self.advance();
        let items = self.parse_arg_list(&TokenKind::RParen, "')'")?;
        Ok(list_of(items))
    }

    /// Comma-separated arguments up to and including `close`. Newlines
    /// around the items are insignificant.
    fn parse_arg_list(&mut self, close: &TokenKind, expecting: &str) -> Result<Vec<Node>> {
        let mut items = Vec::new();
        self.skip_newlines();
        while !self.check(close) {
            let item = self.nested(Self::parse_arg)?;
            self.check_value(&item)?;
            items.push(item);
            self.skip_newlines();
            if !self.eat(&TokenKind::Comma) {
                break;
            }
            self.skip_newlines();
        }
        self.expect(close, expecting)?;
        Ok(items)
    }

    fn parse_command_args(&mut self) -> Result<ListNode> {
        let mut items = Vec::new();
        loop {
            let item = self.nested(Self::parse_arg)?;
            self.check_value(&item)?;
            items.push(item);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        let span = items[0].span().to(self.prev_span());
        Ok(ListNode::new(span, items))
    }

    /// Whether the current token starts the first argument of a call written
    /// without parentheses: `puts x`, `foo [1]`, `bar -x`, `baz ::Const`.
    ///
    /// After a local variable only plain operands qualify, so `a [0]` indexes
    /// and `a -1` subtracts.
    fn at_command_arg(&self, after_local: bool) -> bool {
        match self.kind() {
            TokenKind::Ident(_)
            | TokenKind::Constant(_)
            | TokenKind::IVar(_)
            | TokenKind::CVar(_)
            | TokenKind::GVar(_)
            | TokenKind::String(_)
            | TokenKind::Symbol(_)
            | TokenKind::Words(_)
            | TokenKind::Symbols(_)
            | TokenKind::SelfKw
            | TokenKind::Nil
            | TokenKind::True
            | TokenKind::False
            | TokenKind::FileKw
            | TokenKind::LineKw
            | TokenKind::Def => true,
            TokenKind::Integer(_) | TokenKind::Float(_) => !after_local,
            TokenKind::LBracket | TokenKind::LParen => !after_local && !self.adjacent(),
            TokenKind::Minus | TokenKind::Plus | TokenKind::Bang | TokenKind::Colon2 => {
                !after_local && !self.adjacent() && self.glued_to_next()
            }
            _ => false,
        }
    }

    // === Primaries ===

    fn parse_primary(&mut self) -> Result<Node> {
        let span = self.peek().span;
        let node: Node = match self.kind().clone() {
            TokenKind::Integer(value) => {
                self.advance();
                FixnumNode::new(span, value).into()
            }
            TokenKind::Float(value) => {
                self.advance();
                FloatNode::new(span, value).into()
            }
            TokenKind::String(text) => {
                self.advance();
                let mut value = text;
                // adjacent literals concatenate: "a" 'b'
                while let TokenKind::String(next) = self.kind() {
                    value.push_str(next);
                    self.advance();
                }
                StrNode::new(self.span_from(span), value).into()
            }
            TokenKind::Symbol(name) => {
                self.advance();
                SymbolNode::new(span, name).into()
            }
            TokenKind::Words(words) => {
                self.advance();
                let items = words.into_iter().map(|w| Node::from(StrNode::new(span, w))).collect();
                ArrayNode::new(span, items).into()
            }
            TokenKind::Symbols(words) => {
                self.advance();
                let items = words
                    .into_iter()
                    .map(|w| Node::from(SymbolNode::new(span, w)))
                    .collect();
                ArrayNode::new(span, items).into()
            }
            TokenKind::IVar(name) => {
                self.advance();
                InstVarNode::new(span, name).into()
            }
            TokenKind::CVar(name) => {
                self.advance();
                ClassVarNode::new(span, name).into()
            }
            TokenKind::GVar(name) => {
                self.advance();
                GlobalVarNode::new(span, name).into()
            }
            TokenKind::Constant(name) => {
                self.advance();
                if self.check(&TokenKind::LParen) && self.adjacent() {
                    let args = self.parse_paren_args()?;
                    FCallNode::new(self.span_from(span), name, args).into()
                } else {
                    ConstNode::new(span, name).into()
                }
            }
            TokenKind::Ident(name) => self.parse_identifier(span, name)?,
            TokenKind::Colon2 => {
                self.advance();
                let name = self.expect_constant()?;
                Colon3Node::new(self.span_from(span), name).into()
            }
            TokenKind::Nil => {
                self.advance();
                NilNode::new(span).into()
            }
            TokenKind::True => {
                self.advance();
                TrueNode::new(span).into()
            }
            TokenKind::False => {
                self.advance();
                FalseNode::new(span).into()
            }
            TokenKind::SelfKw => {
                self.advance();
                SelfNode::new(span).into()
            }
            TokenKind::FileKw => {
                self.advance();
                StrNode::new(span, self.file.clone()).into()
            }
            TokenKind::LineKw => {
                self.advance();
                FixnumNode::new(span, span.line as i64).into()
            }
            TokenKind::LParen => {
                self.advance();
                let body = self.parse_statements(&[TokenKind::RParen])?;
                self.expect(&TokenKind::RParen, "')'")?;
                body.unwrap_or_else(|| NilNode::new(self.span_from(span)).into())
            }
            TokenKind::LBracket => {
                self.advance();
                let elements = self.parse_arg_list(&TokenKind::RBracket, "']'")?;
                ArrayNode::new(self.span_from(span), elements).into()
            }
            TokenKind::If => self.parse_if()?,
            TokenKind::Unless => self.parse_unless()?,
            TokenKind::While | TokenKind::Until => self.parse_loop()?,
            TokenKind::Def => self.parse_def()?,
            TokenKind::Class => self.parse_class()?,
            TokenKind::Module => self.parse_module()?,
            TokenKind::Return => self.parse_return()?,
            TokenKind::Yield => self.parse_yield()?,
            _ => return self.unexpected_token(),
        };
        Ok(node)
    }

    /// A bare name: a method call with arguments, a local variable, or a
    /// call with no receiver and no arguments.
    fn parse_identifier(&mut self, span: Span, name: String) -> Result<Node> {
        self.advance();
        if self.check(&TokenKind::LParen) && self.adjacent() {
            let args = self.parse_paren_args()?;
            return Ok(FCallNode::new(self.span_from(span), name, args).into());
        }
        let local = self.is_local(&name);
        if self.at_command_arg(local) {
            let args = self.parse_command_args()?;
            return Ok(FCallNode::new(self.span_from(span), name, Some(args)).into());
        }
        Ok(if local {
            LocalVarNode::new(span, name).into()
        } else {
            VCallNode::new(span, name).into()
        })
    }

    fn expect_constant(&mut self) -> Result<String> {
        match self.kind() {
            TokenKind::Constant(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            _ => self.unexpected("constant name"),
        }
    }

    // === Control flow ===

    /// `if`/`elsif` branch through the closing `end`; `elsif` chains nest in
    /// the else branch.
    fn parse_if(&mut self) -> Result<Node> {
        let start = self.advance().span;
        let condition = self.parse_condition()?;
        self.parse_then()?;
        let then_body = self.parse_statements(&[TokenKind::Elsif, TokenKind::Else, TokenKind::End])?;
        let else_body = match self.kind() {
            TokenKind::Elsif => Some(self.descend(Self::parse_if)?),
            TokenKind::Else => {
                self.advance();
                let body = self.parse_statements(&[TokenKind::End])?;
                self.expect(&TokenKind::End, "'end'")?;
                body
            }
            _ => {
                self.expect(&TokenKind::End, "'end'")?;
                None
            }
        };
        Ok(IfNode::new(self.span_from(start), condition, then_body, else_body).into())
    }

    /// `unless c then a else b end` is `if c then b else a end`.
    fn parse_unless(&mut self) -> Result<Node> {
        let start = self.advance().span;
        let condition = self.parse_condition()?;
        self.parse_then()?;
        let body = self.parse_statements(&[TokenKind::Else, TokenKind::End])?;
        let else_body = if self.eat(&TokenKind::Else) {
            self.parse_statements(&[TokenKind::End])?
        } else {
            None
        };
        self.expect(&TokenKind::End, "'end'")?;
        Ok(IfNode::new(self.span_from(start), condition, else_body, body).into())
    }

    fn parse_then(&mut self) -> Result<()> {
        if self.eat(&TokenKind::Then) {
            return Ok(());
        }
        if !self.at_term() {
            return self.unexpected("'then' or ';' or newline");
        }
        self.skip_terms();
        self.eat(&TokenKind::Then);
        Ok(())
    }

    fn parse_loop(&mut self) -> Result<Node> {
        let keyword = self.advance();
        let condition = self.parse_condition()?;
        if !self.eat(&TokenKind::Do) {
            if !self.at_term() {
                return self.unexpected("'do' or ';' or newline");
            }
            self.skip_terms();
        }
        let body = self.parse_statements(&[TokenKind::End])?;
        self.expect(&TokenKind::End, "'end'")?;
        let span = self.span_from(keyword.span);
        Ok(match keyword.kind {
            TokenKind::While => WhileNode::new(span, condition, body).into(),
            _ => UntilNode::new(span, condition, body).into(),
        })
    }

    fn parse_return(&mut self) -> Result<Node> {
        let start = self.advance().span;
        if matches!(self.scope_kind(), ScopeKind::Class | ScopeKind::Module) {
            return self.error(
                SyntaxErrorKind::TopLevelReturn,
                start.line,
                "Invalid return in class/module body",
            );
        }
        let has_value = self.at_command_arg(false)
            || matches!(self.kind(), TokenKind::LParen | TokenKind::LBracket);
        if !has_value {
            return Ok(ReturnNode::new(start, None).into());
        }
        if self.scope_kind() == ScopeKind::Top {
            return self.error(
                SyntaxErrorKind::TopLevelReturn,
                start.line,
                "argument of top-level return is not allowed",
            );
        }
        let value = self.parse_values()?;
        Ok(ReturnNode::new(self.span_from(start), Some(value)).into())
    }

    fn parse_yield(&mut self) -> Result<Node> {
        let start = self.advance().span;
        if !self.in_def() {
            return self.error(SyntaxErrorKind::GrammarError, start.line, "Invalid yield");
        }
        let args = self.parse_call_args()?;
        Ok(YieldNode::new(self.span_from(start), args).into())
    }

    // === Definitions ===

    fn parse_def(&mut self) -> Result<Node> {
        let start = self.advance().span;
        let name = self.parse_def_name()?;
        self.in_scope(ScopeKind::Def, |p| {
            let args = p.parse_params()?;
            let body = p.parse_statements(&[TokenKind::End])?;
            p.expect(&TokenKind::End, "'end'")?;
            Ok(DefNode::new(p.span_from(start), name, args, body).into())
        })
    }

    /// `name`, `name=`, `self.name`, or an operator such as `==` or `[]`.
    fn parse_def_name(&mut self) -> Result<String> {
        if self.check(&TokenKind::SelfKw) && *self.kind_at(1) == TokenKind::Dot {
            self.advance();
            self.advance();
            let name = self.parse_method_name()?;
            return Ok(format!("self.{}", name));
        }
        self.parse_method_name()
    }

    fn parse_method_name(&mut self) -> Result<String> {
        let name = match self.kind() {
            TokenKind::Ident(name) | TokenKind::Constant(name) | TokenKind::SetterName(name) => {
                name.clone()
            }
            TokenKind::LBracket if *self.kind_at(1) == TokenKind::RBracket => {
                self.advance();
                let close = self.advance();
                if self.check(&TokenKind::Equal) && self.peek().span.start == close.span.end {
                    self.advance();
                    return Ok("[]=".to_string());
                }
                return Ok("[]".to_string());
            }
            kind => match operator_method_name(kind) {
                Some(op) => op.to_string(),
                None => return self.unexpected("method name"),
            },
        };
        self.advance();
        Ok(name)
    }

    /// Parameters in parentheses, or bare up to the end of the line.
    fn parse_params(&mut self) -> Result<ArgsNode> {
        let start = self.peek().span;
        let parens = self.eat(&TokenKind::LParen);
        let mut params = Params::default();
        if parens {
            self.skip_newlines();
        }
        let empty = if parens {
            self.check(&TokenKind::RParen)
        } else {
            self.at_term()
        };
        if !empty {
            loop {
                self.parse_param(&mut params)?;
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
                if parens {
                    self.skip_newlines();
                }
            }
        }
        let span = if parens {
            self.skip_newlines();
            self.expect(&TokenKind::RParen, "')'")?;
            self.span_from(start)
        } else if !self.at_term() {
            return self.unexpected("newline or ';'");
        } else if params.required.is_empty() && params.optional.is_empty() && params.rest.is_none() {
            Span::empty(start.start, start.line)
        } else {
            self.span_from(start)
        };
        Ok(ArgsNode::new(span, params.required, params.optional, params.rest))
    }

    fn parse_param(&mut self, params: &mut Params) -> Result<()> {
        let token = self.peek().clone();
        let line = token.line();
        match token.kind {
            TokenKind::Star => {
                self.advance();
                let name = match self.kind() {
                    TokenKind::Ident(name) if is_local_name(name) => name.clone(),
                    _ => return self.unexpected("rest parameter name"),
                };
                self.advance();
                if params.rest.is_some() {
                    return self.error(
                        SyntaxErrorKind::GrammarError,
                        line,
                        "only one rest parameter is allowed",
                    );
                }
                self.declare_param(&name, line)?;
                params.rest = Some(name);
            }
            TokenKind::Ident(name) if is_local_name(&name) => {
                self.advance();
                self.declare_param(&name, line)?;
                if self.eat(&TokenKind::Equal) {
                    if params.rest.is_some() {
                        return self.error(
                            SyntaxErrorKind::GrammarError,
                            line,
                            "optional parameter after rest parameter",
                        );
                    }
                    let value = self.nested(Self::parse_arg)?;
                    self.check_value(&value)?;
                    let span = token.span.to(value.span());
                    params.optional.push(LocalAsgnNode::new(span, name, value).into());
                } else {
                    if !params.optional.is_empty() || params.rest.is_some() {
                        return self.error(
                            SyntaxErrorKind::GrammarError,
                            line,
                            "required parameters after optional or rest parameters are not supported",
                        );
                    }
                    params.required.push(name);
                }
            }
            TokenKind::Constant(_) => {
                return self.error(SyntaxErrorKind::GrammarError, line, "formal argument cannot be a constant");
            }
            TokenKind::IVar(_) => {
                return self.error(
                    SyntaxErrorKind::GrammarError,
                    line,
                    "formal argument cannot be an instance variable",
                );
            }
            TokenKind::CVar(_) => {
                return self.error(
                    SyntaxErrorKind::GrammarError,
                    line,
                    "formal argument cannot be a class variable",
                );
            }
            TokenKind::GVar(_) => {
                return self.error(
                    SyntaxErrorKind::GrammarError,
                    line,
                    "formal argument cannot be a global variable",
                );
            }
            TokenKind::Amp => {
                return self.error(SyntaxErrorKind::GrammarError, line, "block parameters not supported");
            }
            _ => return self.unexpected("parameter name"),
        }
        Ok(())
    }

    fn declare_param(&mut self, name: &str, line: usize) -> Result<()> {
        if self.is_local(name) {
            return self.error(SyntaxErrorKind::GrammarError, line, "duplicated argument name");
        }
        self.declare(name);
        Ok(())
    }

    fn parse_class(&mut self) -> Result<Node> {
        let start = self.advance().span;
        if self.in_def() {
            return self.error(SyntaxErrorKind::GrammarError, start.line, "class definition in method body");
        }
        let cpath = self.parse_cpath()?;
        let superclass = if self.eat(&TokenKind::Less) {
            Some(self.parse_oror()?)
        } else {
            None
        };
        if !self.at_term() {
            return self.unexpected("newline or ';'");
        }
        self.in_scope(ScopeKind::Class, |p| {
            let body = p.parse_statements(&[TokenKind::End])?;
            p.expect(&TokenKind::End, "'end'")?;
            Ok(ClassNode::new(p.span_from(start), cpath, superclass, body).into())
        })
    }

    fn parse_module(&mut self) -> Result<Node> {
        let start = self.advance().span;
        if self.in_def() {
            return self.error(SyntaxErrorKind::GrammarError, start.line, "module definition in method body");
        }
        let cpath = self.parse_cpath()?;
        if !self.at_term() {
            return self.unexpected("newline or ';'");
        }
        self.in_scope(ScopeKind::Module, |p| {
            let body = p.parse_statements(&[TokenKind::End])?;
            p.expect(&TokenKind::End, "'end'")?;
            Ok(ModuleNode::new(p.span_from(start), cpath, body).into())
        })
    }

    /// `Name`, `::Name` or `Outer::Name`.
    fn parse_cpath(&mut self) -> Result<Node> {
        let start = self.peek().span;
        let mut path: Node = match self.kind() {
            TokenKind::Constant(name) => {
                let node = ConstNode::new(start, name.clone());
                self.advance();
                node.into()
            }
            TokenKind::Colon2 => {
                self.advance();
                let name = self.expect_constant()?;
                Colon3Node::new(self.span_from(start), name).into()
            }
            _ => {
                return self.error(
                    SyntaxErrorKind::GrammarError,
                    start.line,
                    "class/module name must be CONSTANT",
                )
            }
        };
        self.chain(|p| {
            while p.eat(&TokenKind::Colon2) {
                p.enter()?;
                let name = p.expect_constant()?;
                path = Colon2Node::new(p.span_from(start), path, name).into();
            }
            Ok(path)
        })
    }
}

fn expecting_after_statement(terminators: &[TokenKind]) -> String {
    if terminators.is_empty() {
        return "end-of-input".to_string();
    }
    let mut parts = vec!["newline".to_string(), "';'".to_string()];
    parts.extend(terminators.iter().map(ToString::to_string));
    parts.join(" or ")
}

fn keyword_assignment(kind: &TokenKind) -> Option<&'static str> {
    let message = match kind {
        TokenKind::SelfKw => "Can't change the value of self",
        TokenKind::Nil => "Can't assign to nil",
        TokenKind::True => "Can't assign to true",
        TokenKind::False => "Can't assign to false",
        TokenKind::FileKw => "Can't assign to __FILE__",
        TokenKind::LineKw => "Can't assign to __LINE__",
        _ => return None,
    };
    Some(message)
}

fn operator_method_name(kind: &TokenKind) -> Option<&'static str> {
    let name = match kind {
        TokenKind::Plus => "+",
        TokenKind::Minus => "-",
        TokenKind::Star => "*",
        TokenKind::Pow => "**",
        TokenKind::Slash => "/",
        TokenKind::Percent => "%",
        TokenKind::EqEq => "==",
        TokenKind::NotEq => "!=",
        TokenKind::Less => "<",
        TokenKind::LessEq => "<=",
        TokenKind::Greater => ">",
        TokenKind::GreaterEq => ">=",
        TokenKind::Amp => "&",
        TokenKind::Pipe => "|",
        TokenKind::Bang => "!",
        _ => return None,
    };
    Some(name)
}

fn is_local_name(name: &str) -> bool {
    name.starts_with(|c: char| c.is_ascii_lowercase() || c == '_' || !c.is_ascii())
        && !name.ends_with(|c: char| c == '?' || c == '!')
}

fn is_attr_name(name: &str) -> bool {
    name.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_' || !c.is_ascii())
        && !name.ends_with(|c: char| c == '?' || c == '!')
}

fn binary_call(left: Node, name: &str, right: Node) -> Node {
    let span = left.span().to(right.span());
    let args = ListNode::new(right.span(), vec![right]);
    CallNode::new(span, left, name, Some(args), false).into()
}

fn list_of(items: Vec<Node>) -> Option<ListNode> {
    let first = items.first()?.span();
    let last = items.last()?.span();
    Some(ListNode::new(first.to(last), items))
}

/// The positive value of a negative numeric literal `node` read from the
/// single token `token`.
fn positive_literal(token: &Token, node: &Node) -> Option<Node> {
    match (&token.kind, node) {
        (TokenKind::Integer(value), Node::Fixnum(_)) if *value < 0 => {
            let span = Span::new(token.span.start + 1, token.span.end, token.span.line);
            value.checked_neg().map(|v| FixnumNode::new(span, v).into())
        }
        (TokenKind::Float(value), Node::Float(_)) if value.is_sign_negative() => {
            let span = Span::new(token.span.start + 1, token.span.end, token.span.line);
            Some(FloatNode::new(span, -value).into())
        }
        _ => None,
    }
}
