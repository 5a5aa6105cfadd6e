//! Canonical source printer for the Garnet Ruby front end.
//!
//! [`Formatter`] is a [`Visitor`] producing `String`s. Layout rules:
//!
//! - two spaces of indentation per nesting level, one statement per line
//! - a blank line between a definition and its neighbours
//! - spaces around binary operators; parentheses only where precedence needs them
//! - every call with arguments uses parentheses: `puts x` becomes `puts(x)`
//! - `and`/`or`/`not` print as `&&`/`||`/`!`, modifiers as block forms
//!
//! Reparsing the output gives back the same tree.
//!
//! ```rust
//! use garnet_fmt::format_source;
//!
//! let out = format_source("demo.rb", "def add(a,b) a+b end;puts add 1,2").unwrap();
//! assert_eq!(out, "def add(a, b)\n  a + b\nend\n\nputs(add(1, 2))\n");
//! ```

use garnet_syntax::ast::*;
use garnet_syntax::error::Result;
use garnet_syntax::visitor::Visitor;

/// Binding strength of a printed expression; a child binding looser than its
/// context is parenthesised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Prec {
    Statement,
    OrOr,
    AndAnd,
    Equality,
    Comparison,
    BitOr,
    BitAnd,
    Additive,
    Multiplicative,
    Unary,
    Pow,
    Primary,
}

fn binary_prec(name: &str) -> Option<Prec> {
    let prec = match name {
        "==" | "!=" => Prec::Equality,
        "<" | "<=" | ">" | ">=" => Prec::Comparison,
        "|" => Prec::BitOr,
        "&" => Prec::BitAnd,
        "+" | "-" => Prec::Additive,
        "*" | "/" | "%" => Prec::Multiplicative,
        "**" => Prec::Pow,
        _ => return None,
    };
    Some(prec)
}

/// The single argument of a binary operator call, if `call` is one.
fn binary_operand(call: &CallNode) -> Option<&Node> {
    if call.is_lazy() || binary_prec(call.name()).is_none() {
        return None;
    }
    match call.args_node() {
        Some(Node::List(list)) if list.len() == 1 => list.items().first(),
        _ => None,
    }
}

fn is_unary(call: &CallNode) -> bool {
    matches!(call.name(), "-@" | "+@") && call.args_node().is_none() && !call.is_lazy()
}

fn prec_of(node: &Node) -> Prec {
    match node {
        Node::Fixnum(n) if n.value() < 0 => Prec::Unary,
        Node::Float(n) if n.value().is_sign_negative() => Prec::Unary,
        Node::Call(call) if is_unary(call) => Prec::Unary,
        Node::Call(call) => match binary_operand(call) {
            Some(_) => binary_prec(call.name()).unwrap_or(Prec::Primary),
            None => Prec::Primary,
        },
        Node::Not(_) => Prec::Unary,
        Node::And(_) => Prec::AndAnd,
        Node::Or(_) => Prec::OrOr,
        Node::LocalAsgn(_)
        | Node::InstAsgn(_)
        | Node::GlobalAsgn(_)
        | Node::ClassVarAsgn(_)
        | Node::ConstDecl(_)
        | Node::AttrAssign(_)
        | Node::MultipleAsgn(_)
        | Node::If(_)
        | Node::While(_)
        | Node::Until(_)
        | Node::Return(_)
        | Node::Def(_)
        | Node::Class(_)
        | Node::Module(_) => Prec::Statement,
        _ => Prec::Primary,
    }
}

fn is_definition(node: &Node) -> bool {
    matches!(node, Node::Def(_) | Node::Class(_) | Node::Module(_))
}

/// Statement-level nodes that cannot follow `return` without parentheses.
fn starts_with_keyword(node: &Node) -> bool {
    matches!(
        node,
        Node::If(_) | Node::While(_) | Node::Until(_) | Node::Yield(_) | Node::Class(_) | Node::Module(_)
    )
}

fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '#' => out.push_str("\\#"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c.is_control() => out.push_str(&format!("\\u{{{:x}}}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

const OPERATOR_SYMBOLS: [&str; 27] = [
    "[]=", "[]", "<=>", "===", "==", "=~", "!=", "!~", "**", "+@", "-@", "<=", ">=", "<<", ">>",
    "+", "-", "*", "/", "%", "<", ">", "!", "&", "|", "^", "~",
];

/// Whether `:name` reads back as the same symbol without quotes.
fn is_bare_symbol(name: &str) -> bool {
    if OPERATOR_SYMBOLS.contains(&name) {
        return true;
    }
    let word = match name.strip_prefix("@@") {
        Some(rest) => rest,
        None => name.strip_prefix(|c: char| c == '@' || c == '$').unwrap_or_else(|| {
            name.strip_suffix(|c: char| c == '?' || c == '!' || c == '=')
                .unwrap_or(name)
        }),
    };
    let mut chars = word.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || !c.is_ascii())
        && chars.all(|c| c.is_alphanumeric() || c == '_' || !c.is_ascii())
}

/// Prints a tree back as source text.
#[derive(Debug, Default)]
pub struct Formatter {
    indent: usize,
}

impl Formatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Formats `node`. A `Root` node yields a whole file, one statement per
    /// line with a trailing newline; any other node yields a fragment.
    pub fn format(&mut self, node: &Node) -> String {
        node.accept(self)
    }

    fn pad(&self) -> String {
        "  ".repeat(self.indent)
    }

    /// Statements of `node`, one per line at the current indentation.
    fn statements(&mut self, node: Option<&Node>) -> String {
        let statements: Vec<&Node> = match node {
            Some(Node::Block(block)) => block.statements().iter().collect(),
            Some(node) => vec![node],
            None => Vec::new(),
        };
        let mut out = String::new();
        for (i, statement) in statements.iter().enumerate() {
            if i > 0 && (is_definition(statement) || is_definition(statements[i - 1])) {
                out.push('\n');
            }
            out.push_str(&self.pad());
            out.push_str(&statement.accept(self));
            out.push('\n');
        }
        out
    }

    /// Statements one level deeper than the current line.
    fn body(&mut self, node: Option<&Node>) -> String {
        self.indent += 1;
        let out = self.statements(node);
        self.indent -= 1;
        out
    }

    /// `node` in a context binding at `context`; parenthesised when it binds
    /// more loosely.
    fn operand(&mut self, node: &Node, context: Prec) -> String {
        let text = node.accept(self);
        if prec_of(node) < context {
            format!("({})", text)
        } else {
            text
        }
    }

    fn items(&mut self, args: Option<&Node>) -> String {
        match args {
            Some(node) => node.accept(self),
            None => String::new(),
        }
    }

    fn paren_args(&mut self, args: Option<&Node>) -> String {
        match args {
            Some(node) => format!("({})", node.accept(self)),
            None => String::new(),
        }
    }

    /// `recv.name` or `recv[index]`, the left-hand side of an attribute
    /// assignment.
    fn attr_target(&mut self, node: &AttrAssignNode, index: &[&Node]) -> String {
        let recv = self.operand(node.receiver_node(), Prec::Primary);
        if node.name() == "[]=" {
            let index: Vec<String> = index.iter().map(|item| item.accept(self)).collect();
            return format!("{}[{}]", recv, index.join(", "));
        }
        let dot = if node.is_lazy() { "&." } else { "." };
        format!("{}{}{}", recv, dot, node.name().trim_end_matches('='))
    }

    fn assignment(&mut self, target: &str, value: &Node) -> String {
        format!("{} = {}", target, value.accept(self))
    }

    fn binary(&mut self, left: &Node, op: &str, right: &Node, prec: Prec) -> String {
        // `**` is right-associative and takes a unary right operand
        let (left_prec, right_prec) = match prec {
            Prec::Pow => (Prec::Primary, Prec::Unary),
            _ => (prec, next(prec)),
        };
        let left = self.operand(left, left_prec);
        let right = self.operand(right, right_prec);
        format!("{} {} {}", left, op, right)
    }

    fn conditional(&mut self, keyword: &str, condition: &Node, body: Option<&Node>) -> String {
        let condition = condition.accept(self);
        let body = self.body(body);
        format!("{} {}\n{}{}end", keyword, condition, body, self.pad())
    }
}

fn next(prec: Prec) -> Prec {
    match prec {
        Prec::Statement => Prec::OrOr,
        Prec::OrOr => Prec::AndAnd,
        Prec::AndAnd => Prec::Equality,
        Prec::Equality => Prec::Comparison,
        Prec::Comparison => Prec::BitOr,
        Prec::BitOr => Prec::BitAnd,
        Prec::BitAnd => Prec::Additive,
        Prec::Additive => Prec::Multiplicative,
        Prec::Multiplicative => Prec::Unary,
        Prec::Unary => Prec::Pow,
        Prec::Pow | Prec::Primary => Prec::Primary,
    }
}

impl Visitor for Formatter {
    type Output = String;

    fn visit_root(&mut self, node: &RootNode) -> String {
        self.statements(node.body_node())
    }

    fn visit_block(&mut self, node: &BlockNode) -> String {
        let parts: Vec<String> = node.statements().iter().map(|s| s.accept(self)).collect();
        format!("({})", parts.join("; "))
    }

    fn visit_nil(&mut self, _node: &NilNode) -> String {
        "nil".to_string()
    }

    fn visit_true(&mut self, _node: &TrueNode) -> String {
        "true".to_string()
    }

    fn visit_false(&mut self, _node: &FalseNode) -> String {
        "false".to_string()
    }

    fn visit_self(&mut self, _node: &SelfNode) -> String {
        "self".to_string()
    }

    fn visit_fixnum(&mut self, node: &FixnumNode) -> String {
        node.value().to_string()
    }

    fn visit_float(&mut self, node: &FloatNode) -> String {
        format!("{:?}", node.value())
    }

    fn visit_str(&mut self, node: &StrNode) -> String {
        quote(node.value())
    }

    fn visit_symbol(&mut self, node: &SymbolNode) -> String {
        if is_bare_symbol(node.name()) {
            format!(":{}", node.name())
        } else {
            format!(":{}", quote(node.name()))
        }
    }

    fn visit_array(&mut self, node: &ArrayNode) -> String {
        let items: Vec<String> = node.elements().iter().map(|e| e.accept(self)).collect();
        format!("[{}]", items.join(", "))
    }

    fn visit_list(&mut self, node: &ListNode) -> String {
        let items: Vec<String> = node.items().iter().map(|e| e.accept(self)).collect();
        items.join(", ")
    }

    fn visit_local_var(&mut self, node: &LocalVarNode) -> String {
        node.name().to_string()
    }

    fn visit_local_asgn(&mut self, node: &LocalAsgnNode) -> String {
        self.assignment(node.name(), node.value_node())
    }

    fn visit_inst_var(&mut self, node: &InstVarNode) -> String {
        node.name().to_string()
    }

    fn visit_inst_asgn(&mut self, node: &InstAsgnNode) -> String {
        self.assignment(node.name(), node.value_node())
    }

    fn visit_global_var(&mut self, node: &GlobalVarNode) -> String {
        node.name().to_string()
    }

    fn visit_global_asgn(&mut self, node: &GlobalAsgnNode) -> String {
        self.assignment(node.name(), node.value_node())
    }

    fn visit_class_var(&mut self, node: &ClassVarNode) -> String {
        node.name().to_string()
    }

    fn visit_class_var_asgn(&mut self, node: &ClassVarAsgnNode) -> String {
        self.assignment(node.name(), node.value_node())
    }

    fn visit_multiple_asgn(&mut self, node: &MultipleAsgnNode) -> String {
        // attribute targets carry only their index; the value comes from the
        // right-hand side
        let targets: Vec<String> = node
            .targets()
            .iter()
            .map(|target| match target {
                Node::AttrAssign(attr) => {
                    let index: Vec<&Node> = match attr.args_node() {
                        Some(Node::List(list)) => list.items().iter().collect(),
                        _ => Vec::new(),
                    };
                    self.attr_target(attr, &index)
                }
                target => target.accept(self),
            })
            .collect();
        // `a, b = [1, 2]` and `a, b = 1, 2` build the same tree
        let value = match node.value_node() {
            Node::Array(array) if !array.elements().is_empty() => {
                let items: Vec<String> = array.elements().iter().map(|e| e.accept(self)).collect();
                items.join(", ")
            }
            value => value.accept(self),
        };
        format!("{} = {}", targets.join(", "), value)
    }

    fn visit_const(&mut self, node: &ConstNode) -> String {
        node.name().to_string()
    }

    fn visit_colon2(&mut self, node: &Colon2Node) -> String {
        let left = self.operand(node.left_node(), Prec::Primary);
        format!("{}::{}", left, node.name())
    }

    fn visit_colon3(&mut self, node: &Colon3Node) -> String {
        format!("::{}", node.name())
    }

    fn visit_const_decl(&mut self, node: &ConstDeclNode) -> String {
        let target = match node.const_node() {
            Some(path) => path.accept(self),
            None => node.name().to_string(),
        };
        self.assignment(&target, node.value_node())
    }

    fn visit_call(&mut self, node: &CallNode) -> String {
        let receiver = node.receiver_node();
        if let Some(right) = binary_operand(node) {
            let prec = binary_prec(node.name()).unwrap_or(Prec::Primary);
            return self.binary(receiver, node.name(), right, prec);
        }
        if is_unary(node) {
            let sign = &node.name()[..1];
            // `-(1)` keeps the literal from folding into `-1`
            let operand = match receiver {
                Node::Fixnum(_) | Node::Float(_) => format!("({})", receiver.accept(self)),
                _ => self.operand(receiver, Prec::Unary),
            };
            return format!("{}{}", sign, operand);
        }
        let recv = self.operand(receiver, Prec::Primary);
        if node.name() == "[]" && !node.is_lazy() {
            let index = self.items(node.args_node());
            return format!("{}[{}]", recv, index);
        }
        let dot = if node.is_lazy() { "&." } else { "." };
        let args = self.paren_args(node.args_node());
        format!("{}{}{}{}", recv, dot, node.name(), args)
    }

    fn visit_fcall(&mut self, node: &FCallNode) -> String {
        let args = self.items(node.args_node());
        format!("{}({})", node.name(), args)
    }

    fn visit_vcall(&mut self, node: &VCallNode) -> String {
        node.name().to_string()
    }

    fn visit_attr_assign(&mut self, node: &AttrAssignNode) -> String {
        let mut items: Vec<&Node> = match node.args_node() {
            Some(Node::List(list)) => list.items().iter().collect(),
            _ => Vec::new(),
        };
        let value = items.pop();
        let target = self.attr_target(node, &items);
        match value {
            Some(value) => self.assignment(&target, value),
            None => target,
        }
    }

    fn visit_yield(&mut self, node: &YieldNode) -> String {
        format!("yield{}", self.paren_args(node.args_node()))
    }

    fn visit_not(&mut self, node: &NotNode) -> String {
        format!("!{}", self.operand(node.value_node(), Prec::Unary))
    }

    fn visit_and(&mut self, node: &AndNode) -> String {
        self.binary(node.first_node(), "&&", node.second_node(), Prec::AndAnd)
    }

    fn visit_or(&mut self, node: &OrNode) -> String {
        self.binary(node.first_node(), "||", node.second_node(), Prec::OrOr)
    }

    fn visit_if(&mut self, node: &IfNode) -> String {
        let (keyword, then_body, mut else_body) = match (node.then_body(), node.else_body()) {
            (None, Some(body)) => ("unless", Some(body), None),
            (then_body, else_body) => ("if", then_body, else_body),
        };
        let mut out = format!("{} {}\n", keyword, node.condition().accept(self));
        out.push_str(&self.body(then_body));
        while let Some(branch) = else_body {
            match branch {
                Node::If(elsif) if keyword == "if" && elsif.then_body().is_some() => {
                    out.push_str(&format!("{}elsif {}\n", self.pad(), elsif.condition().accept(self)));
                    out.push_str(&self.body(elsif.then_body()));
                    else_body = elsif.else_body();
                }
                _ => {
                    out.push_str(&format!("{}else\n", self.pad()));
                    out.push_str(&self.body(Some(branch)));
                    else_body = None;
                }
            }
        }
        out.push_str(&self.pad());
        out.push_str("end");
        out
    }

    fn visit_while(&mut self, node: &WhileNode) -> String {
        self.conditional("while", node.condition(), node.body_node())
    }

    fn visit_until(&mut self, node: &UntilNode) -> String {
        self.conditional("until", node.condition(), node.body_node())
    }

    fn visit_return(&mut self, node: &ReturnNode) -> String {
        match node.value_node() {
            None => "return".to_string(),
            Some(value) if starts_with_keyword(value) => format!("return ({})", value.accept(self)),
            Some(value) => format!("return {}", value.accept(self)),
        }
    }

    fn visit_def(&mut self, node: &DefNode) -> String {
        let params = node.args_node().accept(self);
        let params = if params.is_empty() {
            params
        } else {
            format!("({})", params)
        };
        let body = self.body(node.body_node());
        format!("def {}{}\n{}{}end", node.name(), params, body, self.pad())
    }

    fn visit_args(&mut self, node: &ArgsNode) -> String {
        let mut params: Vec<String> = node.required().to_vec();
        for optional in node.optional() {
            params.push(optional.accept(self));
        }
        if let Some(rest) = node.rest() {
            params.push(format!("*{}", rest));
        }
        params.join(", ")
    }

    fn visit_class(&mut self, node: &ClassNode) -> String {
        let mut header = format!("class {}", node.cpath().accept(self));
        if let Some(superclass) = node.superclass() {
            header.push_str(" < ");
            header.push_str(&self.operand(superclass, Prec::OrOr));
        }
        let body = self.body(node.body_node());
        format!("{}\n{}{}end", header, body, self.pad())
    }

    fn visit_module(&mut self, node: &ModuleNode) -> String {
        let cpath = node.cpath().accept(self);
        let body = self.body(node.body_node());
        format!("module {}\n{}{}end", cpath, body, self.pad())
    }
}

/// Parses `source` and prints it back in canonical layout.
pub fn format_source(file: &str, source: &str) -> Result<String> {
    let root = garnet_parser::parse(file, source)?;
    Ok(Formatter::new().format(&root))
}
