use super::{children, NameNode, Node, ParseNode};
use crate::span::Span;

/// Method definition: `def name(args) body end`
#[derive(Debug, Clone, PartialEq)]
pub struct DefNode {
    span: Span,
    name: String,
    args: Box<Node>,
    body: Option<Box<Node>>,
}

impl DefNode {
    pub fn new(span: Span, name: impl Into<String>, args: ArgsNode, body: Option<Node>) -> Self {
        Self {
            span,
            name: name.into(),
            args: Box::new(Node::Args(args)),
            body: body.map(Box::new),
        }
    }

    /// Always an `Args` node.
    pub fn args_node(&self) -> &Node {
        &self.args
    }

    pub fn body_node(&self) -> Option<&Node> {
        self.body.as_deref()
    }
}

impl NameNode for DefNode {
    fn name(&self) -> &str {
        &self.name
    }
}

impl ParseNode for DefNode {
    fn span(&self) -> Span {
        self.span
    }

    fn child_nodes(&self) -> Vec<&Node> {
        children([Some(&*self.args), self.body.as_deref()])
    }
}

/// Parameter list of a method definition.
///
/// Required parameters come first, then optional ones (each a `LocalAsgn`
/// holding the default value), then the optional `*rest` name.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgsNode {
    span: Span,
    required: Vec<String>,
    optional: Vec<Node>,
    rest: Option<String>,
}

impl ArgsNode {
    pub fn new(
        span: Span,
        required: Vec<String>,
        optional: Vec<Node>,
        rest: Option<String>,
    ) -> Self {
        Self {
            span,
            required,
            optional,
            rest,
        }
    }

    pub fn required(&self) -> &[String] {
        &self.required
    }

    pub fn optional(&self) -> &[Node] {
        &self.optional
    }

    pub fn rest(&self) -> Option<&str> {
        self.rest.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.required.is_empty() && self.optional.is_empty() && self.rest.is_none()
    }

    /// Number of arguments a caller must pass.
    pub fn arity(&self) -> usize {
        self.required.len()
    }
}

impl ParseNode for ArgsNode {
    fn span(&self) -> Span {
        self.span
    }

    fn child_nodes(&self) -> Vec<&Node> {
        self.optional.iter().collect()
    }
}

/// `class Cpath < Superclass body end`
#[derive(Debug, Clone, PartialEq)]
pub struct ClassNode {
    span: Span,
    cpath: Box<Node>,
    superclass: Option<Box<Node>>,
    body: Option<Box<Node>>,
}

impl ClassNode {
    pub fn new(span: Span, cpath: Node, superclass: Option<Node>, body: Option<Node>) -> Self {
        Self {
            span,
            cpath: Box::new(cpath),
            superclass: superclass.map(Box::new),
            body: body.map(Box::new),
        }
    }

    /// The class name: a `Const`, `Colon2` or `Colon3` node.
    pub fn cpath(&self) -> &Node {
        &self.cpath
    }

    pub fn superclass(&self) -> Option<&Node> {
        self.superclass.as_deref()
    }

    pub fn body_node(&self) -> Option<&Node> {
        self.body.as_deref()
    }
}

impl ParseNode for ClassNode {
    fn span(&self) -> Span {
        self.span
    }

    fn child_nodes(&self) -> Vec<&Node> {
        children([
            Some(&*self.cpath),
            self.superclass.as_deref(),
            self.body.as_deref(),
        ])
    }
}

/// `module Cpath body end`
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleNode {
    span: Span,
    cpath: Box<Node>,
    body: Option<Box<Node>>,
}

impl ModuleNode {
    pub fn new(span: Span, cpath: Node, body: Option<Node>) -> Self {
        Self {
            span,
            cpath: Box::new(cpath),
            body: body.map(Box::new),
        }
    }

    pub fn cpath(&self) -> &Node {
        &self.cpath
    }

    pub fn body_node(&self) -> Option<&Node> {
        self.body.as_deref()
    }
}

impl ParseNode for ModuleNode {
    fn span(&self) -> Span {
        self.span
    }

    fn child_nodes(&self) -> Vec<&Node> {
        children([Some(&*self.cpath), self.body.as_deref()])
    }
}
