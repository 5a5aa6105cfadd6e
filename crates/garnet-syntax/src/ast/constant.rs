use super::{children, AssignableNode, NameNode, Node, NodeError, ParseNode};
use crate::span::Span;

/// Bare constant reference: `Foo`
#[derive(Debug, Clone, PartialEq)]
pub struct ConstNode {
    span: Span,
    name: String,
}

impl ConstNode {
    pub fn new(span: Span, name: impl Into<String>) -> Self {
        Self {
            span,
            name: name.into(),
        }
    }
}

impl NameNode for ConstNode {
    fn name(&self) -> &str {
        &self.name
    }
}

impl ParseNode for ConstNode {
    fn span(&self) -> Span {
        self.span
    }

    fn child_nodes(&self) -> Vec<&Node> {
        Vec::new()
    }
}

/// Scoped constant reference: `Foo::Bar`
#[derive(Debug, Clone, PartialEq)]
pub struct Colon2Node {
    span: Span,
    left: Box<Node>,
    name: String,
}

impl Colon2Node {
    pub fn new(span: Span, left: Node, name: impl Into<String>) -> Self {
        Self {
            span,
            left: Box::new(left),
            name: name.into(),
        }
    }

    /// The scope the constant is looked up in (`Foo` in `Foo::Bar`).
    pub fn left_node(&self) -> &Node {
        &self.left
    }
}

impl NameNode for Colon2Node {
    fn name(&self) -> &str {
        &self.name
    }
}

impl ParseNode for Colon2Node {
    fn span(&self) -> Span {
        self.span
    }

    fn child_nodes(&self) -> Vec<&Node> {
        vec![&*self.left]
    }
}

/// Top-level constant reference: `::Foo`
#[derive(Debug, Clone, PartialEq)]
pub struct Colon3Node {
    span: Span,
    name: String,
}

impl Colon3Node {
    pub fn new(span: Span, name: impl Into<String>) -> Self {
        Self {
            span,
            name: name.into(),
        }
    }
}

impl NameNode for Colon3Node {
    fn name(&self) -> &str {
        &self.name
    }
}

impl ParseNode for Colon3Node {
    fn span(&self) -> Span {
        self.span
    }

    fn child_nodes(&self) -> Vec<&Node> {
        Vec::new()
    }
}

/// Declaration (and assignment) of a constant: `FOO = 1`, `Foo::BAR = 1`.
///
/// The target is a plain name, a name-bearing path node (`Colon2` or
/// `Colon3`), or both. When both are present the plain name wins.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstDeclNode {
    span: Span,
    name: Option<String>,
    path: Option<Box<Node>>,
    value: Box<Node>,
}

impl ConstDeclNode {
    /// Fails when neither a non-empty `name` nor a `path` is given, or when
    /// the path node has no name of its own.
    ///
    /// An empty `name` counts as no name at all, so with a path present the
    /// declaration is named after the path.
    pub fn new(
        span: Span,
        name: Option<String>,
        path: Option<Node>,
        value: Node,
    ) -> Result<Self, NodeError> {
        let name = name.filter(|name| !name.is_empty());
        if let Some(path) = &path {
            if path.as_name_node().is_none() {
                return Err(NodeError::NamelessPath(path.node_type()));
            }
        } else if name.is_none() {
            return Err(NodeError::MissingConstName);
        }
        Ok(Self {
            span,
            name,
            path: path.map(Box::new),
            value: Box::new(value),
        })
    }

    /// The full target path (`Foo::BAR` in `Foo::BAR = 1`), if one was given.
    pub fn const_node(&self) -> Option<&Node> {
        self.path.as_deref()
    }

    /// The scope the constant is declared in: the left side of a `Colon2`
    /// path. `None` for plain names and top-level `::NAME` paths.
    pub fn scope_node(&self) -> Option<&Node> {
        match self.path.as_deref() {
            Some(Node::Colon2(path)) => Some(path.left_node()),
            _ => None,
        }
    }
}

impl NameNode for ConstDeclNode {
    /// The rightmost element of the target (`BAR` in `Foo::BAR`).
    fn name(&self) -> &str {
        match (&self.name, &self.path) {
            (Some(name), _) => name,
            // `new` guarantees a path without a plain name is a NameNode.
            (None, Some(path)) => path.name().unwrap_or_default(),
            (None, None) => "",
        }
    }
}

impl AssignableNode for ConstDeclNode {
    fn value_node(&self) -> &Node {
        &self.value
    }
}

impl ParseNode for ConstDeclNode {
    fn span(&self) -> Span {
        self.span
    }

    fn child_nodes(&self) -> Vec<&Node> {
        children([self.path.as_deref(), Some(&*self.value)])
    }
}
