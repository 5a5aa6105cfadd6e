use super::{NameNode, Node, ParseNode};
use crate::span::Span;

macro_rules! keyword_node {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name {
            span: Span,
        }

        impl $name {
            pub fn new(span: Span) -> Self {
                Self { span }
            }
        }

        impl ParseNode for $name {
            fn span(&self) -> Span {
                self.span
            }

            fn child_nodes(&self) -> Vec<&Node> {
                Vec::new()
            }
        }
    };
}

keyword_node!(
    /// `nil`
    NilNode
);
keyword_node!(
    /// `true`
    TrueNode
);
keyword_node!(
    /// `false`
    FalseNode
);
keyword_node!(
    /// `self`
    SelfNode
);

/// Integer literal that fits in 64 bits.
#[derive(Debug, Clone, PartialEq)]
pub struct FixnumNode {
    span: Span,
    value: i64,
}

impl FixnumNode {
    pub fn new(span: Span, value: i64) -> Self {
        Self { span, value }
    }

    pub fn value(&self) -> i64 {
        self.value
    }
}

impl ParseNode for FixnumNode {
    fn span(&self) -> Span {
        self.span
    }

    fn child_nodes(&self) -> Vec<&Node> {
        Vec::new()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FloatNode {
    span: Span,
    value: f64,
}

impl FloatNode {
    pub fn new(span: Span, value: f64) -> Self {
        Self { span, value }
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

impl ParseNode for FloatNode {
    fn span(&self) -> Span {
        self.span
    }

    fn child_nodes(&self) -> Vec<&Node> {
        Vec::new()
    }
}

/// String literal with escapes already resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct StrNode {
    span: Span,
    value: String,
}

impl StrNode {
    pub fn new(span: Span, value: impl Into<String>) -> Self {
        Self {
            span,
            value: value.into(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl ParseNode for StrNode {
    fn span(&self) -> Span {
        self.span
    }

    fn child_nodes(&self) -> Vec<&Node> {
        Vec::new()
    }
}

/// `:name`
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolNode {
    span: Span,
    name: String,
}

impl SymbolNode {
    pub fn new(span: Span, name: impl Into<String>) -> Self {
        Self {
            span,
            name: name.into(),
        }
    }
}

impl NameNode for SymbolNode {
    fn name(&self) -> &str {
        &self.name
    }
}

impl ParseNode for SymbolNode {
    fn span(&self) -> Span {
        self.span
    }

    fn child_nodes(&self) -> Vec<&Node> {
        Vec::new()
    }
}

/// Array literal: `[1, 2]`, `%w(a b)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayNode {
    span: Span,
    elements: Vec<Node>,
}

impl ArrayNode {
    pub fn new(span: Span, elements: Vec<Node>) -> Self {
        Self { span, elements }
    }

    pub fn elements(&self) -> &[Node] {
        &self.elements
    }
}

impl ParseNode for ArrayNode {
    fn span(&self) -> Span {
        self.span
    }

    fn child_nodes(&self) -> Vec<&Node> {
        self.elements.iter().collect()
    }
}

/// Argument list of a call, attribute assignment or `yield`.
#[derive(Debug, Clone, PartialEq)]
pub struct ListNode {
    span: Span,
    items: Vec<Node>,
}

impl ListNode {
    pub fn new(span: Span, items: Vec<Node>) -> Self {
        Self { span, items }
    }

    pub fn items(&self) -> &[Node] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_items(self) -> Vec<Node> {
        self.items
    }
}

impl ParseNode for ListNode {
    fn span(&self) -> Span {
        self.span
    }

    fn child_nodes(&self) -> Vec<&Node> {
        self.items.iter().collect()
    }
}
