use super::{children, Node, ParseNode};
use crate::span::Span;

/// Top of every parsed file.
#[derive(Debug, Clone, PartialEq)]
pub struct RootNode {
    span: Span,
    file: String,
    body: Option<Box<Node>>,
}

impl RootNode {
    pub fn new(span: Span, file: impl Into<String>, body: Option<Node>) -> Self {
        Self {
            span,
            file: file.into(),
            body: body.map(Box::new),
        }
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    /// `None` for an empty file.
    pub fn body_node(&self) -> Option<&Node> {
        self.body.as_deref()
    }
}

impl ParseNode for RootNode {
    fn span(&self) -> Span {
        self.span
    }

    fn child_nodes(&self) -> Vec<&Node> {
        children([self.body.as_deref()])
    }
}

/// Sequence of two or more statements. A single statement is never wrapped.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockNode {
    span: Span,
    statements: Vec<Node>,
}

impl BlockNode {
    pub fn new(span: Span, statements: Vec<Node>) -> Self {
        debug_assert!(statements.len() >= 2, "single statements are not wrapped in a block");
        Self { span, statements }
    }

    pub fn statements(&self) -> &[Node] {
        &self.statements
    }
}

impl ParseNode for BlockNode {
    fn span(&self) -> Span {
        self.span
    }

    fn child_nodes(&self) -> Vec<&Node> {
        self.statements.iter().collect()
    }
}

/// `!value`, `not value`
#[derive(Debug, Clone, PartialEq)]
pub struct NotNode {
    span: Span,
    value: Box<Node>,
}

impl NotNode {
    pub fn new(span: Span, value: Node) -> Self {
        Self {
            span,
            value: Box::new(value),
        }
    }

    pub fn value_node(&self) -> &Node {
        &self.value
    }
}

impl ParseNode for NotNode {
    fn span(&self) -> Span {
        self.span
    }

    fn child_nodes(&self) -> Vec<&Node> {
        vec![&*self.value]
    }
}

macro_rules! logical_node {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name {
            span: Span,
            first: Box<Node>,
            second: Box<Node>,
        }

        impl $name {
            pub fn new(span: Span, first: Node, second: Node) -> Self {
                Self {
                    span,
                    first: Box::new(first),
                    second: Box::new(second),
                }
            }

            pub fn first_node(&self) -> &Node {
                &self.first
            }

            pub fn second_node(&self) -> &Node {
                &self.second
            }
        }

        impl ParseNode for $name {
            fn span(&self) -> Span {
                self.span
            }

            fn child_nodes(&self) -> Vec<&Node> {
                vec![&*self.first, &*self.second]
            }
        }
    };
}

logical_node!(
    /// `a && b`, `a and b`
    AndNode
);
logical_node!(
    /// `a || b`, `a or b`
    OrNode
);

/// `if`/`elsif`/`else`, `unless` (branches swapped) and the modifier forms.
#[derive(Debug, Clone, PartialEq)]
pub struct IfNode {
    span: Span,
    condition: Box<Node>,
    then_body: Option<Box<Node>>,
    else_body: Option<Box<Node>>,
}

impl IfNode {
    pub fn new(
        span: Span,
        condition: Node,
        then_body: Option<Node>,
        else_body: Option<Node>,
    ) -> Self {
        Self {
            span,
            condition: Box::new(condition),
            then_body: then_body.map(Box::new),
            else_body: else_body.map(Box::new),
        }
    }

    pub fn condition(&self) -> &Node {
        &self.condition
    }

    pub fn then_body(&self) -> Option<&Node> {
        self.then_body.as_deref()
    }

    pub fn else_body(&self) -> Option<&Node> {
        self.else_body.as_deref()
    }
}

impl ParseNode for IfNode {
    fn span(&self) -> Span {
        self.span
    }

    fn child_nodes(&self) -> Vec<&Node> {
        children([
            Some(&*self.condition),
            self.then_body.as_deref(),
            self.else_body.as_deref(),
        ])
    }
}

macro_rules! loop_node {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name {
            span: Span,
            condition: Box<Node>,
            body: Option<Box<Node>>,
        }

        impl $name {
            pub fn new(span: Span, condition: Node, body: Option<Node>) -> Self {
                Self {
                    span,
                    condition: Box::new(condition),
                    body: body.map(Box::new),
                }
            }

            pub fn condition(&self) -> &Node {
                &self.condition
            }

            pub fn body_node(&self) -> Option<&Node> {
                self.body.as_deref()
            }
        }

        impl ParseNode for $name {
            fn span(&self) -> Span {
                self.span
            }

            fn child_nodes(&self) -> Vec<&Node> {
                children([Some(&*self.condition), self.body.as_deref()])
            }
        }
    };
}

loop_node!(
    /// `while cond ... end`, `body while cond`
    WhileNode
);
loop_node!(
    /// `until cond ... end`, `body until cond`
    UntilNode
);

/// `return`, `return value`
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnNode {
    span: Span,
    value: Option<Box<Node>>,
}

impl ReturnNode {
    pub fn new(span: Span, value: Option<Node>) -> Self {
        Self {
            span,
            value: value.map(Box::new),
        }
    }

    pub fn value_node(&self) -> Option<&Node> {
        self.value.as_deref()
    }
}

impl ParseNode for ReturnNode {
    fn span(&self) -> Span {
        self.span
    }

    fn child_nodes(&self) -> Vec<&Node> {
        children([self.value.as_deref()])
    }
}
