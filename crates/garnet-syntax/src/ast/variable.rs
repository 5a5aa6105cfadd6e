use super::{AssignableNode, NameNode, Node, ParseNode};
use crate::span::Span;

/// Generates a variable read node and its matching assignment node.
macro_rules! variable_nodes {
    ($(#[$read_doc:meta])* $read:ident, $(#[$asgn_doc:meta])* $asgn:ident) => {
        $(#[$read_doc])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $read {
            span: Span,
            name: String,
        }

        impl $read {
            pub fn new(span: Span, name: impl Into<String>) -> Self {
                Self {
                    span,
                    name: name.into(),
                }
            }
        }

        impl NameNode for $read {
            fn name(&self) -> &str {
                &self.name
            }
        }

        impl ParseNode for $read {
            fn span(&self) -> Span {
                self.span
            }

            fn child_nodes(&self) -> Vec<&Node> {
                Vec::new()
            }
        }

        $(#[$asgn_doc])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $asgn {
            span: Span,
            name: String,
            value: Box<Node>,
        }

        impl $asgn {
            pub fn new(span: Span, name: impl Into<String>, value: Node) -> Self {
                Self {
                    span,
                    name: name.into(),
                    value: Box::new(value),
                }
            }
        }

        impl NameNode for $asgn {
            fn name(&self) -> &str {
                &self.name
            }
        }

        impl AssignableNode for $asgn {
            fn value_node(&self) -> &Node {
                &self.value
            }
        }

        impl ParseNode for $asgn {
            fn span(&self) -> Span {
                self.span
            }

            fn child_nodes(&self) -> Vec<&Node> {
                vec![&*self.value]
            }
        }
    };
}

variable_nodes!(
    /// Read of a local variable assigned earlier in the same scope.
    LocalVarNode,
    /// `name = value`
    LocalAsgnNode
);
variable_nodes!(
    /// `@name`
    InstVarNode,
    /// `@name = value`
    InstAsgnNode
);
variable_nodes!(
    /// `$name`
    GlobalVarNode,
    /// `$name = value`
    GlobalAsgnNode
);
variable_nodes!(
    /// `@@name`
    ClassVarNode,
    /// `@@name = value`
    ClassVarAsgnNode
);

/// `a, @b, c.d = value`
///
/// Targets are reads (`LocalVar`, `InstVar`, `GlobalVar`, `ClassVar`, `Const`)
/// or argument-less `AttrAssign` nodes; the grammar engine enforces this.
#[derive(Debug, Clone, PartialEq)]
pub struct MultipleAsgnNode {
    span: Span,
    targets: Vec<Node>,
    value: Box<Node>,
}

impl MultipleAsgnNode {
    pub fn new(span: Span, targets: Vec<Node>, value: Node) -> Self {
        Self {
            span,
            targets,
            value: Box::new(value),
        }
    }

    pub fn targets(&self) -> &[Node] {
        &self.targets
    }
}

impl AssignableNode for MultipleAsgnNode {
    fn value_node(&self) -> &Node {
        &self.value
    }
}

impl ParseNode for MultipleAsgnNode {
    fn span(&self) -> Span {
        self.span
    }

    fn child_nodes(&self) -> Vec<&Node> {
        self.targets
            .iter()
            .chain(std::iter::once(&*self.value))
            .collect()
    }
}
