use super::{children, ArgumentNode, ListNode, NameNode, Node, NodeType, ParseNode};
use crate::span::Span;

/// Method call with an explicit receiver: `recv.name(args)`, `recv&.name`,
/// and binary operators (`a + b` is `a.+(b)`).
#[derive(Debug, Clone, PartialEq)]
pub struct CallNode {
    span: Span,
    receiver: Box<Node>,
    name: String,
    args: Option<Box<Node>>,
    lazy: bool,
}

impl CallNode {
    pub fn new(
        span: Span,
        receiver: Node,
        name: impl Into<String>,
        args: Option<ListNode>,
        lazy: bool,
    ) -> Self {
        Self {
            span,
            receiver: Box::new(receiver),
            name: name.into(),
            args: args.map(|list| Box::new(Node::List(list))),
            lazy,
        }
    }

    pub fn receiver_node(&self) -> &Node {
        &self.receiver
    }

    /// Called with `&.`.
    pub fn is_lazy(&self) -> bool {
        self.lazy
    }

    /// Takes the call apart, for grammar rules that reinterpret a call as
    /// something else (an assignment target).
    pub fn into_parts(self) -> (Span, Node, String, Option<Node>, bool) {
        (
            self.span,
            *self.receiver,
            self.name,
            self.args.map(|args| *args),
            self.lazy,
        )
    }
}

impl NameNode for CallNode {
    fn name(&self) -> &str {
        &self.name
    }
}

impl ArgumentNode for CallNode {
    fn args_node(&self) -> Option<&Node> {
        self.args.as_deref()
    }
}

impl ParseNode for CallNode {
    fn span(&self) -> Span {
        self.span
    }

    fn child_nodes(&self) -> Vec<&Node> {
        children([Some(&*self.receiver), self.args.as_deref()])
    }
}

/// Receiver-less call with arguments or parentheses: `puts(1)`, `puts 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct FCallNode {
    span: Span,
    name: String,
    args: Option<Box<Node>>,
}

impl FCallNode {
    pub fn new(span: Span, name: impl Into<String>, args: Option<ListNode>) -> Self {
        Self {
            span,
            name: name.into(),
            args: args.map(|list| Box::new(Node::List(list))),
        }
    }
}

impl NameNode for FCallNode {
    fn name(&self) -> &str {
        &self.name
    }
}

impl ArgumentNode for FCallNode {
    fn args_node(&self) -> Option<&Node> {
        self.args.as_deref()
    }
}

impl ParseNode for FCallNode {
    fn span(&self) -> Span {
        self.span
    }

    fn child_nodes(&self) -> Vec<&Node> {
        children([self.args.as_deref()])
    }
}

/// Bare identifier that is not a known local variable: `foo`.
#[derive(Debug, Clone, PartialEq)]
pub struct VCallNode {
    span: Span,
    name: String,
}

impl VCallNode {
    pub fn new(span: Span, name: impl Into<String>) -> Self {
        Self {
            span,
            name: name.into(),
        }
    }
}

impl NameNode for VCallNode {
    fn name(&self) -> &str {
        &self.name
    }
}

impl ParseNode for VCallNode {
    fn span(&self) -> Span {
        self.span
    }

    fn child_nodes(&self) -> Vec<&Node> {
        Vec::new()
    }
}

/// Assignment to an attribute or element, lowered to a setter call:
/// `recv.name = v` calls `name=`, `recv[i] = v` calls `[]=`.
///
/// `args_node()` is `None` only for multiple-assignment targets
/// (`a.b, c = 1, 2`), where the value is supplied at run time.
#[derive(Debug, Clone, PartialEq)]
pub struct AttrAssignNode {
    span: Span,
    receiver: Box<Node>,
    name: String,
    args: Option<Box<Node>>,
    lazy: bool,
    is_self: bool,
}

impl AttrAssignNode {
    pub fn new(
        span: Span,
        receiver: Node,
        name: impl Into<String>,
        args: Option<ListNode>,
        lazy: bool,
    ) -> Self {
        let is_self = receiver.node_type() == NodeType::SelfRef;
        Self {
            span,
            receiver: Box::new(receiver),
            name: name.into(),
            args: args.map(|list| Box::new(Node::List(list))),
            lazy,
            is_self,
        }
    }

    /// Starts a node whose arguments are parsed after the receiver and name.
    /// The result is not a [`Node`] until it is finished.
    pub fn builder(
        span: Span,
        receiver: Node,
        name: impl Into<String>,
        lazy: bool,
    ) -> PendingAttrAssign {
        PendingAttrAssign {
            span,
            receiver,
            name: name.into(),
            lazy,
        }
    }

    pub fn receiver_node(&self) -> &Node {
        &self.receiver
    }

    /// Assigned through `&.`.
    pub fn is_lazy(&self) -> bool {
        self.lazy
    }

    /// Whether the receiver is `self`, fixed at construction.
    pub fn is_self(&self) -> bool {
        self.is_self
    }
}

impl NameNode for AttrAssignNode {
    fn name(&self) -> &str {
        &self.name
    }
}

impl ArgumentNode for AttrAssignNode {
    fn args_node(&self) -> Option<&Node> {
        self.args.as_deref()
    }
}

impl ParseNode for AttrAssignNode {
    fn span(&self) -> Span {
        self.span
    }

    fn child_nodes(&self) -> Vec<&Node> {
        children([Some(&*self.receiver), self.args.as_deref()])
    }
}

/// An attribute assignment whose arguments have not been attached yet.
#[derive(Debug)]
#[must_use = "a pending attribute assignment is only a node once finished"]
pub struct PendingAttrAssign {
    span: Span,
    receiver: Node,
    name: String,
    lazy: bool,
}

impl PendingAttrAssign {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Finishes the node with its argument list; the span is widened to cover
    /// the arguments.
    pub fn with_args(self, args: ListNode) -> AttrAssignNode {
        let span = self.span.to(args.span());
        AttrAssignNode::new(span, self.receiver, self.name, Some(args), self.lazy)
    }

    /// Finishes the node with no arguments at all.
    pub fn without_args(self) -> AttrAssignNode {
        AttrAssignNode::new(self.span, self.receiver, self.name, None, self.lazy)
    }
}

/// `yield`, `yield(a, b)`
#[derive(Debug, Clone, PartialEq)]
pub struct YieldNode {
    span: Span,
    args: Option<Box<Node>>,
}

impl YieldNode {
    pub fn new(span: Span, args: Option<ListNode>) -> Self {
        Self {
            span,
            args: args.map(|list| Box::new(Node::List(list))),
        }
    }
}

impl ArgumentNode for YieldNode {
    fn args_node(&self) -> Option<&Node> {
        self.args.as_deref()
    }
}

impl ParseNode for YieldNode {
    fn span(&self) -> Span {
        self.span
    }

    fn child_nodes(&self) -> Vec<&Node> {
        children([self.args.as_deref()])
    }
}
