//! Syntax tree for the Garnet front end.
//!
//! Every syntactic construct has its own node struct carrying exactly the
//! fields relevant to it. The structs are unified under the [`Node`] sum type,
//! which provides the variant tag ([`Node::node_type`]), the generic child
//! enumeration ([`Node::child_nodes`]) and visitor dispatch ([`Node::accept`]).
//!
//! Nodes are immutable once built: fields are private and exposed through
//! accessors. A node owns its children exclusively, so a tree can be shared
//! read-only between threads once construction is finished.
//!
//! # Examples
//!
//! ```rust
//! use garnet_syntax::ast::*;
//! use garnet_syntax::Span;
//!
//! let span = Span::new(0, 7, 1);
//! let receiver = Node::from(SelfNode::new(Span::new(0, 4, 1)));
//! let node = AttrAssignNode::builder(span, receiver, "x=", false)
//!     .with_args(ListNode::new(span, vec![FixnumNode::new(span, 1).into()]));
//!
//! assert!(node.is_self());
//! assert_eq!(Node::from(node).child_nodes().len(), 2);
//! ```

mod call;
mod constant;
mod control;
mod definition;
mod literal;
mod variable;

pub use call::*;
pub use constant::*;
pub use control::*;
pub use definition::*;
pub use literal::*;
pub use variable::*;

use std::fmt;

use thiserror::Error;

use crate::span::Span;
use crate::visitor::Visitor;

/// Behavior every concrete node struct provides.
pub trait ParseNode {
    fn span(&self) -> Span;

    /// Direct owned children in construct-defined order, absent optional
    /// children omitted.
    fn child_nodes(&self) -> Vec<&Node>;
}

/// Nodes that carry a name: variables, constants, calls, definitions.
pub trait NameNode {
    fn name(&self) -> &str;
}

/// Nodes that carry an argument list.
pub trait ArgumentNode {
    /// The `List` node holding the arguments, if any were given.
    fn args_node(&self) -> Option<&Node>;
}

/// Nodes that assign a value to something.
pub trait AssignableNode {
    fn value_node(&self) -> &Node;
}

/// Violations of a node constructor's contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NodeError {
    #[error("constant declaration needs a name or a name-bearing path")]
    MissingConstName,
    #[error("{0} node cannot be used as a constant path, it has no name")]
    NamelessPath(NodeType),
}

/// Collects the present children, dropping absent optional ones.
pub(crate) fn children<'a, const N: usize>(nodes: [Option<&'a Node>; N]) -> Vec<&'a Node> {
    nodes.into_iter().flatten().collect()
}

/// Declares the closed variant set. Each line names the tag, the node struct
/// and the visitor method that handles it; the tag enum, the `Node` sum type
/// and the dispatch table are all generated from this one list.
macro_rules! node_variants {
    ($($variant:ident($node:ident) => $visit:ident,)*) => {
        /// Variant tag identifying which construct a [`Node`] represents.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum NodeType {
            $($variant,)*
        }

        impl NodeType {
            pub const ALL: &'static [NodeType] = &[$(NodeType::$variant,)*];

            pub fn as_str(self) -> &'static str {
                match self {
                    $(NodeType::$variant => stringify!($variant),)*
                }
            }
        }

        /// A syntax tree node.
        #[derive(Debug, Clone, PartialEq)]
        pub enum Node {
            $($variant($node),)*
        }

        impl Node {
            pub fn node_type(&self) -> NodeType {
                match self {
                    $(Node::$variant(_) => NodeType::$variant,)*
                }
            }

            pub fn span(&self) -> Span {
                match self {
                    $(Node::$variant(node) => node.span(),)*
                }
            }

            pub fn child_nodes(&self) -> Vec<&Node> {
                match self {
                    $(Node::$variant(node) => node.child_nodes(),)*
                }
            }

            /// Invokes the visitor method matching this node's variant.
            pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
                match self {
                    $(Node::$variant(node) => visitor.$visit(node),)*
                }
            }
        }

        $(
            impl From<$node> for Node {
                fn from(node: $node) -> Self {
                    Node::$variant(node)
                }
            }
        )*
    };
}

node_variants! {
    Root(RootNode) => visit_root,
    Block(BlockNode) => visit_block,
    Nil(NilNode) => visit_nil,
    True(TrueNode) => visit_true,
    False(FalseNode) => visit_false,
    SelfRef(SelfNode) => visit_self,
    Fixnum(FixnumNode) => visit_fixnum,
    Float(FloatNode) => visit_float,
    Str(StrNode) => visit_str,
    Symbol(SymbolNode) => visit_symbol,
    Array(ArrayNode) => visit_array,
    List(ListNode) => visit_list,
    LocalVar(LocalVarNode) => visit_local_var,
    LocalAsgn(LocalAsgnNode) => visit_local_asgn,
    InstVar(InstVarNode) => visit_inst_var,
    InstAsgn(InstAsgnNode) => visit_inst_asgn,
    GlobalVar(GlobalVarNode) => visit_global_var,
    GlobalAsgn(GlobalAsgnNode) => visit_global_asgn,
    ClassVar(ClassVarNode) => visit_class_var,
    ClassVarAsgn(ClassVarAsgnNode) => visit_class_var_asgn,
    MultipleAsgn(MultipleAsgnNode) => visit_multiple_asgn,
    Const(ConstNode) => visit_const,
    Colon2(Colon2Node) => visit_colon2,
    Colon3(Colon3Node) => visit_colon3,
    ConstDecl(ConstDeclNode) => visit_const_decl,
    Call(CallNode) => visit_call,
    FCall(FCallNode) => visit_fcall,
    VCall(VCallNode) => visit_vcall,
    AttrAssign(AttrAssignNode) => visit_attr_assign,
    Not(NotNode) => visit_not,
    And(AndNode) => visit_and,
    Or(OrNode) => visit_or,
    If(IfNode) => visit_if,
    While(WhileNode) => visit_while,
    Until(UntilNode) => visit_until,
    Return(ReturnNode) => visit_return,
    Yield(YieldNode) => visit_yield,
    Def(DefNode) => visit_def,
    Args(ArgsNode) => visit_args,
    Class(ClassNode) => visit_class,
    Module(ModuleNode) => visit_module,
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Node {
    pub fn as_name_node(&self) -> Option<&dyn NameNode> {
        let named: &dyn NameNode = match self {
            Node::Symbol(n) => n,
            Node::LocalVar(n) => n,
            Node::LocalAsgn(n) => n,
            Node::InstVar(n) => n,
            Node::InstAsgn(n) => n,
            Node::GlobalVar(n) => n,
            Node::GlobalAsgn(n) => n,
            Node::ClassVar(n) => n,
            Node::ClassVarAsgn(n) => n,
            Node::Const(n) => n,
            Node::Colon2(n) => n,
            Node::Colon3(n) => n,
            Node::ConstDecl(n) => n,
            Node::Call(n) => n,
            Node::FCall(n) => n,
            Node::VCall(n) => n,
            Node::AttrAssign(n) => n,
            Node::Def(n) => n,
            _ => return None,
        };
        Some(named)
    }

    pub fn as_argument_node(&self) -> Option<&dyn ArgumentNode> {
        let node: &dyn ArgumentNode = match self {
            Node::Call(n) => n,
            Node::FCall(n) => n,
            Node::AttrAssign(n) => n,
            Node::Yield(n) => n,
            _ => return None,
        };
        Some(node)
    }

    pub fn as_assignable_node(&self) -> Option<&dyn AssignableNode> {
        let node: &dyn AssignableNode = match self {
            Node::LocalAsgn(n) => n,
            Node::InstAsgn(n) => n,
            Node::GlobalAsgn(n) => n,
            Node::ClassVarAsgn(n) => n,
            Node::ConstDecl(n) => n,
            Node::MultipleAsgn(n) => n,
            _ => return None,
        };
        Some(node)
    }

    /// The node's name, when it has the [`NameNode`] capability.
    pub fn name(&self) -> Option<&str> {
        self.as_name_node().map(|named| named.name())
    }

    pub fn is(&self, tag: NodeType) -> bool {
        self.node_type() == tag
    }
}

#[cfg(test)]
mod tests;
