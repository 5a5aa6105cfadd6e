//! Variant-agnostic tree walks built on [`Node::child_nodes`].
//!
//! ```rust
//! use garnet_syntax::ast::*;
//! use garnet_syntax::{walk, Span};
//!
//! let span = Span::new(0, 5, 1);
//! let list = ListNode::new(span, vec![FixnumNode::new(span, 1).into()]);
//! let call: Node = FCallNode::new(span, "p", Some(list)).into();
//!
//! assert_eq!(walk::count(&call), 3);
//! assert_eq!(walk::depth(&call), 3);
//! assert_eq!(walk::dump(&call), "FCall p\n  List\n    Fixnum 1\n");
//! ```

use std::fmt::Write;

use crate::ast::{NameNode, Node};

/// Pre-order iterator: a node first, then its children left to right.
pub struct Preorder<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.child_nodes().into_iter().rev());
        Some(node)
    }
}

pub fn preorder(root: &Node) -> Preorder<'_> {
    Preorder { stack: vec![root] }
}

/// Number of nodes in the tree, `root` included.
pub fn count(root: &Node) -> usize {
    preorder(root).count()
}

/// Length of the longest root-to-leaf path; a lone leaf has depth 1.
pub fn depth(root: &Node) -> usize {
    let mut deepest = 0;
    let mut stack = vec![(root, 1)];
    while let Some((node, level)) = stack.pop() {
        deepest = deepest.max(level);
        stack.extend(node.child_nodes().into_iter().map(|child| (child, level + 1)));
    }
    deepest
}

/// One line per node, indented two spaces per level: the tag, then the
/// node's literal value or name when it has one.
pub fn dump(root: &Node) -> String {
    let mut out = String::new();
    let mut stack = vec![(root, 0)];
    while let Some((node, level)) = stack.pop() {
        out.push_str(&"  ".repeat(level));
        out.push_str(node.node_type().as_str());
        if let Some(detail) = detail(node) {
            out.push(' ');
            out.push_str(&detail);
        }
        out.push('\n');
        stack.extend(node.child_nodes().into_iter().rev().map(|child| (child, level + 1)));
    }
    out
}

fn detail(node: &Node) -> Option<String> {
    let mut text = String::new();
    match node {
        Node::Fixnum(n) => write!(text, "{}", n.value()).ok()?,
        Node::Float(n) => write!(text, "{:?}", n.value()).ok()?,
        Node::Str(n) => write!(text, "{:?}", n.value()).ok()?,
        Node::Symbol(n) => write!(text, ":{}", n.name()).ok()?,
        Node::Root(n) => write!(text, "{}", n.file()).ok()?,
        _ => text.push_str(node.name()?),
    }
    Some(text)
}
