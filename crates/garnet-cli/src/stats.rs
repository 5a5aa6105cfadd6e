use std::collections::BTreeMap;
use std::fmt;

use garnet_syntax::ast::Node;
use garnet_syntax::walk;

/// Shape summary of a parsed tree, printed by `garnet dump --stats`.
#[derive(Debug, PartialEq, Eq)]
pub struct TreeStats {
    pub nodes: usize,
    pub depth: usize,
    /// Node count per variant tag, ordered by tag name.
    pub per_tag: BTreeMap<&'static str, usize>,
}

impl TreeStats {
    pub fn collect(root: &Node) -> Self {
        let mut per_tag = BTreeMap::new();
        for node in walk::preorder(root) {
            *per_tag.entry(node.node_type().as_str()).or_insert(0) += 1;
        }
        Self {
            nodes: walk::count(root),
            depth: walk::depth(root),
            per_tag,
        }
    }
}

impl fmt::Display for TreeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "nodes: {}", self.nodes)?;
        writeln!(f, "depth: {}", self.depth)?;
        for (tag, count) in &self.per_tag {
            writeln!(f, "  {}: {}", tag, count)?;
        }
        Ok(())
    }
}
