//! Debug utilities: pretty-printing and invariant verification.
//!
//! Kept out of the hot path entirely — these walk the tree with owned
//! accumulators and `println!`, fine for tests and troubleshooting but
//! wasteful in `search`/`insert`.

use super::node::{Child, Node, NodeType};
use super::Tree;

impl<V: std::fmt::Debug> Tree<V> {
    /// Print the tree structure to stdout for interactive debugging.
    pub fn debug_print(&self) {
        println!("=== tree: {} leaves, {} nodes ===", self.count(), self.node_count());
        match &self.root {
            Some(child) => debug_child(child, 0),
            None => println!("(empty)"),
        }
    }
}

fn debug_child<V: std::fmt::Debug>(child: &Child<V>, depth: usize) {
    let indent = "  ".repeat(depth);
    match child {
        Child::Leaf(leaf) => {
            println!("{}leaf {:?} -> {:?}", indent, String::from_utf8_lossy(&leaf.key), leaf.value);
        }
        Child::Inner(node) => {
            let header = node.header();
            println!(
                "{}{:?} (partial_len={}, children={})",
                indent,
                node.node_type(),
                header.partial_len,
                node.num_children()
            );
            for (byte, c) in node.iter_children() {
                println!("{}  [{:#04x}] ->", indent, byte);
                debug_child(c, depth + 2);
            }
        }
    }
}

/// One violated structural invariant, found by [`Tree::verify_integrity`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrityIssue(pub String);

impl<V> Tree<V> {
    /// Walk the whole tree checking structural invariants: no node holds
    /// more children than its layout's capacity, no non-root adaptive
    /// layout is under-populated for its tier (it should have shrunk or
    /// collapsed), and the live leaf count matches [`Tree::count`].
    /// Intended for tests, not the hot path.
    pub fn verify_integrity(&self) -> Vec<IntegrityIssue> {
        let mut issues = Vec::new();
        let mut leaves = 0u64;
        if let Some(child) = &self.root {
            verify_child(child, true, &mut issues, &mut leaves);
        }
        if leaves != self.count {
            issues.push(IntegrityIssue(format!(
                "counted {leaves} live leaves by walking the tree but Tree::count() reports {}",
                self.count
            )));
        }
        issues
    }
}

fn verify_child<V>(child: &Child<V>, is_root: bool, issues: &mut Vec<IntegrityIssue>, leaves: &mut u64) {
    match child {
        Child::Leaf(_) => *leaves += 1,
        Child::Inner(node) => verify_node(node, is_root, issues, leaves),
    }
}

fn verify_node<V>(node: &Node<V>, is_root: bool, issues: &mut Vec<IntegrityIssue>, leaves: &mut u64) {
    let n = node.num_children();
    let (min_normally, max_allowed) = match node.node_type() {
        NodeType::N4 => (2, 4),
        NodeType::N16 => (5, 16),
        NodeType::N48 => (17, 48),
        NodeType::N256 => (49, 256),
    };
    if n > max_allowed {
        issues.push(IntegrityIssue(format!("{:?} has {n} children, capacity is {max_allowed}", node.node_type())));
    }
    if !is_root && n < min_normally {
        issues.push(IntegrityIssue(format!(
            "non-root {:?} has only {n} children, below its normal minimum of {min_normally} (should have shrunk or collapsed)",
            node.node_type()
        )));
    }
    if is_root && n < 1 {
        issues.push(IntegrityIssue(format!("root {:?} has no children", node.node_type())));
    }
    for (_, c) in node.iter_children() {
        verify_child(c, false, issues, leaves);
    }
}

#[cfg(test)]
mod tests {
    use super::super::Tree;

    #[test]
    fn fresh_tree_has_no_issues() {
        let mut t: Tree<u64> = Tree::new();
        for i in 0..200u64 {
            t.insert(&i.to_be_bytes(), i);
        }
        for i in (0..200u64).step_by(3) {
            t.delete(&i.to_be_bytes());
        }
        assert!(t.verify_integrity().is_empty(), "{:?}", t.verify_integrity());
    }
}
