// src/core/graph_display.rs

//! ASCII rendering of a command tree.

use crate::core::node::NodeRef;
use std::fmt::{self, Write};

/// Renders an ASCII tree of `root` and every descendant, marking the nodes
/// whose availability rule currently evaluates to `false`.
///
/// Rendering queries availability, so transitions seen here are announced
/// like any other.
pub fn render_tree<T: fmt::Display>(root: &NodeRef<T>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}{}", describe(root), marker(root));

    let children = root.children();
    let count = children.len();
    for (i, child) in children.iter().enumerate() {
        render_node(&mut out, child, "", i + 1 == count);
    }
    out
}

/// Prints [`render_tree`] to stdout.
pub fn display_tree<T: fmt::Display>(root: &NodeRef<T>) {
    print!("{}", render_tree(root));
}

fn describe<T: fmt::Display>(node: &NodeRef<T>) -> String {
    format!("{} - {}", node.label(), node.explanation())
}

fn marker<T>(node: &NodeRef<T>) -> &'static str {
    if node.is_available() {
        ""
    } else {
        " (unavailable)"
    }
}

/// Recursive function to print a tree node and its descendants.
fn render_node<T: fmt::Display>(out: &mut String, node: &NodeRef<T>, prefix: &str, is_last: bool) {
    let connector = if is_last { "└─" } else { "├─" };
    let _ = writeln!(out, "{}{}{}{}", prefix, connector, describe(node), marker(node));

    // Prepare the prefix for the children of this node
    let child_prefix = format!("{}{}", prefix, if is_last { "   " } else { "│  " });

    let children = node.children();
    let count = children.len();
    for (i, child) in children.iter().enumerate() {
        render_node(out, child, &child_prefix, i + 1 == count);
    }
}
