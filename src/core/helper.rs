// src/core/helper.rs

//! The `help` pseudo-child of a root.

use crate::constants::HELP_LABEL;
use crate::core::command::{CommandNode, filter_labels};
use crate::core::node::NodeRef;
use colored::*;
use std::cell::RefCell;
use std::fmt;
use std::io::{self, Write};
use std::rc::Rc;

/// Renders one node for the helper.
pub type Displayer<T> = Box<dyn Fn(&dyn CommandNode<T>)>;

/// An output shared by the helper, leaf actions and whoever reads what they print.
pub type SharedWriter = Rc<RefCell<dyn Write>>;

/// A [`SharedWriter`] over stdout.
pub fn stdout_writer() -> SharedWriter {
    Rc::new(RefCell::new(io::stdout()))
}

/// The pseudo-child a root reserves under a fixed label to document its
/// subtree instead of dispatching to it.
///
/// `source` is the node whose children are documented, always the root that
/// owns the helper. The reserved token itself is already consumed from `args`.
pub trait Helper<T> {
    /// The reserved token.
    fn label(&self) -> &str {
        HELP_LABEL
    }

    /// Displays documentation for the path named by `args`.
    fn on_command(&self, source: &dyn CommandNode<T>, args: &[&str]) -> bool;

    /// Candidates for the last token of `args`, among the descendants of `source`.
    fn on_tab_complete(&self, source: &dyn CommandNode<T>, args: &[&str]) -> Vec<String>;
}

/// The default helper: prints `label - explanation` lines, or hands each node
/// to a custom displayer.
pub struct CommandHelper<T> {
    displayer: Displayer<T>,
}

impl<T: fmt::Display + 'static> CommandHelper<T> {
    /// A helper printing to stdout.
    pub fn new() -> Self {
        Self::writing_to(stdout_writer())
    }

    /// A helper printing `label - explanation` lines to `out`.
    pub fn writing_to(out: SharedWriter) -> Self {
        Self {
            displayer: Box::new(move |node: &dyn CommandNode<T>| {
                let _ = writeln!(
                    out.borrow_mut(),
                    "{} - {}",
                    node.label().cyan().bold(),
                    node.explanation()
                );
            }),
        }
    }
}

impl<T: fmt::Display + 'static> Default for CommandHelper<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> CommandHelper<T> {
    /// A helper rendering nodes through `displayer`.
    pub fn with_displayer<F>(displayer: F) -> Self
    where
        F: Fn(&dyn CommandNode<T>) + 'static,
    {
        Self {
            displayer: Box::new(displayer),
        }
    }

    fn display(&self, node: &dyn CommandNode<T>) {
        (self.displayer)(node);
    }

    fn display_available_children(&self, node: &dyn CommandNode<T>) {
        for child in node.available_children() {
            self.display(&*child);
        }
    }
}

/// Walks `path` from `source`, one token per level.
fn resolve<T>(source: &dyn CommandNode<T>, path: &[&str]) -> Option<NodeRef<T>> {
    let (first, rest) = path.split_first()?;
    let mut current = source.child(first)?;
    for token in rest {
        let next = current.child(token)?;
        current = next;
    }
    Some(current)
}

fn complete_below<T>(node: &dyn CommandNode<T>, args: &[&str]) -> Vec<String> {
    let Some((token, rest)) = args.split_first() else {
        return Vec::new();
    };
    match node.child(token) {
        None => {
            let fragment = args.last().copied().unwrap_or_default();
            filter_labels(&node.available_children(), fragment)
        }
        Some(child) if !child.is_available() => Vec::new(),
        Some(child) => complete_below(&*child, rest),
    }
}

impl<T> Helper<T> for CommandHelper<T> {
    fn on_command(&self, source: &dyn CommandNode<T>, args: &[&str]) -> bool {
        match resolve(source, args) {
            Some(node) => {
                self.display(&*node);
                self.display_available_children(&*node);
            }
            None => {
                if !args.is_empty() {
                    log::debug!("Help path {:?} unresolved below '{}'", args, source.label());
                }
                self.display_available_children(source);
            }
        }
        true
    }

    fn on_tab_complete(&self, source: &dyn CommandNode<T>, args: &[&str]) -> Vec<String> {
        complete_below(source, args)
    }
}

impl<T> fmt::Debug for CommandHelper<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandHelper")
            .field("label", &HELP_LABEL)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::availability;
    use crate::core::command::{Command, RootCommand};
    use crate::core::node::TreeOps;

    /// root -> { server -> { start, stop(unavailable) }, status }
    fn recorded_tree() -> (NodeRef<String>, Rc<RefCell<Vec<String>>>) {
        let shown = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&shown);
        let helper = CommandHelper::with_displayer(move |node: &dyn CommandNode<String>| {
            sink.borrow_mut()
                .push(format!("{}={}", node.label(), node.explanation()));
        });
        let root = RootCommand::new("root", "the root".to_string(), helper).into_ref();
        let server = Command::new("server", "manage the server".to_string()).into_ref();
        root.add(Rc::clone(&server)).unwrap();
        root.add(Command::new("status", "show status".to_string()).into_ref())
            .unwrap();
        server
            .add(Command::new("start", "start it".to_string()).into_ref())
            .unwrap();
        server
            .add(
                Command::new("stop", "stop it".to_string())
                    .with_availability(availability::constant(false))
                    .into_ref(),
            )
            .unwrap();
        (root, shown)
    }

    #[test]
    fn test_help_alone_lists_available_children() {
        let (root, shown) = recorded_tree();
        assert_eq!(root.on_command(&["help"]), Ok(true));
        assert_eq!(
            *shown.borrow(),
            vec!["server=manage the server", "status=show status"]
        );
    }

    #[test]
    fn test_help_on_path_shows_node_then_available_children() {
        let (root, shown) = recorded_tree();
        assert_eq!(root.on_command(&["help", "server"]), Ok(true));
        assert_eq!(
            *shown.borrow(),
            vec!["server=manage the server", "start=start it"]
        );
    }

    #[test]
    fn test_help_on_unresolved_path_falls_back_to_children() {
        let (root, shown) = recorded_tree();
        assert_eq!(root.on_command(&["help", "server", "restart"]), Ok(true));
        assert_eq!(
            *shown.borrow(),
            vec!["server=manage the server", "status=show status"]
        );
    }

    #[test]
    fn test_help_completion_is_scoped_to_source() {
        let (root, _) = recorded_tree();
        assert_eq!(root.on_tab_complete(&["help", "s"]), vec!["server", "status"]);
        assert_eq!(root.on_tab_complete(&["help", "server", "st"]), vec!["start"]);
        assert_eq!(root.on_tab_complete(&["help", "server", "stop", ""]), Vec::<String>::new());
        assert!(
            !root
                .on_tab_complete(&["help", "e"])
                .contains(&HELP_LABEL.to_string())
        );
    }

    #[test]
    fn test_default_displayer_writes_to_shared_output() {
        colored::control::set_override(false);
        let buffer = Rc::new(RefCell::new(Vec::<u8>::new()));
        let root = RootCommand::new(
            "root",
            "the root".to_string(),
            CommandHelper::writing_to(Rc::clone(&buffer) as SharedWriter),
        )
        .into_ref();
        root.add(Command::new("status", "show status".to_string()).into_ref())
            .unwrap();

        assert_eq!(root.on_command(&["help"]), Ok(true));

        let output = String::from_utf8(buffer.borrow().clone()).unwrap();
        assert_eq!(output, "status - show status\n");
    }

    #[test]
    fn test_bare_help_token_completes_at_root_level() {
        let (root, _) = recorded_tree();
        assert_eq!(root.on_tab_complete(&["help"]), vec!["help"]);
        assert!(root.on_tab_complete(&["help", ""]).contains(&"server".to_string()));
    }
}
