// src/core/builder.rs

//! Top-down assembly of a command tree.

use crate::core::availability::AvailabilityRule;
use crate::core::command::{Command, RootCommand};
use crate::core::errors::TreeError;
use crate::core::node::{NodeRef, TreeOps};
use crate::core::wrapper::{Completer, Executor, Wrapper};
use std::fmt;

/// Fluent assembly of a command tree below a [`RootCommand`].
///
/// ```
/// use cmdtree::prelude::*;
///
/// let root = TreeBuilder::new(RootCommand::new("app", "demo", CommandHelper::new()))
///     .node(
///         NodeBuilder::new("server", "Manage the server")
///             .child(NodeBuilder::new("start", "Start it").executor(|_| true)),
///     )
///     .build()
///     .unwrap();
/// assert_eq!(root.on_command(&["server", "start"]), Ok(true));
/// ```
pub struct TreeBuilder<T> {
    helper_label: String,
    root: NodeRef<T>,
    pending: Vec<NodeBuilder<T>>,
}

impl<T: 'static> TreeBuilder<T> {
    /// Starts a tree headed by `root`.
    pub fn new(root: RootCommand<T>) -> Self {
        Self {
            helper_label: root.helper_label().to_string(),
            root: root.into_ref(),
            pending: Vec::new(),
        }
    }

    /// Queues a direct child of the root.
    pub fn node(mut self, node: NodeBuilder<T>) -> Self {
        self.pending.push(node);
        self
    }

    /// Attaches every queued node, parents before children, so that each
    /// addition is announced to the root's sink.
    ///
    /// A root-level label equal to the helper label is rejected, as is any
    /// duplicate sibling label.
    pub fn build(self) -> Result<NodeRef<T>, TreeError> {
        for node in self.pending {
            if node.label == self.helper_label {
                return Err(TreeError::ReservedLabel {
                    label: node.label,
                    root: self.root.label().to_string(),
                });
            }
            node.attach(&self.root)?;
        }
        Ok(self.root)
    }
}

impl<T> fmt::Debug for TreeBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeBuilder")
            .field("root", &self.root.label())
            .field("pending", &self.pending)
            .finish()
    }
}

/// Description of one node, its strategies and its children.
pub struct NodeBuilder<T> {
    label: String,
    explanation: T,
    availability: Option<AvailabilityRule>,
    completer: Option<Completer>,
    executor: Option<Executor>,
    children: Vec<NodeBuilder<T>>,
}

impl<T: 'static> NodeBuilder<T> {
    /// An always-available node with no strategy.
    pub fn new(label: impl Into<String>, explanation: impl Into<T>) -> Self {
        Self {
            label: label.into(),
            explanation: explanation.into(),
            availability: None,
            completer: None,
            executor: None,
            children: Vec::new(),
        }
    }

    /// Gates the node behind `rule`.
    pub fn available_when<F>(mut self, rule: F) -> Self
    where
        F: Fn() -> bool + 'static,
    {
        self.availability = Some(std::rc::Rc::new(rule));
        self
    }

    /// Installs a completion strategy.
    pub fn completer<F>(mut self, completer: F) -> Self
    where
        F: Fn(&[&str]) -> Vec<String> + 'static,
    {
        self.completer = Some(Box::new(completer));
        self
    }

    /// Installs an execution strategy.
    pub fn executor<F>(mut self, executor: F) -> Self
    where
        F: Fn(&[&str]) -> bool + 'static,
    {
        self.executor = Some(Box::new(executor));
        self
    }

    /// Queues a child.
    pub fn child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    fn into_node(self) -> (NodeRef<T>, Vec<Self>) {
        let mut command = Command::new(self.label, self.explanation);
        if let Some(rule) = self.availability {
            command = command.with_availability(rule);
        }

        let node = if self.completer.is_none() && self.executor.is_none() {
            command.into_ref()
        } else {
            let mut wrapper = Wrapper::new(command.into_ref());
            if let Some(completer) = self.completer {
                wrapper = wrapper.with_completer(completer);
            }
            if let Some(executor) = self.executor {
                wrapper = wrapper.with_executor(executor);
            }
            wrapper.into_ref()
        };
        (node, self.children)
    }

    fn attach(self, parent: &NodeRef<T>) -> Result<NodeRef<T>, TreeError> {
        let (node, children) = self.into_node();
        parent.add(std::rc::Rc::clone(&node))?;
        for child in children {
            child.attach(&node)?;
        }
        Ok(node)
    }
}

impl<T> fmt::Debug for NodeBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeBuilder")
            .field("label", &self.label)
            .field("completer", &self.completer.is_some())
            .field("executor", &self.executor.is_some())
            .field("children", &self.children)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::events::{EventBus, NodeEvent};
    use crate::core::helper::CommandHelper;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn root() -> RootCommand<String> {
        RootCommand::new("app", "demo".to_string(), CommandHelper::new())
    }

    #[test]
    fn test_build_nested_tree() {
        let tree = TreeBuilder::new(root())
            .node(
                NodeBuilder::new("server", "Manage the server")
                    .child(NodeBuilder::new("start", "Start it"))
                    .child(NodeBuilder::new("stop", "Stop it")),
            )
            .node(NodeBuilder::new("status", "Show status"))
            .build()
            .unwrap();

        let labels: Vec<String> = tree
            .children()
            .iter()
            .map(|node| node.label().to_string())
            .collect();
        assert_eq!(labels, vec!["server", "status"]);
        assert_eq!(tree.child("server").unwrap().children().len(), 2);
        assert_eq!(tree.on_tab_complete(&["server", "s"]), vec!["start", "stop"]);
    }

    #[test]
    fn test_reserved_label_is_rejected_at_root() {
        let result = TreeBuilder::new(root())
            .node(NodeBuilder::new("help", "Shadowing the helper"))
            .build();
        assert_eq!(
            result.unwrap_err(),
            TreeError::ReservedLabel {
                label: "help".to_string(),
                root: "app".to_string(),
            }
        );
    }

    #[test]
    fn test_duplicate_sibling_is_reported() {
        let result = TreeBuilder::new(root())
            .node(NodeBuilder::new("a", "first"))
            .node(NodeBuilder::new("a", "second"))
            .build();
        assert!(matches!(result, Err(TreeError::DuplicateLabel { .. })));
    }

    #[test]
    fn test_every_addition_reaches_root_sink() {
        let bus = EventBus::new();
        let added = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&added);
        bus.subscribe(move |event| {
            if let NodeEvent::Added { node, parent } = event {
                sink.borrow_mut().push(format!("{}<{}", node, parent));
            }
        });

        TreeBuilder::new(root().with_notifier(bus))
            .node(NodeBuilder::new("server", "s").child(NodeBuilder::new("start", "s")))
            .build()
            .unwrap();

        assert_eq!(*added.borrow(), vec!["server<app", "start<server"]);
    }

    #[test]
    fn test_strategies_and_availability_are_installed() {
        let enabled = Rc::new(Cell::new(false));
        let gate = Rc::clone(&enabled);
        let tree = TreeBuilder::new(root())
            .node(
                NodeBuilder::new("deploy", "Deploy")
                    .available_when(move || gate.get())
                    .completer(|_| vec!["prod".to_string(), "staging".to_string()])
                    .executor(|args| args == ["prod"]),
            )
            .build()
            .unwrap();

        assert!(matches!(
            tree.on_command(&["deploy", "prod"]),
            Err(crate::core::errors::DispatchError::ArgumentNotAvailable { .. })
        ));
        assert!(tree.on_tab_complete(&["deploy", ""]).is_empty());

        enabled.set(true);
        assert_eq!(tree.on_command(&["deploy", "prod"]), Ok(true));
        assert_eq!(tree.on_command(&["deploy", "dev"]), Ok(false));
        assert_eq!(tree.on_tab_complete(&["deploy", ""]), vec!["prod", "staging"]);
    }
}
