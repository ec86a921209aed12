//! # Node Structure
//!
//! The structural half of the command tree: identity, payload, ordered children,
//! parent/root linkage and availability with change detection.
//!
//! Nodes are shared through [`NodeRef`] handles. A parent owns strong handles to
//! its children, in insertion order, and every child keeps a weak handle back to
//! its parent. A node with no parent is the root of its (sub)tree.
//!
//! Structure can only change through [`TreeOps::add`] and [`TreeOps::remove`];
//! the linkage hooks on [`NodeBase`] are private to this crate.

use crate::constants::ALL_CHILDREN;
use crate::core::availability::{self, Availability, AvailabilityRule};
use crate::core::command::CommandNode;
use crate::core::errors::TreeError;
use crate::core::events::{NodeEvent, NotificationSink};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// A shared handle to any node of a command tree.
pub type NodeRef<T> = Rc<dyn CommandNode<T>>;

type ParentLink<T> = Weak<dyn CommandNode<T>>;

/// Whether a node may ever be attached under a parent.
enum Role {
    Child,
    Root {
        sink: Option<Rc<dyn NotificationSink>>,
    },
}

/// The state shared by every node implementation.
///
/// Concrete nodes embed one `NodeBase` and expose it through [`Node::base`];
/// decorators forward to the base of the node they wrap.
pub struct NodeBase<T> {
    label: String,
    explanation: T,
    role: Role,
    availability: Availability,
    children: RefCell<Vec<NodeRef<T>>>,
    parent: RefCell<Option<ParentLink<T>>>,
}

impl<T> NodeBase<T> {
    /// A node that can be attached under a parent.
    pub fn new(label: impl Into<String>, explanation: T) -> Self {
        Self::with_role(label.into(), explanation, Role::Child)
    }

    /// A node that rejects every parent. `sink` receives the notifications of
    /// the whole tree below it.
    pub fn root(
        label: impl Into<String>,
        explanation: T,
        sink: Option<Rc<dyn NotificationSink>>,
    ) -> Self {
        Self::with_role(label.into(), explanation, Role::Root { sink })
    }

    fn with_role(label: String, explanation: T, role: Role) -> Self {
        Self {
            label,
            explanation,
            role,
            availability: Availability::new(availability::constant(true)),
            children: RefCell::new(Vec::new()),
            parent: RefCell::new(None),
        }
    }

    /// Installs the initial availability rule while the node is being built.
    /// The rule is evaluated once to seed the transition detector.
    pub fn with_availability(mut self, rule: AvailabilityRule) -> Self {
        self.availability = Availability::new(rule);
        self
    }

    /// Routes the notifications of the tree headed by this root to `sink`.
    /// Has no effect on non-root nodes, which resolve their root's sink.
    pub(crate) fn with_notifier(mut self, sink: Rc<dyn NotificationSink>) -> Self {
        if let Role::Root { sink: slot } = &mut self.role {
            *slot = Some(sink);
        }
        self
    }

    /// The label, unique among siblings.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The opaque payload.
    pub fn explanation(&self) -> &T {
        &self.explanation
    }

    /// `true` for nodes built with [`NodeBase::root`].
    pub fn is_root(&self) -> bool {
        matches!(self.role, Role::Root { .. })
    }

    /// The parent, or `None` when this node heads its tree.
    pub fn parent(&self) -> Option<NodeRef<T>> {
        self.parent.borrow().as_ref().and_then(Weak::upgrade)
    }

    /// A snapshot of the children, in insertion order. Mutating the returned
    /// vector never affects the tree.
    pub fn children(&self) -> Vec<NodeRef<T>> {
        self.children.borrow().clone()
    }

    /// The direct child labeled `label`.
    pub fn child(&self, label: &str) -> Option<NodeRef<T>> {
        self.children
            .borrow()
            .iter()
            .find(|child| child.label() == label)
            .cloned()
    }

    /// Number of direct children.
    pub fn len(&self) -> usize {
        self.children.borrow().len()
    }

    /// Returns `true` for leaves.
    pub fn is_empty(&self) -> bool {
        self.children.borrow().is_empty()
    }

    /// Evaluates the availability rule. A transition raises
    /// [`NodeEvent::AvailabilityChanged`] before the fresh value is returned.
    pub fn is_available(&self) -> bool {
        let (available, changed) = self.availability.evaluate();
        if changed {
            self.emit(NodeEvent::AvailabilityChanged {
                node: self.label.clone(),
                available,
            });
        }
        available
    }

    /// Replaces the availability rule. Nothing is evaluated or raised here.
    pub fn set_available(&self, rule: AvailabilityRule) {
        self.availability.set_rule(rule);
    }

    /// The sink of the root this node currently belongs to.
    pub(crate) fn notifier(&self) -> Option<Rc<dyn NotificationSink>> {
        match &self.role {
            Role::Root { sink } => sink.clone(),
            Role::Child => self.parent().and_then(|parent| parent.base().notifier()),
        }
    }

    pub(crate) fn emit(&self, event: NodeEvent) {
        log::debug!("{}", event);
        if let Some(sink) = self.notifier() {
            sink.notify(&event);
        }
    }

    pub(crate) fn link_parent(&self, parent: ParentLink<T>) -> Result<(), TreeError> {
        if self.is_root() {
            return Err(TreeError::RootHasParent {
                label: self.label.clone(),
            });
        }
        *self.parent.borrow_mut() = Some(parent);
        Ok(())
    }

    pub(crate) fn unlink_parent(&self) {
        self.parent.borrow_mut().take();
    }

    pub(crate) fn push_child(&self, node: NodeRef<T>) {
        self.children.borrow_mut().push(node);
    }

    pub(crate) fn take_child(&self, label: &str) -> Option<NodeRef<T>> {
        let mut children = self.children.borrow_mut();
        let position = children.iter().position(|child| child.label() == label)?;
        Some(children.remove(position))
    }
}

impl<T> fmt::Debug for NodeBase<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let children: Vec<String> = self
            .children
            .borrow()
            .iter()
            .map(|child| child.label().to_string())
            .collect();
        let parent = self.parent().map(|parent| parent.label().to_string());
        f.debug_struct("NodeBase")
            .field("label", &self.label)
            .field("root", &self.is_root())
            .field("parent", &parent)
            .field("children", &children)
            .field("availability", &self.availability)
            .finish()
    }
}

/// The structural contract every node fulfils.
///
/// Implementors only provide [`Node::base`]; every other method forwards to it.
pub trait Node<T> {
    /// The state backing this node.
    fn base(&self) -> &NodeBase<T>;

    /// See [`NodeBase::label`].
    fn label<'a>(&'a self) -> &'a str
    where
        T: 'a,
    {
        self.base().label()
    }

    /// See [`NodeBase::explanation`].
    fn explanation(&self) -> &T {
        self.base().explanation()
    }

    /// See [`NodeBase::parent`].
    fn parent(&self) -> Option<NodeRef<T>> {
        self.base().parent()
    }

    /// See [`NodeBase::children`].
    fn children(&self) -> Vec<NodeRef<T>> {
        self.base().children()
    }

    /// See [`NodeBase::child`].
    fn child(&self, label: &str) -> Option<NodeRef<T>> {
        self.base().child(label)
    }

    /// See [`NodeBase::is_available`].
    fn is_available(&self) -> bool {
        self.base().is_available()
    }

    /// See [`NodeBase::set_available`].
    fn set_available(&self, rule: AvailabilityRule) {
        self.base().set_available(rule);
    }

    /// The available direct children, in insertion order.
    fn available_children(&self) -> Vec<NodeRef<T>> {
        self.children()
            .into_iter()
            .filter(|child| child.is_available())
            .collect()
    }
}

/// Structural operations on node handles.
pub trait TreeOps<T> {
    /// Attaches `node` as the last child of this node.
    ///
    /// Fails, leaving the tree untouched, if a sibling already carries the same
    /// label, if `node` is a root, if `node` already has a parent, or if `node`
    /// is this node or one of its ancestors.
    fn add(&self, node: NodeRef<T>) -> Result<(), TreeError>;

    /// Detaches the child labeled `label` and returns it. Unknown labels are
    /// silently ignored.
    fn remove(&self, label: &str) -> Option<NodeRef<T>>;

    /// The topmost ancestor, or this node when it has no parent.
    fn root(&self) -> NodeRef<T>;

    /// Every node of this subtree, this node included, labeled `label`.
    /// [`ALL_CHILDREN`] matches every label.
    ///
    /// Order: this node, then its direct children, then the descendants of each
    /// child depth-first, following the same pattern level by level.
    fn children_by_label(&self, label: &str) -> Vec<NodeRef<T>>;
}

impl<T: 'static> TreeOps<T> for NodeRef<T> {
    fn add(&self, node: NodeRef<T>) -> Result<(), TreeError> {
        let base = self.base();

        if base.child(node.label()).is_some() {
            return Err(TreeError::DuplicateLabel {
                label: node.label().to_string(),
                parent: base.label().to_string(),
            });
        }
        if node.base().is_root() {
            return Err(TreeError::RootHasParent {
                label: node.label().to_string(),
            });
        }
        if let Some(current) = node.parent() {
            return Err(TreeError::AlreadyAttached {
                label: node.label().to_string(),
                parent: current.label().to_string(),
            });
        }
        if is_ancestor_or_self(&node, self) {
            return Err(TreeError::Cycle {
                label: node.label().to_string(),
                parent: base.label().to_string(),
            });
        }

        node.base().link_parent(Rc::downgrade(self))?;
        base.push_child(Rc::clone(&node));
        base.emit(NodeEvent::Added {
            node: node.label().to_string(),
            parent: base.label().to_string(),
        });
        Ok(())
    }

    fn remove(&self, label: &str) -> Option<NodeRef<T>> {
        let base = self.base();
        let removed = base.take_child(label)?;
        removed.base().unlink_parent();
        base.emit(NodeEvent::Removed {
            node: removed.label().to_string(),
            former_parent: base.label().to_string(),
        });
        Some(removed)
    }

    fn root(&self) -> NodeRef<T> {
        let mut current = Rc::clone(self);
        while let Some(parent) = current.parent() {
            current = parent;
        }
        current
    }

    fn children_by_label(&self, label: &str) -> Vec<NodeRef<T>> {
        let mut found = Vec::new();
        if matches_label(self, label) {
            found.push(Rc::clone(self));
        }
        collect_descendants(self, label, &mut found);
        found
    }
}

/// Two handles designate the same node when they share the same base, which
/// also holds for a decorator and the node it wraps.
pub fn same_node<T>(a: &NodeRef<T>, b: &NodeRef<T>) -> bool {
    std::ptr::eq(a.base(), b.base())
}

fn is_ancestor_or_self<T>(candidate: &NodeRef<T>, node: &NodeRef<T>) -> bool {
    let mut current = Some(Rc::clone(node));
    while let Some(step) = current {
        if same_node(candidate, &step) {
            return true;
        }
        current = step.parent();
    }
    false
}

fn matches_label<T>(node: &NodeRef<T>, label: &str) -> bool {
    label == ALL_CHILDREN || node.label() == label
}

fn collect_descendants<T>(node: &NodeRef<T>, label: &str, found: &mut Vec<NodeRef<T>>) {
    let children = node.children();
    found.extend(
        children
            .iter()
            .filter(|child| matches_label(child, label))
            .cloned(),
    );
    for child in &children {
        collect_descendants(child, label, found);
    }
}
