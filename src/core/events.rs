//! # Tree Notifications
//!
//! The command tree raises three kinds of notifications: a node was added, a node
//! was removed, and a node's availability changed. The tree never owns a global
//! dispatcher. Instead, a root node is given a [`NotificationSink`] at construction
//! and every node in its tree resolves that sink by walking up to the root.
//! Detached subtrees therefore raise nothing.
//!
//! [`EventBus`] is the provided sink: an ordered list of callbacks invoked
//! synchronously, in registration order.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// A structural or state change in a command tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeEvent {
    /// `node` was attached under `parent`.
    Added {
        /// Label of the attached node.
        node: String,
        /// Label of its new parent.
        parent: String,
    },
    /// `node` was detached from `former_parent`.
    Removed {
        /// Label of the detached node.
        node: String,
        /// Label of the parent it left.
        former_parent: String,
    },
    /// The availability predicate of `node` now evaluates to `available`.
    AvailabilityChanged {
        /// Label of the node.
        node: String,
        /// The new answer of its predicate.
        available: bool,
    },
}

impl NodeEvent {
    /// The label of the node the event is about.
    pub fn node(&self) -> &str {
        match self {
            Self::Added { node, .. }
            | Self::Removed { node, .. }
            | Self::AvailabilityChanged { node, .. } => node,
        }
    }
}

impl fmt::Display for NodeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added { node, parent } => write!(f, "node '{}' added to '{}'", node, parent),
            Self::Removed {
                node,
                former_parent,
            } => write!(f, "node '{}' removed from '{}'", node, former_parent),
            Self::AvailabilityChanged { node, available } => {
                let state = if *available { "available" } else { "unavailable" };
                write!(f, "node '{}' is now {}", node, state)
            }
        }
    }
}

/// Receives the notifications raised by a command tree.
pub trait NotificationSink {
    /// Called synchronously, on the thread that mutated or queried the tree.
    fn notify(&self, event: &NodeEvent);
}

type Listener = Rc<dyn Fn(&NodeEvent)>;

/// A callback list. Listeners run in registration order.
#[derive(Default)]
pub struct EventBus {
    listeners: RefCell<Vec<Listener>>,
}

impl EventBus {
    /// Creates an empty bus, ready to be shared with a root node.
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Registers a listener.
    pub fn subscribe<F>(&self, listener: F)
    where
        F: Fn(&NodeEvent) + 'static,
    {
        self.listeners.borrow_mut().push(Rc::new(listener));
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Returns `true` if nobody listens.
    pub fn is_empty(&self) -> bool {
        self.listeners.borrow().is_empty()
    }
}

impl NotificationSink for EventBus {
    fn notify(&self, event: &NodeEvent) {
        // Snapshot first: a listener may subscribe while being notified.
        let listeners: Vec<Listener> = self.listeners.borrow().iter().cloned().collect();
        for listener in listeners {
            listener(event);
        }
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.len())
            .finish()
    }
}
