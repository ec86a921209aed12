// src/core/errors.rs

//! Structural and dispatch errors of the command tree.

use thiserror::Error;

/// Errors raised while mutating the shape of a command tree.
///
/// Every variant leaves the tree exactly as it was before the failed call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("A node is already registered for label \"{label}\" under \"{parent}\".")]
    /// A sibling already uses the label.
    DuplicateLabel {
        /// The rejected label.
        label: String,
        /// The node that already has a child with that label.
        parent: String,
    },

    #[error("The root node \"{label}\" has no parent and cannot be attached to one.")]
    /// Roots are never attached.
    RootHasParent {
        /// The root that was offered as a child.
        label: String,
    },

    #[error("The node \"{label}\" is already attached to \"{parent}\". Remove it first.")]
    /// The node has a parent already.
    AlreadyAttached {
        /// The attached node.
        label: String,
        /// Its current parent.
        parent: String,
    },

    #[error("Attaching \"{label}\" under \"{parent}\" would make a node its own ancestor.")]
    /// The target parent is the node itself or one of its descendants.
    Cycle {
        /// The node being attached.
        label: String,
        /// The target parent.
        parent: String,
    },

    #[error("The label \"{label}\" is reserved for the helper of the root \"{root}\".")]
    /// The label belongs to the helper of the root.
    ReservedLabel {
        /// The reserved label.
        label: String,
        /// The root the helper belongs to.
        root: String,
    },
}

/// Errors raised by `on_command` when a token sequence cannot be dispatched.
///
/// Completion never produces these: it degrades to an empty candidate list.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("The command \"{label}\" is not available (yet?).")]
    /// The root itself is unavailable.
    NotAvailableCommand {
        /// The root label.
        label: String,
    },

    #[error(
        "Argument \"{argument}\" not found for command \"{label}\". Given arguments: {}",
        .arguments.join(" ")
    )]
    /// No child matches the token.
    UnknownArgument {
        /// The node whose children were searched.
        label: String,
        /// The unmatched token.
        argument: String,
        /// The full token sequence that was dispatched.
        arguments: Vec<String>,
    },

    #[error("The argument \"{argument}\" associated to the command \"{label}\" is not available.")]
    /// The matching child is unavailable.
    ArgumentNotAvailable {
        /// The node whose child was matched.
        label: String,
        /// The token naming the unavailable child.
        argument: String,
    },
}

impl DispatchError {
    /// Re-prefixes a token consumed by an enclosing level, so that the
    /// diagnostic of `UnknownArgument` always shows the full original sequence.
    pub(crate) fn within(self, token: &str) -> Self {
        match self {
            Self::UnknownArgument {
                label,
                argument,
                mut arguments,
            } => {
                arguments.insert(0, token.to_string());
                Self::UnknownArgument {
                    label,
                    argument,
                    arguments,
                }
            }
            other => other,
        }
    }
}
