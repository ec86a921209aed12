// src/core/command.rs

//! Dispatch and completion: [`Command`] for inner nodes and leaves,
//! [`RootCommand`] for the root and its helper.

use crate::core::availability::AvailabilityRule;
use crate::core::errors::DispatchError;
use crate::core::events::NotificationSink;
use crate::core::helper::Helper;
use crate::core::node::{Node, NodeBase, NodeRef};
use std::fmt;
use std::rc::Rc;

/// The dispatch and completion contract of a command tree node.
///
/// Both operations consume one token per level and recurse into the child whose
/// label matches that token.
pub trait CommandNode<T>: Node<T> + fmt::Debug {
    /// Resolves `args` against the subtree below this node and runs the action
    /// reached, if any.
    ///
    /// Exhausting the tokens is a success. An unknown token or an unavailable
    /// child is reported as a [`DispatchError`].
    fn on_command(&self, args: &[&str]) -> Result<bool, DispatchError>;

    /// Candidates for the last token of `args`. The preceding tokens are
    /// committed selectors. Never fails: dead ends yield an empty list.
    fn on_tab_complete(&self, args: &[&str]) -> Vec<String>;
}

/// Keeps the labels containing `fragment`, in their original order.
pub(crate) fn filter_labels<T>(nodes: &[NodeRef<T>], fragment: &str) -> Vec<String> {
    nodes
        .iter()
        .map(|node| node.label())
        .filter(|label| label.contains(fragment))
        .map(str::to_string)
        .collect()
}

fn last_token<'a>(args: &[&'a str]) -> &'a str {
    args.last().copied().unwrap_or_default()
}

/// Shared descent step: looks `token` up among the children of `node` and
/// recurses with the remaining tokens.
fn dispatch_child<T>(
    node: &dyn CommandNode<T>,
    token: &str,
    rest: &[&str],
) -> Result<bool, DispatchError> {
    let child = node
        .child(token)
        .ok_or_else(|| DispatchError::UnknownArgument {
            label: node.label().to_string(),
            argument: token.to_string(),
            arguments: std::iter::once(token)
                .chain(rest.iter().copied())
                .map(str::to_string)
                .collect(),
        })?;

    if !child.is_available() {
        return Err(DispatchError::ArgumentNotAvailable {
            label: child.label().to_string(),
            argument: token.to_string(),
        });
    }

    log::debug!("'{}' -> '{}' ({} tokens left)", node.label(), token, rest.len());
    child.on_command(rest).map_err(|e| e.within(token))
}

/// Shared completion step once `token` is known to be a committed selector or
/// the fragment being typed.
fn complete_child<T>(
    node: &dyn CommandNode<T>,
    args: &[&str],
    token: &str,
    rest: &[&str],
    extra: Option<&str>,
) -> Vec<String> {
    match node.child(token) {
        // Not a child label: offer every available child matching the fragment.
        None => {
            let fragment = last_token(args);
            let mut candidates = filter_labels(&node.available_children(), fragment);
            if let Some(label) = extra.filter(|label| label.contains(fragment)) {
                candidates.push(label.to_string());
            }
            candidates
        }
        Some(child) if !child.is_available() => Vec::new(),
        Some(child) => child.on_tab_complete(rest),
    }
}

/// An interior or leaf node of a command tree.
pub struct Command<T> {
    base: NodeBase<T>,
}

impl<T: 'static> Command<T> {
    /// An always-available node.
    pub fn new(label: impl Into<String>, explanation: T) -> Self {
        Self {
            base: NodeBase::new(label, explanation),
        }
    }

    /// Installs the availability rule.
    pub fn with_availability(self, rule: AvailabilityRule) -> Self {
        Self {
            base: self.base.with_availability(rule),
        }
    }

    /// Moves the node behind a shared handle, ready to be attached.
    pub fn into_ref(self) -> NodeRef<T> {
        Rc::new(self)
    }
}

impl<T> Node<T> for Command<T> {
    fn base(&self) -> &NodeBase<T> {
        &self.base
    }
}

impl<T> CommandNode<T> for Command<T> {
    fn on_command(&self, args: &[&str]) -> Result<bool, DispatchError> {
        match args.split_first() {
            None => Ok(true),
            Some((token, rest)) => dispatch_child(self, token, rest),
        }
    }

    fn on_tab_complete(&self, args: &[&str]) -> Vec<String> {
        if !self.is_available() {
            return Vec::new();
        }
        match args.split_first() {
            None => Vec::new(),
            Some((token, rest)) => complete_child(self, args, token, rest, None),
        }
    }
}

impl<T> fmt::Debug for Command<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command").field("base", &self.base).finish()
    }
}

/// The entry node of a command tree.
///
/// A root never has a parent, checks its own availability before dispatching,
/// and reserves its helper's label: that token, typed first, is handed to the
/// [`Helper`] instead of being looked up among the children.
pub struct RootCommand<T> {
    base: NodeBase<T>,
    helper: Box<dyn Helper<T>>,
}

impl<T: 'static> RootCommand<T> {
    /// An always-available root with no notification sink.
    pub fn new(label: impl Into<String>, explanation: T, helper: impl Helper<T> + 'static) -> Self {
        Self {
            base: NodeBase::root(label, explanation, None),
            helper: Box::new(helper),
        }
    }

    /// Installs the availability rule.
    pub fn with_availability(self, rule: AvailabilityRule) -> Self {
        Self {
            base: self.base.with_availability(rule),
            helper: self.helper,
        }
    }

    /// Routes every notification raised by this tree to `sink`.
    pub fn with_notifier(self, sink: Rc<dyn NotificationSink>) -> Self {
        Self {
            base: self.base.with_notifier(sink),
            helper: self.helper,
        }
    }

    /// Moves the root behind a shared handle.
    pub fn into_ref(self) -> NodeRef<T> {
        Rc::new(self)
    }
}

impl<T> RootCommand<T> {
    /// The token reserved for the helper.
    pub fn helper_label(&self) -> &str {
        self.helper.label()
    }
}

impl<T> Node<T> for RootCommand<T> {
    fn base(&self) -> &NodeBase<T> {
        &self.base
    }
}

impl<T> CommandNode<T> for RootCommand<T> {
    fn on_command(&self, args: &[&str]) -> Result<bool, DispatchError> {
        if !self.is_available() {
            return Err(DispatchError::NotAvailableCommand {
                label: self.label().to_string(),
            });
        }

        let Some((token, rest)) = args.split_first() else {
            return Ok(true);
        };

        if *token == self.helper.label() {
            log::debug!("'{}' -> helper ({} tokens left)", self.label(), rest.len());
            return Ok(self.helper.on_command(self, rest));
        }

        dispatch_child(self, token, rest)
    }

    fn on_tab_complete(&self, args: &[&str]) -> Vec<String> {
        if !self.is_available() {
            return Vec::new();
        }

        let Some((token, rest)) = args.split_first() else {
            return Vec::new();
        };

        // The helper token alone is still a fragment being typed.
        if *token == self.helper.label() && !rest.is_empty() {
            return self.helper.on_tab_complete(self, rest);
        }

        complete_child(self, args, token, rest, Some(self.helper.label()))
    }
}

impl<T> fmt::Debug for RootCommand<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RootCommand")
            .field("base", &self.base)
            .field("helper", &self.helper.label())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::availability;
    use crate::core::events::{EventBus, NodeEvent};
    use crate::core::helper::CommandHelper;
    use crate::core::node::TreeOps;
    use std::cell::{Cell, RefCell};

    fn root() -> NodeRef<String> {
        RootCommand::new("root", "root".to_string(), CommandHelper::new()).into_ref()
    }

    fn command(label: &str) -> NodeRef<String> {
        Command::new(label, label.to_string()).into_ref()
    }

    fn disabled(label: &str) -> NodeRef<String> {
        Command::new(label, label.to_string())
            .with_availability(availability::constant(false))
            .into_ref()
    }

    // --- Dispatch ---

    #[test]
    fn test_unmatched_dispatch_reports_token() {
        let tree = root();
        tree.add(command("start")).unwrap();

        let result = tree.on_command(&["stop"]);

        assert_eq!(
            result,
            Err(DispatchError::UnknownArgument {
                label: "root".to_string(),
                argument: "stop".to_string(),
                arguments: vec!["stop".to_string()],
            })
        );
    }

    #[test]
    fn test_unknown_argument_carries_full_sequence() {
        let tree = root();
        let server = command("server");
        tree.add(Rc::clone(&server)).unwrap();
        server.add(command("start")).unwrap();

        let result = tree.on_command(&["server", "restart", "--now"]);

        assert_eq!(
            result,
            Err(DispatchError::UnknownArgument {
                label: "server".to_string(),
                argument: "restart".to_string(),
                arguments: vec![
                    "server".to_string(),
                    "restart".to_string(),
                    "--now".to_string()
                ],
            })
        );
    }

    #[test]
    fn test_empty_dispatch_succeeds() {
        let tree = root();
        tree.add(command("start")).unwrap();
        assert_eq!(tree.on_command(&[]), Ok(true));
        assert_eq!(tree.on_command(&["start"]), Ok(true));
    }

    #[test]
    fn test_unavailable_root_fails_dispatch() {
        let tree = RootCommand::new("root", "r".to_string(), CommandHelper::new())
            .with_availability(availability::constant(false))
            .into_ref();

        assert_eq!(
            tree.on_command(&["anything"]),
            Err(DispatchError::NotAvailableCommand {
                label: "root".to_string(),
            })
        );
        assert!(tree.on_tab_complete(&[""]).is_empty());
    }

    #[test]
    fn test_unavailable_child_fails_dispatch() {
        let tree = root();
        let server = command("server");
        tree.add(Rc::clone(&server)).unwrap();
        server.add(disabled("stop")).unwrap();

        assert_eq!(
            tree.on_command(&["server", "stop"]),
            Err(DispatchError::ArgumentNotAvailable {
                label: "stop".to_string(),
                argument: "stop".to_string(),
            })
        );
    }

    #[test]
    fn test_dispatch_is_deterministic() {
        let tree = root();
        tree.add(command("start")).unwrap();
        tree.add(disabled("stop")).unwrap();

        for args in [&["start"][..], &["stop"][..], &["nope", "x"][..]] {
            let first = tree.on_command(args);
            let second = tree.on_command(args);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_interior_nodes_do_not_recheck_themselves() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let tree = root();
        let server = Command::new("server", "s".to_string())
            .with_availability(Rc::new(move || {
                counter.set(counter.get() + 1);
                true
            }))
            .into_ref();
        tree.add(Rc::clone(&server)).unwrap();
        server.add(command("start")).unwrap();
        calls.set(0);

        assert_eq!(tree.on_command(&["server", "start"]), Ok(true));
        assert_eq!(calls.get(), 1);
    }

    // --- Completion ---

    #[test]
    fn test_substring_filter_keeps_insertion_order() {
        let tree = root();
        for label in ["status", "stats", "reset"] {
            tree.add(command(label)).unwrap();
        }

        assert_eq!(tree.on_tab_complete(&["sta"]), vec!["status", "stats"]);
        assert_eq!(tree.on_tab_complete(&["set"]), vec!["reset"]);
        assert_eq!(tree.on_tab_complete(&["at"]), vec!["status", "stats"]);
    }

    #[test]
    fn test_root_offers_helper_label() {
        let tree = root();
        tree.add(command("status")).unwrap();
        tree.add(command("shell")).unwrap();

        assert_eq!(tree.on_tab_complete(&[""]), vec!["status", "shell", "help"]);
        assert_eq!(tree.on_tab_complete(&["el"]), vec!["shell", "help"]);
    }

    #[test]
    fn test_empty_completion_on_unavailable_branch() {
        let tree = root();
        tree.add(command("alpha")).unwrap();
        tree.add(disabled("beta")).unwrap();

        assert!(tree.on_tab_complete(&["beta", ""]).is_empty());
        assert_eq!(tree.on_tab_complete(&[""]), vec!["alpha", "help"]);
    }

    #[test]
    fn test_completion_descends_into_matching_child() {
        let tree = root();
        let server = command("server");
        tree.add(Rc::clone(&server)).unwrap();
        server.add(command("start")).unwrap();
        server.add(command("stop")).unwrap();
        server.add(disabled("status")).unwrap();

        assert_eq!(tree.on_tab_complete(&["server", "st"]), vec!["start", "stop"]);
        assert_eq!(tree.on_tab_complete(&["server", "op"]), vec!["stop"]);
        assert!(tree.on_tab_complete(&["server"]).is_empty());
        assert!(tree.on_tab_complete(&[]).is_empty());
    }

    #[test]
    fn test_completion_candidates_contain_final_token() {
        let tree = root();
        for label in ["list", "last", "load", "blast"] {
            tree.add(command(label)).unwrap();
        }

        for fragment in ["l", "as", "oa", "zz", ""] {
            let candidates = tree.on_tab_complete(&[fragment]);
            assert!(candidates.iter().all(|c| c.contains(fragment)));
            for candidate in &candidates {
                assert!(candidate == "help" || tree.child(candidate).is_some());
            }
        }
    }

    #[test]
    fn test_completion_excludes_unavailable_children() {
        let tree = root();
        tree.add(command("start")).unwrap();
        tree.add(disabled("stop")).unwrap();

        assert_eq!(tree.on_tab_complete(&["st"]), vec!["start"]);
    }

    #[test]
    fn test_helper_token_alone_is_filtered_like_a_fragment() {
        let tree = root();
        tree.add(command("helpdesk")).unwrap();
        tree.add(command("status")).unwrap();

        assert_eq!(tree.on_tab_complete(&["hel"]), vec!["helpdesk", "help"]);
        assert_eq!(tree.on_tab_complete(&["help"]), vec!["helpdesk", "help"]);
        assert_eq!(tree.on_tab_complete(&["help", "st"]), vec!["status"]);
    }

    // --- Notifications ---

    #[test]
    fn test_dispatch_announces_availability_transition() {
        let bus = EventBus::new();
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        bus.subscribe(move |event| sink.borrow_mut().push(event.clone()));
        let tree = RootCommand::new("root", "r".to_string(), CommandHelper::new())
            .with_notifier(bus)
            .into_ref();

        let enabled = Rc::new(Cell::new(true));
        let gate = Rc::clone(&enabled);
        tree.add(
            Command::new("deploy", "d".to_string())
                .with_availability(Rc::new(move || gate.get()))
                .into_ref(),
        )
        .unwrap();
        events.borrow_mut().clear();

        enabled.set(false);
        assert!(tree.on_command(&["deploy"]).is_err());
        assert!(tree.on_command(&["deploy"]).is_err());

        assert_eq!(
            *events.borrow(),
            vec![NodeEvent::AvailabilityChanged {
                node: "deploy".to_string(),
                available: false,
            }]
        );
    }
}
