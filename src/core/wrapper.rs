// src/core/wrapper.rs

//! A decorator that gives an existing node its own completion and execution.

use crate::core::command::CommandNode;
use crate::core::errors::DispatchError;
use crate::core::node::{Node, NodeBase, NodeRef};
use std::fmt;
use std::rc::Rc;

/// A leaf completion strategy: remaining tokens in, ordered candidates out.
pub type Completer = Box<dyn Fn(&[&str]) -> Vec<String>>;

/// A leaf execution strategy: remaining tokens in, success flag out.
pub type Executor = Box<dyn Fn(&[&str]) -> bool>;

/// A decorator over any node.
///
/// Structure, identity and availability are those of the wrapped node. Dispatch
/// and completion go to the installed strategies when present, and to the
/// wrapped node otherwise.
pub struct Wrapper<T> {
    inner: NodeRef<T>,
    completer: Option<Completer>,
    executor: Option<Executor>,
}

impl<T: 'static> Wrapper<T> {
    /// Wraps `inner` with no strategy installed.
    pub fn new(inner: NodeRef<T>) -> Self {
        Self {
            inner,
            completer: None,
            executor: None,
        }
    }

    /// Answers completion requests with `completer` instead of the wrapped node.
    pub fn with_completer<F>(mut self, completer: F) -> Self
    where
        F: Fn(&[&str]) -> Vec<String> + 'static,
    {
        self.completer = Some(Box::new(completer));
        self
    }

    /// Ends dispatch here and runs `executor` on the remaining tokens.
    pub fn with_executor<F>(mut self, executor: F) -> Self
    where
        F: Fn(&[&str]) -> bool + 'static,
    {
        self.executor = Some(Box::new(executor));
        self
    }

    /// The decorated node.
    pub fn inner(&self) -> &NodeRef<T> {
        &self.inner
    }

    /// Moves the wrapper behind a shared handle, ready to be attached.
    pub fn into_ref(self) -> NodeRef<T> {
        Rc::new(self)
    }
}

impl<T> Node<T> for Wrapper<T> {
    fn base(&self) -> &NodeBase<T> {
        self.inner.base()
    }
}

impl<T> CommandNode<T> for Wrapper<T> {
    fn on_command(&self, args: &[&str]) -> Result<bool, DispatchError> {
        match &self.executor {
            Some(executor) => {
                log::debug!("Running executor of '{}' with {:?}", self.label(), args);
                Ok(executor(args))
            }
            None => self.inner.on_command(args),
        }
    }

    fn on_tab_complete(&self, args: &[&str]) -> Vec<String> {
        match &self.completer {
            Some(completer) => completer(args),
            None => self.inner.on_tab_complete(args),
        }
    }
}

impl<T> fmt::Debug for Wrapper<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wrapper")
            .field("inner", self.inner.base())
            .field("completer", &self.completer.is_some())
            .field("executor", &self.executor.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::command::{Command, RootCommand};
    use crate::core::helper::CommandHelper;
    use crate::core::node::{TreeOps, same_node};
    use std::cell::RefCell;

    fn root() -> NodeRef<String> {
        RootCommand::new("root", "r".to_string(), CommandHelper::new()).into_ref()
    }

    #[test]
    fn test_plain_wrapper_behaves_like_wrapped_node() {
        let tree = root();
        let inner = Command::new("server", "s".to_string()).into_ref();
        let wrapped = Wrapper::new(Rc::clone(&inner)).into_ref();
        tree.add(Rc::clone(&wrapped)).unwrap();
        wrapped
            .add(Command::new("start", "s".to_string()).into_ref())
            .unwrap();
        wrapped
            .add(Command::new("status", "s".to_string()).into_ref())
            .unwrap();

        assert!(same_node(&wrapped, &inner));
        assert_eq!(inner.children().len(), 2);
        assert_eq!(
            tree.on_tab_complete(&["server", "st"]),
            inner.on_tab_complete(&["st"])
        );
        assert_eq!(tree.on_command(&["server", "start"]), Ok(true));
        assert!(matches!(
            tree.on_command(&["server", "restart"]),
            Err(DispatchError::UnknownArgument { .. })
        ));
    }

    #[test]
    fn test_children_attached_through_wrapper_point_back_to_it() {
        let tree = root();
        let wrapped = Wrapper::new(Command::new("server", "s".to_string()).into_ref()).into_ref();
        tree.add(Rc::clone(&wrapped)).unwrap();
        let child = Command::new("start", "s".to_string()).into_ref();
        wrapped.add(Rc::clone(&child)).unwrap();

        assert!(same_node(&child.parent().unwrap(), &wrapped));
        assert!(same_node(&child.root(), &tree));
    }

    #[test]
    fn test_executor_receives_remaining_tokens() {
        let tree = root();
        let received = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&received);
        let leaf = Wrapper::new(Command::new("echo", "e".to_string()).into_ref())
            .with_executor(move |args| {
                sink.borrow_mut()
                    .extend(args.iter().map(|arg| arg.to_string()));
                args.len() == 2
            })
            .into_ref();
        tree.add(leaf).unwrap();

        assert_eq!(tree.on_command(&["echo", "hello", "world"]), Ok(true));
        assert_eq!(*received.borrow(), vec!["hello", "world"]);
        assert_eq!(tree.on_command(&["echo", "once"]), Ok(false));
    }

    #[test]
    fn test_completer_replaces_child_completion() {
        let tree = root();
        let leaf = Wrapper::new(Command::new("color", "c".to_string()).into_ref())
            .with_completer(|args| {
                let fragment = args.last().copied().unwrap_or_default();
                ["red", "green", "grey"]
                    .iter()
                    .filter(|color| color.contains(fragment))
                    .map(|color| color.to_string())
                    .collect()
            })
            .into_ref();
        tree.add(leaf).unwrap();

        assert_eq!(tree.on_tab_complete(&["color", "gr"]), vec!["green", "grey"]);
        assert_eq!(tree.on_tab_complete(&["color", "e"]), vec!["red", "green", "grey"]);
    }
}
