//! # cmdtree
//!
//! A labeled command tree for interactive command lines. Each node names one
//! token; a token sequence is dispatched by descending one level per token, and
//! the candidates for the token being typed are computed the same way.
//!
//! Nodes carry a dynamic availability rule: unavailable branches can neither be
//! dispatched to nor offered as completions, and every change in availability
//! (like every structural change) is announced to the sink injected at the root.
//!
//! ```
//! use cmdtree::prelude::*;
//!
//! let root = RootCommand::new("app", "demo", CommandHelper::new()).into_ref();
//! root.add(Command::new("status", "Show status").into_ref()).unwrap();
//! root.add(Command::new("stats", "Show statistics").into_ref()).unwrap();
//!
//! assert_eq!(root.on_tab_complete(&["sta"]), vec!["status", "stats"]);
//! assert_eq!(root.on_command(&["status"]), Ok(true));
//! ```

pub mod cli;
pub mod constants;
pub mod core;
pub mod models;
pub mod system;

/// The types and traits needed to build and drive a tree.
pub mod prelude {
    pub use crate::core::availability::{AvailabilityRule, constant};
    pub use crate::core::builder::{NodeBuilder, TreeBuilder};
    pub use crate::core::command::{Command, CommandNode, RootCommand};
    pub use crate::core::errors::{DispatchError, TreeError};
    pub use crate::core::events::{EventBus, NodeEvent, NotificationSink};
    pub use crate::core::helper::{CommandHelper, Helper};
    pub use crate::core::node::{Node, NodeRef, TreeOps};
    pub use crate::core::wrapper::Wrapper;
}
