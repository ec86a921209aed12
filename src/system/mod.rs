//! # System Interaction Layer
//!
//! The boundary between the command tree engine and the outside world: the
//! configuration file a tree is assembled from, and the terminal it is driven by.
//!
//! ## Modules
//!
//! - **`tree_config`**: Loads (or generates on first run) the `tree.toml` definition and
//!   assembles a `RootCommand<String>` from it, wiring availability rules, argument
//!   validation and completion suggestions onto the leaves.
//! - **`console`**: An interactive line console. Splits input lines shell-style, dispatches
//!   them to the tree and answers completion queries through `:`-prefixed meta commands.

pub mod console;
pub mod tree_config;
