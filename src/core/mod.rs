//! # Command Tree Core
//!
//! The engine behind the command tree, independent of any transport.
//!
//! ## Modules
//!
//! - **`node`**: the structural model. Labels, payloads, ordered children,
//!   parent/root linkage and the `add`/`remove` operations.
//! - **`availability`**: availability predicates and transition detection.
//! - **`command`**: the recursive dispatch (`on_command`) and completion
//!   (`on_tab_complete`) algorithms, for interior nodes and for roots.
//! - **`helper`**: the reserved `help` pseudo-child of a root.
//! - **`wrapper`**: the decorator used to attach leaf completion/execution
//!   strategies without a new node type.
//! - **`events`**: the notifications raised on structural and availability changes.
//! - **`builder`**: fluent tree assembly.
//! - **`parsing`**: token converters for leaf handlers.
//! - **`graph_display`**: ASCII rendering of a tree.

pub mod availability;
pub mod builder;
pub mod command;
pub mod errors;
pub mod events;
pub mod graph_display;
pub mod helper;
pub mod node;
pub mod parsing;
pub mod wrapper;
