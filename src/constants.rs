// src/constants.rs

//! Reserved tokens and configuration file names.

/// The token a root reserves for its helper.
pub const HELP_LABEL: &str = "help";

/// The label value matching every node in `children_by_label`.
pub const ALL_CHILDREN: &str = "*";

/// The name of the directory holding cmdtree configuration (inside the user config dir).
pub const CONFIG_DIR_NAME: &str = "cmdtree";

/// The name of the default tree definition file (inside the config directory).
pub const TREE_CONFIG_FILENAME: &str = "tree.toml";

/// Prefix of the console's own commands, kept apart from tree labels.
pub const META_PREFIX: char = ':';
