// src/models.rs

//! The serde models of `tree.toml`.

use serde::{Deserialize, Serialize};

// --- Tree Definition Models ---
// These mirror the TOML file a command tree is assembled from.

/// The top-level table of a tree definition: the root node and its children.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TreeConfig {
    /// Label of the root, also used as the console prompt.
    pub label: String,
    /// Shown by the helper for the root.
    #[serde(default)]
    pub explanation: String,
    /// Top-level commands.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<CommandConfig>,
}

/// One `[[commands]]` entry, possibly nesting its own `[[commands]]`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CommandConfig {
    /// The token that selects this entry.
    pub label: String,
    /// Shown by the helper.
    #[serde(default)]
    pub explanation: String,

    /// A static switch. `false` keeps the node permanently unavailable.
    #[serde(default = "default_available")]
    pub available: bool,

    /// The node is only available while this environment variable is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires_env: Option<String>,

    /// The kind every remaining argument must parse as.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accepts: Option<ArgKind>,

    /// Text printed, followed by the remaining arguments, when the leaf runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub echo: Option<String>,

    /// Completion candidates offered below this leaf.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,

    /// Nested entries.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<CommandConfig>,
}

/// Value kinds a leaf can require of its arguments.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ArgKind {
    /// A 32-bit signed integer.
    Int,
    /// A floating point number.
    Double,
    /// `HH:MM` or `HH:MM:SS`.
    Time,
    /// `true` or `false`, in any case.
    Bool,
}

fn default_available() -> bool {
    true
}

impl CommandConfig {
    /// A plain, always-available entry.
    pub fn new(label: impl Into<String>, explanation: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            explanation: explanation.into(),
            available: true,
            requires_env: None,
            accepts: None,
            echo: None,
            suggestions: Vec::new(),
            commands: Vec::new(),
        }
    }

    /// Whether running this entry does anything beyond descending.
    pub fn has_action(&self) -> bool {
        self.echo.is_some() || self.accepts.is_some()
    }

    /// Whether this entry supplies its own completion candidates.
    pub fn has_completion(&self) -> bool {
        !self.suggestions.is_empty() || self.accepts == Some(ArgKind::Bool)
    }
}
