// src/system/tree_config.rs

//! Loading `tree.toml` and assembling the command tree it describes.

use crate::constants::{CONFIG_DIR_NAME, TREE_CONFIG_FILENAME};
use crate::core::builder::{NodeBuilder, TreeBuilder};
use crate::core::command::RootCommand;
use crate::core::errors::TreeError;
use crate::core::events::NotificationSink;
use crate::core::helper::{CommandHelper, SharedWriter, stdout_writer};
use crate::core::node::NodeRef;
use crate::core::parsing::{self, ParseError};
use crate::models::{ArgKind, CommandConfig, TreeConfig};
use colored::*;
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use thiserror::Error;

/// Failures while locating, reading or assembling a tree definition.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The platform has no user configuration directory.
    #[error("Could not find system config directory.")]
    ConfigDirNotFound,
    /// Reading, writing or creating the definition file failed.
    #[error("Could not access tree definition at '{path}': {source}")]
    Io {
        /// The file involved.
        path: String,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The file is not a valid tree definition.
    #[error("Invalid tree definition in '{path}': {source}")]
    Parse {
        /// The file involved.
        path: String,
        /// The TOML decoding failure.
        #[source]
        source: toml::de::Error,
    },
    /// The generated default could not be encoded.
    #[error("Could not serialize the default tree definition: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// An entry has children as well as `echo` or `accepts`.
    #[error("Command '{label}' has both children and an action; actions are only allowed on leaves.")]
    ActionOnBranch {
        /// The offending entry.
        label: String,
    },
    /// The tree itself rejected an entry.
    #[error(transparent)]
    Tree(#[from] TreeError),
}

/// `<config_dir>/cmdtree/tree.toml`.
pub fn default_tree_path() -> Result<PathBuf, ConfigError> {
    let config_dir = dirs::config_dir().ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(config_dir.join(CONFIG_DIR_NAME).join(TREE_CONFIG_FILENAME))
}

/// Loads the tree definition at `path`, or at [`default_tree_path`] when no
/// path is given. A missing default file is generated and written first.
pub fn load_tree_config(path: Option<&Path>) -> Result<TreeConfig, ConfigError> {
    match path {
        Some(path) => read_tree_config(path),
        None => load_or_generate(&default_tree_path()?),
    }
}

fn load_or_generate(path: &Path) -> Result<TreeConfig, ConfigError> {
    if path.exists() {
        return read_tree_config(path);
    }

    log::debug!("No tree definition at '{}', writing the default one", path.display());
    let io_error = |source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    let default_config = generate_default_tree_config();
    let toml_string = toml::to_string_pretty(&default_config)?;
    fs::write(path, toml_string).map_err(io_error)?;
    Ok(default_config)
}

fn read_tree_config(path: &Path) -> Result<TreeConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

/// The definition written on first run.
pub fn generate_default_tree_config() -> TreeConfig {
    let echo = |label: &str, explanation: &str, text: &str| CommandConfig {
        echo: Some(text.to_string()),
        ..CommandConfig::new(label, explanation)
    };

    let mut server = CommandConfig::new("server", "Manage the local server");
    server.commands = vec![
        echo("start", "Start the server", "Starting server"),
        echo("stop", "Stop the server", "Stopping server"),
        echo("status", "Show the server status", "Server is idle"),
    ];

    let deploy = CommandConfig {
        requires_env: Some("CMDTREE_DEPLOY".to_string()),
        suggestions: vec!["production".to_string(), "staging".to_string()],
        ..echo("deploy", "Deploy a build (requires CMDTREE_DEPLOY)", "Deploying to")
    };

    let mut alarm = CommandConfig::new("alarm", "Schedule alarms");
    alarm.commands = vec![CommandConfig {
        accepts: Some(ArgKind::Time),
        ..echo("set", "Set an alarm (HH:MM)", "Alarm set for")
    }];

    let verbose = CommandConfig {
        accepts: Some(ArgKind::Bool),
        ..echo("verbose", "Toggle verbose output", "Verbose output:")
    };

    TreeConfig {
        label: CONFIG_DIR_NAME.to_string(),
        explanation: "Interactive command tree".to_string(),
        commands: vec![server, deploy, alarm, verbose],
    }
}

/// Assembles the command tree described by `config`. Every addition is
/// announced to `sink`, when given. Help pages and leaf output go to stdout.
pub fn build_tree(
    config: &TreeConfig,
    sink: Option<Rc<dyn NotificationSink>>,
) -> Result<NodeRef<String>, ConfigError> {
    build_tree_to(config, sink, stdout_writer())
}

/// Like [`build_tree`], with help pages and leaf output written to `out`.
pub fn build_tree_to(
    config: &TreeConfig,
    sink: Option<Rc<dyn NotificationSink>>,
    out: SharedWriter,
) -> Result<NodeRef<String>, ConfigError> {
    let mut root = RootCommand::new(
        config.label.clone(),
        config.explanation.clone(),
        CommandHelper::writing_to(Rc::clone(&out)),
    );
    if let Some(sink) = sink {
        root = root.with_notifier(sink);
    }

    let mut builder = TreeBuilder::new(root);
    for command in &config.commands {
        builder = builder.node(node_builder(command, &out)?);
    }
    Ok(builder.build()?)
}

fn node_builder(
    config: &CommandConfig,
    out: &SharedWriter,
) -> Result<NodeBuilder<String>, ConfigError> {
    if config.has_action() && !config.commands.is_empty() {
        return Err(ConfigError::ActionOnBranch {
            label: config.label.clone(),
        });
    }

    let mut builder = NodeBuilder::new(config.label.clone(), config.explanation.clone());

    let enabled = config.available;
    let required = config.requires_env.clone();
    if !enabled || required.is_some() {
        builder = builder.available_when(move || {
            enabled && required.as_deref().is_none_or(env_is_set)
        });
    }

    if config.has_action() {
        let accepts = config.accepts;
        let echo = config.echo.clone();
        let out = Rc::clone(out);
        builder = builder.executor(move |args| run_leaf(accepts, echo.as_deref(), &out, args));
    }

    if config.has_completion() {
        let suggestions = match (config.suggestions.is_empty(), config.accepts) {
            (true, Some(ArgKind::Bool)) => vec!["true".to_string(), "false".to_string()],
            _ => config.suggestions.clone(),
        };
        builder = builder.completer(move |args| suggest(&suggestions, args));
    }

    for child in &config.commands {
        builder = builder.child(node_builder(child, out)?);
    }
    Ok(builder)
}

fn env_is_set(var: &str) -> bool {
    env::var_os(var).is_some()
}

fn run_leaf(
    accepts: Option<ArgKind>,
    echo: Option<&str>,
    out: &SharedWriter,
    args: &[&str],
) -> bool {
    if let Some(kind) = accepts
        && let Err(e) = validate(kind, args)
    {
        eprintln!("{}: {}", "Invalid argument".yellow().bold(), e);
        return false;
    }
    if let Some(text) = echo {
        let mut out = out.borrow_mut();
        let written = if args.is_empty() {
            writeln!(out, "{}", text)
        } else {
            writeln!(out, "{} {}", text, args.join(" "))
        };
        if let Err(e) = written {
            log::warn!("Could not write the output of '{}': {}", text, e);
            return false;
        }
    }
    true
}

/// Checks that every token parses as `kind`.
pub fn validate(kind: ArgKind, args: &[&str]) -> Result<(), ParseError> {
    for token in args {
        match kind {
            ArgKind::Int => parsing::parse_int(token).map(drop)?,
            ArgKind::Double => parsing::parse_double(token).map(drop)?,
            ArgKind::Time => parsing::parse_time(token).map(drop)?,
            ArgKind::Bool => parsing::parse_bool(token).map(drop)?,
        }
    }
    Ok(())
}

fn suggest(suggestions: &[String], args: &[&str]) -> Vec<String> {
    let fragment = args.last().copied().unwrap_or_default();
    suggestions
        .iter()
        .filter(|candidate| candidate.contains(fragment))
        .cloned()
        .collect()
}
