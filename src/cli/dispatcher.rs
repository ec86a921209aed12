// src/cli/dispatcher.rs

//! Routing a parsed command line to completion, dispatch or the console.

use anyhow::{Context, Result, anyhow};
use colored::*;
use std::rc::Rc;

use crate::{
    cli::Cli,
    core::{
        events::{EventBus, NotificationSink},
        graph_display,
        node::NodeRef,
    },
    system::{console::Console, tree_config},
};

/// The main application dispatcher.
///
/// Loads the tree definition, then routes to one of the three modes: printing
/// completion candidates, dispatching the given tokens, or running the
/// interactive console when no token was given.
pub fn run(cli: Cli) -> Result<()> {
    log::debug!("CLI args parsed: {:?}", cli);

    let config = tree_config::load_tree_config(cli.config.as_deref())
        .context("Failed to load the command tree definition")?;
    let sink = cli.events.then(event_printer);
    let root = tree_config::build_tree(&config, sink)
        .with_context(|| format!("Failed to assemble the command tree '{}'", config.label))?;

    if cli.tree {
        graph_display::display_tree(&root);
        if cli.args.is_empty() && !cli.complete {
            return Ok(());
        }
    }

    let args: Vec<&str> = cli.args.iter().map(String::as_str).collect();

    if cli.complete {
        print!("{}", render_candidates(&complete(&root, &args), cli.json)?);
        return Ok(());
    }

    if args.is_empty() {
        return Console::new(root).run_stdin();
    }

    execute(&root, &args)
}

/// A sink echoing every notification to stderr.
fn event_printer() -> Rc<dyn NotificationSink> {
    let bus = EventBus::new();
    bus.subscribe(|event| eprintln!("{} {}", "event:".dimmed(), event));
    bus
}

/// Dispatches `args` once. A leaf reporting failure is an error too.
fn execute(root: &NodeRef<String>, args: &[&str]) -> Result<()> {
    if root.on_command(args)? {
        Ok(())
    } else {
        Err(anyhow!("Command '{}' did not complete.", args.join(" ")))
    }
}

/// Completion of the root level when no token is given.
fn complete(root: &NodeRef<String>, args: &[&str]) -> Vec<String> {
    if args.is_empty() {
        root.on_tab_complete(&[""])
    } else {
        root.on_tab_complete(args)
    }
}

fn render_candidates(candidates: &[String], json: bool) -> Result<String> {
    if json {
        let mut rendered = serde_json::to_string(candidates)?;
        rendered.push('\n');
        return Ok(rendered);
    }
    Ok(candidates.iter().map(|c| format!("{}\n", c)).collect())
}
