// src/cli/mod.rs

//! The clap command line of the `cmdtree` binary.

use clap::Parser;
use std::path::PathBuf;

pub mod dispatcher;

/// cmdtree: dispatch, complete and explore a labeled command tree.
///
/// With ARGS, the tokens are dispatched through the tree (or completed, with
/// `--complete`). Without ARGS, an interactive console reads lines from stdin.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    styles = clap::builder::Styles::styled()
        .header(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .usage(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .literal(clap::builder::styling::AnsiColor::Cyan.on_default().bold())
        .placeholder(clap::builder::styling::AnsiColor::Green.on_default()),
)]
// `help` is a token of the tree itself, not a clap subcommand.
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Tree definition to load instead of `<config_dir>/cmdtree/tree.toml`.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print the completion candidates for the last token instead of running.
    #[arg(long)]
    pub complete: bool,

    /// Print completion candidates as a JSON array.
    #[arg(long, requires = "complete")]
    pub json: bool,

    /// Print the command tree before doing anything else.
    #[arg(long)]
    pub tree: bool,

    /// Print every tree notification to stderr.
    #[arg(long)]
    pub events: bool,

    /// The tokens to dispatch or complete.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags_and_tokens() {
        let cli =
            Cli::try_parse_from(["cmdtree", "--complete", "--json", "server", "st"]).unwrap();
        assert!(cli.complete && cli.json && !cli.tree);
        assert_eq!(cli.args, vec!["server", "st"]);
    }

    #[test]
    fn test_tokens_after_first_arg_are_not_flags() {
        let cli = Cli::try_parse_from(["cmdtree", "count", "--tree", "-5"]).unwrap();
        assert!(!cli.tree);
        assert_eq!(cli.args, vec!["count", "--tree", "-5"]);
    }

    #[test]
    fn test_json_requires_complete() {
        assert!(Cli::try_parse_from(["cmdtree", "--json", "server"]).is_err());
    }

    #[test]
    fn test_help_token_reaches_the_tree() {
        let cli = Cli::try_parse_from(["cmdtree", "help", "server"]).unwrap();
        assert_eq!(cli.args, vec!["help", "server"]);
    }
}
