// src/system/console.rs

//! The interactive front end: a prompt over a command tree.
//!
//! On a terminal, lines are read through `dialoguer` with TAB completion backed
//! by the tree. Piped input is read line by line with the same semantics.

use crate::constants::META_PREFIX;
use crate::core::graph_display;
use crate::core::node::NodeRef;
use anyhow::{Context, Result};
use colored::*;
use dialoguer::{Completion, Input, theme::ColorfulTheme};
use std::io::{self, BufRead, IsTerminal, Write};

/// What the console should do after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Keep reading.
    Continue,
    /// End the session.
    Quit,
}

// --- Meta Command Registry ---

type MetaHandler = fn(&Console, &str, &mut dyn Write) -> Result<Outcome>;

/// A console command, typed after [`META_PREFIX`], that never reaches the tree.
struct MetaCommand {
    name: &'static str,
    aliases: &'static [&'static str],
    handler: MetaHandler,
}

static META_REGISTRY: &[MetaCommand] = &[
    MetaCommand {
        name: "complete",
        aliases: &["c"],
        handler: Console::complete_meta,
    },
    MetaCommand {
        name: "tree",
        aliases: &["ls"],
        handler: Console::tree_meta,
    },
    MetaCommand {
        name: "quit",
        aliases: &["exit", "q"],
        handler: Console::quit_meta,
    },
];

fn find_meta(name: &str) -> Option<&'static MetaCommand> {
    META_REGISTRY
        .iter()
        .find(|cmd| cmd.name == name || cmd.aliases.contains(&name))
}

// --- Tokenisation ---

/// Splits a line the way a POSIX shell would. `None` on unbalanced quotes.
pub fn split_line(line: &str) -> Option<Vec<String>> {
    shlex::split(line)
}

/// Like [`split_line`], but a line that is empty or ends in whitespace gets an
/// empty final token: the user is starting a new word.
pub fn completion_tokens(line: &str) -> Option<Vec<String>> {
    let mut tokens = split_line(line)?;
    if line.is_empty() || line.ends_with(char::is_whitespace) {
        tokens.push(String::new());
    }
    Some(tokens)
}

fn as_strs(tokens: &[String]) -> Vec<&str> {
    tokens.iter().map(String::as_str).collect()
}

/// Longest prefix shared by every word.
fn common_prefix(words: &[String]) -> String {
    let Some((first, rest)) = words.split_first() else {
        return String::new();
    };
    let mut prefix = first.as_str();
    for word in rest {
        while !word.starts_with(prefix) {
            let mut chars = prefix.chars();
            chars.next_back();
            prefix = chars.as_str();
        }
    }
    prefix.to_string()
}

fn quote(word: &str) -> String {
    shlex::try_quote(word)
        .map(|quoted| quoted.into_owned())
        .unwrap_or_else(|_| word.to_string())
}

// --- Console ---

/// A line-oriented front end over a command tree.
#[derive(Debug)]
pub struct Console {
    root: NodeRef<String>,
}

impl Console {
    /// A console dispatching to `root`.
    pub fn new(root: NodeRef<String>) -> Self {
        Self { root }
    }

    /// Runs on stdin: with TAB completion when it is a terminal, line by line
    /// otherwise.
    pub fn run_stdin(&self) -> Result<()> {
        if io::stdin().is_terminal() {
            self.run_interactive()
        } else {
            self.run(io::stdin().lock(), &mut io::stdout())
        }
    }

    /// Prompts through `dialoguer` until a quit command is entered.
    pub fn run_interactive(&self) -> Result<()> {
        let theme = ColorfulTheme::default();
        let completion = TreeCompletion { console: self };
        let mut stdout = io::stdout();

        loop {
            let line = Input::<String>::with_theme(&theme)
                .with_prompt(self.root.label())
                .allow_empty(true)
                .completion_with(&completion)
                .interact_text()
                .context("Failed to read console input")?;
            if self.handle_line(&line, &mut stdout)? == Outcome::Quit {
                return Ok(());
            }
        }
    }

    /// Reads lines from `input` until it is exhausted or a quit command is
    /// entered, writing prompts and results to `out`.
    pub fn run<R: BufRead>(&self, input: R, out: &mut dyn Write) -> Result<()> {
        let prompt = format!("{}> ", self.root.label());
        write!(out, "{}", prompt.green().bold())?;
        out.flush()?;

        for line in input.lines() {
            let line = line.context("Failed to read console input")?;
            if self.handle_line(&line, out)? == Outcome::Quit {
                return Ok(());
            }
            write!(out, "{}", prompt.green().bold())?;
            out.flush()?;
        }
        writeln!(out)?;
        Ok(())
    }

    /// Processes one line. Dispatch failures are reported on `out` and never
    /// end the session; only I/O errors are returned.
    pub fn handle_line(&self, line: &str, out: &mut dyn Write) -> Result<Outcome> {
        let trimmed = line.trim_start();
        if trimmed.trim_end().is_empty() {
            return Ok(Outcome::Continue);
        }

        if let Some(meta) = trimmed.strip_prefix(META_PREFIX) {
            let (name, rest) = meta.split_once(char::is_whitespace).unwrap_or((meta, ""));
            return match find_meta(name) {
                Some(command) => (command.handler)(self, rest, out),
                None => {
                    writeln!(
                        out,
                        "{}: unknown console command '{}{}'",
                        "Error".red().bold(),
                        META_PREFIX,
                        name
                    )?;
                    Ok(Outcome::Continue)
                }
            };
        }

        let Some(tokens) = split_line(trimmed) else {
            writeln!(out, "{}: unbalanced quotes", "Error".red().bold())?;
            return Ok(Outcome::Continue);
        };
        self.dispatch(&as_strs(&tokens), out)?;
        Ok(Outcome::Continue)
    }

    fn dispatch(&self, args: &[&str], out: &mut dyn Write) -> Result<()> {
        log::debug!("Console dispatch: {:?}", args);
        match self.root.on_command(args) {
            Ok(true) => {}
            Ok(false) => writeln!(
                out,
                "{}: '{}' did not complete",
                "Failed".yellow().bold(),
                args.join(" ")
            )?,
            Err(e) => writeln!(out, "{}: {}", "Error".red().bold(), e)?,
        }
        Ok(())
    }

    /// The candidates for the last token of `line`.
    pub fn complete(&self, line: &str) -> Vec<String> {
        match completion_tokens(line) {
            Some(tokens) => self.root.on_tab_complete(&as_strs(&tokens)),
            None => Vec::new(),
        }
    }

    /// What `line` becomes after a TAB press: the last token is replaced by the
    /// only candidate, or extended to the prefix all candidates share. `None`
    /// when the tree cannot narrow it down.
    pub fn complete_line(&self, line: &str) -> Option<String> {
        if line.trim_start().starts_with(META_PREFIX) {
            return None;
        }

        let head = line.trim_end_matches(|c: char| !c.is_whitespace());
        let fragment = line.strip_prefix(head).unwrap_or_default();
        match self.complete(line).as_slice() {
            [] => None,
            [only] => Some(format!("{}{} ", head, quote(only))),
            many => {
                let shared = common_prefix(many);
                (shared.len() > fragment.len() && shared.starts_with(fragment))
                    .then(|| format!("{}{}", head, shared))
            }
        }
    }

    fn complete_meta(&self, rest: &str, out: &mut dyn Write) -> Result<Outcome> {
        for candidate in self.complete(rest) {
            writeln!(out, "{}", candidate)?;
        }
        Ok(Outcome::Continue)
    }

    fn tree_meta(&self, _rest: &str, out: &mut dyn Write) -> Result<Outcome> {
        write!(out, "{}", graph_display::render_tree(&self.root))?;
        Ok(Outcome::Continue)
    }

    fn quit_meta(&self, _rest: &str, _out: &mut dyn Write) -> Result<Outcome> {
        Ok(Outcome::Quit)
    }
}

/// TAB completion for `dialoguer` prompts.
struct TreeCompletion<'a> {
    console: &'a Console,
}

impl Completion for TreeCompletion<'_> {
    fn get(&self, input: &str) -> Option<String> {
        self.console.complete_line(input)
    }
}
