// src/bin/cmdtree.rs

use clap::Parser;
use cmdtree::cli::{Cli, dispatcher};
use colored::*;

/// The main entry point of the `cmdtree` application.
/// It sets up logging, parses arguments, hands them to the dispatcher
/// and performs centralized error handling.
fn main() {
    env_logger::init();

    if let Err(e) = dispatcher::run(Cli::parse()) {
        // --- Centralized Error Handling ---
        eprintln!("\n{}: {:#}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}
