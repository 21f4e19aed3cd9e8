// SPDX-FileCopyrightText: 2026 Storefront Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `storefront shell` command implementation.
//!
//! A readline REPL that keeps one session alive for the whole process, so a
//! login at the prompt carries over to every later command, including silent
//! token refreshes.

use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use storefront_client::StorefrontClient;
use storefront_core::{CatalogFilter, StorefrontError};
use tracing::debug;

use crate::commands;
use crate::render::Output;

const HELP: &str = "\
commands:
  login <user>                  log in (password from STOREFRONT_PASSWORD or prompt)
  logout                        drop the session tokens
  whoami                        show the current user
  products [category] [/search] list products, optionally filtered
  categories                    list categories with counts
  show <id>                     show one product
  delete <id>                   delete a product
  help                          show this help
  quit                          leave the shell";

/// A parsed shell line.
#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    Login(String),
    Logout,
    WhoAmI,
    Products(CatalogFilter),
    Categories,
    Show(u64),
    Delete(u64),
    Help,
    Quit,
    Empty,
}

/// Parse one line of shell input.
pub fn parse_command(line: &str) -> Result<ShellCommand, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word {
        "" => Ok(ShellCommand::Empty),
        "login" if rest.is_empty() => Err("usage: login <user>".into()),
        "login" => Ok(ShellCommand::Login(rest.to_string())),
        "logout" => Ok(ShellCommand::Logout),
        "whoami" => Ok(ShellCommand::WhoAmI),
        "products" => Ok(ShellCommand::Products(parse_filter(rest))),
        "categories" => Ok(ShellCommand::Categories),
        "show" => parse_id(rest, "show").map(ShellCommand::Show),
        "delete" => parse_id(rest, "delete").map(ShellCommand::Delete),
        "help" | "?" => Ok(ShellCommand::Help),
        "quit" | "exit" | "/quit" | "/exit" => Ok(ShellCommand::Quit),
        other => Err(format!("unknown command `{other}`; type `help`")),
    }
}

/// `men's clothing /backpack` -> category "men's clothing", search "backpack".
fn parse_filter(rest: &str) -> CatalogFilter {
    let (category, search) = match rest.split_once('/') {
        Some((category, search)) => (category.trim(), search.trim()),
        None => (rest, ""),
    };
    let category = (!category.is_empty()).then(|| category.to_string());
    CatalogFilter::new(category, search)
}

fn parse_id(rest: &str, command: &str) -> Result<u64, String> {
    rest.parse()
        .map_err(|_| format!("usage: {command} <id> (numeric product id)"))
}

/// Runs the interactive REPL until `quit` or end of input.
pub async fn run_shell(client: &StorefrontClient, out: &Output) -> Result<(), StorefrontError> {
    let mut rl = DefaultEditor::new()
        .map_err(|e| StorefrontError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", "storefront shell".bold().green());
    println!("Type {} for commands, {} to exit.\n", "help".yellow(), "quit".yellow());

    loop {
        let prompt = match client.session().user_name() {
            Some(name) if client.session().is_logged_in() => format!("{name}> "),
            _ => "storefront> ".to_string(),
        };

        match rl.readline(&prompt) {
            Ok(line) => {
                let command = match parse_command(&line) {
                    Ok(command) => command,
                    Err(message) => {
                        eprintln!("{}", message.yellow());
                        continue;
                    }
                };
                if command != ShellCommand::Empty {
                    let _ = rl.add_history_entry(line.trim());
                }
                if command == ShellCommand::Quit {
                    break;
                }
                if let Err(e) = dispatch(client, command, out).await {
                    debug!(error = %e, "shell command failed");
                    out.error(&e);
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    println!("{}", "goodbye".dimmed());
    Ok(())
}

async fn dispatch(
    client: &StorefrontClient,
    command: ShellCommand,
    out: &Output,
) -> Result<(), StorefrontError> {
    match command {
        ShellCommand::Login(user) => {
            if let Err(e) = commands::login(client, &user, out).await {
                out.login_error(&e);
            }
            Ok(())
        }
        ShellCommand::Logout => {
            client.log_out();
            out.notice("logged out");
            Ok(())
        }
        ShellCommand::WhoAmI => {
            out.session(&client.snapshot());
            Ok(())
        }
        ShellCommand::Products(filter) => commands::products(client, &filter, out).await,
        ShellCommand::Categories => commands::categories(client, out).await,
        ShellCommand::Show(id) => commands::show(client, id, out).await,
        ShellCommand::Delete(id) => commands::delete(client, id, out).await,
        ShellCommand::Help => {
            println!("{HELP}");
            Ok(())
        }
        ShellCommand::Quit | ShellCommand::Empty => Ok(()),
    }
}
