// SPDX-FileCopyrightText: 2026 Storefront Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storefront - a terminal client for the Fake Store catalog API.
//!
//! This is the binary entry point. Each invocation owns one session: `--user`
//! logs in before the subcommand runs, and `shell` keeps the session open for
//! as many commands as the user types.

mod commands;
mod prompt;
mod render;
mod shell;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use storefront_client::StorefrontClient;
use storefront_config::StorefrontConfig;
use storefront_core::{CatalogFilter, ProductDraft, ProductPatch, StorefrontError};
use tracing_subscriber::EnvFilter;

use crate::render::Output;

/// Storefront - browse and edit the Fake Store catalog.
#[derive(Parser, Debug)]
#[command(name = "storefront", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the default locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log in as this user before running the command.
    #[arg(long, global = true)]
    user: Option<String>,

    /// Print data as JSON.
    #[arg(long, global = true)]
    json: bool,

    /// Disable colors.
    #[arg(long, global = true)]
    plain: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Log in and report the outcome.
    Login {
        /// Username (defaults to --user).
        username: Option<String>,
    },
    /// List products, optionally filtered.
    Products {
        /// Only show this category ("All" shows everything).
        #[arg(long)]
        category: Option<String>,
        /// Case-insensitive title search.
        #[arg(long, default_value = "")]
        search: String,
    },
    /// List categories with product counts.
    Categories,
    /// Show one product.
    Show { id: u64 },
    /// Create a product.
    Create(CreateArgs),
    /// Update a product; unspecified fields keep their current values.
    Update {
        id: u64,
        #[command(flatten)]
        fields: UpdateArgs,
    },
    /// Delete a product.
    Delete { id: u64 },
    /// Launch an interactive REPL session.
    Shell,
}

#[derive(Args, Debug)]
struct CreateArgs {
    #[arg(long)]
    title: String,
    #[arg(long)]
    price: f64,
    #[arg(long)]
    description: String,
    #[arg(long)]
    category: String,
    #[arg(long)]
    image: String,
}

impl From<CreateArgs> for ProductDraft {
    fn from(args: CreateArgs) -> Self {
        Self {
            title: args.title,
            price: args.price,
            description: args.description,
            category: args.category,
            image: args.image,
        }
    }
}

#[derive(Args, Debug)]
struct UpdateArgs {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    price: Option<f64>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    image: Option<String>,
}

impl From<UpdateArgs> for ProductPatch {
    fn from(args: UpdateArgs) -> Self {
        Self {
            title: args.title,
            price: args.price,
            description: args.description,
            category: args.category,
            image: args.image,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => storefront_config::load_and_validate_path(path),
        None => storefront_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            storefront_config::render_errors(&errors);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.log.level);
    log_loaded_config(&cli, &config);

    let out = Output::new(cli.json, cli.plain);
    run(cli, &config, &out).await
}

async fn run(cli: Cli, config: &StorefrontConfig, out: &Output) -> ExitCode {
    let client = match StorefrontClient::new(&config.api) {
        Ok(client) => client,
        Err(e) => {
            out.error(&e);
            return ExitCode::FAILURE;
        }
    };

    let Some(command) = cli.command else {
        println!("storefront: use --help for available commands");
        return ExitCode::SUCCESS;
    };

    let login_user = match &command {
        Commands::Login { username } => username.clone().or(cli.user),
        _ => cli.user,
    };
    if let Some(user) = login_user {
        if let Err(e) = commands::login(&client, &user, out).await {
            out.login_error(&e);
            return ExitCode::FAILURE;
        }
    }

    match execute(&client, command, out).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            out.error(&e);
            ExitCode::FAILURE
        }
    }
}

async fn execute(
    client: &StorefrontClient,
    command: Commands,
    out: &Output,
) -> Result<(), StorefrontError> {
    match command {
        Commands::Login { .. } => {
            if !client.session().is_logged_in() {
                return Err(StorefrontError::Validation(vec![
                    "username is required (pass it or use --user)".into(),
                ]));
            }
            if out.is_json() {
                out.session(&client.snapshot());
            }
            Ok(())
        }
        Commands::Products { category, search } => {
            commands::products(client, &CatalogFilter::new(category, search), out).await
        }
        Commands::Categories => commands::categories(client, out).await,
        Commands::Show { id } => commands::show(client, id, out).await,
        Commands::Create(args) => commands::create(client, &args.into(), out).await,
        Commands::Update { id, fields } => commands::update(client, id, fields.into(), out).await,
        Commands::Delete { id } => commands::delete(client, id, out).await,
        Commands::Shell => shell::run_shell(client, out).await,
    }
}

/// Initialize the tracing subscriber. `RUST_LOG` overrides the configured level.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("storefront={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

/// Logging starts only once the config is known, so the load is reported here.
fn log_loaded_config(cli: &Cli, config: &StorefrontConfig) {
    let source = cli
        .config
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "default locations".to_string());
    tracing::debug!(
        %source,
        base_url = %config.api.base_url,
        level = %config.log.level,
        "configuration loaded"
    );
}
