// SPDX-FileCopyrightText: 2026 Storefront Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Terminal and JSON rendering of catalog data.
//!
//! Every command prints through [`Output`], which decides between colored
//! text, plain text, and pretty JSON once at startup.

use std::io::IsTerminal;

use colored::Colorize;
use serde::Serialize;
use storefront_core::{CategoryFacet, Product, ProductEcho, Session, StorefrontError};

/// Generic notice shown when a login fails without a server message.
pub const LOGIN_FAILED: &str = "Login failed. Please try again.";

/// Output mode selected by `--json` and `--plain`.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    json: bool,
    color: bool,
}

impl Output {
    /// Color is disabled by `--plain` or when stdout is not a TTY.
    pub fn new(json: bool, plain: bool) -> Self {
        Self {
            json,
            color: !plain && std::io::stdout().is_terminal(),
        }
    }

    #[cfg(test)]
    pub fn plain() -> Self {
        Self {
            json: false,
            color: false,
        }
    }

    pub fn is_json(&self) -> bool {
        self.json
    }

    pub fn products(&self, products: &[&Product]) {
        if self.json {
            print_json(&products);
            return;
        }
        if products.is_empty() {
            println!("{}", self.dim("no products match"));
            return;
        }
        for product in products {
            println!("{}", self.product_line(product));
        }
    }

    pub fn product(&self, product: &Product) {
        if self.json {
            print_json(product);
            return;
        }
        println!("{}", self.product_detail(product));
    }

    pub fn facets(&self, facets: &[CategoryFacet]) {
        if self.json {
            print_json(&facets);
            return;
        }
        for facet in facets {
            println!("{:<24} {}", facet.name, self.dim(&facet.count.to_string()));
        }
    }

    /// Response of a create or update call.
    pub fn echo(&self, action: &str, echo: &ProductEcho) {
        if self.json {
            print_json(echo);
            return;
        }
        let id = echo
            .id
            .map(|id| format!(" #{id}"))
            .unwrap_or_default();
        let title = echo.title.as_deref().unwrap_or("(untitled)");
        println!("{}{id}: {title}", self.ok(action));
    }

    pub fn session(&self, session: &Session) {
        if self.json {
            print_json(&SessionView::from(session));
            return;
        }
        println!("{}", self.session_line(session));
    }

    pub fn notice(&self, message: &str) {
        if self.json {
            return;
        }
        println!("{}", self.ok(message));
    }

    /// Print an error to stderr. JSON mode still gets a human line, since
    /// stdout is reserved for data.
    pub fn error(&self, err: &StorefrontError) {
        let label = if self.color {
            "error".red().to_string()
        } else {
            "error".to_string()
        };
        eprintln!("{label}: {}", failure_notice(err));
    }

    pub fn login_error(&self, err: &StorefrontError) {
        let label = if self.color {
            "error".red().to_string()
        } else {
            "error".to_string()
        };
        eprintln!("{label}: {}", login_failure_notice(err));
    }

    fn product_line(&self, product: &Product) -> String {
        let id = format!("#{:<4}", product.id);
        let price = format!("{:>9}", format_price(product.price));
        if self.color {
            format!(
                "{} {} {} {}",
                id.dimmed(),
                price.green(),
                product.title.bold(),
                format!("[{}]", product.category).cyan()
            )
        } else {
            format!("{id} {price} {} [{}]", product.title, product.category)
        }
    }

    fn product_detail(&self, product: &Product) -> String {
        let rating = format!(
            "{:.1} ({} reviews)",
            product.rating.rate, product.rating.count
        );
        if self.color {
            format!(
                "{} {}\n  {}  {}\n  {} {}\n  {} {}\n\n{}",
                format!("#{}", product.id).dimmed(),
                product.title.bold(),
                format_price(product.price).green(),
                format!("[{}]", product.category).cyan(),
                "rating:".dimmed(),
                rating,
                "image:".dimmed(),
                product.image,
                product.description
            )
        } else {
            format!(
                "#{} {}\n  {}  [{}]\n  rating: {rating}\n  image: {}\n\n{}",
                product.id,
                product.title,
                format_price(product.price),
                product.category,
                product.image,
                product.description
            )
        }
    }

    fn session_line(&self, session: &Session) -> String {
        let name = session.user_name.as_deref().unwrap_or("(anonymous)");
        let state = if session.is_logged_in() {
            "logged in"
        } else {
            "logged out"
        };
        if self.color {
            let state = if session.is_logged_in() {
                state.green()
            } else {
                state.yellow()
            };
            format!("{} ({state})", name.bold())
        } else {
            format!("{name} ({state})")
        }
    }

    fn ok(&self, text: &str) -> String {
        if self.color {
            text.green().to_string()
        } else {
            text.to_string()
        }
    }

    fn dim(&self, text: &str) -> String {
        if self.color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }
}

/// Session state for `whoami --json`. Tokens are never printed.
#[derive(Debug, Serialize)]
struct SessionView<'a> {
    user_name: Option<&'a str>,
    logged_in: bool,
    can_refresh: bool,
}

impl<'a> From<&'a Session> for SessionView<'a> {
    fn from(session: &'a Session) -> Self {
        Self {
            user_name: session.user_name.as_deref(),
            logged_in: session.is_logged_in(),
            can_refresh: session.refresh_token.is_some(),
        }
    }
}

pub fn format_price(price: f64) -> String {
    format!("${price:.2}")
}

/// One-line description of a failed operation.
///
/// HTTP failures show the server's own message when it sent one.
pub fn failure_notice(err: &StorefrontError) -> String {
    match err {
        StorefrontError::Http { status, .. } => match err.server_message() {
            Some(message) => format!("request failed ({status}): {message}"),
            None => format!("request failed with status {status}"),
        },
        other => other.to_string(),
    }
}

/// Notice for a failed login: the server's message, or a generic one.
pub fn login_failure_notice(err: &StorefrontError) -> String {
    match err {
        StorefrontError::Validation(_) => err.to_string(),
        _ => err
            .server_message()
            .map(str::to_string)
            .unwrap_or_else(|| LOGIN_FAILED.to_string()),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(e) => eprintln!("error: failed to encode JSON: {e}"),
    }
}
