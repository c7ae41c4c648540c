//! CLI command definitions and parsing
use crate::constraints::ConstraintKind;
use crate::error::{MindbreezeError, Result};
use crate::request::OrderField;
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "mindbreeze",
    version,
    author = "neur0map",
    about = "Query a Mindbreeze search endpoint from the command line",
    long_about = "Builds Mindbreeze search requests from command line options and prints the \
                  normalized results. Continuation tokens are kept on disk per session, so \
                  later pages of the same query can be requested from separate invocations."
)]
pub struct Cli {
    /// Global config file path (defaults to ~/.config/mindbreeze/config.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a search
    Search {
        /// Search query text
        query: String,

        /// Page to fetch (pages after the first need an earlier search of
        /// the same query in the same session)
        #[arg(short, long, default_value = "1")]
        page: i64,

        /// Results per page (defaults to the configured value)
        #[arg(long)]
        per_page: Option<u32>,

        /// Field to order by
        #[arg(short, long, value_parser = ["relevance", "date"])]
        order: Option<String>,

        /// Order direction (applies to relevance when --order is not given)
        #[arg(short, long, value_parser = ["asc", "desc"], default_value = "desc")]
        direction: String,

        /// Named datasource constraint from the config file
        #[arg(long)]
        datasource: Option<String>,

        /// Only documents dated on or after this date (YYYY-MM-DD or Unix seconds)
        #[arg(long, requires = "to")]
        from: Option<String>,

        /// Only documents dated on or before this date (YYYY-MM-DD or Unix seconds)
        #[arg(long, requires = "from")]
        to: Option<String>,

        /// Extra constraint as LABEL:KIND:VALUE (kind: between_dates, regex, term).
        /// between_dates takes a JSON array of Unix seconds, e.g. mes:date:between_dates:[1,2]
        #[arg(long = "constraint", value_name = "LABEL:KIND:VALUE")]
        constraints: Vec<String>,

        /// Session key the continuation token is stored under
        #[arg(short, long, default_value = "default")]
        session: String,

        /// Print the compiled request instead of sending it
        #[arg(long)]
        dry_run: bool,

        /// Show results in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Validate configuration file
    Validate {
        /// Path to config file (defaults to standard location)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Initialize default configuration
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Split a `LABEL:KIND:VALUE` constraint argument
///
/// The label may itself contain colons (`mes:date`), so the kind is the
/// second-to-last segment and the value everything after it.
pub fn parse_constraint_arg(arg: &str) -> Option<(String, String, String)> {
    const KINDS: [&str; 3] = ["between_dates", "regex", "term"];

    for kind in KINDS {
        let marker = format!(":{}:", kind);
        if let Some(pos) = arg.find(&marker) {
            let label = &arg[..pos];
            let value = &arg[pos + marker.len()..];
            if !label.is_empty() {
                return Some((label.to_string(), kind.to_string(), value.to_string()));
            }
        }
    }

    let mut parts = arg.splitn(3, ':');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(label), Some(kind), Some(value)) if !label.is_empty() => {
            Some((label.to_string(), kind.to_string(), value.to_string()))
        }
        _ => None,
    }
}

/// Constraint input for the VALUE part of a `--constraint` argument
///
/// `between_dates` values are parsed as JSON. Every other kind gets the
/// text exactly as typed, so `12.50` or `null` stay literal strings.
pub fn constraint_value(kind: &str, raw: &str) -> Result<Value> {
    match kind.parse::<ConstraintKind>() {
        Ok(ConstraintKind::BetweenDates) => serde_json::from_str(raw).map_err(|e| {
            MindbreezeError::invalid_argument(format!(
                "between_dates value must be a JSON array like [from,to], got '{}': {}",
                raw, e
            ))
        }),
        _ => Ok(Value::String(raw.to_string())),
    }
}

/// Field and direction for `QueryBuilder::set_order`
///
/// A direction given without `--order` applies to the default field.
pub fn order_args<'a>(order: Option<&'a str>, direction: &'a str) -> (&'a str, &'a str) {
    (order.unwrap_or(OrderField::default().name()), direction)
}
