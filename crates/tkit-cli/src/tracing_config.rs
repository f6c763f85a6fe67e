//! Tracing setup for the `tkit` binary.
//!
//! Output format is picked with `TKIT_LOG_FORMAT`:
//!
//! - `text` (default): flat `tracing-subscriber` lines
//! - `tree`: indented span hierarchy via `tracing-tree`, handy for following
//!   one unification query case by case
//! - `json`: one JSON object per span/event
//!
//! ```bash
//! TKIT_LOG=debug tkit unify "Enumerable<>" "List<Int32>"
//! TKIT_LOG=trace TKIT_LOG_FORMAT=tree tkit unify Person Manager
//! TKIT_LOG="tkit_solver::unify=trace" TKIT_LOG_FORMAT=json tkit supertypes "List<Int32>"
//! ```
//!
//! Nothing is installed unless `TKIT_LOG` (or `RUST_LOG`) is set.
//!
//! ## What each target reports
//!
//! | Target | Level | Content |
//! |--------|-------|---------|
//! | `tkit_cli::universe` | `info` | type count once a universe is loaded |
//! | `tkit_cli::universe` | `debug` | every declaration with its symbol and arity |
//! | `tkit_cli::driver` | `debug` | recursion limits of the query |
//! | `tkit_solver::unify` | `debug` | verdict and step count of each query |
//! | `tkit_solver::unify` | `trace` | one `unify` span per query, one event per case tried |
//! | `tkit_solver::supertypes` | `debug`/`trace` | interface and ancestor counts, each ancestor climbed |
//! | `tkit_solver::symbols` | `trace` | symbol registration |
//!
//! A query that fails closed through `is_unifiable` logs the error at
//! `warn` under `tkit_solver::unify`.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

const LOG_VAR: &str = "TKIT_LOG";
const LOG_FORMAT_VAR: &str = "TKIT_LOG_FORMAT";

/// Tracing output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Tree,
    Json,
}

impl LogFormat {
    /// Parse a `TKIT_LOG_FORMAT` value. Unknown values fall back to text.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    fn from_env() -> Self {
        Self::parse(&std::env::var(LOG_FORMAT_VAR).unwrap_or_default())
    }
}

/// `TKIT_LOG` wins over `RUST_LOG`; both use the `RUST_LOG` syntax.
fn build_filter() -> EnvFilter {
    if let Ok(val) = std::env::var(LOG_VAR) {
        EnvFilter::builder().parse_lossy(val)
    } else {
        EnvFilter::from_default_env()
    }
}

/// Install the global subscriber, writing to stderr so stdout stays clean
/// for query results.
pub fn init_tracing() {
    let has_tkit_log = std::env::var(LOG_VAR).is_ok();
    let has_rust_log = std::env::var("RUST_LOG").is_ok();
    if !has_tkit_log && !has_rust_log {
        return;
    }

    let filter = build_filter();
    match LogFormat::from_env() {
        LogFormat::Tree => {
            let tree_layer = tracing_tree::HierarchicalLayer::default()
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_deferred_spans(true)
                .with_targets(true);

            Registry::default().with(filter).with(tree_layer).init();
        }
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);

            Registry::default().with(filter).with(json_layer).init();
        }
        LogFormat::Text => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
