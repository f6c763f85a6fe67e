use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use tkit_solver::RecursionProfile;

/// CLI arguments for the tkit binary.
#[derive(Parser, Debug)]
#[command(
    name = "tkit",
    version,
    about = "Generic-aware nominal type unification over a declared type universe"
)]
pub struct CliArgs {
    /// Type universe to load (JSON). The builtin core universe is used when omitted.
    #[arg(short = 'u', long, value_name = "PATH", global = true)]
    pub universe: Option<PathBuf>,

    /// Maximum nesting of unification calls, and the tallest hierarchy
    /// walked, before giving up.
    #[arg(long = "max-depth", value_name = "N", global = true)]
    pub max_depth: Option<u32>,

    /// Maximum number of unification steps per query, and declarations
    /// visited per supertype walk, before giving up.
    #[arg(long = "max-iterations", value_name = "N", global = true)]
    pub max_iterations: Option<u32>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,

    /// Color text output: auto, always, never.
    #[arg(long, value_enum, default_value_t = ColorMode::Auto, global = true)]
    pub color: ColorMode,

    /// Render names with their namespaces.
    #[arg(short = 'q', long, global = true)]
    pub qualified: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Decide whether B can be treated as an A (e.g. `unify "Enumerable<>" "List<Int32>"`)
    Unify {
        /// The type being asked for.
        #[arg(value_name = "A")]
        a: String,
        /// The type on hand.
        #[arg(value_name = "B")]
        b: String,
    },
    /// List the supertypes of a type, interfaces first, then ancestors.
    Supertypes {
        #[arg(value_name = "TYPE")]
        ty: String,
    },
    /// Describe a declaration and the reference it was given as.
    Show {
        #[arg(value_name = "TYPE")]
        ty: String,
    },
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum ColorMode {
    /// Color when stdout is a terminal.
    #[default]
    Auto,
    Always,
    Never,
}

impl CliArgs {
    /// Recursion limits for unification queries. Unset limits keep the
    /// defaults of [`RecursionProfile::Unification`]; supertype walks use
    /// [`RecursionProfile::closure`] of the result.
    pub fn recursion_profile(&self) -> RecursionProfile {
        let defaults = RecursionProfile::Unification;
        match (self.max_depth, self.max_iterations) {
            (None, None) => defaults,
            (depth, iterations) => RecursionProfile::Custom {
                max_depth: depth.unwrap_or(defaults.max_depth()),
                max_iterations: iterations.unwrap_or(defaults.max_iterations()),
            },
        }
    }
}

#[cfg(test)]
#[path = "../tests/args_tests.rs"]
mod tests;
