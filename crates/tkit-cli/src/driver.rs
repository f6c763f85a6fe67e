//! Runs one CLI command against a loaded universe.

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::io::Write;
use tkit_solver::{
    SymbolKind, SymbolTable, TypeFormatter, TypeInfo, TypeRef, Unifier, supertypes_of_with_profile,
};
use tracing::debug;

use crate::args::{CliArgs, Command, OutputFormat};
use crate::type_expr::parse_type;
use crate::universe::{core_universe, load_universe};

/// Query answered yes, or command succeeded.
pub const EXIT_SUCCESS: i32 = 0;
/// Query answered no.
pub const EXIT_NO_MATCH: i32 = 1;
/// Usage error, unreadable universe or malformed type expression.
pub const EXIT_ERROR: i32 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Success,
    NoMatch,
}

impl Outcome {
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Success => EXIT_SUCCESS,
            Self::NoMatch => EXIT_NO_MATCH,
        }
    }
}

/// Load `--universe`, or the builtin core universe.
pub fn load_table(args: &CliArgs) -> Result<SymbolTable> {
    match &args.universe {
        Some(path) => load_universe(path),
        None => core_universe(),
    }
}

/// Execute `args.command`, writing results to `out`. `color` enables ANSI
/// styling of text output.
pub fn run(args: &CliArgs, color: bool, out: &mut dyn Write) -> Result<Outcome> {
    let table = load_table(args)?;
    let driver = Driver {
        table: &table,
        args,
        color,
    };
    match &args.command {
        Command::Unify { a, b } => driver.unify(a, b, out),
        Command::Supertypes { ty } => driver.supertypes(ty, out),
        Command::Show { ty } => driver.show(ty, out),
    }
}

struct Driver<'a> {
    table: &'a SymbolTable,
    args: &'a CliArgs,
    color: bool,
}

#[derive(Serialize)]
struct UnifyReport {
    a: String,
    b: String,
    matched: bool,
    instantiation: Option<Vec<String>>,
}

#[derive(Serialize)]
struct SupertypesReport {
    #[serde(rename = "type")]
    ty: String,
    supertypes: Vec<String>,
}

#[derive(Serialize)]
struct ShowReport {
    #[serde(rename = "type")]
    ty: String,
    symbol: u32,
    kind: SymbolKind,
    definition: String,
    params: Vec<String>,
    open: bool,
    base: Option<String>,
    interfaces: Vec<String>,
    all_interfaces: Vec<String>,
    supertypes: Vec<String>,
}

impl Driver<'_> {
    fn formatter(&self) -> TypeFormatter<'_, SymbolTable> {
        TypeFormatter::new(self.table).qualified(self.args.qualified)
    }

    fn parse(&self, text: &str) -> Result<TypeRef> {
        parse_type(self.table, text).with_context(|| format!("invalid type expression `{text}`"))
    }

    fn unify(&self, a: &str, b: &str, out: &mut dyn Write) -> Result<Outcome> {
        let a_ref = self.parse(a)?;
        let b_ref = self.parse(b)?;
        let profile = self.args.recursion_profile();
        debug!(?profile, "unify");

        let result = Unifier::with_profile(self.table, profile)
            .unify(&a_ref, &b_ref)
            .with_context(|| format!("could not decide `{a}` against `{b}`"))?;

        let formatter = self.formatter();
        let report = UnifyReport {
            a: formatter.format(&a_ref),
            b: formatter.format(&b_ref),
            matched: result.matched,
            instantiation: result
                .instantiation
                .as_ref()
                .map(|args| args.iter().map(|arg| formatter.format_argument(arg)).collect()),
        };

        match self.args.format {
            OutputFormat::Json => write_json(out, &report)?,
            OutputFormat::Text => {
                let verdict = match (report.matched, self.color) {
                    (true, true) => "match".green().bold().to_string(),
                    (false, true) => "no match".red().bold().to_string(),
                    (true, false) => "match".to_string(),
                    (false, false) => "no match".to_string(),
                };
                writeln!(out, "{verdict}: {} <- {}", report.a, report.b)?;
                if let Some(args) = &report.instantiation {
                    writeln!(out, "instantiation: <{}>", args.join(", "))?;
                }
            }
        }

        Ok(if result.matched {
            Outcome::Success
        } else {
            Outcome::NoMatch
        })
    }

    fn supertypes(&self, text: &str, out: &mut dyn Write) -> Result<Outcome> {
        let ty = self.parse(text)?;
        let formatter = self.formatter();
        let report = SupertypesReport {
            ty: formatter.format(&ty),
            supertypes: self.formatted_supertypes(&ty)?,
        };

        match self.args.format {
            OutputFormat::Json => write_json(out, &report)?,
            OutputFormat::Text => {
                for supertype in &report.supertypes {
                    writeln!(out, "{supertype}")?;
                }
            }
        }
        Ok(Outcome::Success)
    }

    fn show(&self, text: &str, out: &mut dyn Write) -> Result<Outcome> {
        let ty = self.parse(text)?;
        let info = self
            .table
            .get(ty.symbol)
            .with_context(|| format!("`{text}` has no declaration"))?;
        let formatter = self.formatter();
        let definition = ty.generic_definition();

        let report = ShowReport {
            ty: formatter.format(&ty),
            symbol: ty.symbol.0,
            kind: info.kind,
            definition: formatter.format(&definition),
            params: info
                .type_params
                .iter()
                .map(|atom| self.table.names().resolve(*atom).to_string())
                .collect(),
            open: ty.is_generic() && ty.is_open_definition(),
            base: info.base.as_ref().map(|base| formatter.format(base)),
            interfaces: info.interfaces.iter().map(|i| formatter.format(i)).collect(),
            all_interfaces: self
                .table
                .interfaces_within(ty.symbol, self.args.recursion_profile().closure())
                .with_context(|| format!("could not flatten the interfaces of {text}"))?
                .iter()
                .map(|i| formatter.format(i))
                .collect(),
            supertypes: self.formatted_supertypes(&ty)?,
        };

        match self.args.format {
            OutputFormat::Json => write_json(out, &report)?,
            OutputFormat::Text => {
                let kind = format!("{:?}", report.kind).to_lowercase();
                let header = format!("{kind} {}", formatter.full_name(ty.symbol));
                if self.color {
                    writeln!(out, "{}", header.bold())?;
                } else {
                    writeln!(out, "{header}")?;
                }
                writeln!(out, "  definition: {}", report.definition)?;
                if report.ty != report.definition {
                    writeln!(out, "  reference: {}", report.ty)?;
                }
                writeln!(out, "  base: {}", report.base.as_deref().unwrap_or("(none)"))?;
                write_list(out, "interfaces", &report.interfaces)?;
                write_list(out, "all interfaces", &report.all_interfaces)?;
                write_list(out, "supertypes", &report.supertypes)?;
            }
        }
        Ok(Outcome::Success)
    }

    fn formatted_supertypes(&self, ty: &TypeRef) -> Result<Vec<String>> {
        let formatter = self.formatter();
        let profile = self.args.recursion_profile().closure();
        let supertypes = supertypes_of_with_profile(self.table, ty, profile)
            .with_context(|| format!("could not walk the supertypes of {}", formatter.format(ty)))?;
        Ok(supertypes.iter().map(|s| formatter.format(s)).collect())
    }
}

fn write_json<T: Serialize>(out: &mut dyn Write, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value).context("failed to serialize output")?;
    writeln!(out)?;
    Ok(())
}

fn write_list(out: &mut dyn Write, label: &str, items: &[String]) -> Result<()> {
    if items.is_empty() {
        writeln!(out, "  {label}: (none)")?;
    } else {
        writeln!(out, "  {label}: {}", items.join(", "))?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../tests/driver_tests.rs"]
mod tests;
