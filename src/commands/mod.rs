//! Command definitions and implementations.
//!
//! Each command is defined in its own module with:
//! - The command struct with clap attributes for CLI parsing
//! - An `Execute` impl that runs it against an [`Executor`]
//! - An `Outputable` impl for its result

mod exec;
mod export;
mod fill;
mod import;
mod query;
mod seed;

pub use exec::{AffectedResult, ExecCmd};
pub use export::{ExportCmd, ExportResult};
pub use fill::FillCmd;
pub use import::{ImportCmd, ImportError, ImportResult};
pub use query::QueryCmd;
pub use seed::{SeedCmd, SeedResult};

use std::error::Error;

use clap::{Args, Subcommand};

use crate::db::{Executor, Param, Value};
use crate::output::{OutputFormat, Outputable};

/// Trait for executing commands with command-specific result types.
pub trait Execute {
    type Output: Outputable;

    fn execute(self, executor: &Executor) -> Result<Self::Output, Box<dyn Error>>;
}

/// SQL text and parameters shared by statement-running commands.
#[derive(Args, Debug, Clone)]
pub struct StatementArgs {
    /// SQL statement to execute
    #[arg(short, long)]
    pub sql: String,

    /// Parameter as NAME=VALUE; prefix the value with int:, real:, bool:, text: or hex: to force its type
    #[arg(short, long = "param", value_parser = parse_param)]
    pub params: Vec<Param>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a statement and report affected rows
    Exec(ExecCmd),

    /// Run a query and print its rows
    Query(QueryCmd),

    /// Run a statement and print the filled result set
    Fill(FillCmd),

    /// Run a query and write its rows to a worksheet file
    Export(ExportCmd),

    /// Insert every row of a worksheet file into a table
    Import(ImportCmd),

    /// Create and populate the sample user table
    Seed(SeedCmd),

    /// Catch-all for unknown commands
    #[command(external_subcommand)]
    Unknown(Vec<String>),
}

impl Command {
    /// Execute the command and return formatted output
    pub fn run(self, executor: &Executor, format: OutputFormat) -> Result<String, Box<dyn Error>> {
        match self {
            Command::Exec(cmd) => Ok(cmd.execute(executor)?.format(format)),
            Command::Query(cmd) => Ok(cmd.execute(executor)?.format(format)),
            Command::Fill(cmd) => Ok(cmd.execute(executor)?.format(format)),
            Command::Export(cmd) => Ok(cmd.execute(executor)?.format(format)),
            Command::Import(cmd) => Ok(cmd.execute(executor)?.format(format)),
            Command::Seed(cmd) => Ok(cmd.execute(executor)?.format(format)),
            Command::Unknown(args) => {
                Err(format!("Unknown command: {}", args.first().unwrap_or(&String::new())).into())
            }
        }
    }
}

/// Parse `NAME=VALUE` into a parameter. An empty name binds positionally.
pub fn parse_param(s: &str) -> Result<Param, String> {
    let (name, raw) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", s))?;
    Ok(Param::new(name.trim(), parse_value(raw)?))
}

/// Parse a parameter value, honouring an explicit type prefix.
///
/// Without a known prefix: `null`, integers, reals, `true`/`false`, and
/// otherwise text.
pub fn parse_value(raw: &str) -> Result<Value, String> {
    if let Some((ty, rest)) = raw.split_once(':') {
        match ty {
            "int" => {
                return rest
                    .parse::<i64>()
                    .map(Value::Integer)
                    .map_err(|e| format!("invalid int '{}': {}", rest, e));
            }
            "real" => {
                return rest
                    .parse::<f64>()
                    .map(Value::Real)
                    .map_err(|e| format!("invalid real '{}': {}", rest, e));
            }
            "bool" => {
                return match rest {
                    "true" | "1" => Ok(Value::Bool(true)),
                    "false" | "0" => Ok(Value::Bool(false)),
                    _ => Err(format!("invalid bool '{}'", rest)),
                };
            }
            "text" => return Ok(Value::Text(rest.to_string())),
            "hex" => {
                return hex::decode(rest)
                    .map(Value::Bytes)
                    .map_err(|e| format!("invalid hex '{}': {}", rest, e));
            }
            _ => {}
        }
    }

    if raw == "null" {
        return Ok(Value::Null);
    }
    if let Ok(i) = raw.parse::<i64>() {
        return Ok(Value::Integer(i));
    }
    // Guard against "inf"/"nan", which parse as floats.
    if raw.chars().any(|c| c.is_ascii_digit()) {
        if let Ok(r) = raw.parse::<f64>() {
            return Ok(Value::Real(r));
        }
    }
    match raw {
        "true" => Ok(Value::Bool(true)),
        "false" => Ok(Value::Bool(false)),
        _ => Ok(Value::Text(raw.to_string())),
    }
}
