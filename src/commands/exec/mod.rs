mod execute;
mod output;

pub use execute::AffectedResult;

use clap::Args;

use crate::commands::StatementArgs;
use crate::db::StatementKind;

/// Run a statement for its side effects and report the affected-row count
#[derive(Args, Debug)]
#[command(after_help = "\
Examples:
  sistation exec -s 'CREATE TABLE t (id int primary key, name text)'
  sistation exec -s 'INSERT INTO t VALUES (@id, @name)' -p id=1 -p name=A
  sistation exec -s 'DELETE FROM t WHERE id = ?' -p =1")]
pub struct ExecCmd {
    #[command(flatten)]
    pub statement: StatementArgs,

    /// How the SQL text is interpreted
    #[arg(short, long, value_enum, default_value_t = StatementKind::Text)]
    pub kind: StatementKind,
}
