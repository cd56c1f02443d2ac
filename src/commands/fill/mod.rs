mod execute;

use clap::Args;

use crate::commands::StatementArgs;
use crate::db::StatementKind;

/// Run a statement and print every table it fills into a result set
#[derive(Args, Debug)]
#[command(after_help = "\
Examples:
  sistation fill -s 'SELECT * FROM UserTable'
  sistation fill -s 'SELECT * FROM UserTable WHERE department = @dept' -p dept=X
  sistation fill -s 'DELETE FROM UserTable'     # Runs the statement, returns no tables")]
pub struct FillCmd {
    #[command(flatten)]
    pub statement: StatementArgs,

    /// How the SQL text is interpreted
    #[arg(short, long, value_enum, default_value_t = StatementKind::Text)]
    pub kind: StatementKind,
}
