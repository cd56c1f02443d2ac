mod execute;

use clap::Args;

use crate::commands::StatementArgs;

/// Run a query and print its rows as a table
#[derive(Args, Debug)]
#[command(after_help = "\
Examples:
  sistation query -s 'SELECT * FROM UserTable'
  sistation query -s 'SELECT * FROM UserTable WHERE userId = @userid' -p userid=10
  sistation --format json query -s 'SELECT name FROM sqlite_master'")]
pub struct QueryCmd {
    #[command(flatten)]
    pub statement: StatementArgs,
}
