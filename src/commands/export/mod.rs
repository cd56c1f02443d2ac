mod execute;
mod output;

pub use execute::ExportResult;

use std::path::PathBuf;

use clap::Args;

use crate::commands::StatementArgs;

/// Run a query and write its rows to a worksheet file
#[derive(Args, Debug)]
#[command(after_help = "\
Examples:
  sistation export -s 'SELECT * FROM UserTable' --sheet users
  sistation export -s 'SELECT * FROM UserTable WHERE department = @d' -p d=X --sheet x -d out")]
pub struct ExportCmd {
    #[command(flatten)]
    pub statement: StatementArgs,

    /// Worksheet name; the file is written as <DIR>/<SHEET>.sheet.json
    #[arg(long)]
    pub sheet: String,

    /// Directory to write the worksheet into (created if missing)
    #[arg(short, long, default_value = ".")]
    pub dir: PathBuf,
}
