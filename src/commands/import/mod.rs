mod execute;
mod output;

pub use execute::{ImportError, ImportResult};

use std::path::PathBuf;

use clap::Args;

fn validate_file_exists(s: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(s);
    if path.exists() {
        Ok(path)
    } else {
        Err(format!("File not found: {}", path.display()))
    }
}

/// Insert every row of a worksheet file into an existing table
#[derive(Args, Debug)]
#[command(after_help = "\
Examples:
  sistation import --sheet users.sheet.json -t UserTable
  sistation import --sheet out/x.sheet.json -t Staging   # Header cells name the columns")]
pub struct ImportCmd {
    /// Path to the worksheet file
    #[arg(long, value_parser = validate_file_exists)]
    pub sheet: PathBuf,

    /// Table to insert into; header cells must name its columns
    #[arg(short, long)]
    pub table: String,
}
