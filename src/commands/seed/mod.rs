mod execute;
mod output;

pub use execute::SeedResult;

use clap::Args;

/// Create the sample user table, add a user when it is empty, and read it back
#[derive(Args, Debug)]
#[command(after_help = "\
Examples:
  sistation seed                                   # Sample user 10 / A / X
  sistation seed --user-id 7 --display-name B      # Different sample user")]
pub struct SeedCmd {
    /// Id of the sample user
    #[arg(long, default_value_t = 10)]
    pub user_id: i64,

    /// Display name of the sample user
    #[arg(long, default_value = "A")]
    pub display_name: String,

    /// Department of the sample user
    #[arg(long, default_value = "X")]
    pub department: String,
}
