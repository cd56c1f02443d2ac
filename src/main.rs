use clap::Parser;
use tracing_subscriber::EnvFilter;

use sistation::cli::Args;
use sistation::config::ConfigFile;
use sistation::db::Executor;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = ConfigFile::resolve(&args.config)?;
    let executor = Executor::from_config(config);
    let output = args.command.run(&executor, args.format)?;
    println!("{}", output);
    Ok(())
}
