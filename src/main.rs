use clap::Parser;
use wildfire_gateway::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Fetch(args) => cli::fetch::run(args).await,
        Command::Cache(args) => cli::cache::run(args).await,
    }
}
