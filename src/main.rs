use clap::Parser;
use dirscout::cli::Cli;
use dirscout::runner;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    runner::run(cli).await
}
