use clap::Parser;
use pmp_partner_api::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve(args) => cli::serve::run(args).await,
        Command::Routes(args) => cli::routes::run(args),
    }
}
