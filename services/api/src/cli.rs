use clap::{Args, Parser, Subcommand};
use hemolink::error::AppError;

use crate::demo::{run_campaign_seed, run_demo, CampaignSeedArgs, DemoArgs};
use crate::server;

#[derive(Parser, Debug)]
#[command(
    name = "Hemolink",
    about = "Run the blood donation coordination service from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Campaign maintenance utilities
    Campaign {
        #[command(subcommand)]
        command: CampaignCommand,
    },
    /// Run an end-to-end CLI demo covering intake, campaigns, and inventory
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum CampaignCommand {
    /// Load campaigns from a CSV seed file and print the resulting board
    Seed(CampaignSeedArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Campaign {
            command: CampaignCommand::Seed(args),
        } => run_campaign_seed(args),
        Command::Demo(args) => run_demo(args),
    }
}
