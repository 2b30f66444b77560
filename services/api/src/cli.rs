use clap::{Args, Parser, Subcommand};
use roi_quote::error::AppError;

use crate::demo::{run_demo, run_estimate, DemoArgs, EstimateArgs};
use crate::server;

#[derive(Parser, Debug)]
#[command(
    name = "ROI Quote Service",
    about = "Price service bundles and compare them against a business's current finance setup",
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
    /// Print the internal-team monthly estimate for a turnover band
    Estimate(EstimateArgs),
    /// Run an end-to-end quote demo against the built-in price book
    Demo(DemoArgs),
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
        Command::Estimate(args) => run_estimate(args),
        Command::Demo(args) => run_demo(args),
    }
}
