use crate::demo::{run_assess, run_demo, run_questionnaire, AssessArgs, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use risk_screener::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Breast Cancer Risk Screener",
    about = "Score the risk questionnaire and find nearby breast specialists",
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
    /// Print the questionnaire with its allowed answers
    Questionnaire,
    /// Score an answer file and look up nearby providers
    Assess(AssessArgs),
    /// Score a set of sample respondents without calling any external service
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
        Command::Questionnaire => {
            run_questionnaire();
            Ok(())
        }
        Command::Assess(args) => run_assess(args).await,
        Command::Demo(args) => {
            run_demo(args);
            Ok(())
        }
    }
}
