use crate::report::{run_export, run_score, ExportArgs, ScoreArgs};
use crate::server;
use ai_scan::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "AI Maturity Scan",
    about = "Score AI maturity scans from the command line or serve them over HTTP",
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
    /// Score or export a completed answer sheet
    Scan {
        #[command(subcommand)]
        command: ScanCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ScanCommand {
    /// Print overall, per-domain scores, weakest items and recommendations
    Score(ScoreArgs),
    /// Write the per-question CSV export
    Export(ExportArgs),
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
        Command::Scan {
            command: ScanCommand::Score(args),
        } => run_score(args),
        Command::Scan {
            command: ScanCommand::Export(args),
        } => run_export(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn scan_export_parses_date_override() {
        let cli = Cli::try_parse_from([
            "ai-scan-api",
            "scan",
            "export",
            "--answers",
            "answers.json",
            "--today",
            "2025-03-07",
        ])
        .expect("arguments parse");

        match cli.command {
            Some(Command::Scan {
                command: ScanCommand::Export(args),
            }) => {
                assert_eq!(args.answers, std::path::PathBuf::from("answers.json"));
                assert_eq!(
                    args.today.map(|date| date.to_string()),
                    Some("2025-03-07".to_string())
                );
                assert!(args.output.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
