use crate::report::{
    run_certificate, run_grade, run_import_questions, run_progress, CertificateArgs, GradeArgs,
    ImportQuestionsArgs, ProgressArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use skillpath::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Skillpath",
    about = "Run the learning platform API or inspect quizzes and progress from the command line",
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
    /// Grade an answer sheet against a quiz definition
    Grade(GradeArgs),
    /// Print the progress dashboard for one learner
    Progress(ProgressArgs),
    /// Compose a completion certificate
    Certificate(CertificateArgs),
    /// Convert a question CSV into gateway JSON
    ImportQuestions(ImportQuestionsArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Dataset snapshot used to seed the in-memory gateway
    #[arg(long)]
    pub(crate) dataset: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Grade(args) => run_grade(args),
        Command::Progress(args) => run_progress(args),
        Command::Certificate(args) => run_certificate(args),
        Command::ImportQuestions(args) => run_import_questions(args),
    }
}
