mod cli;
mod infra;
mod relay;
mod report;
mod routes;
mod server;

use skillpath::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
