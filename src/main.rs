use gridrun::models::RunStatus;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // Process the command; the run status carries the scriptable exit code
    // (0 succeeded, 1 failed, 2 errored).
    match gridrun::cli::run().await {
        Ok(status) => ExitCode::from(status.exit_code()),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(RunStatus::Errored.exit_code())
        }
    }
}
