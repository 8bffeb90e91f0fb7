use slinky::{
    app,
    config::{Credentials, Settings},
    logging,
};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("slinky: {err}: {}", source_of(&err));
            return ExitCode::FAILURE;
        }
    };

    let _guards = match logging::init_logging(&settings.log_dir) {
        Ok(guards) => guards,
        Err(err) => {
            eprintln!("slinky: {err}");
            return ExitCode::FAILURE;
        }
    };

    let credentials = match Credentials::from_env() {
        Ok(credentials) => credentials,
        Err(err) => {
            tracing::error!(error = %err, cause = %source_of(&err), "cannot load credentials");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(subreddit = %settings.subreddit, "starting");
    match app::run(settings, credentials).await {
        Ok(report) => {
            tracing::info!(?report, "stopped");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "stopped with error");
            ExitCode::FAILURE
        }
    }
}

fn source_of(err: &dyn std::error::Error) -> String {
    err.source().map(ToString::to_string).unwrap_or_default()
}
