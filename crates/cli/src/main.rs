mod commands;
mod config;
mod error;

use std::process::ExitCode;

use client::{ApiClient, FileCache, Ledger};

use crate::error::Result;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "expense_cli=warn,client=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let (config, command) = config::load()?;
    let api = ApiClient::new(&config.base_url);
    let mut ledger = Ledger::open(config.user.clone(), FileCache::new(&config.cache_path));

    commands::run(command, &api, &config.token, &mut ledger).await
}
