use clap::Parser;
use mb_cli::{logging, run, Cli, CliConfig, Status};
use mb_client::HttpSchemaStore;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match try_main(cli).await {
        Ok(status) => status.into(),
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn try_main(cli: Cli) -> anyhow::Result<Status> {
    let config = CliConfig::load(cli.config.as_deref())?;
    logging::init(cli.verbose, &config.log.filter);
    tracing::debug!(base_url = %config.api.base_url, "configuration loaded");

    let store = HttpSchemaStore::new(config.api.clone())?;
    let mut stdout = std::io::stdout().lock();
    run(cli.command, &config, &store, &mut stdout).await
}
