use anyhow::Result;
use clap::Parser;
use lcsts_launcher::cli::Cli;
use lcsts_launcher::logging;
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    logging::init(cli.log_dir.as_deref());

    let command = cli.selected();
    logging::install_panic_hook(command.name());
    tracing::debug!("lcsts_launcher {}", command.name());

    let result = command.execute();
    if let Err(e) = &result {
        tracing::error!("{:#}", e);
    }
    logging::flush();
    result
}
