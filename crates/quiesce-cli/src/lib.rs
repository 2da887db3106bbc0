pub mod cli;
pub mod diagnostics;
pub mod dispatch;
pub mod logging;

use anyhow::Result;
use clap::Parser;

use crate::cli::Cli;
use crate::diagnostics::DiagnosticsSession;
use crate::logging::{LogTarget, init_logging};

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let diagnostics = DiagnosticsSession::initialize(cli.diagnostics)?;
    let config = quiesce_app::load_user_config()?;

    let target = match diagnostics.log_file()? {
        Some(file) => LogTarget::File(file),
        None if cli.command.is_interactive() => LogTarget::Discard,
        None => LogTarget::Stderr,
    };
    init_logging(&config.logging, target)?;
    if let Some(path) = diagnostics.path() {
        tracing::info!(path = %path.display(), "diagnostics enabled");
    }

    dispatch::run_with_deps(cli, config)
}
