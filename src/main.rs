use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use ats_audit::cli::{handle_command, AuditCli};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging first; reports go to stdout, diagnostics to stderr.
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = AuditCli::parse();
    handle_command(cli).await
}
