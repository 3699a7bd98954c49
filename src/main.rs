use std::sync::Arc;
use anyhow::Result;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use supplier_console::config::Settings;
use supplier_console::console::{Command, Console, HELP};
use supplier_console::{FormController, RestSupplierApi};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level)),
        )
        .with_writer(std::io::stderr)
        .init();
    settings.log_summary();

    let api = RestSupplierApi::new(&settings)?;
    info!(collection = %api.collection_url(), "Connected supplier console");

    let mut console = Console::new(FormController::new(Arc::new(api)));
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    stdout.write_all(format!("{HELP}\n> ").as_bytes()).await?;
    stdout.flush().await?;

    while let Some(line) = lines.next_line().await? {
        if !line.trim().is_empty() {
            match line.parse::<Command>() {
                Ok(Command::Quit) => break,
                Ok(command) => match console.execute(command).await {
                    Ok(output) if !output.is_empty() => {
                        stdout.write_all(format!("{output}\n").as_bytes()).await?;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        error!(error = %e, "Command aborted");
                        stdout.write_all(format!("error: {e}\n").as_bytes()).await?;
                    }
                },
                Err(e) => {
                    stdout.write_all(format!("{e}\n").as_bytes()).await?;
                }
            }
        }
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;
    }

    info!("Supplier console closed");
    Ok(())
}
