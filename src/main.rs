use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use citeview::catalog::Catalog;
use citeview::config;

#[derive(Parser)]
#[command(
    name = "citeview",
    version,
    about = "Browse citation-extraction pipeline outputs in the browser"
)]
struct Cli {
    /// Outputs root directory (overrides the config file)
    #[arg(long, global = true, env = "CITEVIEW_OUTPUTS")]
    outputs: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the dashboards
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to listen on
        #[arg(long, default_value_t = 8423)]
        port: u16,
    },
    /// List output folders and their inference status
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("citeview=info")),
        )
        .init();

    let cli = Cli::parse();

    let mut settings = config::load_settings().await;
    if let Some(outputs) = cli.outputs {
        settings.outputs_dir = outputs;
    }

    match cli.command {
        Command::Serve { host, port } => citeview::server::serve(&settings, &host, port).await,
        Command::List => {
            let catalog = Catalog::scan(&settings.outputs_dir);
            for folder in catalog.folders() {
                let modified = folder
                    .modified
                    .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| "—".to_string());
                println!("{}\t{}\t{}", folder.id, folder.validity.label(), modified);
            }
            println!(
                "{} folders, {} failed LLM inference",
                catalog.len(),
                catalog.failed_count()
            );
            Ok(())
        }
    }
}
