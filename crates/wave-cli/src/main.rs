use std::io::Read;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use wave_core::discount::{self, RunInput};

#[derive(Debug, Parser)]
#[command(name = "wave-cli")]
#[command(about = "Wave cart drawer command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply pending database migrations.
    Migrate,
    /// Evaluate a discount input envelope and print the decision.
    Evaluate {
        /// Path to a JSON input envelope; reads stdin when omitted.
        input: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Migrate => migrate().await,
        Commands::Evaluate { input } => evaluate(input.as_deref()),
    }
}

async fn migrate() -> anyhow::Result<()> {
    let pool = wave_db::connect_pool_from_env().await?;
    let applied = wave_db::run_migrations(&pool).await?;
    println!("applied {applied} migration(s)");
    Ok(())
}

/// Offline harness for the discount evaluator: feed it the same envelope the
/// checkout pipeline sends and inspect the decision without a running server.
fn evaluate(input: Option<&std::path::Path>) -> anyhow::Result<()> {
    let raw = match input {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    // Evaluation is total: an envelope that does not parse is treated as
    // empty and yields the empty decision, never an error.
    let input: RunInput = serde_json::from_str(&raw).unwrap_or_default();
    let result = discount::run(&input);
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
