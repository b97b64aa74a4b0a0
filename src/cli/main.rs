use anyhow::Context;
use clap::{Parser, Subcommand};
use complaint_router::{
    config::{ClassifierConfig, Config},
    ml::{load_dataset, TrainedPipeline},
};
use reqwest::Client;
use serde_json::json;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "complaint-cli")]
#[command(about = "Complaint Router CLI", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:5001")]
    endpoint: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a complaint
    Classify {
        #[arg(short, long)]
        text: String,

        #[arg(short, long)]
        location: String,
    },

    /// Show the model the server is using
    Model,

    /// Check server health
    Health,

    /// Fit on a dataset and report how many of its own rows are reproduced
    CheckDataset {
        /// Dataset to fit on; defaults to the configured `classifier.dataset_path`
        #[arg(short, long)]
        dataset: Option<PathBuf>,

        /// Print every row whose label is not reproduced
        #[arg(short, long)]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let client = Client::new();

    match cli.command {
        Commands::Classify { text, location } => {
            let response = client
                .post(format!("{}/classify", cli.endpoint))
                .json(&json!({
                    "text": text,
                    "location": location,
                }))
                .send()
                .await
                .context("failed to reach complaint router")?;

            let body: serde_json::Value = response.json().await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }

        Commands::Model => {
            let response = client
                .get(format!("{}/model", cli.endpoint))
                .send()
                .await
                .context("failed to reach complaint router")?;

            let body: serde_json::Value = response.json().await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }

        Commands::Health => {
            let response = client
                .get(format!("{}/health", cli.endpoint))
                .send()
                .await
                .context("failed to reach complaint router")?;

            let body: serde_json::Value = response.json().await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }

        Commands::CheckDataset { dataset, verbose } => {
            // Fit exactly the model the server would build
            let classifier_config = match Config::load() {
                Ok(config) => config.classifier,
                Err(e) => {
                    eprintln!("Warning: failed to load configuration ({}), using defaults", e);
                    ClassifierConfig::default()
                }
            }
            .with_dataset_path(dataset);

            let path = &classifier_config.dataset_path;
            let rows = load_dataset(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            let pipeline = TrainedPipeline::fit(&rows, &classifier_config)?;
            let mismatches = pipeline.training_mismatches(&rows)?;

            println!(
                "Reproduced {}/{} training labels",
                rows.len() - mismatches.len(),
                rows.len()
            );
            println!("Note: every row was used for fitting; this is not a held-out evaluation.");

            if verbose {
                for mismatch in &mismatches {
                    println!(
                        "  \"{}\" ({}): expected {}, got {}",
                        mismatch.text, mismatch.location, mismatch.expected, mismatch.predicted
                    );
                }
            }

            if !mismatches.is_empty() {
                std::process::exit(2);
            }
        }
    }

    Ok(())
}
