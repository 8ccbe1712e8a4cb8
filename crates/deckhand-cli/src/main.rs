//! Deckhand CLI: upload, check and delete flashcard assets from the command line.
//!
//! Set DECKHAND_TOKEN (bearer token, re-read per request) and DECKHAND_API_URL
//! (or API_URL; defaults to http://localhost:8000).

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use deckhand_api_client::{ApiClient, EnvSession};
use deckhand_cli::{init_tracing, PathPicker};
use deckhand_core::{validate, AssetKind, ClientConfig, ValidationError};
use deckhand_upload::{DropZone, UploadProfile, UploadStateContainer};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "deckhand", about = "Deckhand asset CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Kind {
    Image,
    Deck,
}

impl From<Kind> for AssetKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Image => AssetKind::Image,
            Kind::Deck => AssetKind::DeckPackage,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a file (card image or .apkg deck package)
    Upload {
        /// Path to the file to upload
        file: PathBuf,
        /// Asset kind, selects the validation policy and endpoint
        #[arg(long, value_enum, default_value = "image")]
        kind: Kind,
    },
    /// Check a file against the upload policy without sending it
    Check {
        /// Path to the file to check
        file: PathBuf,
        #[arg(long, value_enum, default_value = "image")]
        kind: Kind,
    },
    /// Delete a previously uploaded asset by its URL
    Delete {
        /// Asset URL as returned by upload
        url: String,
    },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = ClientConfig::from_env().context("Invalid Deckhand configuration")?;
    let cli = Cli::parse();

    match cli.command {
        Commands::Upload { file, kind } => {
            let profile = UploadProfile::from_config(&config, kind.into());
            let client = ApiClient::from_config(&config, Arc::new(EnvSession::default()))?;
            let container = UploadStateContainer::new(client, profile);

            let policy = &container.profile().policy;
            let (mut zone, _events) = DropZone::new(policy);
            let picker = PathPicker::new(&file).with_max_size(policy.max_size_bytes);
            zone.browse(&picker).await?;
            let selected = zone
                .take_selected()
                .with_context(|| format!("No file selected: {}", file.display()))?;

            let result = container.upload(&selected).await?;
            print_json(&result)?;
        }
        Commands::Check { file, kind } => {
            let policy = config.policy_for(kind.into());
            let (mut zone, _events) = DropZone::new(&policy);
            let picker = PathPicker::new(&file).with_max_size(policy.max_size_bytes);
            if let Err(e) = zone.browse(&picker).await {
                let Some(reason) = e.downcast_ref::<ValidationError>() else {
                    return Err(e);
                };
                print_json(&serde_json::json!({
                    "valid": false,
                    "file": file.display().to_string(),
                    "reason": reason.to_string(),
                }))?;
                return Ok(());
            }
            let selected = zone
                .take_selected()
                .with_context(|| format!("No file selected: {}", file.display()))?;

            let verdict = match validate(&selected, &policy) {
                Ok(()) => serde_json::json!({ "valid": true, "file": selected.name() }),
                Err(e) => serde_json::json!({
                    "valid": false,
                    "file": selected.name(),
                    "reason": e.to_string(),
                }),
            };
            print_json(&verdict)?;
        }
        Commands::Delete { url } => {
            let client = ApiClient::from_config(&config, Arc::new(EnvSession::default()))?;
            let container = UploadStateContainer::new(client, UploadProfile::image());
            let removed = container.remove(&url).await?;
            print_json(&serde_json::json!({ "success": removed, "url": url }))?;
        }
    }

    Ok(())
}
