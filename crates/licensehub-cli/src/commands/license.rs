//! License administration commands.

use std::sync::Arc;

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use licensehub_auth::RsaCodec;
use licensehub_auth::codec::keys;
use licensehub_core::config::AppConfig;
use licensehub_core::error::AppError;
use licensehub_core::types::pagination::PageRequest;
use licensehub_database::Stores;
use licensehub_entity::license::{License, LicenseStatus, expire};
use licensehub_service::LicenseService;
use licensehub_service::license::envelope;

use crate::output::{self, OutputFormat};

/// Arguments for license commands
#[derive(Debug, Args)]
pub struct LicenseArgs {
    /// License subcommand
    #[command(subcommand)]
    pub command: LicenseCommand,
}

/// License subcommands
#[derive(Debug, Subcommand)]
pub enum LicenseCommand {
    /// List live licenses
    List {
        /// Name filter (substring)
        #[arg(long)]
        name: Option<String>,
        /// Page number
        #[arg(long, default_value_t = 1)]
        page: u64,
        /// Page size
        #[arg(long, default_value_t = 20)]
        size: u64,
    },
    /// Overwrite a license status (valid, invalid, expired)
    Status {
        /// Container id
        container_id: String,
        /// New status
        status: LicenseStatus,
    },
    /// Soft-delete a license
    Remove {
        /// Container id
        container_id: String,
        /// Skip confirmation
        #[arg(long)]
        force: bool,
    },
    /// Seal a JSON payload into a `{key, info}` envelope for the configured public key
    Seal {
        /// Payload JSON, e.g. '{"name":"acme","containerId":"c-1"}'
        json: String,
    },
}

#[derive(Debug, Serialize, Tabled)]
struct LicenseRow {
    #[tabled(rename = "Container")]
    container_id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Domain")]
    domain: String,
    #[tabled(rename = "Expire")]
    expire: String,
    #[tabled(rename = "Last Online")]
    last_online: String,
}

impl From<&License> for LicenseRow {
    fn from(license: &License) -> Self {
        Self {
            container_id: license.container_id.clone(),
            name: license.name.clone(),
            status: license.status.to_string(),
            ip: license.ip.clone(),
            domain: license.domain.clone(),
            expire: expire::format(license.expire),
            last_online: license
                .last_online_at
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

async fn license_service(config: &AppConfig) -> Result<LicenseService, AppError> {
    let codec = Arc::new(RsaCodec::from_config(&config.keys)?);
    let stores = Stores::from_config(&config.database).await?;
    Ok(LicenseService::new(stores.licenses, codec, &config.license))
}

/// Execute license commands
pub async fn execute(
    args: &LicenseArgs,
    config_env: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_env)?;

    match &args.command {
        LicenseCommand::List { name, page, size } => {
            let service = license_service(&config).await?;
            let result = service
                .list(name.as_deref(), &PageRequest::new(*page, *size))
                .await?;
            let rows: Vec<LicenseRow> = result.items.iter().map(LicenseRow::from).collect();
            output::print_list(&rows, format);
            if format == OutputFormat::Table {
                println!(
                    "Page {}/{} ({} total)",
                    result.page, result.total_pages, result.total_items
                );
            }
        }
        LicenseCommand::Status {
            container_id,
            status,
        } => {
            let service = license_service(&config).await?;
            let license = service.set_status(container_id, *status).await?;
            output::print_success(&format!(
                "License '{}' is now {}",
                license.container_id, license.status
            ));
        }
        LicenseCommand::Remove {
            container_id,
            force,
        } => {
            if !force {
                let confirmed = dialoguer::Confirm::new()
                    .with_prompt(format!("Remove license '{container_id}'?"))
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?;
                if !confirmed {
                    output::print_warning("Cancelled");
                    return Ok(());
                }
            }
            let service = license_service(&config).await?;
            service.remove(container_id).await?;
            output::print_success(&format!("License '{container_id}' removed"));
        }
        LicenseCommand::Seal { json } => {
            let payload: serde_json::Value = serde_json::from_str(json)?;
            let plaintext = serde_json::to_vec(&payload)?;
            let public = keys::load_public_key(&config.keys.public_key_path)?;
            let sealed = envelope::seal(&plaintext, &public)?;
            println!("{}", serde_json::to_string_pretty(&sealed)?);
        }
    }
    Ok(())
}
