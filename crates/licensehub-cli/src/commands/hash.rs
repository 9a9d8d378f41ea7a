//! bcrypt hashing commands.

use clap::{Args, Subcommand};

use licensehub_auth::password::bcrypt::{self, DEFAULT_COST};
use licensehub_core::error::AppError;

use crate::output;

/// `hash <password> [--cost N]` or `hash verify <password> <hash>`
#[derive(Debug, Args)]
#[command(args_conflicts_with_subcommands = true)]
pub struct HashArgs {
    /// Hash subcommand
    #[command(subcommand)]
    pub command: Option<HashCommand>,
    /// Password to hash; prompted for when omitted
    pub password: Option<String>,
    /// Cost factor
    #[arg(long)]
    pub cost: Option<u32>,
}

/// Hash subcommands
#[derive(Debug, Subcommand)]
pub enum HashCommand {
    /// Check a password against a hash
    Verify {
        /// Candidate password
        password: String,
        /// bcrypt hash text
        hash: String,
    },
}

/// Execute hash commands
pub async fn execute(args: &HashArgs) -> Result<(), AppError> {
    if let Some(HashCommand::Verify { password, hash }) = &args.command {
        return if bcrypt::matches(password.as_bytes(), hash)? {
            output::print_success("Password matches");
            Ok(())
        } else {
            Err(AppError::authentication("Password does not match"))
        };
    }

    let password = match &args.password {
        Some(p) => p.clone(),
        None => dialoguer::Password::new()
            .with_prompt("Password")
            .interact()
            .map_err(|e| AppError::internal(format!("Input error: {e}")))?,
    };
    let cost = args.cost.unwrap_or(DEFAULT_COST);
    let hash = tokio::task::spawn_blocking(move || bcrypt::encode(password.as_bytes(), cost))
        .await
        .map_err(|e| AppError::internal(format!("Hashing task failed: {e}")))??;
    println!("{hash}");
    Ok(())
}
