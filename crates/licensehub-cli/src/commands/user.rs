//! Operator account commands.

use std::sync::Arc;

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use licensehub_auth::PasswordHasher;
use licensehub_cache::CacheManager;
use licensehub_core::error::AppError;
use licensehub_database::Stores;
use licensehub_entity::user::User;
use licensehub_service::UserService;

use crate::output::{self, OutputFormat};

/// Arguments for user commands
#[derive(Debug, Args)]
pub struct UserArgs {
    /// User subcommand
    #[command(subcommand)]
    pub command: UserCommand,
}

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Create an operator account
    Create {
        /// Login name
        username: String,
        /// Contact email
        #[arg(long)]
        email: Option<String>,
        /// Display name
        #[arg(long)]
        nick: Option<String>,
        /// Password; prompted for when omitted
        #[arg(long)]
        password: Option<String>,
    },
}

#[derive(Debug, Serialize, Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Username")]
    username: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.clone(),
            email: user.email.clone().unwrap_or_default(),
            status: user.status.to_string(),
        }
    }
}

/// Execute user commands
pub async fn execute(
    args: &UserArgs,
    config_env: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        UserCommand::Create {
            username,
            email,
            nick,
            password,
        } => {
            let config = super::load_config(config_env)?;
            if config.database.is_memory() {
                output::print_warning("database.url is 'memory'; the account will not persist");
            }

            let password = match password {
                Some(p) => p.clone(),
                None => dialoguer::Password::new()
                    .with_prompt("Password")
                    .with_confirmation("Confirm password", "Passwords do not match")
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?,
            };

            let stores = Stores::from_config(&config.database).await?;
            let hasher = Arc::new(PasswordHasher::new(&config.auth)?);
            let service = UserService::new(
                stores.users,
                Arc::new(CacheManager::in_memory()),
                hasher,
                &config.auth,
            );

            let user = service
                .create(username, &password, email.clone(), nick.clone())
                .await?;
            output::print_success(&format!("User '{}' created", user.username));
            output::print_item(&UserRow::from(&user), format);
        }
    }
    Ok(())
}
