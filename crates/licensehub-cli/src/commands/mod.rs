//! CLI command definitions and dispatch.

pub mod hash;
pub mod keys;
pub mod license;
pub mod migrate;
pub mod user;

use clap::{Parser, Subcommand};

use licensehub_core::config::AppConfig;
use licensehub_core::error::AppError;

use crate::output::OutputFormat;

/// LicenseHub administration
#[derive(Debug, Parser)]
#[command(name = "licensehub", version, about, long_about = None)]
pub struct Cli {
    /// Configuration overlay to load (`config/<env>.toml`)
    #[arg(long, env = "LICENSEHUB_ENV", default_value = "development")]
    pub config_env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// RSA key pair management
    Keys(keys::KeysArgs),
    /// bcrypt hashing
    Hash(hash::HashArgs),
    /// Operator account management
    User(user::UserArgs),
    /// License administration
    License(license::LicenseArgs),
    /// Apply pending database migrations
    Migrate,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Keys(args) => keys::execute(args, &self.config_env).await,
            Commands::Hash(args) => hash::execute(args).await,
            Commands::User(args) => user::execute(args, &self.config_env, self.format).await,
            Commands::License(args) => {
                license::execute(args, &self.config_env, self.format).await
            }
            Commands::Migrate => migrate::execute(&self.config_env).await,
        }
    }
}

/// Helper: load configuration for an environment
pub fn load_config(env: &str) -> Result<AppConfig, AppError> {
    AppConfig::load(env)
}
