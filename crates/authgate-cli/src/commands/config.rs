//! Configuration management CLI commands.

use clap::{Args, Subcommand};

use crate::output::{self, OutputFormat};
use authgate_core::config::AppConfig;
use authgate_core::error::AppError;

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration with secrets masked
    Show,
    /// Validate configuration file
    Validate,
}

/// Execute config commands
pub async fn execute(
    args: &ConfigArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => {
            let config = masked(super::load_config(config_path)?);
            match format {
                OutputFormat::Table => print_summary(&config),
                OutputFormat::Json => output::print_json(&config),
            }
        }
        ConfigCommand::Validate => match super::load_config(config_path) {
            Ok(config) => {
                output::print_success(&format!("Configuration '{}' is valid", config_path));
                print_summary(&masked(config));
            }
            Err(e) => {
                output::print_error(&format!("Configuration invalid: {}", e));
                return Err(e);
            }
        },
    }

    Ok(())
}

fn print_summary(config: &AppConfig) {
    output::print_kv("Secret", &config.auth.jwt_secret);
    output::print_kv("Token TTL", &format!("{}s", config.auth.token_ttl_seconds));
    output::print_kv("Store", &config.session.store.to_string());
    output::print_kv("Store path", &config.session.store_path);
    output::print_kv(
        "Verify timeout",
        &format!("{}s", config.session.verify_timeout_seconds),
    );
    output::print_kv(
        "Monitor",
        &if config.monitor.enabled {
            format!("every {}s", config.monitor.poll_interval_seconds)
        } else {
            "disabled".to_string()
        },
    );
    output::print_kv(
        "Logging",
        &format!("{} ({})", config.logging.level, config.logging.format),
    );
    let users: Vec<&str> = config.users.iter().map(|u| u.username.as_str()).collect();
    output::print_kv("Users", &users.join(", "));
}

/// Replace secrets with a fixed mask
fn masked(mut config: AppConfig) -> AppConfig {
    config.auth.jwt_secret = mask(&config.auth.jwt_secret);
    for user in &mut config.users {
        user.password = mask(&user.password);
    }
    config
}

fn mask(secret: &str) -> String {
    if secret.is_empty() {
        String::new()
    } else {
        "****".to_string()
    }
}
