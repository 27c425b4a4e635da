//! Credential CLI commands.

use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use authgate_auth::{Claims, JwtSigner, JwtVerifier, SigningKey};
use authgate_core::error::AppError;
use authgate_core::traits::{Clock, SystemClock};
use authgate_core::types::{Credential, Principal};

/// Arguments for token commands
#[derive(Debug, Args)]
pub struct TokenArgs {
    /// Token subcommand
    #[command(subcommand)]
    pub command: TokenCommand,
}

/// Token subcommands
#[derive(Debug, Subcommand)]
pub enum TokenCommand {
    /// Issue a credential for a principal
    Issue {
        /// Username to embed
        #[arg(short, long)]
        username: String,
        /// Grant the admin flag
        #[arg(long)]
        admin: bool,
        /// Validity in seconds (defaults to auth.token_ttl_seconds)
        #[arg(long)]
        ttl: Option<u64>,
    },
    /// Verify signature and expiry of a credential
    Verify {
        /// Encoded credential
        token: String,
    },
    /// Decode a credential WITHOUT verifying it
    Decode {
        /// Encoded credential
        token: String,
    },
}

/// Claim display row
#[derive(Debug, Serialize, Tabled)]
struct ClaimRow {
    /// Username
    username: String,
    /// Admin flag
    admin: bool,
    /// Issued at
    issued_at: String,
    /// Expires at
    expires_at: String,
    /// Seconds left
    remaining_secs: u64,
}

impl ClaimRow {
    fn new(claims: &Claims, now: i64) -> Self {
        Self {
            username: claims.username.clone(),
            admin: claims.is_admin,
            issued_at: format_timestamp(claims.iat),
            expires_at: format_timestamp(claims.exp),
            remaining_secs: claims.remaining_ttl_seconds(now),
        }
    }
}

/// Issued credential output
#[derive(Debug, Serialize)]
struct IssuedToken<'a> {
    token: &'a str,
    username: &'a str,
    is_admin: bool,
    expires_at: String,
}

/// Execute token commands
pub async fn execute(
    args: &TokenArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let key = SigningKey::from_config(&config.auth)?;

    match &args.command {
        TokenCommand::Issue {
            username,
            admin,
            ttl,
        } => {
            let ttl = ttl.unwrap_or(config.auth.token_ttl_seconds);
            let signer = JwtSigner::new(key, clock.clone());
            let principal = Principal::new(username.clone(), *admin);
            let credential = signer.issue(&principal, Duration::from_secs(ttl))?;

            let expires_at = clock
                .now()
                .checked_add_unsigned(ttl)
                .map(format_timestamp)
                .unwrap_or_else(|| "never".to_string());

            match format {
                OutputFormat::Table => {
                    output::print_success(&format!("Issued credential for {}", principal));
                    output::print_kv("Expires", &expires_at);
                    println!("{}", credential.as_str());
                }
                OutputFormat::Json => output::print_json(&IssuedToken {
                    token: credential.as_str(),
                    username: &principal.username,
                    is_admin: principal.is_admin,
                    expires_at,
                }),
            }
        }
        TokenCommand::Verify { token } => {
            let verifier = JwtVerifier::new(key, clock.clone());
            let claims = verifier.validate(&Credential::new(token.as_str()))?;

            if format == OutputFormat::Table {
                output::print_success("Credential is valid");
            }
            output::print_item(&ClaimRow::new(&claims, clock.now()), format);
        }
        TokenCommand::Decode { token } => {
            let verifier = JwtVerifier::new(key, clock.clone());
            let claims = verifier.decode_payload(&Credential::new(token.as_str()))?;

            output::print_warning("Signature and expiry were NOT checked");
            output::print_item(&ClaimRow::new(&claims, clock.now()), format);
        }
    }

    Ok(())
}

fn format_timestamp(secs: i64) -> String {
    chrono::DateTime::from_timestamp(secs, 0)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| secs.to_string())
}
