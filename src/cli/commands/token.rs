use anyhow::bail;
use clap::Args;
use serde_json::json;

use crate::auth::{generate_jwt, Claims};
use crate::cli::{utils::output_success, OutputFormat};
use crate::config::AppConfig;

/// Every permission a route checks
pub const ALL_PERMISSIONS: [&str; 4] = ["get:drinks-detail", "post:drinks", "patch:drinks", "delete:drinks"];

#[derive(Args, Debug)]
pub struct TokenArgs {
    #[arg(long = "permission", short = 'p', help = "Permission to grant (repeatable)")]
    pub permissions: Vec<String>,

    #[arg(long, help = "Grant every drink permission")]
    pub all: bool,

    #[arg(long, default_value = "dev|local", help = "Token subject")]
    pub subject: String,

    #[arg(long, help = "Lifetime in hours (defaults to AUTH_TOKEN_EXPIRY_HOURS)")]
    pub hours: Option<u64>,
}

pub fn handle(args: TokenArgs, config: AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let Some(secret) = config.auth.jwt_secret.as_deref() else {
        bail!("AUTH_JWT_SECRET must be set to mint tokens");
    };

    let mut permissions = args.permissions;
    if args.all {
        permissions.extend(ALL_PERMISSIONS.iter().map(|p| p.to_string()));
    }
    permissions.sort();
    permissions.dedup();

    let claims = Claims::new(
        args.subject,
        permissions,
        config.auth.audience.clone(),
        config.auth.issuer.clone(),
        args.hours.unwrap_or(config.auth.token_expiry_hours),
    )?;
    let token = generate_jwt(&claims, secret)?;

    match output_format {
        OutputFormat::Json => output_success(
            &output_format,
            "Token minted",
            Some(json!({ "token": token, "claims": claims })),
        ),
        OutputFormat::Text => {
            println!("{}", token);
            Ok(())
        }
    }
}
