pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "coffee-shop")]
#[command(about = "Coffee Shop API - drink catalog server and admin tools")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve(commands::serve::ServeArgs),

    #[command(about = "Drop and recreate the drinks table, seeding the default drink")]
    InitDb,

    #[command(about = "Mint a development token signed with AUTH_JWT_SECRET")]
    Token(commands::token::TokenArgs),
}

#[derive(Debug, Clone)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let config = AppConfig::from_env()?;
    tracing::info!("Loaded {:?} configuration", config.environment);

    match cli.command.unwrap_or(Commands::Serve(Default::default())) {
        Commands::Serve(args) => commands::serve::handle(args, config).await,
        Commands::InitDb => commands::init_db::handle(config, output_format).await,
        Commands::Token(args) => commands::token::handle(args, config, output_format),
    }
}
