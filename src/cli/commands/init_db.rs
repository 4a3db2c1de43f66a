use anyhow::Context;
use serde_json::json;

use crate::cli::{utils::output_success, OutputFormat};
use crate::config::AppConfig;
use crate::state::AppState;

pub async fn handle(config: AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let store = AppState::open_store(&config).await?;
    store.reset().await.context("failed to reset drink store")?;

    let drinks = store.list().await?;
    output_success(
        &output_format,
        &format!("Drink store reset, {} drink(s) seeded", drinks.len()),
        Some(json!({ "drinks": drinks })),
    )
}
