use axum::extract::State;

use crate::database::ShortDrink;
use crate::middleware::{ApiResponse, ApiResult, DrinksPayload};
use crate::state::AppState;

/// GET /drinks - public menu, short view of every drink
pub async fn list(State(state): State<AppState>) -> ApiResult<DrinksPayload<ShortDrink>> {
    let drinks = state.store.list().await?;

    Ok(ApiResponse::success(DrinksPayload {
        drinks: drinks.iter().map(|d| d.short()).collect(),
    }))
}
