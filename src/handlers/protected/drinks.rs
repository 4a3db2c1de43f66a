use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::database::{DrinkPatch, LongDrink, NewDrink, RecipeInput};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, DeletedPayload, DrinksPayload};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateDrinkRequest {
    pub title: Option<String>,
    pub recipe: Option<RecipeInput>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateDrinkRequest {
    pub title: Option<String>,
    pub recipe: Option<RecipeInput>,
}

/// Absent, empty and whitespace-only titles are all rejected
fn valid_title(title: Option<String>) -> Result<String, ApiError> {
    match title {
        Some(t) if !t.trim().is_empty() => Ok(t),
        _ => Err(ApiError::bad_request()),
    }
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload.map(|Json(body)| body).map_err(|e| {
        tracing::debug!("Rejected request body: {}", e);
        ApiError::bad_request()
    })
}

/// Ids that are not integers name no drink
fn drink_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, ApiError> {
    path.map(|Path(id)| id).map_err(|_| ApiError::not_found())
}

/// GET /drinks-detail - long view of every drink
pub async fn detail(State(state): State<AppState>) -> ApiResult<DrinksPayload<LongDrink>> {
    let drinks = state.store.list().await?;

    Ok(ApiResponse::success(DrinksPayload {
        drinks: drinks.iter().map(|d| d.long()).collect(),
    }))
}

/// POST /drinks - add a drink to the menu
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<CreateDrinkRequest>, JsonRejection>,
) -> ApiResult<DrinksPayload<LongDrink>> {
    let request = body(payload)?;
    let title = valid_title(request.title)?;
    let recipe = request.recipe.ok_or_else(ApiError::bad_request)?;

    let drink = state
        .store
        .insert(NewDrink {
            title,
            recipe: recipe.into(),
        })
        .await?;

    tracing::info!("Drink {} '{}' created by {:?}", drink.id, drink.title, user.subject);

    Ok(ApiResponse::success(DrinksPayload {
        drinks: vec![drink.long()],
    }))
}

/// PATCH /drinks/:id - replace title and/or recipe
pub async fn update(
    path: Result<Path<i64>, PathRejection>,
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<UpdateDrinkRequest>, JsonRejection>,
) -> ApiResult<DrinksPayload<LongDrink>> {
    let id = drink_id(path)?;
    let mut drink = state.store.get(id).await?.ok_or_else(ApiError::not_found)?;

    let request = body(payload)?;
    let patch = DrinkPatch {
        title: request.title.map(|t| valid_title(Some(t))).transpose()?,
        recipe: request.recipe.map(Into::into),
    };
    drink.apply(patch);

    // The row can vanish between the read and the write
    let updated = state.store.update(&drink).await?.ok_or_else(ApiError::not_found)?;

    tracing::info!("Drink {} updated by {:?}", updated.id, user.subject);

    Ok(ApiResponse::success(DrinksPayload {
        drinks: vec![updated.long()],
    }))
}

/// DELETE /drinks/:id - remove a drink for good
pub async fn delete(
    path: Result<Path<i64>, PathRejection>,
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<DeletedPayload> {
    let id = drink_id(path)?;
    state.store.get(id).await?.ok_or_else(ApiError::not_found)?;

    if !state.store.delete(id).await? {
        return Err(ApiError::not_found());
    }

    tracing::info!("Drink {} deleted by {:?}", id, user.subject);

    Ok(ApiResponse::success(DeletedPayload { delete: id }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_titles_are_rejected() {
        assert!(valid_title(None).is_err());
        assert!(valid_title(Some(String::new())).is_err());
        assert!(valid_title(Some("   ".into())).is_err());
        assert_eq!(valid_title(Some("Cortado".into())).unwrap(), "Cortado");
    }
}
