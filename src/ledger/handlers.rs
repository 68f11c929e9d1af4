use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use tracing::instrument;

use crate::{dates, error::AppError, state::AppState};

use super::dto::DateQuery;
use super::{repo, MealRecord};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/meals", get(list_meals))
        .route("/meals/:id", delete(delete_meal))
}

#[instrument(skip(state))]
async fn list_meals(
    State(state): State<AppState>,
    Query(q): Query<DateQuery>,
) -> Result<Json<Vec<MealRecord>>, AppError> {
    let date = match q.date.as_deref() {
        Some(raw) => dates::parse_date(raw)?,
        None => dates::today(),
    };
    let meals = repo::list_for_date(&state.db, date).await?;
    Ok(Json(meals))
}

#[instrument(skip(state))]
async fn delete_meal(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    repo::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
