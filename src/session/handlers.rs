use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use bytes::Bytes;
use tracing::instrument;

use crate::{
    dates,
    error::AppError,
    ledger::{repo, MealRecord, NewMeal},
    nutrition,
    profile::Profile,
    state::AppState,
};

use super::dto::{
    ConfirmRequest, DashboardMacros, DashboardResponse, MacroGauge, NavigateRequest,
    ProfileResponse, SessionView,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(get_profile).put(save_profile))
        .route("/navigate", post(navigate))
        .route("/analyze", post(analyze))
        .route("/analyze/discard", post(discard))
        .route("/meals/confirm", post(confirm_save))
        .route("/dashboard", get(dashboard))
        .layer(DefaultBodyLimit::max(20 * 1024 * 1024)) // 20MB uploads
}

#[instrument(skip(state))]
async fn get_profile(State(state): State<AppState>) -> Json<ProfileResponse> {
    let session = state.session.read().await;
    Json(ProfileResponse {
        profile: session.profile().cloned(),
        view: session.view(),
    })
}

#[instrument(skip(state, body))]
async fn save_profile(
    State(state): State<AppState>,
    Json(body): Json<Profile>,
) -> Result<Json<SessionView>, AppError> {
    let mut session = state.session.write().await;
    session.save_profile(body)?;
    Ok(Json(SessionView {
        view: session.view(),
    }))
}

#[instrument(skip(state))]
async fn navigate(
    State(state): State<AppState>,
    Json(body): Json<NavigateRequest>,
) -> Result<Json<SessionView>, AppError> {
    let mut session = state.session.write().await;
    let view = session.navigate(body.target)?;
    Ok(Json(SessionView { view }))
}

/// upload-and-analyze: multipart `image` plus optional `label`. The
/// vision call is awaited inline; session locks are not held across it.
#[instrument(skip(state, multipart))]
async fn analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<crate::vision::NutritionEstimate>, AppError> {
    let mut image: Option<Bytes> = None;
    let mut label: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("malformed multipart body: {e}")))?
    {
        let name = field.name().map(|s| s.to_owned());
        match name.as_deref() {
            Some("image") => {
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::validation(format!("failed to read image: {e}")))?;
                image = Some(data);
            }
            Some("label") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::validation(format!("failed to read label: {e}")))?;
                let text = text.trim().to_owned();
                if !text.is_empty() {
                    label = Some(text);
                }
            }
            _ => {}
        }
    }

    let image = image.ok_or_else(|| AppError::validation("multipart field 'image' is required"))?;
    if image.is_empty() {
        return Err(AppError::validation("uploaded image is empty"));
    }

    {
        let session = state.session.read().await;
        if session.profile().is_none() {
            return Err(AppError::validation(
                "complete your profile before logging meals",
            ));
        }
    }

    let estimate = state.vision.estimate(image, label.as_deref()).await?;

    let mut session = state.session.write().await;
    session.hold_estimate(estimate.clone())?;
    Ok(Json(estimate))
}

#[instrument(skip(state))]
async fn discard(State(state): State<AppState>) -> StatusCode {
    let mut session = state.session.write().await;
    session.discard_estimate();
    StatusCode::NO_CONTENT
}

/// confirm-save: the only action that mutates persisted data. The
/// session transition commits only after the append succeeded.
#[instrument(skip(state, body))]
async fn confirm_save(
    State(state): State<AppState>,
    Json(body): Json<ConfirmRequest>,
) -> Result<(StatusCode, Json<MealRecord>), AppError> {
    let estimate = {
        let session = state.session.read().await;
        session.confirm_target()?.clone()
    };

    let meal_name = body
        .meal_name
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| estimate.meal_name.clone());

    let new_meal = NewMeal {
        log_date: dates::today(),
        meal_name,
        logged_at: dates::now_hhmm(),
        serving: Some(estimate.serving),
        calories: estimate.calories,
        protein_g: estimate.protein_g,
        carbs_g: estimate.carbs_g,
        fat_g: estimate.fat_g,
        fiber_g: estimate.fiber_g,
        sugar_g: estimate.sugar_g,
    };

    let id = repo::append(&state.db, &new_meal).await?;

    let mut session = state.session.write().await;
    session.finish_confirm();

    Ok((StatusCode::CREATED, Json(new_meal.into_record(id))))
}

#[instrument(skip(state))]
async fn dashboard(State(state): State<AppState>) -> Result<Json<DashboardResponse>, AppError> {
    let profile = {
        let session = state.session.read().await;
        session.profile().cloned()
    }
    .ok_or_else(|| AppError::validation("complete your profile before viewing the dashboard"))?;

    let today = dates::today();
    let totals = repo::sum_for_date(&state.db, today).await?;
    let meals = repo::list_for_date(&state.db, today).await?;

    let target_kcal = profile.daily_target_kcal();
    let macro_caps = nutrition::macro_targets(target_kcal);

    Ok(Json(DashboardResponse {
        date: today,
        daily_target_kcal: target_kcal,
        consumed_kcal: totals.calories,
        remaining_kcal: (target_kcal - totals.calories).max(0.0),
        macros: DashboardMacros {
            protein: MacroGauge {
                consumed_g: totals.protein_g,
                target_g: macro_caps.protein_g,
            },
            carbs: MacroGauge {
                consumed_g: totals.carbs_g,
                target_g: macro_caps.carbs_g,
            },
            fat: MacroGauge {
                consumed_g: totals.fat_g,
                target_g: macro_caps.fat_g,
            },
        },
        meals,
    }))
}
