use crate::error::ApiError;
use crate::models::{DebugSnapshot, SetupReport};
use crate::state::AppState;
use rocket::serde::json::Json;
use rocket::{State, get, post};

/// Table layout and the latest brew rows. Only mounted when debug endpoints
/// are enabled in the configuration.
#[get("/api/v1/debug")]
pub async fn debug_snapshot(state: &State<AppState>) -> Result<Json<DebugSnapshot>, ApiError> {
    Ok(Json(state.journal.debug_snapshot()?))
}

/// Creates missing tables. Never drops or recreates existing ones.
#[post("/api/v1/setup")]
pub async fn setup(state: &State<AppState>) -> Result<Json<SetupReport>, ApiError> {
    Ok(Json(state.journal.setup()?))
}
