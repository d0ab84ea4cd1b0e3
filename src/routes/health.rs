use crate::state::AppState;
use rocket::serde::json::Json;
use rocket::{State, get};

#[get("/api/v1/health")]
pub async fn health_check(state: &State<AppState>) -> Json<serde_json::Value> {
    let database = if state.journal.is_configured() {
        "configured"
    } else {
        "unconfigured"
    };

    Json(serde_json::json!({
        "status": "ok",
        "database": database,
    }))
}
