use super::{soft_get, soft_list};
use crate::error::{ApiError, parse_id};
use crate::models::{
    Brew, BrewFilter, BrewInput, Mutation, RatioPreview, Removal, brew_ratio, validate_dose,
};
use crate::state::AppState;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{State, delete, get, post, put};

#[get("/api/v1/brews?<min_rating>")]
pub async fn list_brews(
    min_rating: Option<f64>,
    state: &State<AppState>,
) -> Result<Json<Vec<Brew>>, ApiError> {
    soft_list(state.journal.list_brews(&BrewFilter::new(min_rating)), "brews")
}

#[post("/api/v1/brews", data = "<input>")]
pub async fn create_brew(
    input: Json<BrewInput>,
    state: &State<AppState>,
) -> Result<(Status, Json<Mutation<Brew>>), ApiError> {
    let created = state.journal.create_brew(input.into_inner())?;
    Ok((Status::Created, Json(created)))
}

#[get("/api/v1/brews/<id>")]
pub async fn get_brew(id: &str, state: &State<AppState>) -> Result<Json<Brew>, ApiError> {
    let id = parse_id(id)?;
    soft_get(state.journal.get_brew_by_id(id), || format!("Brew {id} not found"))
}

#[put("/api/v1/brews/<id>", data = "<input>")]
pub async fn update_brew(
    id: &str,
    input: Json<BrewInput>,
    state: &State<AppState>,
) -> Result<Json<Mutation<Brew>>, ApiError> {
    let id = parse_id(id)?;
    Ok(Json(state.journal.update_brew(id, input.into_inner())?))
}

#[delete("/api/v1/brews/<id>")]
pub async fn delete_brew(id: &str, state: &State<AppState>) -> Result<Json<Removal>, ApiError> {
    let id = parse_id(id)?;
    Ok(Json(state.journal.delete_brew(id)?))
}

/// Ratio preview for forms, computed exactly as brew writes compute it
#[get("/api/v1/brews/ratio?<dose>&<water_amount>")]
pub async fn preview_ratio(
    dose: Option<f64>,
    water_amount: Option<i32>,
) -> Result<Json<RatioPreview>, ApiError> {
    let (Some(dose), Some(water_amount)) = (dose, water_amount) else {
        return Err(ApiError::BadRequest(
            "dose and water_amount are required numbers".to_string(),
        ));
    };

    validate_dose(dose).map_err(ApiError::BadRequest)?;
    if water_amount < 0 {
        return Err(ApiError::BadRequest(
            "water_amount must not be negative".to_string(),
        ));
    }

    Ok(Json(RatioPreview {
        dose,
        water_amount,
        ratio: brew_ratio(dose, water_amount),
    }))
}
