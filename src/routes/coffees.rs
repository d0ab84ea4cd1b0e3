use super::{soft_get, soft_list};
use crate::error::{ApiError, parse_id};
use crate::models::{Brew, Coffee, CoffeeFilter, CoffeeInput, Mutation, Removal};
use crate::state::AppState;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{State, delete, get, post, put};

/// `q` searches name, region, producer, variety and process
#[get("/api/v1/coffees?<q>&<min_rating>")]
pub async fn list_coffees(
    q: Option<String>,
    min_rating: Option<f64>,
    state: &State<AppState>,
) -> Result<Json<Vec<Coffee>>, ApiError> {
    let filter = CoffeeFilter::new(q, min_rating);
    soft_list(state.journal.list_coffees(&filter), "coffees")
}

#[post("/api/v1/coffees", data = "<input>")]
pub async fn create_coffee(
    input: Json<CoffeeInput>,
    state: &State<AppState>,
) -> Result<(Status, Json<Mutation<Coffee>>), ApiError> {
    let created = state.journal.create_coffee(input.into_inner())?;
    Ok((Status::Created, Json(created)))
}

#[get("/api/v1/coffees/<id>")]
pub async fn get_coffee(id: &str, state: &State<AppState>) -> Result<Json<Coffee>, ApiError> {
    let id = parse_id(id)?;
    soft_get(state.journal.get_coffee_by_id(id), || format!("Coffee {id} not found"))
}

#[put("/api/v1/coffees/<id>", data = "<input>")]
pub async fn update_coffee(
    id: &str,
    input: Json<CoffeeInput>,
    state: &State<AppState>,
) -> Result<Json<Mutation<Coffee>>, ApiError> {
    let id = parse_id(id)?;
    Ok(Json(state.journal.update_coffee(id, input.into_inner())?))
}

/// Deletes the coffee together with all of its brews
#[delete("/api/v1/coffees/<id>")]
pub async fn delete_coffee(id: &str, state: &State<AppState>) -> Result<Json<Removal>, ApiError> {
    let id = parse_id(id)?;
    Ok(Json(state.journal.delete_coffee(id)?))
}

/// Latest brews of one coffee, as shown on its detail view
#[get("/api/v1/coffees/<id>/brews?<limit>")]
pub async fn list_coffee_brews(
    id: &str,
    limit: Option<i64>,
    state: &State<AppState>,
) -> Result<Json<Vec<Brew>>, ApiError> {
    let id = parse_id(id)?;
    soft_list(state.journal.list_brews_by_coffee_id(id, limit), "brews")
}
