pub mod admin;
pub mod brews;
pub mod coffees;
pub mod health;

use crate::error::{ApiError, JournalError};
use log::warn;
use rocket::serde::json::Json;
use rocket::{Catcher, Request, Route, catch, catchers, routes};

pub fn get_routes() -> Vec<Route> {
    routes![
        health::health_check,
        // Coffees
        coffees::list_coffees,
        coffees::create_coffee,
        coffees::get_coffee,
        coffees::update_coffee,
        coffees::delete_coffee,
        coffees::list_coffee_brews,
        // Brews
        brews::list_brews,
        brews::create_brew,
        brews::preview_ratio,
        brews::get_brew,
        brews::update_brew,
        brews::delete_brew,
        // Schema setup
        admin::setup,
    ]
}

pub fn get_debug_routes() -> Vec<Route> {
    routes![admin::debug_snapshot]
}

pub fn get_catchers() -> Vec<Catcher> {
    catchers![bad_request, not_found, unprocessable, internal_error]
}

/// Lists stay usable without a database: they come back empty
pub(crate) fn soft_list<T>(
    result: Result<Vec<T>, JournalError>,
    what: &str,
) -> Result<Json<Vec<T>>, ApiError> {
    match result {
        Err(JournalError::Unconfigured) => {
            warn!("Database not configured, returning no {what}");
            Ok(Json(Vec::new()))
        }
        other => Ok(Json(other?)),
    }
}

/// Single-record reads: missing row and missing database both answer 404
pub(crate) fn soft_get<T, F>(
    result: Result<Option<T>, JournalError>,
    not_found: F,
) -> Result<Json<T>, ApiError>
where
    F: FnOnce() -> String,
{
    match result {
        Ok(Some(item)) => Ok(Json(item)),
        Ok(None) => Err(ApiError::NotFound(not_found())),
        Err(JournalError::Unconfigured) => {
            warn!("Database not configured");
            Err(ApiError::NotFound(not_found()))
        }
        Err(e) => Err(e.into()),
    }
}

#[catch(400)]
fn bad_request(_req: &Request<'_>) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "error": "Malformed request" }))
}

#[catch(404)]
fn not_found(req: &Request<'_>) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "error": format!("No route for {}", req.uri()) }))
}

#[catch(422)]
fn unprocessable(_req: &Request<'_>) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "error": "Request body could not be parsed" }))
}

#[catch(500)]
fn internal_error(_req: &Request<'_>) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "error": "Internal server error" }))
}
