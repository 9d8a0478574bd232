//! JSON API route handlers.
//!
//! Read-only echoes of the registry collections, with the same exact-match
//! filters as the HTML pages. The backend's empty-result policy shows
//! through unchanged: the relational store answers `[]`, the flat-file
//! store answers 404 with a no-results reason.

use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use motorpool_core::Vin;

use crate::error::{AppError, Result};
use crate::models::{Car, Person, Store};
use crate::state::AppState;

/// Query parameters for `/api/people`.
#[derive(Debug, Deserialize)]
pub struct PeopleQuery {
    pub vin: Option<String>,
}

/// Query parameters for `/api/cars`.
#[derive(Debug, Deserialize)]
pub struct CarsQuery {
    pub vin: Option<String>,
    pub make: Option<String>,
    pub year: Option<i32>,
}

/// Query parameters for `/api/stores`.
#[derive(Debug, Deserialize)]
pub struct StoresQuery {
    pub retailer: Option<String>,
}

/// List people as JSON.
pub async fn people(
    State(state): State<AppState>,
    Query(query): Query<PeopleQuery>,
) -> Result<Response> {
    let people: Vec<Person> = match query.vin.as_deref() {
        Some(raw) => {
            let vin = Vin::parse(raw)
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            state.registry().get_people_by_vin(&vin).await?
        }
        None => state.registry().get_all_people().await?,
    };

    Ok(Json(people).into_response())
}

/// List cars as JSON.
pub async fn cars(
    State(state): State<AppState>,
    Query(query): Query<CarsQuery>,
) -> Result<Response> {
    let cars: Vec<Car> = if let Some(raw) = query.vin.as_deref() {
        let vin = Vin::parse(raw).map_err(|e| AppError::BadRequest(e.to_string()))?;
        state.registry().get_cars_by_vin(&vin).await?
    } else if let Some(year) = query.year {
        state.registry().get_cars_by_year(year).await?
    } else if let Some(make) = query.make.as_deref() {
        state.registry().get_cars_by_make(make).await?
    } else {
        state.registry().get_cars().await?
    };

    Ok(Json(cars).into_response())
}

/// List stores as JSON.
pub async fn stores(
    State(state): State<AppState>,
    Query(query): Query<StoresQuery>,
) -> Result<Response> {
    let stores: Vec<Store> = match query.retailer.as_deref() {
        Some(retailer) => state.registry().get_stores_by_retailer(retailer).await?,
        None => state.registry().get_stores().await?,
    };

    Ok(Json(stores).into_response())
}
