//! Car route handlers.
//!
//! Cars are keyed by their user-supplied VIN; the list supports exact-match
//! filters on vin, make and year. All routes require a logged-in user.

use askama::Template;
use askama_web::WebTemplate;
use axum::Form;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use motorpool_core::Vin;

use crate::db::RepositoryError;
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::{Car, NewCar};
use crate::state::AppState;

/// Accepted model year range (first production car to a generous horizon).
const YEAR_RANGE: std::ops::RangeInclusive<i32> = 1886..=2100;

// =============================================================================
// View Types
// =============================================================================

/// Car display data for templates.
#[derive(Clone)]
pub struct CarView {
    pub vin: String,
    pub make: String,
    pub model: String,
    pub year: i32,
}

impl From<Car> for CarView {
    fn from(car: Car) -> Self {
        Self {
            vin: car.vin.into_inner(),
            make: car.make,
            model: car.model,
            year: car.year,
        }
    }
}

// =============================================================================
// Form and Query Types
// =============================================================================

/// Query parameters for the car list. At most one filter is applied, in
/// the order vin, year, make.
#[derive(Debug, Deserialize)]
pub struct CarsQuery {
    pub vin: Option<String>,
    pub make: Option<String>,
    pub year: Option<String>,
    pub error: Option<String>,
}

/// Add/update form data.
#[derive(Debug, Deserialize)]
pub struct CarForm {
    pub vin: String,
    pub make: String,
    pub model: String,
    pub year: String,
}

/// Translate an error code from a redirect into a user-facing message.
fn error_message(code: &str) -> String {
    match code {
        "add" => "Unable to add the car".to_owned(),
        "taken" => "A car with this VIN is already registered".to_owned(),
        "update" => "Unable to update the car".to_owned(),
        "delete" => "Unable to remove car / car not found".to_owned(),
        "invalid" => "VIN, make, model and a numeric year are required".to_owned(),
        _ => "Something went wrong".to_owned(),
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Car list page template.
#[derive(Template, WebTemplate)]
#[template(path = "cars/index.html")]
pub struct CarsTemplate {
    pub username: Option<String>,
    pub cars: Vec<CarView>,
    pub info: Option<String>,
    pub error: Option<String>,
}

/// Add car page template.
#[derive(Template, WebTemplate)]
#[template(path = "cars/add.html")]
pub struct CarAddTemplate {
    pub username: Option<String>,
    pub error: Option<String>,
}

/// Edit car page template.
#[derive(Template, WebTemplate)]
#[template(path = "cars/edit.html")]
pub struct CarEditTemplate {
    pub username: Option<String>,
    pub car: Option<CarView>,
    pub error: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// List cars, optionally filtered by vin, year or make.
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<CarsQuery>,
) -> Result<Response> {
    let mut error = query.error.as_deref().map(error_message);

    let result = if let Some(raw) = query.vin.as_deref() {
        match Vin::parse(raw) {
            Ok(vin) => state.registry().get_cars_by_vin(&vin).await,
            Err(_) => Ok(Vec::new()),
        }
    } else if let Some(raw) = query.year.as_deref() {
        match raw.trim().parse::<i32>() {
            Ok(year) => state.registry().get_cars_by_year(year).await,
            Err(_) => Ok(Vec::new()),
        }
    } else if let Some(make) = query.make.as_deref() {
        state.registry().get_cars_by_make(make).await
    } else {
        state.registry().get_cars().await
    };

    let (cars, info) = match result {
        Ok(cars) if cars.is_empty() => (Vec::new(), Some("no results".to_owned())),
        Ok(cars) => (cars.into_iter().map(CarView::from).collect(), None),
        Err(RepositoryError::NoResults) => {
            error = Some(RepositoryError::NoResults.to_string());
            (Vec::new(), None)
        }
        Err(e) => return Err(e.into()),
    };

    Ok(CarsTemplate {
        username: Some(user.username.into_inner()),
        cars,
        info,
        error,
    }
    .into_response())
}

/// Display the add-car form.
pub async fn add_page(
    RequireAuth(user): RequireAuth,
    Query(query): Query<CarsQuery>,
) -> impl IntoResponse {
    CarAddTemplate {
        username: Some(user.username.into_inner()),
        error: query.error.as_deref().map(error_message),
    }
}

/// Handle the add-car form submission.
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Form(form): Form<CarForm>,
) -> Result<Response> {
    let Some(car) = new_car_from_form(&form) else {
        return Ok(Redirect::to("/cars/add?error=invalid").into_response());
    };

    match state.registry().add_car(car).await {
        Ok(_) => Ok(Redirect::to("/cars").into_response()),
        Err(RepositoryError::Conflict(_)) => {
            Ok(Redirect::to("/cars/add?error=taken").into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Display the edit form for one car.
pub async fn edit_page(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(vin): Path<String>,
) -> Result<Response> {
    let username = Some(user.username.into_inner());

    let car = match Vin::parse(&vin) {
        Ok(vin) => match state.registry().get_cars_by_vin(&vin).await {
            Ok(cars) => cars.into_iter().next(),
            Err(RepositoryError::NoResults) => None,
            Err(e) => return Err(e.into()),
        },
        Err(_) => None,
    };

    match car {
        Some(car) => Ok(CarEditTemplate {
            username,
            car: Some(CarView::from(car)),
            error: None,
        }
        .into_response()),
        None => Ok(CarEditTemplate {
            username,
            car: None,
            error: Some("No such car".to_owned()),
        }
        .into_response()),
    }
}

/// Handle the update-car form submission.
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Form(form): Form<CarForm>,
) -> Result<Response> {
    let Some(car) = new_car_from_form(&form) else {
        return Ok(Redirect::to("/cars?error=update").into_response());
    };

    let car = Car::from(car);
    match state.registry().update_car(&car).await {
        Ok(()) => Ok(Redirect::to("/cars").into_response()),
        Err(RepositoryError::NotFound) => {
            Ok(Redirect::to("/cars?error=update").into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Delete one car by VIN.
///
/// On the relational backend the database nulls the VIN of dependent
/// people; the flat-file backend leaves it untouched.
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(vin): Path<String>,
) -> Result<Response> {
    let Ok(vin) = Vin::parse(&vin) else {
        return Ok(Redirect::to("/cars?error=delete").into_response());
    };

    match state.registry().delete_car_by_vin(&vin).await {
        Ok(()) => Ok(Redirect::to("/cars").into_response()),
        Err(RepositoryError::NotFound) => {
            Ok(Redirect::to("/cars?error=delete").into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Build a `NewCar` from validated form input.
///
/// Returns `None` if the VIN fails to parse, make or model is blank, or
/// the year is not a number in the accepted range.
fn new_car_from_form(form: &CarForm) -> Option<NewCar> {
    let vin = Vin::parse(&form.vin).ok()?;
    let make = form.make.trim();
    let model = form.model.trim();
    if make.is_empty() || model.is_empty() {
        return None;
    }

    let year = form.year.trim().parse::<i32>().ok()?;
    if !YEAR_RANGE.contains(&year) {
        return None;
    }

    Some(NewCar {
        vin,
        make: make.to_owned(),
        model: model.to_owned(),
        year,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(vin: &str, make: &str, model: &str, year: &str) -> CarForm {
        CarForm {
            vin: vin.to_owned(),
            make: make.to_owned(),
            model: model.to_owned(),
            year: year.to_owned(),
        }
    }

    #[test]
    fn test_new_car_from_form_valid() {
        let car = new_car_from_form(&form("1a", "Ford", "F150", "2020"));
        assert!(car.is_some_and(|c| c.vin.as_str() == "1A" && c.year == 2020));
    }

    #[test]
    fn test_new_car_from_form_rejects_bad_input() {
        assert!(new_car_from_form(&form("", "Ford", "F150", "2020")).is_none());
        assert!(new_car_from_form(&form("1A", " ", "F150", "2020")).is_none());
        assert!(new_car_from_form(&form("1A", "Ford", "F150", "soon")).is_none());
        assert!(new_car_from_form(&form("1A", "Ford", "F150", "1700")).is_none());
    }
}
