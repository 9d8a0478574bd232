//! People route handlers.
//!
//! List, filter, add, edit, update and delete registered people. All
//! routes require a logged-in user.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use axum::Form;
use serde::Deserialize;

use motorpool_core::{PersonId, Vin, forms};

use crate::db::RepositoryError;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::{Car, NewPerson, Person};
use crate::state::AppState;

// =============================================================================
// View Types
// =============================================================================

/// Person display data for templates.
#[derive(Clone)]
pub struct PersonView {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub vin: String,
}

impl From<Person> for PersonView {
    fn from(person: Person) -> Self {
        // Missing optionals render as empty strings so the same view works
        // for both the table and form prefills
        Self {
            id: person.id.as_i32(),
            first_name: person.first_name,
            last_name: person.last_name,
            phone: person.phone.unwrap_or_default(),
            address: person.address.unwrap_or_default(),
            city: person.city.unwrap_or_default(),
            vin: person.vin.map(Vin::into_inner).unwrap_or_default(),
        }
    }
}

/// One entry of the car dropdown on the add/edit forms.
#[derive(Clone)]
pub struct CarOption {
    pub vin: String,
    pub label: String,
    pub selected: bool,
}

fn car_options(cars: Vec<Car>, selected: Option<&Vin>) -> Vec<CarOption> {
    cars.into_iter()
        .map(|car| {
            let selected = selected == Some(&car.vin);
            CarOption {
                label: format!("{} {} ({})", car.make, car.model, car.year),
                vin: car.vin.into_inner(),
                selected,
            }
        })
        .collect()
}

// =============================================================================
// Form and Query Types
// =============================================================================

/// Query parameters for the people list.
#[derive(Debug, Deserialize)]
pub struct PeopleQuery {
    pub vin: Option<String>,
    pub error: Option<String>,
}

/// Add/update form data. Blank optional fields become `None` at
/// deserialization, so "provided but blank" never reaches the store.
#[derive(Debug, Deserialize)]
pub struct PersonForm {
    pub id: Option<i32>,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, deserialize_with = "forms::empty_as_none")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "forms::empty_as_none")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "forms::empty_as_none")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "forms::empty_as_none")]
    pub vin: Option<String>,
}

/// Translate an error code from a redirect into a user-facing message.
fn error_message(code: &str) -> String {
    match code {
        "add" => "Unable to add the person".to_owned(),
        "update" => "Unable to update the person".to_owned(),
        "delete" => "Unable to remove person / person not found".to_owned(),
        "missing" => "First and last name are required".to_owned(),
        "vin" => "The supplied VIN is not valid".to_owned(),
        "car" => "The referenced car is not registered".to_owned(),
        _ => "Something went wrong".to_owned(),
    }
}

// =============================================================================
// Templates
// =============================================================================

/// People list page template.
#[derive(Template, WebTemplate)]
#[template(path = "people/index.html")]
pub struct PeopleTemplate {
    pub username: Option<String>,
    pub people: Vec<PersonView>,
    pub info: Option<String>,
    pub error: Option<String>,
}

/// Add person page template.
#[derive(Template, WebTemplate)]
#[template(path = "people/add.html")]
pub struct PersonAddTemplate {
    pub username: Option<String>,
    pub cars: Vec<CarOption>,
    pub error: Option<String>,
}

/// Edit person page template.
#[derive(Template, WebTemplate)]
#[template(path = "people/edit.html")]
pub struct PersonEditTemplate {
    pub username: Option<String>,
    pub person: Option<PersonView>,
    pub cars: Vec<CarOption>,
    pub error: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// List people, optionally filtered by VIN.
///
/// Handles both store policies for "nothing matched": an empty collection
/// (relational store) renders an informational banner, a `NoResults`
/// rejection (flat-file store) renders the error banner.
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<PeopleQuery>,
) -> Result<Response> {
    let mut error = query.error.as_deref().map(error_message);

    let result = match query.vin.as_deref() {
        Some(raw) => match Vin::parse(raw) {
            Ok(vin) => state.registry().get_people_by_vin(&vin).await,
            // An unparseable filter can never match anything
            Err(_) => Ok(Vec::new()),
        },
        None => state.registry().get_all_people().await,
    };

    let (people, info) = match result {
        Ok(people) if people.is_empty() => (Vec::new(), Some("no results".to_owned())),
        Ok(people) => (people.into_iter().map(PersonView::from).collect(), None),
        Err(RepositoryError::NoResults) => {
            error = Some(RepositoryError::NoResults.to_string());
            (Vec::new(), None)
        }
        Err(e) => return Err(e.into()),
    };

    Ok(PeopleTemplate {
        username: Some(user.username.into_inner()),
        people,
        info,
        error,
    }
    .into_response())
}

/// Display the add-person form with the car dropdown.
pub async fn add_page(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<PeopleQuery>,
) -> Response {
    // An unavailable car list degrades to an empty dropdown
    let cars = state.registry().get_cars().await.unwrap_or_default();

    PersonAddTemplate {
        username: Some(user.username.into_inner()),
        cars: car_options(cars, None),
        error: query.error.as_deref().map(error_message),
    }
    .into_response()
}

/// Handle the add-person form submission.
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Form(form): Form<PersonForm>,
) -> Result<Response> {
    let Some(person) = new_person_from_form(&form) else {
        return Ok(Redirect::to("/people/add?error=missing").into_response());
    };
    if form.vin.is_some() && person.vin.is_none() {
        return Ok(Redirect::to("/people/add?error=vin").into_response());
    }

    match state.registry().add_person(person).await {
        Ok(_) => Ok(Redirect::to("/people").into_response()),
        Err(RepositoryError::Conflict(_)) => {
            Ok(Redirect::to("/people/add?error=car").into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Display the edit form for one person.
pub async fn edit_page(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i32>,
) -> Result<Response> {
    let username = Some(user.username.into_inner());
    let cars = state.registry().get_cars().await.unwrap_or_default();

    match state.registry().get_person(PersonId::new(id)).await {
        Ok(person) => {
            let options = car_options(cars, person.vin.as_ref());
            Ok(PersonEditTemplate {
                username,
                person: Some(PersonView::from(person)),
                cars: options,
                error: None,
            }
            .into_response())
        }
        Err(RepositoryError::NotFound) => Ok(PersonEditTemplate {
            username,
            person: None,
            cars: Vec::new(),
            error: Some("No such person".to_owned()),
        }
        .into_response()),
        Err(e) => Err(e.into()),
    }
}

/// Handle the update-person form submission.
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Form(form): Form<PersonForm>,
) -> Result<Response> {
    let Some(id) = form.id else {
        return Err(AppError::BadRequest("missing person id".to_owned()));
    };
    let Some(new) = new_person_from_form(&form) else {
        return Ok(Redirect::to("/people?error=update").into_response());
    };

    let person = new.into_person(PersonId::new(id));
    match state.registry().update_person(&person).await {
        Ok(()) => Ok(Redirect::to("/people").into_response()),
        Err(RepositoryError::NotFound | RepositoryError::Conflict(_)) => {
            Ok(Redirect::to("/people?error=update").into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Delete one person by ID.
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<i32>,
) -> Result<Response> {
    match state.registry().delete_person(PersonId::new(id)).await {
        Ok(()) => Ok(Redirect::to("/people").into_response()),
        Err(RepositoryError::NotFound) => {
            Ok(Redirect::to("/people?error=delete").into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Build a `NewPerson` from validated form input.
///
/// Returns `None` if a required field is blank. A VIN that fails to parse
/// is dropped to `None` here; `add` distinguishes that case via the raw
/// form value.
fn new_person_from_form(form: &PersonForm) -> Option<NewPerson> {
    let first_name = form.first_name.trim();
    let last_name = form.last_name.trim();
    if first_name.is_empty() || last_name.is_empty() {
        return None;
    }

    Some(NewPerson {
        first_name: first_name.to_owned(),
        last_name: last_name.to_owned(),
        phone: form.phone.clone(),
        address: form.address.clone(),
        city: form.city.clone(),
        vin: form.vin.as_deref().and_then(|raw| Vin::parse(raw).ok()),
    })
}
