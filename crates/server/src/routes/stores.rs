//! Retail store route handlers.
//!
//! List, filter, add, edit, update and delete stores. All routes require a
//! logged-in user.

use askama::Template;
use askama_web::WebTemplate;
use axum::Form;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use motorpool_core::{StoreId, forms};

use crate::db::RepositoryError;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::{NewStore, Store};
use crate::state::AppState;

// =============================================================================
// View Types
// =============================================================================

/// Store display data for templates.
#[derive(Clone)]
pub struct StoreView {
    pub id: i32,
    pub retailer: String,
    pub phone: String,
    pub address: String,
    pub city: String,
}

impl From<Store> for StoreView {
    fn from(store: Store) -> Self {
        // Missing optionals render as empty strings so the same view works
        // for both the table and form prefills
        Self {
            id: store.id.as_i32(),
            retailer: store.retailer,
            phone: store.phone.unwrap_or_default(),
            address: store.address.unwrap_or_default(),
            city: store.city.unwrap_or_default(),
        }
    }
}

// =============================================================================
// Form and Query Types
// =============================================================================

/// Query parameters for the store list.
#[derive(Debug, Deserialize)]
pub struct StoresQuery {
    pub retailer: Option<String>,
    pub error: Option<String>,
}

/// Add/update form data.
#[derive(Debug, Deserialize)]
pub struct StoreForm {
    pub id: Option<i32>,
    pub retailer: String,
    #[serde(default, deserialize_with = "forms::empty_as_none")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "forms::empty_as_none")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "forms::empty_as_none")]
    pub city: Option<String>,
}

/// Translate an error code from a redirect into a user-facing message.
fn error_message(code: &str) -> String {
    match code {
        "add" => "Unable to add the store".to_owned(),
        "update" => "Unable to update the store".to_owned(),
        "delete" => "Unable to remove store / store not found".to_owned(),
        "missing" => "Retailer name is required".to_owned(),
        _ => "Something went wrong".to_owned(),
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Store list page template.
#[derive(Template, WebTemplate)]
#[template(path = "stores/index.html")]
pub struct StoresTemplate {
    pub username: Option<String>,
    pub stores: Vec<StoreView>,
    pub info: Option<String>,
    pub error: Option<String>,
}

/// Add store page template.
#[derive(Template, WebTemplate)]
#[template(path = "stores/add.html")]
pub struct StoreAddTemplate {
    pub username: Option<String>,
    pub error: Option<String>,
}

/// Edit store page template.
#[derive(Template, WebTemplate)]
#[template(path = "stores/edit.html")]
pub struct StoreEditTemplate {
    pub username: Option<String>,
    pub store: Option<StoreView>,
    pub error: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// List stores, optionally filtered by retailer name.
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<StoresQuery>,
) -> Result<Response> {
    let mut error = query.error.as_deref().map(error_message);

    let result = match query.retailer.as_deref() {
        Some(retailer) => state.registry().get_stores_by_retailer(retailer).await,
        None => state.registry().get_stores().await,
    };

    let (stores, info) = match result {
        Ok(stores) if stores.is_empty() => (Vec::new(), Some("no results".to_owned())),
        Ok(stores) => (stores.into_iter().map(StoreView::from).collect(), None),
        Err(RepositoryError::NoResults) => {
            error = Some(RepositoryError::NoResults.to_string());
            (Vec::new(), None)
        }
        Err(e) => return Err(e.into()),
    };

    Ok(StoresTemplate {
        username: Some(user.username.into_inner()),
        stores,
        info,
        error,
    }
    .into_response())
}

/// Display the add-store form.
pub async fn add_page(
    RequireAuth(user): RequireAuth,
    Query(query): Query<StoresQuery>,
) -> impl IntoResponse {
    StoreAddTemplate {
        username: Some(user.username.into_inner()),
        error: query.error.as_deref().map(error_message),
    }
}

/// Handle the add-store form submission.
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Form(form): Form<StoreForm>,
) -> Result<Response> {
    let Some(store) = new_store_from_form(&form) else {
        return Ok(Redirect::to("/stores/add?error=missing").into_response());
    };

    match state.registry().add_store(store).await {
        Ok(_) => Ok(Redirect::to("/stores").into_response()),
        Err(e) => {
            tracing::warn!(error = %e, "store insert failed");
            Ok(Redirect::to("/stores/add?error=add").into_response())
        }
    }
}

/// Display the edit form for one store.
pub async fn edit_page(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i32>,
) -> Result<Response> {
    let username = Some(user.username.into_inner());

    match state.registry().get_store(StoreId::new(id)).await {
        Ok(store) => Ok(StoreEditTemplate {
            username,
            store: Some(StoreView::from(store)),
            error: None,
        }
        .into_response()),
        Err(RepositoryError::NotFound) => Ok(StoreEditTemplate {
            username,
            store: None,
            error: Some("No such store".to_owned()),
        }
        .into_response()),
        Err(e) => Err(e.into()),
    }
}

/// Handle the update-store form submission.
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Form(form): Form<StoreForm>,
) -> Result<Response> {
    let Some(id) = form.id else {
        return Err(AppError::BadRequest("missing store id".to_owned()));
    };
    let Some(new) = new_store_from_form(&form) else {
        return Ok(Redirect::to("/stores?error=update").into_response());
    };

    let store = new.into_store(StoreId::new(id));
    match state.registry().update_store(&store).await {
        Ok(()) => Ok(Redirect::to("/stores").into_response()),
        Err(RepositoryError::NotFound) => {
            Ok(Redirect::to("/stores?error=update").into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Delete one store by ID.
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<i32>,
) -> Result<Response> {
    match state.registry().delete_store(StoreId::new(id)).await {
        Ok(()) => Ok(Redirect::to("/stores").into_response()),
        Err(RepositoryError::NotFound) => {
            Ok(Redirect::to("/stores?error=delete").into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Build a `NewStore` from validated form input.
fn new_store_from_form(form: &StoreForm) -> Option<NewStore> {
    let retailer = form.retailer.trim();
    if retailer.is_empty() {
        return None;
    }

    Some(NewStore {
        retailer: retailer.to_owned(),
        phone: form.phone.clone(),
        address: form.address.clone(),
        city: form.city.clone(),
    })
}
