//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Home page
//! GET  /about                   - About page
//! GET  /health                  - Liveness check
//! GET  /health/ready            - Readiness check (pings the backend)
//!
//! # People (requires auth)
//! GET  /people                  - List people (?vin= filter)
//! GET  /people/add              - Add form
//! POST /people/add              - Add action
//! GET  /people/{id}             - Edit form
//! POST /people/update           - Update action
//! GET  /people/delete/{id}      - Delete action
//!
//! # Cars (requires auth)
//! GET  /cars                    - List cars (?vin= | ?make= | ?year= filter)
//! GET  /cars/add                - Add form
//! POST /cars/add                - Add action
//! GET  /cars/{vin}              - Edit form
//! POST /cars/update             - Update action
//! GET  /cars/delete/{vin}       - Delete action
//!
//! # Stores (requires auth)
//! GET  /stores                  - List stores (?retailer= filter)
//! GET  /stores/add              - Add form
//! POST /stores/add              - Add action
//! GET  /stores/{id}             - Edit form
//! POST /stores/update           - Update action
//! GET  /stores/delete/{id}      - Delete action
//!
//! # Auth
//! GET  /auth/login              - Login page
//! POST /auth/login              - Login action
//! GET  /auth/register           - Register page
//! POST /auth/register           - Register action
//! POST /auth/logout             - Logout action
//! GET  /auth/history            - Login history (requires auth)
//!
//! # Pictures (requires auth)
//! GET  /pictures                - Uploaded picture grid
//! GET  /pictures/add            - Upload form
//! POST /pictures/add            - Upload action (multipart)
//!
//! # JSON API
//! GET  /api/people              - People as JSON (?vin= filter)
//! GET  /api/cars                - Cars as JSON (?vin= | ?make= | ?year=)
//! GET  /api/stores              - Stores as JSON (?retailer= filter)
//! ```

pub mod api;
pub mod auth;
pub mod cars;
pub mod home;
pub mod people;
pub mod pictures;
pub mod stores;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the people routes router.
pub fn people_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(people::index))
        .route("/add", get(people::add_page).post(people::add))
        .route("/update", post(people::update))
        .route("/delete/{id}", get(people::delete))
        .route("/{id}", get(people::edit_page))
}

/// Create the cars routes router.
pub fn cars_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cars::index))
        .route("/add", get(cars::add_page).post(cars::add))
        .route("/update", post(cars::update))
        .route("/delete/{vin}", get(cars::delete))
        .route("/{vin}", get(cars::edit_page))
}

/// Create the stores routes router.
pub fn stores_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(stores::index))
        .route("/add", get(stores::add_page).post(stores::add))
        .route("/update", post(stores::update))
        .route("/delete/{id}", get(stores::delete))
        .route("/{id}", get(stores::edit_page))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
        .route("/history", get(auth::history))
}

/// Create the pictures routes router.
pub fn pictures_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(pictures::index))
        .route("/add", get(pictures::add_page).post(pictures::add))
}

/// Create the JSON API routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/people", get(api::people))
        .route("/cars", get(api::cars))
        .route("/stores", get(api::stores))
}

/// Create the complete application router (without global layers).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/about", get(home::about))
        .nest("/people", people_routes())
        .nest("/cars", cars_routes())
        .nest("/stores", stores_routes())
        .nest("/auth", auth_routes())
        .nest("/pictures", pictures_routes())
        .nest("/api", api_routes())
}
