//! Picture upload route handlers.
//!
//! Uploaded files are written to the configured upload directory with a
//! UUID filename (the original extension is kept) and served back via the
//! static `/uploads` mount. All routes require a logged-in user.

use std::path::Path as FilePath;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Multipart, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// Form field that carries the uploaded file.
const PICTURE_FIELD: &str = "picture";

/// Query parameters for error display.
#[derive(Debug, Deserialize)]
pub struct PicturesQuery {
    pub error: Option<String>,
}

/// Picture grid page template.
#[derive(Template, WebTemplate)]
#[template(path = "pictures/index.html")]
pub struct PicturesTemplate {
    pub username: Option<String>,
    pub pictures: Vec<String>,
    pub error: Option<String>,
}

/// Upload form page template.
#[derive(Template, WebTemplate)]
#[template(path = "pictures/add.html")]
pub struct PictureAddTemplate {
    pub username: Option<String>,
    pub error: Option<String>,
}

/// Display the grid of uploaded pictures.
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<PicturesQuery>,
) -> Result<Response> {
    let mut pictures = Vec::new();
    let mut entries = tokio::fs::read_dir(&state.config().upload_dir)
        .await
        .map_err(|e| AppError::Internal(format!("cannot read upload directory: {e}")))?;

    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| AppError::Internal(format!("cannot read upload directory: {e}")))?
    {
        if entry.file_type().await.is_ok_and(|t| t.is_file()) {
            pictures.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    pictures.sort();

    let error = if pictures.is_empty() {
        Some("No pictures available, add some!".to_owned())
    } else {
        query
            .error
            .map(|_| "The upload could not be processed".to_owned())
    };

    Ok(PicturesTemplate {
        username: Some(user.username.into_inner()),
        pictures,
        error,
    }
    .into_response())
}

/// Display the upload form.
pub async fn add_page(
    RequireAuth(user): RequireAuth,
    Query(query): Query<PicturesQuery>,
) -> impl IntoResponse {
    PictureAddTemplate {
        username: Some(user.username.into_inner()),
        error: query
            .error
            .map(|_| "The upload could not be processed".to_owned()),
    }
}

/// Handle the multipart upload.
///
/// Filenames are never taken from the client; a fresh UUID avoids both
/// collisions and path traversal. Only the extension survives.
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    mut multipart: Multipart,
) -> Result<Response> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("invalid multipart body: {e}")))?
    {
        if field.name() != Some(PICTURE_FIELD) {
            continue;
        }

        let extension = field
            .file_name()
            .and_then(|name| FilePath::new(name).extension())
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("upload truncated: {e}")))?;

        if data.is_empty() {
            return Ok(Redirect::to("/pictures/add?error=empty").into_response());
        }

        let filename = match extension {
            Some(ext) => format!("{}.{ext}", Uuid::new_v4()),
            None => Uuid::new_v4().to_string(),
        };

        let path = state.config().upload_dir.join(&filename);
        tokio::fs::write(&path, &data)
            .await
            .map_err(|e| AppError::Internal(format!("cannot store upload: {e}")))?;

        tracing::info!(file = %filename, bytes = data.len(), "picture uploaded");
        return Ok(Redirect::to("/pictures").into_response());
    }

    Ok(Redirect::to("/pictures/add?error=missing").into_response())
}
