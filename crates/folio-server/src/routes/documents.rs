//! Document routes: index, view, new/create, edit/save, delete.
//!
//! Viewing is public; every route that shows a form or changes a document
//! goes through the signed-in gate. Forms carrying `cancel` short-circuit to
//! the index before the gate runs.

use std::sync::Arc;

use axum::extract::rejection::FormRejection;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Form, Router};
use serde::Deserialize;

use folio_core::error::DocumentError;
use folio_core::render::render_document;

use crate::error::AppError;
use crate::middleware::{SessionContext, found, redirect_with_flash};
use crate::routes::pages;
use crate::state::AppState;

/// Message shown when the create form is submitted without a name.
pub const EMPTY_NAME_MESSAGE: &str = "Please enter a file name or cancel.";

/// Build the document router.
///
/// Paths:
/// - `GET  /`: list documents
/// - `GET  /new`: new-document form
/// - `POST /create`: create an empty document
/// - `GET  /{file_name}`: view a document
/// - `GET  /{file_name}/edit`: edit form
/// - `POST /{file_name}/edit`: save changes
/// - `POST /{file_name}/delete`: delete
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index))
        .route("/new", get(new_document))
        .route("/create", post(create_document))
        .route("/{file_name}", get(view_document))
        .route("/{file_name}/edit", get(edit_document).post(save_document))
        .route("/{file_name}/delete", post(delete_document))
}

// ── Form types ───────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
struct CreateForm {
    #[serde(default)]
    file_name: String,
    cancel: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct EditForm {
    #[serde(default)]
    text: String,
    cancel: Option<String>,
}

/// Treat a missing or malformed form body as an empty form.
fn form_or_default<T: Default>(form: Result<Form<T>, FormRejection>) -> T {
    form.map(|Form(inner)| inner).unwrap_or_default()
}

// ── Handlers ─────────────────────────────────────────────────────────

async fn index(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
) -> Result<Html<String>, AppError> {
    let files = state.documents.list().await?;
    let username = session.username().await;
    let flash = session.take_flash().await;
    Ok(Html(pages::index_page(
        &files,
        username.as_deref(),
        flash.as_deref(),
    )))
}

async fn view_document(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Response, AppError> {
    let doc = state.documents.read(&name).await?;
    let rendered = render_document(&doc);
    Ok(([(header::CONTENT_TYPE, rendered.content_type)], rendered.body).into_response())
}

async fn new_document(
    Extension(session): Extension<SessionContext>,
) -> Result<Html<String>, AppError> {
    session.require_signed_in().await?;
    let flash = session.take_flash().await;
    Ok(Html(pages::new_page("", flash.as_deref())))
}

async fn create_document(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
    form: Result<Form<CreateForm>, FormRejection>,
) -> Result<Response, AppError> {
    let form = form_or_default(form);
    if form.cancel.is_some() {
        return Ok(found("/"));
    }
    session.require_signed_in().await?;

    match state.documents.create(&form.file_name).await {
        Ok(name) => Ok(redirect_with_flash("/", format!("New file '{name}' created."))),
        Err(DocumentError::EmptyName) => {
            Ok(unprocessable(&session, &form.file_name, EMPTY_NAME_MESSAGE).await)
        }
        Err(DocumentError::InvalidName { reason, .. }) => {
            let message = format!("Invalid file name: {reason}.");
            Ok(unprocessable(&session, &form.file_name, &message).await)
        }
        Err(e) => Err(e.into()),
    }
}

/// Re-render the new-document form with `message` and status 422.
async fn unprocessable(session: &SessionContext, file_name: &str, message: &str) -> Response {
    // The validation message replaces whatever flash was pending.
    let _ = session.take_flash().await;
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Html(pages::new_page(file_name, Some(message))),
    )
        .into_response()
}

async fn edit_document(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
    Path(name): Path<String>,
) -> Result<Html<String>, AppError> {
    session.require_signed_in().await?;
    let doc = state.documents.read(&name).await?;
    let flash = session.take_flash().await;
    Ok(Html(pages::edit_page(
        &doc.name,
        &String::from_utf8_lossy(&doc.content),
        flash.as_deref(),
    )))
}

async fn save_document(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
    Path(name): Path<String>,
    form: Result<Form<EditForm>, FormRejection>,
) -> Result<Response, AppError> {
    let form = form_or_default(form);
    if form.cancel.is_some() {
        return Ok(found("/"));
    }
    session.require_signed_in().await?;

    state.documents.write(&name, form.text.as_bytes()).await?;
    Ok(redirect_with_flash("/", format!("Changes to '{name}' saved.")))
}

async fn delete_document(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
    Path(name): Path<String>,
) -> Result<Response, AppError> {
    session.require_signed_in().await?;

    state.documents.delete(&name).await?;
    Ok(redirect_with_flash("/", format!("File '{name}' deleted.")))
}
