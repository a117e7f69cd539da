//! Sign-in and sign-out routes: `/users/*`
//!
//! Usernames are lowercased for the credential lookup only, so sign-in is
//! case-insensitive. The session keeps the name as it was typed.

use std::sync::Arc;

use axum::extract::rejection::FormRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Form, Router};
use serde::Deserialize;

use crate::middleware::{SessionContext, redirect_with_flash};
use crate::routes::pages;
use crate::state::AppState;

/// Message shown when sign-in fails.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials.";

/// Build the `/users` router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users/signin", get(signin_form).post(signin))
        .route("/users/signout", post(signout))
}

#[derive(Debug, Default, Deserialize)]
struct SigninForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

async fn signin_form(Extension(session): Extension<SessionContext>) -> Html<String> {
    let flash = session.take_flash().await;
    Html(pages::signin_page("", flash.as_deref()))
}

async fn signin(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
    form: Result<Form<SigninForm>, FormRejection>,
) -> Response {
    let form = form.map(|Form(inner)| inner).unwrap_or_default();
    let lookup = form.username.to_lowercase();

    if state.authenticator.validate(&lookup, &form.password).await {
        session.sign_in(form.username).await;
        return redirect_with_flash("/", "Welcome!");
    }

    let _ = session.take_flash().await;
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Html(pages::signin_page(&form.username, Some(INVALID_CREDENTIALS))),
    )
        .into_response()
}

async fn signout(Extension(session): Extension<SessionContext>) -> Response {
    let username = session.sign_out().await.unwrap_or_default();
    redirect_with_flash("/", format!("User '{username}' signed out."))
}
