//! Session middleware for Folio.
//!
//! Resolves the `folio_session` cookie to a server-side [`Session`] (an empty
//! one for new browsers) and injects a [`SessionContext`] into the request
//! extensions. Handlers read and mutate the session through that context.
//! After the handler runs, any [`Flash`] attached to the response is moved
//! into the session, the session is saved, and the cookie is issued or
//! cleared.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use tokio::sync::Mutex;

use folio_core::auth::Authenticator;
use folio_core::session::Session;

use crate::error::AppError;
use crate::state::AppState;

/// Name of the session id cookie.
pub const SESSION_COOKIE: &str = "folio_session";

/// A flash message for the next rendered page, carried on a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash(pub String);

/// `302 Found` to `location`.
pub fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

/// `302 Found` to `location`, leaving `message` in the session.
pub fn redirect_with_flash(location: &str, message: impl Into<String>) -> Response {
    let mut response = found(location);
    response.extensions_mut().insert(Flash(message.into()));
    response
}

#[derive(Debug)]
struct ContextState {
    session: Session,
    renew: bool,
}

/// The current request's view of its session.
#[derive(Debug, Clone)]
pub struct SessionContext {
    inner: Arc<Mutex<ContextState>>,
}

impl SessionContext {
    fn new(session: Session) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ContextState {
                session,
                renew: false,
            })),
        }
    }

    /// The signed-in username, if any.
    pub async fn username(&self) -> Option<String> {
        self.inner.lock().await.session.username.clone()
    }

    /// Gate for protected routes.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::SignInRequired`] if nobody is signed in.
    pub async fn require_signed_in(&self) -> Result<(), AppError> {
        Authenticator::require_signed_in(&self.inner.lock().await.session)?;
        Ok(())
    }

    /// Record `username` as signed in. The session id is rotated on save.
    pub async fn sign_in(&self, username: impl Into<String>) {
        let mut state = self.inner.lock().await;
        state.session.username = Some(username.into());
        state.renew = true;
    }

    /// Clear the signed-in user and return who it was.
    pub async fn sign_out(&self) -> Option<String> {
        self.inner.lock().await.session.username.take()
    }

    /// Remove and return the pending flash message.
    pub async fn take_flash(&self) -> Option<String> {
        self.inner.lock().await.session.take_flash()
    }

    async fn set_flash(&self, message: String) {
        self.inner.lock().await.session.flash = Some(message);
    }

    async fn finish(&self) -> (Session, bool) {
        let state = self.inner.lock().await;
        (state.session.clone(), state.renew)
    }
}

/// Middleware that attaches a [`SessionContext`] to every request.
///
/// Only sessions holding a username or a flash are stored and given a
/// cookie. A stored session that ends up empty is dropped and its cookie
/// cleared, so anonymous readers never occupy the session table.
pub async fn session_middleware(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let had_cookie = jar.get(SESSION_COOKIE).is_some();
    let existing = match jar.get(SESSION_COOKIE) {
        Some(cookie) => {
            let id = cookie.value().to_owned();
            state.sessions.load(&id).await.map(|session| (id, session))
        }
        None => None,
    };

    let (id, session) = match existing {
        Some((id, session)) => (Some(id), session),
        None => (None, Session::default()),
    };

    let ctx = SessionContext::new(session);
    req.extensions_mut().insert(ctx.clone());

    let mut response = next.run(req).await;

    if let Some(Flash(message)) = response.extensions_mut().remove::<Flash>() {
        ctx.set_flash(message).await;
    }

    let (session, renew) = ctx.finish().await;

    if session.is_empty() {
        if let Some(id) = id {
            state.sessions.remove(&id).await;
        }
        if had_cookie {
            let removal = Cookie::build(SESSION_COOKIE).path("/").build();
            return (jar.remove(removal), response).into_response();
        }
        return response;
    }

    let id = match id {
        Some(id) if !renew => {
            state.sessions.save(&id, session).await;
            id
        }
        Some(old) => {
            state.sessions.remove(&old).await;
            state.sessions.create(session).await
        }
        None => state.sessions.create(session).await,
    };

    let cookie = Cookie::build((SESSION_COOKIE, id))
        .path("/")
        .http_only(true)
        .secure(state.secure_cookie)
        .same_site(SameSite::Lax)
        .max_age(cookie::time::Duration::seconds(
            state.sessions.ttl().num_seconds(),
        ))
        .build();

    (jar.add(cookie), response).into_response()
}
