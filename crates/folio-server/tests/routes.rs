//! Router-level tests for the Folio server.
//!
//! Each test builds the full router over a temporary data directory with
//! three seed documents and a single `admin` / `secret` user, then drives it
//! with `tower::ServiceExt::oneshot`. Flash messages are read back from the
//! server-side session named by the response cookie.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use axum::response::Response;
use tempfile::TempDir;
use tower::ServiceExt;

use folio_core::auth::Authenticator;
use folio_core::credentials::CredentialStore;
use folio_core::document::DocumentStore;
use folio_core::session::{Session, SessionStore};
use folio_server::middleware::SESSION_COOKIE;
use folio_server::routes::build_router;
use folio_server::state::AppState;
use folio_storage::FsBackend;

/// bcrypt hash of `secret` at cost 4.
const SECRET_HASH: &str = "$2b$04$WZMfnnATRnIE1h1waVNqyu6d91.L6eVdfKUk.yoR2/b8ZSO9ThnPq";

struct Harness {
    dir: TempDir,
    state: Arc<AppState>,
    app: Router,
}

impl Harness {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("about.md"), "# It's all about me.").unwrap();
        std::fs::write(dir.path().join("changes.txt"), "").unwrap();
        std::fs::write(dir.path().join("history.txt"), "I'm a fascinating guy.").unwrap();

        let backend = FsBackend::open(dir.path()).unwrap();
        let credentials =
            CredentialStore::from_map([("admin".to_owned(), SECRET_HASH.to_owned())]);
        let state = Arc::new(AppState {
            documents: Arc::new(DocumentStore::new(Arc::new(backend))),
            authenticator: Arc::new(Authenticator::new(credentials)),
            sessions: Arc::new(SessionStore::new(chrono::Duration::hours(1))),
            secure_cookie: false,
        });
        let app = build_router(Arc::clone(&state));
        Self { dir, state, app }
    }

    fn create_document(&self, name: &str, content: &str) {
        std::fs::write(self.dir.path().join(name), content).unwrap();
    }

    fn exists(&self, name: &str) -> bool {
        self.dir.path().join(name).exists()
    }

    async fn admin_cookie(&self) -> String {
        let id = self.state.sessions.create(Session::signed_in("admin")).await;
        format!("{SESSION_COOKIE}={id}")
    }

    async fn get(&self, uri: &str, cookie: Option<&str>) -> Response {
        self.send(Method::GET, uri, cookie, None).await
    }

    async fn post(&self, uri: &str, cookie: Option<&str>, form: &str) -> Response {
        self.send(Method::POST, uri, cookie, Some(form)).await
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        cookie: Option<&str>,
        form: Option<&str>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let body = match form {
            Some(form) => {
                builder = builder.header(
                    header::CONTENT_TYPE,
                    "application/x-www-form-urlencoded",
                );
                Body::from(form.to_owned())
            }
            None => Body::empty(),
        };
        self.app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap()
    }

    /// The session the response's cookie points at.
    async fn session_of(&self, response: &Response) -> Session {
        let id = session_id(response);
        self.state.sessions.load(&id).await.expect("session exists")
    }

    /// The stored session the response leaves the browser holding, if any.
    async fn session_after(&self, response: &Response) -> Option<Session> {
        let raw = response.headers().get(header::SET_COOKIE)?.to_str().unwrap();
        let (_, value) = raw.split(';').next()?.split_once('=')?;
        if value.is_empty() {
            return None;
        }
        self.state.sessions.load(value).await
    }
}

/// Extract the session id from the `Set-Cookie` header.
fn session_id(response: &Response) -> String {
    let raw = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("session cookie set")
        .to_str()
        .unwrap();
    let pair = raw.split(';').next().unwrap();
    let (name, value) = pair.split_once('=').unwrap();
    assert_eq!(name, SESSION_COOKIE);
    value.to_owned()
}

fn cookie_of(response: &Response) -> String {
    format!("{SESSION_COOKIE}={}", session_id(response))
}

fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("location header")
        .to_str()
        .unwrap()
}

fn content_type(response: &Response) -> &str {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .expect("content type")
        .to_str()
        .unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

// ── Index and viewing ────────────────────────────────────────────────

#[tokio::test]
async fn index_lists_documents() {
    let h = Harness::new();
    let resp = h.get("/", None).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(content_type(&resp).starts_with("text/html"));
    let body = body_text(resp).await;
    assert!(body.contains("about.md"));
    assert!(body.contains("changes.txt"));
    assert!(body.contains("history.txt"));
    assert!(body.contains(r#"href="/about.md""#));
    assert!(body.contains("Sign In"));
}

#[tokio::test]
async fn index_skips_hidden_files() {
    let h = Harness::new();
    h.create_document(".secret", "hidden");

    let body = body_text(h.get("/", None).await).await;
    assert!(!body.contains(".secret"));
}

#[tokio::test]
async fn text_document_is_served_as_plain_text() {
    let h = Harness::new();
    let resp = h.get("/history.txt", None).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(content_type(&resp), "text/plain");
    assert!(body_text(resp).await.contains("fascinating guy"));
}

#[tokio::test]
async fn markdown_document_is_rendered_to_html() {
    let h = Harness::new();
    let resp = h.get("/about.md", None).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(content_type(&resp).starts_with("text/html"));
    assert!(body_text(resp).await.contains("about me.</h1>"));
}

#[tokio::test]
async fn missing_document_redirects_with_flash() {
    let h = Harness::new();
    let resp = h.get("/badfile.txt", None).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/");
    assert_eq!(
        h.session_of(&resp).await.flash.as_deref(),
        Some("File 'badfile.txt' not found.")
    );
}

#[tokio::test]
async fn flash_is_cleared_after_display() {
    let h = Harness::new();
    let resp = h.get("/badfile.txt", None).await;
    let cookie = cookie_of(&resp);

    let resp = h.get("/", Some(&cookie)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(h.session_after(&resp).await.is_none());
    assert!(h.state.sessions.is_empty().await);
    let cleared = resp.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap();
    assert!(cleared.contains("Max-Age=0"), "{cleared}");
    assert!(body_text(resp).await.contains("File 'badfile.txt' not found."));

    let body = body_text(h.get("/", Some(&cookie)).await).await;
    assert!(!body.contains("not found"));
}

#[tokio::test]
async fn anonymous_reads_store_no_sessions() {
    let h = Harness::new();
    for _ in 0..100 {
        let resp = h.get("/history.txt", None).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().get(header::SET_COOKIE).is_none());
    }
    let resp = h.get("/", None).await;
    assert!(resp.headers().get(header::SET_COOKIE).is_none());
    assert_eq!(h.state.sessions.len().await, 0);
}

#[tokio::test]
async fn stale_cookie_is_cleared() {
    let h = Harness::new();
    let resp = h
        .get("/", Some(&format!("{SESSION_COOKIE}=gone")))
        .await;

    let raw = resp
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(raw.contains("Max-Age=0"), "{raw}");
    assert!(h.state.sessions.is_empty().await);
}

#[tokio::test]
async fn responses_carry_security_headers() {
    let h = Harness::new();
    let resp = h.get("/", None).await;

    let headers = resp.headers();
    assert_eq!(headers.get(header::X_CONTENT_TYPE_OPTIONS).unwrap(), "nosniff");
    assert_eq!(headers.get(header::X_FRAME_OPTIONS).unwrap(), "DENY");
    assert_eq!(headers.get(header::CACHE_CONTROL).unwrap(), "no-store");
}

#[tokio::test]
async fn session_cookie_is_http_only() {
    let h = Harness::new();
    let resp = h.get("/badfile.txt", None).await;

    let raw = resp
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(raw.contains("HttpOnly"));
    assert!(raw.contains("SameSite=Lax"));
    assert!(raw.contains("Path=/"));
}

// ── Editing ──────────────────────────────────────────────────────────

#[tokio::test]
async fn edit_form_shows_textarea() {
    let h = Harness::new();
    let cookie = h.admin_cookie().await;
    let resp = h.get("/changes.txt/edit", Some(&cookie)).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_text(resp).await;
    assert!(body.contains("<textarea"));
    assert!(body.contains(r#"<input type="submit""#));
}

#[tokio::test]
async fn edit_form_for_missing_document_redirects() {
    let h = Harness::new();
    let cookie = h.admin_cookie().await;
    let resp = h.get("/nope.txt/edit", Some(&cookie)).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(
        h.session_of(&resp).await.flash.as_deref(),
        Some("File 'nope.txt' not found.")
    );
}

#[tokio::test]
async fn updating_document_saves_content() {
    let h = Harness::new();
    let cookie = h.admin_cookie().await;
    let resp = h
        .post("/changes.txt/edit", Some(&cookie), "text=new+content")
        .await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/");
    assert_eq!(
        h.session_of(&resp).await.flash.as_deref(),
        Some("Changes to 'changes.txt' saved.")
    );

    let resp = h.get("/changes.txt", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("new content"));
}

#[tokio::test]
async fn cancelled_edit_leaves_document_untouched() {
    let h = Harness::new();
    let cookie = h.admin_cookie().await;
    let resp = h
        .post("/history.txt/edit", Some(&cookie), "text=overwritten&cancel=1")
        .await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert!(h.session_of(&resp).await.flash.is_none());
    let body = body_text(h.get("/history.txt", None).await).await;
    assert_eq!(body, "I'm a fascinating guy.");
}

// ── Creating ─────────────────────────────────────────────────────────

#[tokio::test]
async fn new_document_form() {
    let h = Harness::new();
    let cookie = h.admin_cookie().await;
    let resp = h.get("/new", Some(&cookie)).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_text(resp).await;
    assert!(body.contains(r#"<input type="text""#));
    assert!(body.contains(r#"<input type="submit""#));
}

#[tokio::test]
async fn create_new_document() {
    let h = Harness::new();
    let cookie = h.admin_cookie().await;
    let resp = h.post("/create", Some(&cookie), "file_name=test.txt").await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(
        h.session_of(&resp).await.flash.as_deref(),
        Some("New file 'test.txt' created.")
    );
    assert!(h.exists("test.txt"));

    let body = body_text(h.get("/", None).await).await;
    assert!(body.contains("test.txt"));
}

#[tokio::test]
async fn create_without_filename_is_unprocessable() {
    let h = Harness::new();
    let cookie = h.admin_cookie().await;
    let resp = h.post("/create", Some(&cookie), "file_name=").await;

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(
        body_text(resp)
            .await
            .contains("Please enter a file name or cancel.")
    );
}

#[tokio::test]
async fn create_with_whitespace_name_is_unprocessable() {
    let h = Harness::new();
    let cookie = h.admin_cookie().await;
    let resp = h.post("/create", Some(&cookie), "file_name=+++").await;

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn create_with_path_separator_is_unprocessable() {
    let h = Harness::new();
    let cookie = h.admin_cookie().await;
    let resp = h
        .post("/create", Some(&cookie), "file_name=..%2Fescape.txt")
        .await;

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(!h.dir.path().parent().unwrap().join("escape.txt").exists());
}

#[tokio::test]
async fn create_existing_document_is_refused() {
    let h = Harness::new();
    let cookie = h.admin_cookie().await;
    let resp = h.post("/create", Some(&cookie), "file_name=history.txt").await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(
        h.session_of(&resp).await.flash.as_deref(),
        Some("File 'history.txt' already exists; new file not created.")
    );
    let body = body_text(h.get("/history.txt", None).await).await;
    assert_eq!(body, "I'm a fascinating guy.");
}

#[tokio::test]
async fn cancelled_create_makes_nothing() {
    let h = Harness::new();
    let cookie = h.admin_cookie().await;
    let resp = h
        .post("/create", Some(&cookie), "file_name=test.txt&cancel=1")
        .await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/");
    assert!(!h.exists("test.txt"));
}

// ── Deleting ─────────────────────────────────────────────────────────

#[tokio::test]
async fn deleting_document() {
    let h = Harness::new();
    h.create_document("test.txt", "");
    let cookie = h.admin_cookie().await;

    let resp = h.post("/test.txt/delete", Some(&cookie), "").await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(
        h.session_of(&resp).await.flash.as_deref(),
        Some("File 'test.txt' deleted.")
    );

    let body = body_text(h.get("/", None).await).await;
    assert!(!body.contains(r#"href="/test.txt""#));
    assert!(!h.exists("test.txt"));
}

#[tokio::test]
async fn deleting_missing_document_flashes_not_found() {
    let h = Harness::new();
    let cookie = h.admin_cookie().await;

    let resp = h.post("/ghost.txt/delete", Some(&cookie), "").await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(
        h.session_of(&resp).await.flash.as_deref(),
        Some("File 'ghost.txt' not found.")
    );
}

// ── Signing in and out ───────────────────────────────────────────────

#[tokio::test]
async fn signin_form() {
    let h = Harness::new();
    let resp = h.get("/users/signin", None).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_text(resp).await;
    assert!(body.contains("<input"));
    assert!(body.contains(r#"<button type="submit""#));
}

#[tokio::test]
async fn signin_with_valid_credentials() {
    let h = Harness::new();
    let resp = h
        .post("/users/signin", None, "username=admin&password=secret")
        .await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    let session = h.session_of(&resp).await;
    assert_eq!(session.flash.as_deref(), Some("Welcome!"));
    assert_eq!(session.username.as_deref(), Some("admin"));
}

#[tokio::test]
async fn signin_is_case_insensitive_on_username() {
    let h = Harness::new();
    let resp = h
        .post("/users/signin", None, "username=ADMIN&password=secret")
        .await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(
        h.session_of(&resp).await.username.as_deref(),
        Some("ADMIN")
    );
}

#[tokio::test]
async fn signed_in_name_keeps_typed_case() {
    let h = Harness::new();
    let resp = h
        .post("/users/signin", None, "username=Admin&password=secret")
        .await;
    let cookie = cookie_of(&resp);

    let body = body_text(h.get("/", Some(&cookie)).await).await;
    assert!(body.contains("Signed in as 'Admin'."));

    let resp = h.post("/users/signout", Some(&cookie), "").await;
    assert_eq!(
        h.session_of(&resp).await.flash.as_deref(),
        Some("User 'Admin' signed out.")
    );
}

#[tokio::test]
async fn signin_rotates_session_id() {
    let h = Harness::new();
    let resp = h.get("/badfile.txt", None).await;
    let before = session_id(&resp);

    let resp = h
        .post(
            "/users/signin",
            Some(&format!("{SESSION_COOKIE}={before}")),
            "username=admin&password=secret",
        )
        .await;
    let after = session_id(&resp);

    assert_ne!(before, after);
    assert!(h.state.sessions.load(&before).await.is_none());
}

#[tokio::test]
async fn signin_with_bad_credentials() {
    let h = Harness::new();
    let resp = h
        .post("/users/signin", None, "username=guest&password=shhhh")
        .await;

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(h.session_after(&resp).await.is_none());
    let body = body_text(resp).await;
    assert!(body.contains("Invalid credentials"));
    assert!(body.contains(r#"value="guest""#));
}

#[tokio::test]
async fn signin_with_wrong_password() {
    let h = Harness::new();
    let resp = h
        .post("/users/signin", None, "username=admin&password=wrong")
        .await;

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(h.session_after(&resp).await.is_none());
}

#[tokio::test]
async fn signout() {
    let h = Harness::new();
    let cookie = h.admin_cookie().await;

    let body = body_text(h.get("/", Some(&cookie)).await).await;
    assert!(body.contains("Signed in as 'admin'."));

    let resp = h.post("/users/signout", Some(&cookie), "").await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    let session = h.session_of(&resp).await;
    assert_eq!(session.flash.as_deref(), Some("User 'admin' signed out."));
    assert!(session.username.is_none());

    let next = location(&resp).to_owned();
    let resp = h.get(&next, Some(&cookie)).await;
    assert!(h.session_after(&resp).await.is_none());
    assert!(body_text(resp).await.contains("Sign In"));
}

// ── Signed-out gate ──────────────────────────────────────────────────

async fn assert_sign_in_required(h: &Harness, resp: Response) {
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/");
    assert_eq!(
        h.session_of(&resp).await.flash.as_deref(),
        Some("You must be signed in to do that.")
    );
}

#[tokio::test]
async fn view_edit_while_signed_out() {
    let h = Harness::new();
    h.create_document("test.txt", "");
    let resp = h.get("/test.txt/edit", None).await;
    assert_sign_in_required(&h, resp).await;
}

#[tokio::test]
async fn save_edit_while_signed_out() {
    let h = Harness::new();
    h.create_document("test.txt", "original");
    let resp = h.post("/test.txt/edit", None, "text=changed").await;
    assert_sign_in_required(&h, resp).await;

    let body = body_text(h.get("/test.txt", None).await).await;
    assert_eq!(body, "original");
}

#[tokio::test]
async fn save_edit_without_body_while_signed_out() {
    let h = Harness::new();
    h.create_document("test.txt", "");
    let resp = h.send(Method::POST, "/test.txt/edit", None, None).await;
    assert_sign_in_required(&h, resp).await;
}

#[tokio::test]
async fn new_while_signed_out() {
    let h = Harness::new();
    let resp = h.get("/new", None).await;
    assert_sign_in_required(&h, resp).await;
}

#[tokio::test]
async fn create_while_signed_out() {
    let h = Harness::new();
    let resp = h.post("/create", None, "file_name=test.txt").await;
    assert_sign_in_required(&h, resp).await;
    assert!(!h.exists("test.txt"));
}

#[tokio::test]
async fn delete_while_signed_out() {
    let h = Harness::new();
    h.create_document("test.txt", "");
    let resp = h.post("/test.txt/delete", None, "").await;
    assert_sign_in_required(&h, resp).await;
    assert!(h.exists("test.txt"));
}

#[tokio::test]
async fn cancel_while_signed_out_goes_home_without_flash() {
    let h = Harness::new();
    let resp = h.post("/create", None, "cancel=1").await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/");
    assert!(h.session_after(&resp).await.is_none());
    assert!(h.state.sessions.is_empty().await);
}
