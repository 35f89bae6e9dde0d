//! Web server example serving read-once pastes over HTTP.
//!
//! Routes:
//! - `GET /` shows the form, the usage counters and, for `?s=<token>`, the
//!   share link while it is still readable
//! - `POST /add` stores the `content` form field and redirects to `/?s=<token>`
//! - `GET /t/{token}` shows the paste once
//! - `POST /admin/reset` clears everything when the `pass` field matches
//! - `GET /stats` returns the counters as JSON
//!
//! Configuration comes from the `BURNBOX_*` environment variables;
//! `BURNBOX_PORT` picks the listening port (default 8080). Pages are askama
//! templates under `demos/templates`.

use askama::Template;
use axum::{
    Form, Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header::HOST},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use burnbox::{AdminControl, MemoryStorage, PasteConfig, PasteError, PasteServer};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Clone)]
struct AppState {
    server: Arc<PasteServer<MemoryStorage>>,
    admin: Arc<AdminControl>,
}

#[derive(Deserialize)]
struct IndexQuery {
    s: Option<String>,
}

#[derive(Deserialize)]
struct AddForm {
    content: String,
}

#[derive(Deserialize)]
struct ResetForm {
    pass: String,
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexPage {
    max_content_length: usize,
    share_url: Option<String>,
    lifetime_secs: u64,
    created: u64,
    consumed: u64,
}

#[derive(Template)]
#[template(path = "paste.html")]
struct PastePage {
    content: String,
}

#[derive(Template)]
#[template(path = "not_found.html")]
struct NotFoundPage;

/// Renders a template; askama escapes every interpolated value.
fn render<T: Template>(status: StatusCode, page: &T) -> Response {
    match page.render() {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("template rendering failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn not_found_page() -> Response {
    render(StatusCode::NOT_FOUND, &NotFoundPage)
}

fn error_response(error: PasteError) -> Response {
    let status = match error {
        PasteError::InvalidContent(_) | PasteError::ContentTooLong { .. } => {
            StatusCode::BAD_REQUEST
        }
        PasteError::CapacityExceeded { .. } | PasteError::Unauthorized => StatusCode::FORBIDDEN,
        PasteError::NotFound => return not_found_page(),
        PasteError::TokenCollision => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, error.to_string()).into_response()
}

async fn index(
    State(state): State<AppState>,
    Query(query): Query<IndexQuery>,
    headers: HeaderMap,
) -> Response {
    let mut share_url = None;
    if let Some(token) = query.s {
        match state.server.probe(&token).await {
            Ok(true) => {
                let host = headers
                    .get(HOST)
                    .and_then(|h| h.to_str().ok())
                    .unwrap_or("localhost");
                share_url = Some(format!("http://{host}/t/{token}"));
            }
            Ok(false) => {}
            Err(e) => return error_response(e),
        }
    }

    let stats = state.server.stats();
    let page = IndexPage {
        max_content_length: state.server.config().max_content_length,
        share_url,
        lifetime_secs: state.server.config().lifetime.as_secs(),
        created: stats.created,
        consumed: stats.consumed,
    };
    render(StatusCode::OK, &page)
}

async fn add(State(state): State<AppState>, Form(form): Form<AddForm>) -> Response {
    match state.server.create(&form.content).await {
        Ok(token) => Redirect::to(&format!("/?s={token}")).into_response(),
        Err(e) => error_response(e),
    }
}

async fn view(State(state): State<AppState>, Path(token): Path<String>) -> Response {
    match state.server.consume(&token).await {
        Ok(content) => render(StatusCode::OK, &PastePage { content }),
        Err(e) => error_response(e),
    }
}

async fn reset(State(state): State<AppState>, Form(form): Form<ResetForm>) -> Response {
    match state.admin.reset_all(&form.pass, &state.server).await {
        Ok(_) => "Reset successful! All texts cleared, counters reset.".into_response(),
        Err(e) => error_response(e),
    }
}

async fn stats(State(state): State<AppState>) -> Response {
    Json(state.server.stats()).into_response()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let config = PasteConfig::from_env();
    tracing::info!("{}", config.summary());

    let server = PasteServer::builder()
        .with_config(config)
        .build_and_init()
        .await?;
    let state = AppState {
        server: Arc::new(server),
        admin: Arc::new(AdminControl::from_env()?),
    };

    let app = Router::new()
        .route("/", get(index))
        .route("/add", post(add))
        .route("/t/:token", get(view))
        .route("/admin/reset", post(reset))
        .route("/stats", get(stats))
        .fallback(|| async { not_found_page() })
        .with_state(state);

    let port: u16 = std::env::var("BURNBOX_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!("listening on http://localhost:{port}");
    axum::serve(listener, app).await?;

    Ok(())
}
