//! HTTP server for fontcss (fontcss https://github.com/fontcss/fontcss)
//!
//! Thin axum layer over [`CssEngine::generate_css`]. All request state is
//! local to the handler; the engine is shared read-only behind an `Arc`.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{RawQuery, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use url::form_urlencoded;

use fontcss_core::css::{icon_css, ContentType, CssEngine, EMPTY_RESOLUTION_MESSAGE};
use fontcss_core::error::CssError;
use fontcss_core::face::RenderOptions;

#[derive(Debug, Clone)]
pub struct AppState {
    engine: Arc<CssEngine>,
    homepage: Option<String>,
}

impl AppState {
    pub fn new(engine: Arc<CssEngine>, homepage: Option<String>) -> Self {
        Self { engine, homepage }
    }
}

/// Query parameters understood by `/css2` and `/css`, already URL-decoded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CssQuery {
    /// Every `family` value, in order; pipes are split later by the engine.
    pub families: Vec<String>,
    pub display: Option<String>,
    pub text: Option<String>,
}

impl CssQuery {
    /// Decode a raw query string. Repeated `family` keys accumulate; for
    /// `display` and `text` the last value wins. Unknown keys (`subset`,
    /// `ver`, ...) are ignored.
    pub fn parse(raw: &str) -> Self {
        let mut query = CssQuery::default();
        for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
            match key.as_ref() {
                "family" => query.families.push(value.into_owned()),
                "display" => query.display = Some(value.into_owned()),
                "text" => query.text = Some(value.into_owned()),
                _ => {}
            }
        }
        query
    }
}

/// Bind to `bind` and serve until the process is stopped.
pub async fn serve(bind: &str, state: AppState) -> Result<()> {
    let listener = TcpListener::bind(bind)
        .await
        .with_context(|| format!("binding HTTP server to {bind}"))?;
    log::info!("listening on http://{bind}");

    axum::serve(listener, router(state))
        .await
        .context("serving HTTP")?;
    Ok(())
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(|| async { "ok" }))
        .route("/css2", get(css_handler))
        .route("/css", get(css_handler))
        .route("/icon", get(icon_handler))
        .with_state(state)
}

async fn index_handler(State(state): State<AppState>) -> Response {
    match &state.homepage {
        Some(url) => Redirect::temporary(url).into_response(),
        None => "fontcss".into_response(),
    }
}

async fn icon_handler(State(state): State<AppState>) -> Response {
    let css = icon_css(&state.engine.config().domain);
    ([(header::CONTENT_TYPE, ContentType::Css.mime())], css).into_response()
}

async fn css_handler(State(state): State<AppState>, RawQuery(raw): RawQuery) -> Response {
    let query = CssQuery::parse(raw.as_deref().unwrap_or_default());
    log::debug!("css request for {:?}", query.families);

    let engine = &state.engine;
    let opts = match RenderOptions::from_query(
        query.display.as_deref(),
        query.text.as_deref(),
        engine.mode(),
    ) {
        Ok(opts) => opts,
        Err(err) => return error_response(err),
    };

    match engine.generate_css(&query.families, &opts) {
        Ok(css) => ([(header::CONTENT_TYPE, css.content_type.mime())], css.body).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: CssError) -> Response {
    match err {
        CssError::EmptyResolution => (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(header::CONTENT_TYPE, ContentType::Html.mime())],
            EMPTY_RESOLUTION_MESSAGE,
        )
            .into_response(),
        CssError::InvalidSpecifier { .. } => to_bad_request(err).into_response(),
        other => {
            log::warn!("css request failed: {other}");
            (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()).into_response()
        }
    }
}

fn to_bad_request(err: impl std::fmt::Display) -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, err.to_string())
}
