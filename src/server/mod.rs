//! HTTP server rendering the blog on request

use anyhow::Result;
use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, Request, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::cms::Cursor;
use crate::content::Listing;
use crate::error::Error;
use crate::templates::{Resolution, TemplateRenderer, LOGO_SVG};
use crate::Blog;

/// Server state
pub struct ServerState {
    blog: Blog,
    renderer: TemplateRenderer,
    /// Exported site to serve before rendering on demand
    static_dir: Option<PathBuf>,
}

impl ServerState {
    pub fn new(blog: Blog, static_mode: bool) -> Result<Self> {
        let renderer = TemplateRenderer::new(&blog.config)?;
        let static_dir = static_mode.then(|| blog.public_dir.clone());
        Ok(Self {
            blog,
            renderer,
            static_dir,
        })
    }
}

/// Build the application router
pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/", get(home_handler))
        .route("/post/:slug", get(post_handler))
        .route("/posts/more", get(more_handler))
        .route("/images/logo.svg", get(logo_handler))
        .fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server
pub async fn start(blog: &Blog, ip: &str, port: u16, static_mode: bool, open: bool) -> Result<()> {
    let state = Arc::new(ServerState::new(blog.clone(), static_mode)?);
    let app = router(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}", ip, port);
    println!("Server running at {}", url);
    if static_mode {
        println!("Serving exported files from {:?}", blog.public_dir);
    }
    println!("Press Ctrl+C to stop.");

    if open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Listing page with the first page of posts
async fn home_handler(State(state): State<Arc<ServerState>>) -> Response {
    if let Some(html) = read_exported(&state, "index.html").await {
        return Html(html).into_response();
    }

    let rendered = match state.blog.load_listing().await {
        Ok(listing) => state.renderer.render_home(&listing),
        Err(e) => return error_page(&state, e, Some("/")),
    };

    match rendered {
        Ok(html) => Html(html).into_response(),
        Err(e) => error_page(&state, e, None),
    }
}

/// Post page; resolution blocks until the content source answers
async fn post_handler(
    State(state): State<Arc<ServerState>>,
    Path(slug): Path<String>,
) -> Response {
    if crate::helpers::is_valid_slug(&slug) {
        let exported = format!("post/{}/index.html", slug);
        if let Some(html) = read_exported(&state, &exported).await {
            return Html(html).into_response();
        }
    }

    let resolution = match state.blog.load_post(&slug).await {
        Ok(post) => Resolution::Found(post),
        Err(Error::NotFound { .. }) => Resolution::NotFound,
        Err(e) => {
            let retry = crate::helpers::post_path(&slug);
            return error_page(&state, e, Some(&retry));
        }
    };

    let status = match resolution {
        Resolution::NotFound => StatusCode::NOT_FOUND,
        _ => StatusCode::OK,
    };
    match state.renderer.render_post(&resolution) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => error_page(&state, e, None),
    }
}

#[derive(Debug, Deserialize)]
struct MoreParams {
    cursor: Option<String>,
}

/// Posts of the next listing page, to be appended by the page script
#[derive(Debug, Serialize, Deserialize)]
pub struct MorePosts {
    pub html: String,
    pub next_page: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MoreError {
    pub error: String,
}

async fn more_handler(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<MoreParams>,
) -> Response {
    let Some(cursor) = params.cursor.filter(|c| !c.trim().is_empty()) else {
        return Json(MorePosts {
            html: String::new(),
            next_page: None,
        })
        .into_response();
    };

    let mut listing = Listing::from_cursor(Cursor::new(cursor));
    if let Err(e) = listing.load_more(state.blog.source()).await {
        tracing::error!("Failed to load more posts: {}", e);
        let status = if e.is_fetch_failure() {
            StatusCode::BAD_GATEWAY
        } else {
            StatusCode::BAD_REQUEST
        };
        return (
            status,
            Json(MoreError {
                error: "Não foi possível carregar mais posts".to_string(),
            }),
        )
            .into_response();
    }

    match state.renderer.render_post_list(listing.posts()) {
        Ok(html) => Json(MorePosts {
            html,
            next_page: listing.next_page().map(|cursor| cursor.public().to_string()),
        })
        .into_response(),
        Err(e) => {
            tracing::error!("Failed to render posts: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MoreError {
                    error: "Erro ao exibir os posts".to_string(),
                }),
            )
                .into_response()
        }
    }
}

async fn logo_handler() -> Response {
    ([(header::CONTENT_TYPE, "image/svg+xml")], LOGO_SVG).into_response()
}

/// Serves exported files in static mode, otherwise the not found page
async fn fallback_handler(State(state): State<Arc<ServerState>>, request: Request<Body>) -> Response {
    if let Some(dir) = &state.static_dir {
        let mut service = ServeDir::new(dir).append_index_html_on_directories(true);
        match service.try_call(request).await {
            Ok(response) if response.status() != StatusCode::NOT_FOUND => {
                return response.into_response();
            }
            Ok(_) => {}
            Err(e) => tracing::warn!("Failed to serve static file: {}", e),
        }
    }

    match state.renderer.render_not_found() {
        Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
        Err(e) => error_page(&state, e, None),
    }
}

/// Read a file from the exported site when serving in static mode
async fn read_exported(state: &ServerState, relative: &str) -> Option<String> {
    let dir = state.static_dir.as_ref()?;
    tokio::fs::read_to_string(dir.join(relative)).await.ok()
}

/// Turn a failure into a page; no failure takes the server down
fn error_page(state: &ServerState, error: Error, retry: Option<&str>) -> Response {
    let (status, message, retry) = match &error {
        Error::NotFound { .. } => {
            return match state.renderer.render_not_found() {
                Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
                Err(e) => plain_error(e),
            };
        }
        e if e.is_fetch_failure() => (
            StatusCode::BAD_GATEWAY,
            "Não foi possível carregar o conteúdo",
            retry,
        ),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Erro ao exibir o conteúdo",
            None,
        ),
    };

    tracing::error!("{}: {}", message, error);
    match state.renderer.render_error(message, retry) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => plain_error(e),
    }
}

fn plain_error(error: Error) -> Response {
    tracing::error!("Failed to render error page: {}", error);
    (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
}

/// Open a URL in the default browser
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/c", "start", url])
            .spawn()?;
    }

    Ok(())
}
