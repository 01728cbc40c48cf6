//! Development server with live reload
//!
//! Pages are rendered from the content directory on every request, so edits
//! show up on the next reload without a build step.

use anyhow::Result;
use axum::{
    body::Body,
    extract::{
        ws::{Message, WebSocket},
        Path, State, WebSocketUpgrade,
    },
    http::{header, Request, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::broadcast;
use tower_http::services::ServeDir;

use crate::content::{posts_with_tag, ContentLoader, TagIndex};
use crate::generator::atom_feed;
use crate::pages;
use crate::Site;

/// Live reload script injected into HTML pages
const LIVE_RELOAD_SCRIPT: &str = r#"
<script>
(function() {
    var ws = new WebSocket('ws://' + location.host + '/__livereload');
    ws.onmessage = function(msg) {
        if (msg.data === 'reload') {
            location.reload();
        }
    };
    ws.onclose = function() {
        console.log('Live reload disconnected. Attempting to reconnect...');
        setTimeout(function() { location.reload(); }, 1000);
    };
})();
</script>
</body>
"#;

/// Server state shared across handlers
struct ServerState {
    site: Site,
    loader: ContentLoader,
    reload_tx: broadcast::Sender<()>,
}

impl ServerState {
    fn html_response(&self, html: String) -> Response {
        Html(inject_live_reload(&html)).into_response()
    }

    fn not_found(&self) -> Response {
        let html = pages::render_not_found(&self.site.config).into_string();
        let mut response = self.html_response(html);
        *response.status_mut() = StatusCode::NOT_FOUND;
        response
    }
}

/// Errors surfaced to the client as a 500 response. Missing content is not
/// an error here, handlers render the not-found page for that.
#[derive(Debug, Error)]
enum ServerError {
    #[error(transparent)]
    Content(#[from] anyhow::Error),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        tracing::error!("Request failed: {}", self);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Internal error: {}", self),
        )
            .into_response()
    }
}

/// Start the development server
pub async fn start(site: &Site, ip: &str, port: u16, open: bool) -> Result<()> {
    // Broadcast channel for live reload notifications
    let (reload_tx, _) = broadcast::channel::<()>(16);

    let state = Arc::new(ServerState {
        site: site.clone(),
        loader: ContentLoader::new(site),
        reload_tx: reload_tx.clone(),
    });

    let app = router(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}", ip, port);
    println!("Server running at {}", url);
    println!("Live reload enabled. Watching for changes...");
    println!("Press Ctrl+C to stop.");

    // Open browser if requested
    if open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    // Watch the content tree and nudge connected clients on changes
    let content_dir = site.content_dir.clone();
    let config_path = site.base_dir.join("_config.yml");
    tokio::spawn(async move {
        if let Err(e) = watch_and_notify(content_dir, config_path, reload_tx).await {
            tracing::error!("File watcher error: {}", e);
        }
    });

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/post/:id", get(post_handler))
        .route("/tags", get(tags_handler))
        .route("/tags/:tag", get(tag_handler))
        .route("/atom.xml", get(atom_handler))
        .route("/__livereload", get(livereload_handler))
        .fallback(fallback_handler)
        .with_state(state)
}

/// Index page listing published posts
async fn index_handler(
    State(state): State<Arc<ServerState>>,
) -> Result<Response, ServerError> {
    let published = state.loader.load_published()?;
    let html = pages::render_index(&state.site.config, &published).into_string();
    Ok(state.html_response(html))
}

/// Single post page, looked up by identifier
async fn post_handler(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> Result<Response, ServerError> {
    match state.loader.load_post(&id)? {
        Some(post) => {
            let html = pages::render_post(&state.site.config, &post).into_string();
            Ok(state.html_response(html))
        }
        None => Ok(state.not_found()),
    }
}

/// Tag listing page with usage counts
async fn tags_handler(
    State(state): State<Arc<ServerState>>,
) -> Result<Response, ServerError> {
    let published = state.loader.load_published()?;
    let index = TagIndex::from_posts(&published);
    let html = pages::render_tags(&state.site.config, &index).into_string();
    Ok(state.html_response(html))
}

/// Posts carrying one tag, matched by name or slug
async fn tag_handler(
    State(state): State<Arc<ServerState>>,
    Path(tag): Path<String>,
) -> Result<Response, ServerError> {
    let published = state.loader.load_published()?;
    let index = TagIndex::from_posts(&published);

    let entry = match index.find(&tag) {
        Some(entry) => entry,
        None => return Ok(state.not_found()),
    };

    let tagged = posts_with_tag(&published, &entry.name);
    if tagged.is_empty() {
        return Ok(state.not_found());
    }

    let html = pages::render_tag(&state.site.config, entry, &tagged).into_string();
    Ok(state.html_response(html))
}

/// Atom feed built from the current content
async fn atom_handler(State(state): State<Arc<ServerState>>) -> Result<Response, ServerError> {
    let published = state.loader.load_published()?;
    let feed = atom_feed(&state.site.config, &published);
    Ok(([(header::CONTENT_TYPE, "application/atom+xml")], feed).into_response())
}

/// WebSocket handler for live reload
async fn livereload_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ServerState>>,
) -> impl IntoResponse {
    let reload_rx = state.reload_tx.subscribe();
    ws.on_upgrade(move |socket| handle_livereload_socket(socket, reload_rx))
}

/// Handle WebSocket connection for live reload
async fn handle_livereload_socket(mut socket: WebSocket, mut reload_rx: broadcast::Receiver<()>) {
    tracing::debug!("Live reload client connected");

    loop {
        tokio::select! {
            // Wait for reload signal
            result = reload_rx.recv() => {
                match result {
                    Ok(_) => {
                        if socket.send(Message::Text("reload".to_string())).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                }
            }
            // Handle incoming messages (ping/pong)
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
        }
    }

    tracing::debug!("Live reload client disconnected");
}

/// Serve images and other assets that live next to the markdown files.
/// Anything the content tree does not cover gets the not-found page.
async fn fallback_handler(
    State(state): State<Arc<ServerState>>,
    request: Request<Body>,
) -> Response {
    let mut service = ServeDir::new(&state.site.content_dir);
    match service.try_call(request).await {
        Ok(response) if response.status() != StatusCode::NOT_FOUND => response.into_response(),
        Ok(_) => state.not_found(),
        Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response(),
    }
}

/// Watch for file changes and notify connected clients
async fn watch_and_notify(
    content_dir: PathBuf,
    config_path: PathBuf,
    reload_tx: broadcast::Sender<()>,
) -> Result<()> {
    let (tx, rx) = std::sync::mpsc::channel();

    // Debounce so one save does not fire a burst of reloads
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

    if content_dir.exists() {
        debouncer
            .watcher()
            .watch(&content_dir, RecursiveMode::Recursive)?;
        tracing::debug!("Watching: {:?}", content_dir);
    }

    if config_path.exists() {
        debouncer
            .watcher()
            .watch(&config_path, RecursiveMode::NonRecursive)?;
        tracing::debug!("Watching: {:?}", config_path);
    }

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let relevant_events: Vec<_> = events
                    .iter()
                    .filter(|e| {
                        let path_str = e.path.to_string_lossy();
                        !path_str.contains(".git")
                            && !path_str.contains(".DS_Store")
                            && !path_str.ends_with('~')
                    })
                    .collect();

                if relevant_events.is_empty() {
                    continue;
                }

                for event in &relevant_events {
                    tracing::info!("File changed: {}", event.path.display());
                }

                // Pages render per request, clients only need a nudge
                let _ = reload_tx.send(());
            }
            Ok(Err(e)) => {
                tracing::error!("Watch error: {:?}", e);
            }
            Err(e) => {
                tracing::error!("Channel error: {:?}", e);
                break;
            }
        }
    }

    Ok(())
}

/// Inject live reload script into HTML content
fn inject_live_reload(html: &str) -> String {
    if html.contains("</body>") {
        html.replace("</body>", LIVE_RELOAD_SCRIPT)
    } else {
        // If no </body> tag, append to end
        format!("{}{}", html, LIVE_RELOAD_SCRIPT)
    }
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
