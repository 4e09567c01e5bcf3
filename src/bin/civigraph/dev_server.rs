//! Development server for the chart viewer with live reload
//!
//! Serves the viewer directory (HTML/JS/CSS plus the compiled dataset) and
//! notifies connected browsers over Server-Sent Events whenever a served
//! file changes, so edit-reload loops need no manual refresh.

use axum::{
    extract::State,
    response::{
        sse::{Event, KeepAlive},
        Sse,
    },
    routing::get,
    Router,
};
use notify::{RecursiveMode, Watcher};
use notify_debouncer_full::{new_debouncer, DebounceEventResult};
use std::{convert::Infallible, net::SocketAddr, path::PathBuf, time::Duration};
use tokio::sync::broadcast;
use tokio_stream::{wrappers::BroadcastStream, StreamExt};
use tower_http::{services::ServeDir, trace::TraceLayer};

/// File types the viewer actually loads; changes to anything else (editor
/// swap files, build artifacts) stay silent.
const WATCHED_EXTENSIONS: &[&str] = &["html", "js", "css", "json", "csv", "toml"];

#[derive(Debug, Clone)]
enum Notification {
    Reload,
    Shutdown,
}

#[derive(Clone)]
struct ServerState {
    notify_tx: broadcast::Sender<Notification>,
}

/// Live-reload static server for the viewer directory.
pub struct ViewerServer {
    root: PathBuf,
    port: u16,
}

impl ViewerServer {
    pub fn new(root: PathBuf, port: u16) -> Self {
        ViewerServer { root, port }
    }

    /// Serve until Ctrl-C. Connected SSE clients get a `reload` event on
    /// file changes and a `close` event on shutdown.
    pub async fn serve(self) -> Result<(), Box<dyn std::error::Error>> {
        let (notify_tx, _) = broadcast::channel::<Notification>(64);
        let addr = SocketAddr::from(([127, 0, 0, 1], self.port));

        // The debouncer must stay alive for the server's lifetime; dropping
        // it stops the watch.
        let watcher_tx = notify_tx.clone();
        let mut debouncer = new_debouncer(
            Duration::from_millis(500),
            None,
            move |result: DebounceEventResult| match result {
                Ok(events) => {
                    let relevant = events.iter().any(|event| {
                        event.paths.iter().any(|path| {
                            path.extension()
                                .and_then(|ext| ext.to_str())
                                .map(|ext| WATCHED_EXTENSIONS.contains(&ext))
                                .unwrap_or(false)
                        })
                    });
                    if relevant {
                        tracing::debug!("viewer file changed, broadcasting reload");
                        let _ = watcher_tx.send(Notification::Reload);
                    }
                }
                Err(errors) => {
                    tracing::warn!("file watcher errors: {errors:?}");
                }
            },
        )?;
        debouncer
            .watcher()
            .watch(&self.root, RecursiveMode::Recursive)?;

        let app = Router::new()
            .route("/events", get(sse_handler))
            .nest_service("/", ServeDir::new(&self.root))
            .layer(TraceLayer::new_for_http())
            .with_state(ServerState {
                notify_tx: notify_tx.clone(),
            });

        tracing::info!("viewer server starting on http://{addr}");
        println!("\n🚀 Viewer server running at http://{addr}");
        println!("📁 Serving: {}", self.root.display());
        println!("🔄 Live reload enabled\n");

        let listener = tokio::net::TcpListener::bind(addr).await?;

        // On Ctrl-C, tell SSE clients to close before the listener goes away.
        let shutdown_tx = notify_tx.clone();
        let shutdown = async move {
            let _ = tokio::signal::ctrl_c().await;
            let _ = shutdown_tx.send(Notification::Shutdown);
            tokio::time::sleep(Duration::from_millis(200)).await;
        };

        axum::serve(listener, app.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        drop(debouncer);
        tracing::info!("viewer server shut down");
        Ok(())
    }
}

/// SSE endpoint handler
async fn sse_handler(
    State(state): State<ServerState>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>>> {
    let rx = state.notify_tx.subscribe();
    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(Notification::Reload) => Some(Ok(Event::default().event("reload").data("reload"))),
        Ok(Notification::Shutdown) => Some(Ok(Event::default()
            .event("close")
            .data("Server shutting down"))),
        // Lagged behind; a reload is always safe.
        Err(_) => Some(Ok(Event::default().event("reload").data("reload"))),
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
