//! HTTP API
//!
//! Course generation, dialogue audio and stored course routes on one axum
//! router. [`ApiServer`] runs it in the background with graceful shutdown.

pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use std::future::Future;
use std::net::SocketAddr;

use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::{audio, courses, demo, generate, health_check};

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                log::warn!("Ignoring invalid CORS origin: {}", o);
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(allowed))
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.cors_origins);

    Router::new()
        .route("/health", get(health_check))
        .route("/courses", get(courses::list_courses).post(courses::create_course))
        .route(
            "/courses/:id",
            get(courses::get_course).delete(courses::delete_course),
        )
        .route("/courses/:id/publish", post(courses::publish_course))
        .route("/generate-course", post(generate::generate_course))
        .route("/generate-video-course", post(generate::generate_video_course))
        .route("/generate-audio-course", post(generate::generate_audio_course))
        .route("/generate-script", post(generate::generate_script))
        .route("/generate-audio", post(audio::generate_audio))
        .route("/mock-course", get(demo::mock_course))
        .route("/mock-video-course", get(demo::mock_video_course))
        .route("/mock-audio-course", get(demo::mock_audio_course))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

pub struct ApiServer {
    addr: String,
    state: AppState,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl ApiServer {
    pub fn new(addr: impl Into<String>, state: AppState) -> Self {
        Self {
            addr: addr.into(),
            state,
            shutdown_tx: None,
        }
    }

    /// Bind and serve in a background task. Returns the bound address,
    /// which differs from the configured one when port 0 was requested.
    pub async fn start(&mut self) -> std::io::Result<SocketAddr> {
        if self.shutdown_tx.is_some() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::AddrInUse,
                "API server already running",
            ));
        }

        let listener = TcpListener::bind(&self.addr).await?;
        let local_addr = listener.local_addr()?;
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let app = build_router(self.state.clone());

        tokio::spawn(async move {
            log::info!("API server started on http://{}", local_addr);
            if let Err(e) = axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                    log::info!("API server shutting down");
                })
                .await
            {
                log::error!("API server error: {}", e);
            }
        });

        self.shutdown_tx = Some(shutdown_tx);
        Ok(local_addr)
    }

    /// Stop a server started with [`ApiServer::start`].
    pub async fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            log::info!("API server stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.shutdown_tx.is_some()
    }

    /// Serve in the foreground until `shutdown` resolves.
    pub async fn serve<F>(self, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(&self.addr).await?;
        log::info!("API server listening on http://{}", listener.local_addr()?);
        axum::serve(listener, build_router(self.state))
            .with_graceful_shutdown(shutdown)
            .await
    }
}
