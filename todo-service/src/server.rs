//! HTTP server with graceful shutdown

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
    Router,
};
use std::any::Any;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::{DefaultOnResponse, TraceLayer},
};

use crate::{
    config::{Config, CorsMode},
    error::{Error, Result},
    middleware::{
        report_errors, request_id_layer, request_id_propagation_layer, request_span,
        sensitive_headers_layer,
    },
};

/// Server instance
pub struct Server {
    config: Config,
}

impl Server {
    /// Create a new server instance
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Wrap a router with the configured middleware stack
    ///
    /// Outermost first: request id, id propagation, sensitive headers,
    /// tracing, CORS, compression, timeout, body limit, error reporting,
    /// panic recovery.
    pub fn apply_middleware(&self, app: Router) -> Router {
        let middleware = &self.config.middleware;
        let tracking = &middleware.request_tracking;

        let mut app = app;

        // Layers added first sit closest to the handlers
        if middleware.catch_panic {
            app = app.layer(CatchPanicLayer::custom(handle_panic));
        }

        app = app
            .layer(from_fn_with_state(
                self.config.service.environment,
                report_errors,
            ))
            .layer(RequestBodyLimitLayer::new(middleware.body_limit_bytes()))
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                self.config.service.timeout(),
            ));

        if middleware.compression {
            app = app.layer(CompressionLayer::new());
        }

        if let Some(cors) = self.build_cors_layer() {
            app = app.layer(cors);
        }

        app = app.layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request| request_span(request))
                .on_response(DefaultOnResponse::new().include_headers(true)),
        );

        if tracking.mask_sensitive_headers {
            app = app.layer(sensitive_headers_layer());
        }

        if tracking.request_id_enabled {
            if tracking.propagate_request_id {
                app = app.layer(request_id_propagation_layer());
            }
            app = app.layer(request_id_layer());
        }

        app
    }

    /// Run the server with the given router
    pub async fn serve(self, app: Router) -> Result<()> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.service.port));

        tracing::info!("Starting {} on {}", self.config.service.name, addr);
        self.log_middleware_config();

        let app = self.apply_middleware(app);

        let listener = TcpListener::bind(&addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }

    /// Log middleware configuration for debugging
    fn log_middleware_config(&self) {
        let middleware = &self.config.middleware;
        let tracking = &middleware.request_tracking;

        tracing::info!("Middleware configuration:");
        tracing::info!("  - Environment: {}", self.config.service.environment);
        tracing::info!("  - Panic recovery: {}", middleware.catch_panic);
        tracing::info!(
            "  - Request ID tracking: {} (propagate: {})",
            tracking.request_id_enabled,
            tracking.propagate_request_id
        );
        tracing::info!(
            "  - Sensitive header masking: {}",
            tracking.mask_sensitive_headers
        );
        tracing::info!("  - Request body limit: {} KiB", middleware.body_limit_kb);
        tracing::info!("  - Compression: {}", middleware.compression);
        tracing::info!("  - CORS mode: {:?}", middleware.cors_mode);
        tracing::info!(
            "  - Request timeout: {} seconds",
            self.config.service.timeout_secs
        );
        tracing::info!("  - Todo routes under: {}", self.config.api.base_path);
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Build CORS layer based on configuration
    fn build_cors_layer(&self) -> Option<CorsLayer> {
        match self.config.middleware.cors_mode {
            CorsMode::Permissive => {
                tracing::debug!("Enabling permissive CORS");
                Some(CorsLayer::permissive())
            }
            CorsMode::Restrictive => {
                tracing::debug!("Enabling restrictive CORS (default deny)");
                Some(CorsLayer::new())
            }
            CorsMode::Disabled => {
                tracing::debug!("CORS disabled");
                None
            }
        }
    }
}

/// Turn a handler panic into the generic 500 response
///
/// The panic message only goes into the [`ErrorReport`](crate::error::ErrorReport).
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic payload".to_string()
    };

    Error::Internal(format!("handler panicked: {}", detail)).into_response()
}

/// Wait for shutdown signal (SIGTERM or SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl+C), starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }

    tracing::info!("Shutdown signal received, draining requests...");
}
