//! # todo-service
//!
//! In-memory todo list backend for mobile clients.
//!
//! Requests flow through three layers:
//!
//! - **API** ([`handlers`], [`routes`], [`responses`], [`error`]): decode and
//!   validate input, map results and errors to HTTP
//! - **Service** ([`service`]): paging metadata and not-found semantics
//! - **Repository** ([`repository`]): storage behind the [`TodoRepository`](repository::TodoRepository) trait
//!
//! ## Example
//!
//! ```rust,no_run
//! use todo_service::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     init_tracing(&config)?;
//!
//!     let state = AppState::in_memory(config.clone());
//!     let app = router(state);
//!
//!     Server::new(config).serve(app).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod health;
pub mod ids;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod pagination;
pub mod repository;
pub mod responses;
pub mod routes;
pub mod server;
pub mod service;
pub mod state;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{
        ApiConfig, Config, CorsMode, Environment, MiddlewareConfig, RequestTrackingConfig,
        ServiceConfig,
    };
    pub use crate::error::{Error, ErrorReport, ErrorResponse, Result};
    pub use crate::health::{health, HealthResponse};
    pub use crate::ids::{IdError, MakeTypedRequestId, RequestId, TodoId};
    pub use crate::models::{Title, TitleError, Todo, TITLE_MAX_LEN};
    pub use crate::observability::init_tracing;
    pub use crate::pagination::{Page, Pagination, Paging, DEFAULT_LIMIT, MAX_LIMIT};
    pub use crate::repository::{
        InMemoryTodoRepository, RepositoryError, RepositoryErrorKind, RepositoryOperation,
        RepositoryResult, TodoRepository,
    };
    pub use crate::responses::{Acknowledgement, Created, FieldError, ValidationError};
    pub use crate::routes::router;
    pub use crate::server::Server;
    pub use crate::service::TodoService;
    pub use crate::state::AppState;

    // Re-export commonly used external types
    pub use axum::{
        extract::{Path, Query, State},
        http::StatusCode,
        response::{IntoResponse, Response},
        Json, Router,
    };
    pub use serde::{Deserialize, Serialize};
    pub use tracing::{debug, error, info, instrument, trace, warn};
}
