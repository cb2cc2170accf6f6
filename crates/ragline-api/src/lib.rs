//! Ragline API crate - axum HTTP server and route handlers.
//!
//! Exposes the two service endpoints: POST /generate (answer generation)
//! and GET /health (status report).

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
