//! docrest server - HTTP REST API over a schema-validated document store
//!
//! This crate exposes CRUD and paginated search over the `users` collection,
//! wrapping every result in a uniform JSON envelope.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use docrest_server::AppConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AppConfig::load()?;
//!     docrest_server::start_server(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! # API Endpoints
//!
//! - `GET /` - API information
//! - `GET /health` - Liveness probe
//! - `GET /ready` - Readiness probe (pings the store)
//! - `POST /api/users` - Create a user
//! - `GET /api/users?skip=&limit=&search=` - List users with pagination
//! - `GET /api/users/{id}` - Get a user
//! - `PUT /api/users/{id}` - Update a user (partial merge)
//! - `DELETE /api/users/{id}` - Delete a user
//!
//! # Configuration
//!
//! Settings come from environment variables (`MONGODB_URL`, `DATABASE_NAME`,
//! `API_HOST`, `API_PORT`, `STORE_BACKEND`, ...), optionally via a `.env` file or a
//! `docrest.toml` file. See [`AppConfig`].

pub mod config;
pub mod envelope;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod server;
pub mod state;

pub use config::AppConfig;
pub use error::{ApiError, ApiResult};
pub use server::{build_router, start_server};
pub use state::AppState;
