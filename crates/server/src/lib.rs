//! HTTP adapter for the lexdb search engine (docs/ARCHITECTURE.md §6.1).
//!
//! A thin layer over `lexdb-engine`'s `Manager`/`Processor`: parses and
//! validates requests, routes them to the right collection, and serialises
//! results. All error translation lives in [`error::ServerError`]. See
//! README.md and API.md for complete documentation.
//!
//! ```no_run
//! # use std::sync::Arc;
//! # async fn demo(manager: Arc<engine::Manager>) -> anyhow::Result<()> {
//! server::run("127.0.0.1:9000", std::time::Duration::from_secs(30), manager).await
//! # }
//! ```

pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use error::{ServerError, ServerResult};
pub use server::{build_router, run};
pub use state::AppState;
