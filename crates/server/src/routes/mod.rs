//! HTTP endpoint handlers, one module per concern (docs/ARCHITECTURE.md §6.1).

pub mod collections;
pub mod documents;
pub mod health;

use crate::error::ServerError;

/// Catch-all for routes outside docs/ARCHITECTURE.md §6.1's surface.
pub async fn not_found() -> ServerError {
    ServerError::NotFound
}
