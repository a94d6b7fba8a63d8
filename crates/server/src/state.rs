//! Shared application state threaded through every handler via `axum`'s
//! `State` extractor.

use std::sync::Arc;

use engine::Manager;

#[derive(Clone)]
pub struct AppState {
    pub manager: Arc<Manager>,
}

impl AppState {
    pub fn new(manager: Arc<Manager>) -> Self {
        Self { manager }
    }
}
