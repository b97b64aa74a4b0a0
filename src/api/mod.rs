pub mod handlers;
pub mod routes;

pub use routes::*;

use crate::ml::ComplaintClassifier;
use std::sync::Arc;
use std::time::Instant;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<dyn ComplaintClassifier>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(classifier: Arc<dyn ComplaintClassifier>) -> Self {
        Self {
            classifier,
            started_at: Instant::now(),
        }
    }
}
