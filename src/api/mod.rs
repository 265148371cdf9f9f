pub mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::classifier::SentimentClassifier;
use crate::llm::GenerativeModel;

/// Shared state for API handlers
pub struct ApiState<M: GenerativeModel> {
    pub classifier: Arc<SentimentClassifier<M>>,
}

impl<M: GenerativeModel> Clone for ApiState<M> {
    fn clone(&self) -> Self {
        Self {
            classifier: Arc::clone(&self.classifier),
        }
    }
}

/// Create and configure the API router
pub fn create_router<M: GenerativeModel + 'static>(classifier: SentimentClassifier<M>) -> Router {
    let state = ApiState {
        classifier: Arc::new(classifier),
    };

    // Configure CORS to allow all origins (adjust for production)
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/classify", post(handlers::classify::<M>))
        .route("/api/health", get(handlers::health::<M>))
        .layer(cors)
        .with_state(state)
}
