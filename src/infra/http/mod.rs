mod cards;
mod middleware;

use std::sync::Arc;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};

use crate::application::render::RenderService;

#[derive(Clone)]
pub struct HttpState {
    pub renderer: Arc<dyn RenderService>,
}

impl HttpState {
    pub fn new(renderer: Arc<dyn RenderService>) -> Self {
        Self { renderer }
    }
}

pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route("/_health", get(cards::health))
        .route("/render", post(cards::render_json))
        .route("/", get(cards::card_root))
        .route("/{*path}", get(cards::card_from_path))
        .with_state(state)
        .layer(axum_middleware::from_fn(middleware::trace_cards))
}
