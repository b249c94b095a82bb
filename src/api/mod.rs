//! HTTP boundary
//!
//! Routes, wire shapes and error mapping. All behavior lives in
//! `EntryService`; this layer only translates.

mod dto;
mod error;
mod handlers;

use std::sync::Arc;

use axum::routing::{get, put};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::service::EntryService;

pub use dto::{EntryDto, EntryListDto, PageDto};
pub use error::ApiError;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<EntryService>,
    pub default_page_size: u32,
}

/// Build the todo router.
pub fn build_router(service: Arc<EntryService>, default_page_size: u32) -> Router {
    let state = AppState {
        service,
        default_page_size,
    };

    Router::new()
        .route("/todo", get(handlers::list_entries).post(handlers::create_entry))
        .route(
            "/todo/:id",
            get(handlers::get_entry)
                .put(handlers::update_entry)
                .delete(handlers::delete_entry),
        )
        .route("/sort", put(handlers::sort_entry))
        .route("/sort/renormalize", put(handlers::renormalize))
        .route("/health", get(handlers::health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
