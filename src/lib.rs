//! Todo Order Backend
//!
//! Layered architecture:
//! - domain: Entries, errors and the ordering rules
//! - repository: SQLite entry store
//! - service: Validation and orchestration
//! - api: axum routes over the service

use std::sync::Arc;

use axum::Router;

pub mod api;
pub mod config;
pub mod domain;
pub mod repository;
pub mod service;

use config::ServiceConfig;
use domain::DomainResult;
use repository::open_repository;
use service::EntryService;

/// Open the store named by `config` and wire it into the HTTP router.
pub fn build_app(config: &ServiceConfig) -> DomainResult<Router> {
    let repo = open_repository(&config.store.path, config.store_timeout())?;
    let service = Arc::new(EntryService::new(Arc::new(repo), config.list.max_size));
    Ok(api::build_router(service, config.list.default_size))
}
