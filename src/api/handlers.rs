//! Request handlers for the todo routes.
//!
//! Handlers only translate between wire shapes and `EntryService` calls.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use super::dto::{EntryBody, EntryDto, EntryListDto, ListQuery, RenormalizedDto, SortQuery};
use super::error::ApiError;
use super::AppState;

/// Create an entry at the top of the list
pub async fn create_entry(
    State(state): State<AppState>,
    body: Result<Json<EntryBody>, JsonRejection>,
) -> Result<(StatusCode, Json<EntryDto>), ApiError> {
    let Json(body) = body?;
    let entry = state.service.create(body.content, body.done).await?;
    Ok((StatusCode::CREATED, Json(entry.into())))
}

pub async fn get_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<EntryDto>, ApiError> {
    let entry = state.service.get(&id).await?;
    Ok(Json(entry.into()))
}

/// List one page in display order
pub async fn list_entries(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<EntryListDto>, ApiError> {
    let Query(query) = query?;
    let (page, size) = query.resolve(state.default_page_size)?;
    let list = state.service.list(page, size).await?;
    Ok(Json(list.into()))
}

pub async fn update_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<EntryBody>, JsonRejection>,
) -> Result<Json<EntryDto>, ApiError> {
    let Json(body) = body?;
    let entry = state.service.update(&id, body.content, body.done).await?;
    Ok(Json(entry.into()))
}

/// Move `currentid` between `backid` and `frontid`
pub async fn sort_entry(
    State(state): State<AppState>,
    query: Result<Query<SortQuery>, QueryRejection>,
) -> Result<Json<EntryDto>, ApiError> {
    let Query(query) = query?;
    let moved = state
        .service
        .reorder(query.target()?, query.back(), query.front())
        .await?;
    Ok(Json(moved.into()))
}

pub async fn delete_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.service.delete(&id).await?;
    Ok(StatusCode::OK)
}

pub async fn renormalize(State(state): State<AppState>) -> Result<Json<RenormalizedDto>, ApiError> {
    let renormalized = state.service.renormalize().await?;
    Ok(Json(RenormalizedDto { renormalized }))
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION")
    }))
}
