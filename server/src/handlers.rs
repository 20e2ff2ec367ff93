//! Request handlers: one per CRUD verb.
//!
//! Each handler receives the connected store from the request extensions
//! (see `routes::ensure_connected`), makes exactly one store call, and maps
//! the result onto an envelope or an `ApiError`.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query};
use axum::{Extension, Json};
use serde_json::{json, Value};
use todo_core::payload::ignored_keys;
use todo_core::{parse_fields, parse_patch, ListParams, Todo};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::responses::{Envelope, ListMeta};
use crate::store::SharedStore;

/// An id that is not a UUID cannot name a stored todo.
fn parse_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound)
}

fn read_body(body: Result<Json<Value>, JsonRejection>) -> ApiResult<Value> {
    let Json(body) = body?;
    if let Some(map) = body.as_object() {
        let dropped = ignored_keys(map);
        if !dropped.is_empty() {
            tracing::debug!(?dropped, "ignoring non-writable fields");
        }
    }
    Ok(body)
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn list_todos(
    Extension(store): Extension<SharedStore>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Envelope<Vec<Todo>>> {
    let Query(params) = params?;
    let result = store.list(&params.filter(), params.page()).await?;
    Ok(Envelope::ok(result.items).with_meta(ListMeta::new(result.total, &params)))
}

pub async fn get_todo(
    Extension(store): Extension<SharedStore>,
    Path(id): Path<String>,
) -> ApiResult<Envelope<Todo>> {
    let id = parse_id(&id)?;
    let todo = store.get(id).await?.ok_or(ApiError::NotFound)?;
    Ok(Envelope::ok(todo))
}

pub async fn create_todo(
    Extension(store): Extension<SharedStore>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Envelope<Todo>> {
    let fields = parse_fields(&read_body(body)?)?;
    let todo = store.create(fields).await?;
    tracing::debug!(id = %todo.id, "created todo");
    Ok(Envelope::created(todo))
}

pub async fn replace_todo(
    Extension(store): Extension<SharedStore>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Envelope<Todo>> {
    let id = parse_id(&id)?;
    let fields = parse_fields(&read_body(body)?)?;
    let todo = store.replace(id, fields).await?.ok_or(ApiError::NotFound)?;
    tracing::debug!(%id, "replaced todo");
    Ok(Envelope::ok(todo))
}

pub async fn update_todo(
    Extension(store): Extension<SharedStore>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Envelope<Todo>> {
    let id = parse_id(&id)?;
    let patch = parse_patch(&read_body(body)?)?;
    let todo = store.update(id, patch).await?.ok_or(ApiError::NotFound)?;
    tracing::debug!(%id, "updated todo");
    Ok(Envelope::ok(todo))
}

pub async fn delete_todo(
    Extension(store): Extension<SharedStore>,
    Path(id): Path<String>,
) -> ApiResult<Envelope<Todo>> {
    let id = parse_id(&id)?;
    let todo = store.delete(id).await?.ok_or(ApiError::NotFound)?;
    tracing::debug!(%id, "deleted todo");
    Ok(Envelope::ok(todo))
}
