//! Success envelopes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use todo_core::ListParams;

/// List metadata: total matches plus the limit and offset the client
/// requested. The limit is echoed uncapped even when fewer items come back.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ListMeta {
    pub total: u64,
    pub limit: usize,
    pub offset: usize,
}

impl ListMeta {
    pub fn new(total: u64, params: &ListParams) -> Self {
        Self {
            total,
            limit: params.requested_limit(),
            offset: params.requested_offset(),
        }
    }
}

/// `{"status": ..., "data": ..., "meta"?: ...}`
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    #[serde(skip)]
    code: StatusCode,
    status: &'static str,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    meta: Option<ListMeta>,
}

impl<T: Serialize> Envelope<T> {
    /// 200 with status `ok`.
    pub fn ok(data: T) -> Self {
        Self {
            code: StatusCode::OK,
            status: "ok",
            data,
            meta: None,
        }
    }

    /// 201 with status `created`.
    pub fn created(data: T) -> Self {
        Self {
            code: StatusCode::CREATED,
            status: "created",
            data,
            meta: None,
        }
    }

    pub fn with_meta(mut self, meta: ListMeta) -> Self {
        self.meta = Some(meta);
        self
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        (self.code, Json(self)).into_response()
    }
}
