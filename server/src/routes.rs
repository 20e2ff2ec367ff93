//! Route table for the todo resource.

use axum::extract::{Request, State};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::Router;

use crate::error::ApiResult;
use crate::handlers::{create_todo, delete_todo, get_todo, list_todos, replace_todo, update_todo};
use crate::state::AppState;

/// `/todos` and `/todos/{id}`, each request preceded by `ensure_connected`.
pub fn todo_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route(
            "/todos/{id}",
            get(get_todo)
                .put(replace_todo)
                .patch(update_todo)
                .delete(delete_todo),
        )
        .route_layer(middleware::from_fn_with_state(state, ensure_connected))
}

/// Make sure the storage connection exists and hand it to the handler.
///
/// A connection failure ends the request here with a propagated error.
pub async fn ensure_connected(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let store = state.database().connect().await?;
    request.extensions_mut().insert(store);
    Ok(next.run(request).await)
}
