pub mod info;
pub mod ranking;
pub mod result;

use crate::modules::models::response::{ErrorResponse, IndexResponse};
use axum::{extract::Extension, http::StatusCode, Json};
use panel_scoreboard_libs::{error::StoreError, store::ScoreStore};
use std::sync::Arc;

pub type SharedStore = Arc<dyn ScoreStore>;
pub type ApiError = (StatusCode, Json<ErrorResponse>);
pub type ApiResult<T> = Result<Json<T>, ApiError>;

pub const ROUTES: [&str; 8] = [
    "GET /",
    "POST /result",
    "GET /result",
    "GET /ranking",
    "GET /print",
    "GET /info",
    "GET /dbdebug",
    "GET /api/liveness",
];

pub fn internal_error(e: StoreError) -> ApiError {
    tracing::error!("request failed cause: {:?}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new("unexpected error")),
    )
}

pub async fn index() -> Json<IndexResponse> {
    Json(IndexResponse {
        name: "panel_scoreboard",
        routes: ROUTES.to_vec(),
    })
}

pub async fn liveness(Extension(store): Extension<SharedStore>) -> StatusCode {
    match store.ping().await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::error!("store is not available: {:?}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
