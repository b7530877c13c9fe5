use crate::modules::{
    handlers::{internal_error, ApiResult, SharedStore},
    models::response::RankingView,
};
use axum::{extract::Extension, Json};

pub async fn ranking(Extension(store): Extension<SharedStore>) -> ApiResult<RankingView> {
    let players = store.ranking().await.map_err(internal_error)?;

    Ok(Json(RankingView::from(players)))
}
