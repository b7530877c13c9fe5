use crate::modules::{
    handlers::{internal_error, ApiResult, SharedStore},
    models::{
        request::{normalize_name, ValidatedSubmission},
        response::{remaining_virus, ErrorResponse, PrintView, ResultView},
    },
};
use axum::{extract::Extension, http::StatusCode, Json};
use panel_scoreboard_libs::{
    config::ScoreboardConfig,
    empty_result,
    error::StoreError,
    model::{PlayerResult, RawSubmission},
    ScoreEngine,
};
use std::sync::Arc;

pub async fn post_result(
    Extension(store): Extension<SharedStore>,
    Extension(engine): Extension<Arc<ScoreEngine>>,
    ValidatedSubmission(raw): ValidatedSubmission,
) -> ApiResult<PlayerResult> {
    tracing::debug!("Request: {:?}", raw);
    store.append_raw(&raw).await.map_err(internal_error)?;

    let scored = RawSubmission {
        name: normalize_name(&raw.name),
        ..raw.clone()
    };
    let result = engine.compute_result(&scored).map_err(|e| {
        tracing::error!("rejected submission from {}: {}", raw.name, e);
        (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(e)))
    })?;
    store.append_result(&result).await.map_err(internal_error)?;

    tracing::info!(
        target: "submission",
        "name={} team={:?} difficulty={:?} score={} rank={:?} virusnum={}",
        result.name, result.team, result.difficulty, result.score, result.rank, result.virusnum
    );

    Ok(Json(result))
}

/// The latest stored result, or the placeholder, with the remaining virus count.
async fn latest_or_empty(
    store: &SharedStore,
    config: &ScoreboardConfig,
) -> Result<(PlayerResult, i64), StoreError> {
    let total = store.total_virusnum().await?;
    let player = store
        .latest()
        .await?
        .map(|stored| stored.record)
        .unwrap_or_else(empty_result);

    Ok((player, remaining_virus(config.max_virus, total)))
}

pub async fn latest_result(
    Extension(store): Extension<SharedStore>,
    Extension(config): Extension<Arc<ScoreboardConfig>>,
) -> ApiResult<ResultView> {
    let (player, remaining) = latest_or_empty(&store, &config)
        .await
        .map_err(internal_error)?;

    Ok(Json(ResultView::new(player, remaining)))
}

pub async fn print_result(
    Extension(store): Extension<SharedStore>,
    Extension(config): Extension<Arc<ScoreboardConfig>>,
) -> ApiResult<PrintView> {
    let (player, remaining) = latest_or_empty(&store, &config)
        .await
        .map_err(internal_error)?;

    Ok(Json(PrintView::new(player, remaining)))
}
