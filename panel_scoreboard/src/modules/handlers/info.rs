use crate::modules::{
    handlers::{internal_error, ApiResult, SharedStore},
    models::response::{remaining_virus, DebugView, InfoView},
};
use axum::{extract::Extension, Json};
use panel_scoreboard_libs::{config::ScoreboardConfig, model::Team};
use std::sync::Arc;

pub async fn info(
    Extension(store): Extension<SharedStore>,
    Extension(config): Extension<Arc<ScoreboardConfig>>,
) -> ApiResult<InfoView> {
    let total = store.total_virusnum().await.map_err(internal_error)?;

    let mut sums = [0i64; 3];
    for (sum, team) in sums.iter_mut().zip(Team::ALL) {
        *sum = store.team_virusnum(team).await.map_err(internal_error)?;
    }
    let [red_team_sum, green_team_sum, blue_team_sum] = sums;

    Ok(Json(InfoView {
        remaining_virus: remaining_virus(config.max_virus, total),
        max_virus: config.max_virus,
        red_team_sum,
        green_team_sum,
        blue_team_sum,
    }))
}

pub async fn db_debug(Extension(store): Extension<SharedStore>) -> ApiResult<DebugView> {
    let raw_data = store.all_raw().await.map_err(internal_error)?;
    let player_data = store.all_results().await.map_err(internal_error)?;

    Ok(Json(DebugView {
        raw_data,
        player_data,
    }))
}
