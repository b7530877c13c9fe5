use panel_scoreboard_libs::model::{Difficulty, GameResult, PlayerResult, RawSubmission, Stored};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl ToString) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Viruses left in the event. Never negative.
pub fn remaining_virus(max_virus: i64, total_virusnum: i64) -> i64 {
    (max_virus - total_virusnum).max(0)
}

fn difficulty_image(difficulty: Option<Difficulty>) -> &'static str {
    match difficulty {
        Some(Difficulty::Easy) => "easy",
        Some(Difficulty::Normal) => "normal",
        Some(Difficulty::Hard) => "hard",
        Some(Difficulty::Lunatic) => "lunatic",
        None => "nil",
    }
}

fn lowercase<T: ToString>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map(|value| value.to_string().to_lowercase())
        .unwrap_or_default()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexResponse {
    pub name: &'static str,
    pub routes: Vec<&'static str>,
}

/// Latest result as shown on the result screen.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultView {
    pub remaining_virus: i64,
    pub difficulty_image: &'static str,
    pub game_result: &'static str,
    pub rank: String,
    pub team: String,
    pub player: PlayerResult,
}

impl ResultView {
    pub fn new(player: PlayerResult, remaining_virus: i64) -> Self {
        let game_result = match player.game_result {
            GameResult::Clear => "clear",
            GameResult::Failed => "failed",
        };

        Self {
            remaining_virus,
            difficulty_image: difficulty_image(player.difficulty),
            game_result,
            rank: lowercase(&player.rank),
            team: lowercase(&player.team),
            player,
        }
    }
}

/// Latest result as printed on the result slip.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintView {
    pub remaining_virus: i64,
    pub game_result: &'static str,
    pub player: PlayerResult,
}

impl PrintView {
    pub fn new(player: PlayerResult, remaining_virus: i64) -> Self {
        let game_result = if player.game_result.is_clear() {
            "Clear!!"
        } else {
            "Failed..."
        };

        Self {
            remaining_virus,
            game_result,
            player,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RankingEntry {
    pub position: usize,
    #[serde(flatten)]
    pub player: Stored<PlayerResult>,
}

#[derive(Debug, Serialize)]
pub struct RankingView {
    pub players: Vec<RankingEntry>,
}

impl From<Vec<Stored<PlayerResult>>> for RankingView {
    fn from(players: Vec<Stored<PlayerResult>>) -> Self {
        Self {
            players: players
                .into_iter()
                .enumerate()
                .map(|(index, player)| RankingEntry {
                    position: index + 1,
                    player,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoView {
    pub remaining_virus: i64,
    pub max_virus: i64,
    pub red_team_sum: i64,
    pub green_team_sum: i64,
    pub blue_team_sum: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugView {
    pub raw_data: Vec<Stored<RawSubmission>>,
    pub player_data: Vec<Stored<PlayerResult>>,
}
