use super::{PlayerResultStore, RawDataStore, Result, ScoreStore};
use crate::{
    api::FieldList,
    error::StoreError,
    model::{GameResult, PlayerResult, RawSubmission, Stored, Team},
};
use async_trait::async_trait;
use chrono::{DateTime, Local};
use panel_scoreboard_derive::FieldList;
use sqlx::{postgres::Postgres, FromRow, Pool};
use std::str::FromStr;

#[derive(Debug, FromRow, FieldList)]
pub struct RawDataRow {
    pub id: i64,
    pub name: String,
    pub team: i32,
    pub difficulty: i32,
    pub red_point: i32,
    pub blue_point: i32,
    pub green_point: i32,
    pub hit_point: i32,
    pub remaining_time: i32,
    pub created_at: DateTime<Local>,
}

impl From<RawDataRow> for Stored<RawSubmission> {
    fn from(row: RawDataRow) -> Self {
        Stored {
            id: row.id,
            created_at: row.created_at,
            record: RawSubmission {
                name: row.name,
                team: row.team,
                difficulty: row.difficulty,
                red_point: row.red_point,
                blue_point: row.blue_point,
                green_point: row.green_point,
                hit_point: row.hit_point,
                remaining_time: row.remaining_time,
            },
        }
    }
}

#[derive(Debug, FromRow, FieldList)]
pub struct PlayerDataRow {
    pub id: i64,
    pub name: String,
    pub team: String,
    pub difficulty: String,
    pub score: f64,
    #[column(rename = "\"rank\"")]
    pub rank: String,
    pub virusnum: i64,
    pub game_result: i32,
    pub red_point: i32,
    pub blue_point: i32,
    pub green_point: i32,
    pub hit_point: i32,
    pub remaining_time: i32,
    pub created_at: DateTime<Local>,
}

/// Parses a text column, where the empty string stands for "not set".
fn parse_column<T: FromStr>(column: &'static str, value: String) -> Result<Option<T>> {
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|_| StoreError::Corrupt { column, value })
}

impl TryFrom<PlayerDataRow> for Stored<PlayerResult> {
    type Error = StoreError;

    fn try_from(row: PlayerDataRow) -> Result<Self> {
        let game_result =
            GameResult::try_from(row.game_result).map_err(|_| StoreError::Corrupt {
                column: "game_result",
                value: row.game_result.to_string(),
            })?;

        Ok(Stored {
            id: row.id,
            created_at: row.created_at,
            record: PlayerResult {
                name: row.name,
                team: parse_column("team", row.team)?,
                difficulty: parse_column("difficulty", row.difficulty)?,
                score: row.score,
                rank: parse_column("rank", row.rank)?,
                virusnum: row.virusnum,
                game_result,
                red_point: row.red_point,
                blue_point: row.blue_point,
                green_point: row.green_point,
                hit_point: row.hit_point,
                remaining_time: row.remaining_time,
            },
        })
    }
}

fn to_display<T: ToString>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map(|value| value.to_string())
        .unwrap_or_default()
}

pub struct PgScoreStore {
    pool: Pool<Postgres>,
}

impl PgScoreStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &Pool<Postgres> {
        &self.pool
    }

    async fn select_results(&self, order: &str) -> Result<Vec<Stored<PlayerResult>>> {
        let sql = format!(
            r#"SELECT {} FROM "player_data" ORDER BY {}"#,
            PlayerDataRow::field_list(),
            order
        );
        let rows: Vec<PlayerDataRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;

        rows.into_iter().map(Stored::try_from).collect()
    }
}

#[async_trait]
impl RawDataStore for PgScoreStore {
    async fn append_raw(&self, raw: &RawSubmission) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO "raw_data" (
                "name",
                "team",
                "difficulty",
                "red_point",
                "blue_point",
                "green_point",
                "hit_point",
                "remaining_time"
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8);
            "#,
        )
        .bind(&raw.name)
        .bind(raw.team)
        .bind(raw.difficulty)
        .bind(raw.red_point)
        .bind(raw.blue_point)
        .bind(raw.green_point)
        .bind(raw.hit_point)
        .bind(raw.remaining_time)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("failed to save raw data of {}: {:?}", raw.name, e);
            e
        })?;

        Ok(())
    }

    async fn all_raw(&self) -> Result<Vec<Stored<RawSubmission>>> {
        let sql = format!(
            r#"SELECT {} FROM "raw_data" ORDER BY "id" ASC"#,
            RawDataRow::field_list()
        );
        let rows: Vec<RawDataRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;

        Ok(rows.into_iter().map(Stored::from).collect())
    }
}

#[async_trait]
impl PlayerResultStore for PgScoreStore {
    async fn append_result(&self, result: &PlayerResult) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO "player_data" (
                "name",
                "team",
                "difficulty",
                "score",
                "rank",
                "virusnum",
                "game_result",
                "red_point",
                "blue_point",
                "green_point",
                "hit_point",
                "remaining_time"
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12);
            "#,
        )
        .bind(&result.name)
        .bind(to_display(&result.team))
        .bind(to_display(&result.difficulty))
        .bind(result.score)
        .bind(to_display(&result.rank))
        .bind(result.virusnum)
        .bind(i32::from(result.game_result))
        .bind(result.red_point)
        .bind(result.blue_point)
        .bind(result.green_point)
        .bind(result.hit_point)
        .bind(result.remaining_time)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("failed to save player data of {}: {:?}", result.name, e);
            e
        })?;

        Ok(())
    }

    async fn latest(&self) -> Result<Option<Stored<PlayerResult>>> {
        let sql = format!(
            r#"SELECT {} FROM "player_data" ORDER BY "id" DESC LIMIT 1"#,
            PlayerDataRow::field_list()
        );
        let row: Option<PlayerDataRow> = sqlx::query_as(&sql).fetch_optional(&self.pool).await?;

        row.map(Stored::try_from).transpose()
    }

    async fn ranking(&self) -> Result<Vec<Stored<PlayerResult>>> {
        self.select_results(r#""score" DESC, "id" ASC"#).await
    }

    async fn all_results(&self) -> Result<Vec<Stored<PlayerResult>>> {
        self.select_results(r#""id" ASC"#).await
    }

    async fn total_virusnum(&self) -> Result<i64> {
        let sum: i64 =
            sqlx::query_scalar(r#"SELECT COALESCE(SUM("virusnum"), 0)::BIGINT FROM "player_data""#)
                .fetch_one(&self.pool)
                .await?;

        Ok(sum)
    }

    async fn team_virusnum(&self, team: Team) -> Result<i64> {
        let sum: i64 = sqlx::query_scalar(
            r#"SELECT COALESCE(SUM("virusnum"), 0)::BIGINT FROM "player_data" WHERE "team" = $1"#,
        )
        .bind(team.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(sum)
    }
}

#[async_trait]
impl ScoreStore for PgScoreStore {
    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
