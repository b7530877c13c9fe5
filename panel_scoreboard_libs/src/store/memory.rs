use super::{PlayerResultStore, RawDataStore, Result, ScoreStore};
use crate::model::{PlayerResult, RawSubmission, Stored, Team};
use async_trait::async_trait;
use chrono::Local;
use itertools::Itertools;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Tables {
    raw_data: Vec<Stored<RawSubmission>>,
    player_data: Vec<Stored<PlayerResult>>,
}

/// Process-local store. Contents are lost when the server stops.
#[derive(Debug, Default)]
pub struct MemoryScoreStore {
    tables: RwLock<Tables>,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn stored<T>(id: usize, record: T) -> Stored<T> {
    Stored {
        id: id as i64,
        created_at: Local::now(),
        record,
    }
}

#[async_trait]
impl RawDataStore for MemoryScoreStore {
    async fn append_raw(&self, raw: &RawSubmission) -> Result<()> {
        let mut tables = self.tables.write().await;
        let id = tables.raw_data.len() + 1;
        tables.raw_data.push(stored(id, raw.clone()));
        Ok(())
    }

    async fn all_raw(&self) -> Result<Vec<Stored<RawSubmission>>> {
        Ok(self.tables.read().await.raw_data.clone())
    }
}

#[async_trait]
impl PlayerResultStore for MemoryScoreStore {
    async fn append_result(&self, result: &PlayerResult) -> Result<()> {
        let mut tables = self.tables.write().await;
        let id = tables.player_data.len() + 1;
        tables.player_data.push(stored(id, result.clone()));
        Ok(())
    }

    async fn latest(&self) -> Result<Option<Stored<PlayerResult>>> {
        Ok(self.tables.read().await.player_data.last().cloned())
    }

    async fn ranking(&self) -> Result<Vec<Stored<PlayerResult>>> {
        let tables = self.tables.read().await;
        Ok(tables
            .player_data
            .iter()
            .cloned()
            .sorted_by(|a, b| b.record.score.total_cmp(&a.record.score))
            .collect())
    }

    async fn all_results(&self) -> Result<Vec<Stored<PlayerResult>>> {
        Ok(self.tables.read().await.player_data.clone())
    }

    async fn total_virusnum(&self) -> Result<i64> {
        let tables = self.tables.read().await;
        Ok(tables.player_data.iter().map(|row| row.record.virusnum).sum())
    }

    async fn team_virusnum(&self, team: Team) -> Result<i64> {
        let tables = self.tables.read().await;
        Ok(tables
            .player_data
            .iter()
            .filter(|row| row.record.team == Some(team))
            .map(|row| row.record.virusnum)
            .sum())
    }
}

#[async_trait]
impl ScoreStore for MemoryScoreStore {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::{Difficulty, GameResult, Rank};

    fn result(name: &str, team: Team, score: f64, virusnum: i64) -> PlayerResult {
        PlayerResult {
            name: String::from(name),
            team: Some(team),
            difficulty: Some(Difficulty::Normal),
            score,
            rank: Some(Rank::C),
            virusnum,
            game_result: GameResult::Clear,
            ..PlayerResult::empty()
        }
    }

    #[tokio::test]
    async fn empty_store() {
        let store = MemoryScoreStore::new();
        assert!(store.latest().await.unwrap().is_none());
        assert!(store.ranking().await.unwrap().is_empty());
        assert_eq!(store.total_virusnum().await.unwrap(), 0);
        assert_eq!(store.team_virusnum(Team::Red).await.unwrap(), 0);
        assert!(store.ping().await.is_ok());
    }

    #[tokio::test]
    async fn latest_is_last_appended() {
        let store = MemoryScoreStore::new();
        store.append_result(&result("a", Team::Red, 10.0, 1)).await.unwrap();
        store.append_result(&result("b", Team::Blue, 5.0, 1)).await.unwrap();

        let latest = store.latest().await.unwrap().unwrap();
        assert_eq!(latest.id, 2);
        assert_eq!(latest.record.name, "b");
    }

    #[tokio::test]
    async fn ranking_by_score_descending() {
        let store = MemoryScoreStore::new();
        for (name, score) in [("a", 600.0), ("b", 1800.0), ("c", 600.0), ("d", 1200.0)] {
            store
                .append_result(&result(name, Team::Green, score, 1))
                .await
                .unwrap();
        }

        let names: Vec<String> = store
            .ranking()
            .await
            .unwrap()
            .into_iter()
            .map(|row| row.record.name)
            .collect();
        assert_eq!(names, vec!["b", "d", "a", "c"]);
    }

    #[tokio::test]
    async fn virus_sums() {
        let store = MemoryScoreStore::new();
        store.append_result(&result("a", Team::Red, 0.0, 10)).await.unwrap();
        store.append_result(&result("b", Team::Red, 0.0, 5)).await.unwrap();
        store.append_result(&result("c", Team::Blue, 0.0, 7)).await.unwrap();

        assert_eq!(store.total_virusnum().await.unwrap(), 22);
        assert_eq!(store.team_virusnum(Team::Red).await.unwrap(), 15);
        assert_eq!(store.team_virusnum(Team::Green).await.unwrap(), 0);
        assert_eq!(store.team_virusnum(Team::Blue).await.unwrap(), 7);
    }

    #[tokio::test]
    async fn raw_data_in_insertion_order() {
        let store = MemoryScoreStore::new();
        for name in ["first", "second"] {
            let raw = RawSubmission {
                name: String::from(name),
                team: 9,
                difficulty: 1,
                red_point: 0,
                blue_point: 0,
                green_point: 0,
                hit_point: 0,
                remaining_time: 0,
            };
            store.append_raw(&raw).await.unwrap();
        }

        let rows = store.all_raw().await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, 1);
        assert_eq!(rows[0].record.name, "first");
        assert_eq!(rows[1].record.team, 9);
    }
}
