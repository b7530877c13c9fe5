//! Append-only persistence of raw submissions and scored results.

mod memory;
mod postgres;

pub use memory::MemoryScoreStore;
pub use postgres::{PgScoreStore, PlayerDataRow, RawDataRow};

use crate::{
    error::StoreError,
    model::{PlayerResult, RawSubmission, Stored, Team},
};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, StoreError>;

#[async_trait]
pub trait RawDataStore: Send + Sync {
    async fn append_raw(&self, raw: &RawSubmission) -> Result<()>;
    /// All raw submissions in insertion order.
    async fn all_raw(&self) -> Result<Vec<Stored<RawSubmission>>>;
}

#[async_trait]
pub trait PlayerResultStore: Send + Sync {
    async fn append_result(&self, result: &PlayerResult) -> Result<()>;
    /// The most recently stored result.
    async fn latest(&self) -> Result<Option<Stored<PlayerResult>>>;
    /// All results ordered by score descending. Equal scores keep insertion order.
    async fn ranking(&self) -> Result<Vec<Stored<PlayerResult>>>;
    /// All results in insertion order.
    async fn all_results(&self) -> Result<Vec<Stored<PlayerResult>>>;
    async fn total_virusnum(&self) -> Result<i64>;
    async fn team_virusnum(&self, team: Team) -> Result<i64>;
}

#[async_trait]
pub trait ScoreStore: RawDataStore + PlayerResultStore {
    async fn ping(&self) -> Result<()>;
}
