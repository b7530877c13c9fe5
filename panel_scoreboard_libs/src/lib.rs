pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod store;

pub use api::FieldList;
pub use engine::{empty_result, ScoreEngine};
pub use panel_scoreboard_derive::FieldList;
