pub mod handlers;
pub mod migration;
pub mod models;
