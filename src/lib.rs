//! Market Cache - caching and rate-limited access to a market-data provider
//!
//! A durable get-or-compute cache in front of a request gate that spaces
//! upstream calls and keeps a short-lived copy of each response.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod gate;
pub mod market;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use tasks::spawn_cleanup_task;
