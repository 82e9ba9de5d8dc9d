// Library interface for testing

pub mod config;
pub mod constants;
pub mod db;
pub mod db_postgres;
pub mod ideas;
pub mod models;
pub mod queries;
pub mod schema;
pub mod serve;
pub mod store;

pub use ideas::{generate_shorts_ideas, sample_ideas};
pub use store::{DocumentStore, StoreError};
