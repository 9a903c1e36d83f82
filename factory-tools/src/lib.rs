#[cfg(any(test, feature = "test_utilities"))]
pub mod test_helpers;

mod catalog;
mod config;
mod database;
mod emitter;
mod error;
mod generator;
mod models;
mod orchestrator;
mod postgres_client_wrapper;
mod quoting;
mod schema_reader;

pub use catalog::*;
pub use config::*;
pub use database::*;
pub use emitter::*;
pub use error::*;
pub use generator::*;
pub use models::*;
pub use orchestrator::*;
pub use postgres_client_wrapper::PostgresClientWrapper;
pub use schema_reader::*;
