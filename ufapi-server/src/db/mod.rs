//! Database layer - connection pool, store trait and implementations
//!
//! # Design Principles
//!
//! - Connection pool, one statement per call, no multi-statement transactions
//! - Rely on DB constraints for uniqueness - no check-then-insert
//! - Static SQL text; every value is a bound parameter

pub mod error;
pub mod memory;
pub mod migrations;
pub mod pool;
pub mod repos;
pub mod store;

pub use error::DbError;
pub use memory::MemoryUfStore;
pub use pool::{create_pool, create_pool_with_options, PoolSettings};
pub use repos::UfRepo;
pub use store::UfStore;
