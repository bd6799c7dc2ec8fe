//! Repository implementations for database access
//!
//! Repositories own a clone of the pool; each call acquires a connection
//! for one statement and returns it to the pool on every exit path.

pub mod ufs;

pub use ufs::UfRepo;
