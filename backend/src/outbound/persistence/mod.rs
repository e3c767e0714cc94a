//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories here implement the domain's storage ports on top of
//! `diesel-async` with `bb8` pooling. Row structs (`models.rs`) and table
//! definitions (`schema.rs`) stay private to this module.
//!
//! # Example
//!
//! ```ignore
//! use seating::outbound::persistence::{DbPool, DieselSeatRecordRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/seating")).await?;
//! let repo = DieselSeatRecordRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_profile_repository;
mod diesel_seat_record_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_profile_repository::DieselProfileRepository;
pub use diesel_seat_record_repository::DieselSeatRecordRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
