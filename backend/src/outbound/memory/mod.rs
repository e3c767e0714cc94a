//! In-process adapters for the storage and identity ports.
//!
//! The server falls back to these when no database or auth service is
//! configured, and behaviour tests drive the domain through them. They follow
//! the same conflict rules as the PostgreSQL and GoTrue adapters so flows
//! behave alike either way.

mod identity;
mod profiles;
mod seat_records;

pub use identity::InMemoryIdentityProvider;
pub use profiles::InMemoryProfileRepository;
pub use seat_records::InMemorySeatRecordRepository;

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

// A panicking writer cannot leave these maps half-updated: every mutation is
// computed first and swapped in with a single assignment.
fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
