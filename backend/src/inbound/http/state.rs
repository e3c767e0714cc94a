//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain services and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{IdentityProvider, ProfileRepository, SeatRecordRepository};
use crate::domain::{AccountService, BulkReconciliationEngine, SeatRecordStore, SessionRouter};

/// Parameter object bundling the port implementations the services need.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub seat_records: Arc<dyn SeatRecordRepository>,
    pub profiles: Arc<dyn ProfileRepository>,
    pub identity: Arc<dyn IdentityProvider>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: AccountService,
    pub router: SessionRouter,
    pub store: SeatRecordStore,
    pub importer: BulkReconciliationEngine,
}

impl HttpState {
    /// Build the domain services over one set of ports.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use seating::inbound::http::state::{HttpState, HttpStatePorts};
    /// use seating::outbound::memory::{
    ///     InMemoryIdentityProvider, InMemoryProfileRepository, InMemorySeatRecordRepository,
    /// };
    ///
    /// let state = HttpState::new(HttpStatePorts {
    ///     seat_records: Arc::new(InMemorySeatRecordRepository::new()),
    ///     profiles: Arc::new(InMemoryProfileRepository::new()),
    ///     identity: Arc::new(InMemoryIdentityProvider::new()),
    /// });
    /// let _store = state.store.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            seat_records,
            profiles,
            identity,
        } = ports;
        let store = SeatRecordStore::new(seat_records);
        Self {
            accounts: AccountService::new(identity.clone(), profiles.clone()),
            router: SessionRouter::new(identity, profiles),
            importer: BulkReconciliationEngine::new(store.clone()),
            store,
        }
    }
}
