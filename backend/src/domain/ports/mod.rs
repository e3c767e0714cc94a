//! Domain ports for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod identity_provider;
mod profile_repository;
mod seat_record_repository;
mod seat_row_source;

#[cfg(test)]
pub use identity_provider::MockIdentityProvider;
pub use identity_provider::{IdentityProvider, IdentityProviderError, SubjectAttributes};
#[cfg(test)]
pub use profile_repository::MockProfileRepository;
pub use profile_repository::{ProfileRepository, ProfileRepositoryError};
#[cfg(test)]
pub use seat_record_repository::MockSeatRecordRepository;
pub use seat_record_repository::{SeatRecordRepository, SeatRecordRepositoryError};
#[cfg(test)]
pub use seat_row_source::MockSeatRowSource;
pub use seat_row_source::{ParsedRowSource, SeatRowSource, SeatRowSourceError};
