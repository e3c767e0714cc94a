//! Identity provider adapters.
//!
//! This module provides an HTTP implementation of the `IdentityProvider`
//! port for GoTrue-compatible auth services.

mod dto;
mod gotrue;

pub use gotrue::GoTrueIdentityProvider;
