//! Client-side data layer for the campus lost & found board.
//!
//! The [`domain::SessionStore`] publishes one observable
//! [`domain::Resource`] per tracked resource, drives the remote
//! [`domain::Gateway`], and avoids redundant fetches through a TTL cache.
//! Adapters for the driven ports live in [`outbound`].

pub mod config;
pub mod domain;
pub mod outbound;
pub mod telemetry;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use config::ClientSettings;
