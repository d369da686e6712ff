//! Domain ports describing the remote services the gateway drives.
//!
//! Each trait exposes a strongly typed error so adapters map their failures
//! into predictable variants; every port error folds into a
//! [`RemoteFailure`](crate::domain::ErrorCode::RemoteFailure) domain error.

mod macros;
pub(crate) use macros::define_port_error;

mod account_service;
mod document_store;
mod live_view_store;
mod profile_snapshot_store;

#[cfg(test)]
pub use account_service::MockAccountService;
pub use account_service::{AccountService, AccountServiceError};
#[cfg(test)]
pub use document_store::MockDocumentStore;
pub use document_store::{DocumentStore, DocumentStoreError};
#[cfg(test)]
pub use live_view_store::MockLiveViewStore;
pub use live_view_store::{LiveViewError, LiveViewStore};
#[cfg(test)]
pub use profile_snapshot_store::MockProfileSnapshotStore;
pub use profile_snapshot_store::{ProfileSnapshotError, ProfileSnapshotStore};

/// Collection holding profile documents keyed by email.
pub const PROFILE_COLLECTION: &str = "User";
