//! Domain primitives, the gateway façade and the session state store.
//!
//! Purpose: define the strongly typed values the client works with, the
//! ports it drives, and the state machine the presentation layer observes.
//!
//! Public surface:
//! - Resource: `Idle`/`Loading`/`Success`/`Error` wrapper published per slot.
//! - Error and ErrorCode: the failure value every operation resolves to.
//! - Item, ItemId, ItemKind, ItemStatus and Profile: remote records.
//! - Gateway and RemoteGateway: one call sequence per remote operation.
//! - CachePolicy and CacheTable: TTL-based freshness bookkeeping.
//! - SessionStore: slots, cached fetches and session lifecycle.

pub mod cache;
pub mod credentials;
pub mod error;
pub mod gateway;
pub mod item;
pub mod ports;
pub mod profile;
pub mod resource;
pub mod store;

pub use self::cache::{
    CacheEntry, CacheEntryState, CachePolicy, CacheTable, CachedResource, DEFAULT_CACHE_TTL,
};
pub use self::credentials::{Credentials, CredentialsValidationError, Secret};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
#[cfg(test)]
pub use self::gateway::MockGateway;
pub use self::gateway::{Gateway, RemoteGateway};
pub use self::item::{Item, ItemId, ItemKind, ItemStatus, ItemValidationError, LiveProjection};
pub use self::profile::{Profile, ProfileValidationError};
pub use self::resource::Resource;
pub use self::store::SessionStore;
