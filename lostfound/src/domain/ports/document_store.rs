//! Driven port for the durable document store.
//!
//! Documents live in named collections keyed by id. The store speaks raw
//! JSON values; typed (de)serialisation happens in the gateway.

use async_trait::async_trait;
use serde_json::Value;

use super::define_port_error;

define_port_error! {
    /// Errors raised by document store adapters.
    pub enum DocumentStoreError for "document store" {
        /// Reading a document or collection failed.
        Read { message: String } => "read failed: {message}",
        /// Writing a document failed.
        Write { message: String } => "write failed: {message}",
        /// The caller lacks permission for the collection.
        PermissionDenied { collection: String } => "permission denied for {collection}",
    }
}

/// Port for keyed document collections.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch one document, or `None` when the id is absent.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, DocumentStoreError>;

    /// Create or overwrite one document.
    async fn set(&self, collection: &str, id: &str, document: Value)
    -> Result<(), DocumentStoreError>;

    /// Fetch every document in a collection.
    async fn list(&self, collection: &str) -> Result<Vec<Value>, DocumentStoreError>;
}
