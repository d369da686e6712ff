//! Driven port for the low-latency live-view store.
//!
//! List and summary screens read reduced projections from here; the full
//! record stays in the document store under the same id.

use async_trait::async_trait;

use crate::domain::{ItemId, LiveProjection};

use super::define_port_error;

define_port_error! {
    /// Errors raised by live-view adapters.
    pub enum LiveViewError for "live view" {
        /// Writing the projection failed.
        Write { message: String } => "projection write failed: {message}",
    }
}

/// Port for mirrored item projections.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LiveViewStore: Send + Sync {
    /// Create or overwrite the projection at `path/id`.
    async fn set(
        &self,
        path: &str,
        id: &ItemId,
        projection: &LiveProjection,
    ) -> Result<(), LiveViewError>;
}
