//! Driven port for the locally persisted profile snapshot.
//!
//! The snapshot lets the presentation layer paint the last known profile
//! before the first remote fetch completes. It is local and synchronous;
//! adapters may block on disk IO, so the session store calls `save` and
//! `clear` from the blocking thread pool.

use crate::domain::Profile;

use super::define_port_error;

define_port_error! {
    /// Errors raised by snapshot adapters.
    pub enum ProfileSnapshotError for "profile snapshot" {
        /// Local storage could not be read or written.
        Io { message: String } => "snapshot io failed: {message}",
        /// Stored bytes were not a valid profile.
        Corrupt { message: String } => "snapshot is corrupt: {message}",
    }
}

/// Port for the cached copy of the signed-in profile.
#[cfg_attr(test, mockall::automock)]
pub trait ProfileSnapshotStore: Send + Sync {
    /// Load the stored snapshot, if one exists.
    fn load(&self) -> Result<Option<Profile>, ProfileSnapshotError>;

    /// Replace the stored snapshot.
    fn save(&self, profile: &Profile) -> Result<(), ProfileSnapshotError>;

    /// Remove the stored snapshot; succeeds when none exists.
    fn clear(&self) -> Result<(), ProfileSnapshotError>;
}
