//! Driven port for the remote account/identity service.
//!
//! The account service owns session state. Sign-in, account creation and
//! sign-out go over the network; asking who is signed in is answered from
//! the service's locally held session and never blocks.

use async_trait::async_trait;

use crate::domain::Credentials;

use super::define_port_error;

define_port_error! {
    /// Errors raised by account service adapters.
    pub enum AccountServiceError for "account service" {
        /// The service refused the credentials or the request.
        Rejected { message: String } => "request rejected: {message}",
        /// An account with this identity already exists.
        AlreadyExists { identity: String } => "account already exists: {identity}",
        /// The service could not be reached.
        Unavailable { message: String } => "service unavailable: {message}",
    }
}

/// Port for account lifecycle and session queries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Start a session for existing credentials.
    async fn sign_in(&self, credentials: &Credentials) -> Result<(), AccountServiceError>;

    /// Create an account and start a session for it.
    async fn create_account(&self, credentials: &Credentials) -> Result<(), AccountServiceError>;

    /// End the active session, if any.
    async fn sign_out(&self) -> Result<(), AccountServiceError>;

    /// Identity of the active session, from local state.
    fn current_identity(&self) -> Option<String>;
}
