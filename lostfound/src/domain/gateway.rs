//! Remote data gateway.
//!
//! [`Gateway`] is the façade the state store talks to. Each operation maps
//! onto one sequence of calls against the driven ports and resolves to a
//! domain [`Error`] on failure; adapter errors never cross this boundary
//! unconverted. [`RemoteGateway`] is the production implementation and
//! holds nothing but handles to its ports.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use super::ports::{AccountService, DocumentStore, LiveViewStore, PROFILE_COLLECTION};
use super::{Credentials, Error, Item, ItemId, ItemKind, Profile, Secret};

/// Domain façade over the account service and document stores.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Start a session for existing credentials.
    async fn authenticate(&self, credentials: &Credentials) -> Result<(), Error>;

    /// Create the account, then write its profile record.
    ///
    /// A profile write failure after the account was created still fails the
    /// whole operation; the account is left in place.
    async fn register(&self, profile: &Profile, secret: &Secret) -> Result<(), Error>;

    /// End the active session.
    async fn end_session(&self) -> Result<(), Error>;

    /// Upsert a profile record keyed by its email.
    async fn write_profile(&self, profile: &Profile) -> Result<(), Error>;

    /// Read the profile of the signed-in account.
    async fn read_profile(&self) -> Result<Profile, Error>;

    /// Write a new item record and mirror its live projection.
    async fn create_item(&self, kind: ItemKind, item: &Item) -> Result<(), Error>;

    /// List every record of one kind.
    async fn list_items(&self, kind: ItemKind) -> Result<Vec<Item>, Error>;

    /// Fetch one record; `kind` is raw caller input.
    async fn get_item(&self, id: &ItemId, kind: &str) -> Result<Item, Error>;

    /// Overwrite an existing record and re-mirror it; missing ids are a no-op.
    async fn update_item(&self, id: &ItemId, kind: ItemKind, record: &Item) -> Result<(), Error>;

    /// Whether a session is active, answered from local session state.
    async fn check_session(&self) -> Result<bool, Error>;

    /// Identity of the active session, if any.
    fn current_identity(&self) -> Option<String>;
}

/// [`Gateway`] backed by an account service, a document store and a
/// live-view store.
pub struct RemoteGateway<A, D, L> {
    accounts: Arc<A>,
    documents: Arc<D>,
    live_view: Arc<L>,
}

impl<A, D, L> Clone for RemoteGateway<A, D, L> {
    fn clone(&self) -> Self {
        Self {
            accounts: Arc::clone(&self.accounts),
            documents: Arc::clone(&self.documents),
            live_view: Arc::clone(&self.live_view),
        }
    }
}

impl<A, D, L> RemoteGateway<A, D, L> {
    /// Wire the gateway to its ports.
    ///
    /// ```rust
    /// # use std::sync::Arc;
    /// # use lostfound::domain::RemoteGateway;
    /// # use lostfound::outbound::memory::{
    /// #     InMemoryAccountService, InMemoryDocumentStore, InMemoryLiveViewStore,
    /// # };
    /// let gateway = RemoteGateway::new(
    ///     Arc::new(InMemoryAccountService::default()),
    ///     Arc::new(InMemoryDocumentStore::default()),
    ///     Arc::new(InMemoryLiveViewStore::default()),
    /// );
    /// # let _ = gateway;
    /// ```
    pub fn new(accounts: Arc<A>, documents: Arc<D>, live_view: Arc<L>) -> Self {
        Self {
            accounts,
            documents,
            live_view,
        }
    }
}

fn encode<T: Serialize>(value: &T, what: &str) -> Result<Value, Error> {
    serde_json::to_value(value)
        .map_err(|err| Error::invalid_argument(format!("failed to encode {what}: {err}")))
}

fn decode<T: DeserializeOwned>(value: Value, what: &str) -> Result<T, Error> {
    serde_json::from_value(value)
        .map_err(|err| Error::remote(format!("malformed {what} document: {err}")))
}

fn ensure_kind(expected: ItemKind, item: &Item) -> Result<(), Error> {
    if item.kind == expected {
        Ok(())
    } else {
        Err(Error::invalid_argument(format!(
            "item {} is {} but was submitted as {expected}",
            item.id, item.kind
        )))
    }
}

impl<A, D, L> RemoteGateway<A, D, L>
where
    A: AccountService,
    D: DocumentStore,
    L: LiveViewStore,
{
    /// Write the record and its projection. Both writes are always attempted;
    /// the first failure wins.
    async fn write_item_and_projection(&self, kind: ItemKind, item: &Item) -> Result<(), Error> {
        let document = encode(item, "item")?;
        let record = self
            .documents
            .set(kind.collection(), item.id.as_str(), document)
            .await;
        let mirror = self
            .live_view
            .set(kind.live_path(), &item.id, &item.projection())
            .await;

        match (record, mirror) {
            (Ok(()), Ok(())) => Ok(()),
            (Err(err), mirror) => {
                if let Err(mirror_err) = mirror {
                    debug!(item_id = %item.id, error = %mirror_err, "projection write also failed");
                }
                Err(err.into())
            }
            (Ok(()), Err(err)) => Err(err.into()),
        }
    }
}

#[async_trait]
impl<A, D, L> Gateway for RemoteGateway<A, D, L>
where
    A: AccountService,
    D: DocumentStore,
    L: LiveViewStore,
{
    async fn authenticate(&self, credentials: &Credentials) -> Result<(), Error> {
        self.accounts.sign_in(credentials).await?;
        Ok(())
    }

    async fn register(&self, profile: &Profile, secret: &Secret) -> Result<(), Error> {
        profile.validate()?;
        let credentials = Credentials::try_from_parts(&profile.email, secret.expose())?;
        self.accounts.create_account(&credentials).await?;

        if let Err(err) = self.write_profile(profile).await {
            warn!(
                identity = credentials.identity(),
                error = %err,
                "account created but profile write failed; account has no profile"
            );
            return Err(err);
        }
        Ok(())
    }

    async fn end_session(&self) -> Result<(), Error> {
        self.accounts.sign_out().await?;
        Ok(())
    }

    async fn write_profile(&self, profile: &Profile) -> Result<(), Error> {
        profile.validate()?;
        let document = encode(profile, "profile")?;
        self.documents
            .set(PROFILE_COLLECTION, profile.key(), document)
            .await?;
        Ok(())
    }

    async fn read_profile(&self) -> Result<Profile, Error> {
        let Some(identity) = self.accounts.current_identity() else {
            return Err(Error::not_authenticated("user not logged in"));
        };
        let document = self
            .documents
            .get(PROFILE_COLLECTION, &identity)
            .await?
            .ok_or_else(|| Error::not_found(format!("no profile for {identity}")))?;
        decode(document, "profile")
    }

    async fn create_item(&self, kind: ItemKind, item: &Item) -> Result<(), Error> {
        ensure_kind(kind, item)?;
        self.write_item_and_projection(kind, item).await
    }

    async fn list_items(&self, kind: ItemKind) -> Result<Vec<Item>, Error> {
        let documents = self.documents.list(kind.collection()).await?;
        let items = documents
            .into_iter()
            .filter_map(|document| match decode::<Item>(document, "item") {
                Ok(item) => Some(item),
                Err(err) => {
                    warn!(collection = kind.collection(), error = %err, "skipping malformed item");
                    None
                }
            })
            .collect();
        Ok(items)
    }

    async fn get_item(&self, id: &ItemId, kind: &str) -> Result<Item, Error> {
        let kind = ItemKind::parse(kind)?;
        let document = self
            .documents
            .get(kind.collection(), id.as_str())
            .await?
            .ok_or_else(|| Error::not_found(format!("item {id} not found")))?;
        decode(document, "item")
    }

    async fn update_item(&self, id: &ItemId, kind: ItemKind, record: &Item) -> Result<(), Error> {
        ensure_kind(kind, record)?;
        if &record.id != id {
            return Err(Error::invalid_argument(format!(
                "record id {} does not match target id {id}",
                record.id
            )));
        }

        let existing = self.documents.get(kind.collection(), id.as_str()).await?;
        if existing.is_none() {
            debug!(item_id = %id, %kind, "update skipped; item does not exist");
            return Ok(());
        }
        self.write_item_and_projection(kind, record).await
    }

    async fn check_session(&self) -> Result<bool, Error> {
        Ok(self.accounts.current_identity().is_some())
    }

    fn current_identity(&self) -> Option<String> {
        self.accounts.current_identity()
    }
}

#[cfg(test)]
#[path = "gateway_tests.rs"]
mod tests;
