//! In-process adapters for every driven port.
//!
//! These back the demo binary and the integration suites. Each adapter keeps
//! its state behind a mutex, counts the remote calls it serves, and can be
//! told to fail its next call so error paths are reachable without a network.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;
use zeroize::Zeroizing;

use crate::domain::ports::{
    AccountService, AccountServiceError, DocumentStore, DocumentStoreError, LiveViewError,
    LiveViewStore, ProfileSnapshotError, ProfileSnapshotStore,
};
use crate::domain::{Credentials, ItemId, LiveProjection, Profile};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn take_fault<E>(slot: &Mutex<Option<E>>) -> Result<(), E> {
    match lock(slot).take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Account service holding accounts and the active session in memory.
#[derive(Default)]
pub struct InMemoryAccountService {
    accounts: Mutex<HashMap<String, Zeroizing<String>>>,
    session: Mutex<Option<String>>,
    fault: Mutex<Option<AccountServiceError>>,
    calls: AtomicUsize,
}

impl InMemoryAccountService {
    /// Start with a session already active, as after an earlier launch.
    pub fn with_session(identity: impl Into<String>) -> Self {
        let service = Self::default();
        *lock(&service.session) = Some(identity.into());
        service
    }

    /// Fail the next sign-in, account creation or sign-out with `err`.
    pub fn fail_next(&self, err: AccountServiceError) {
        *lock(&self.fault) = Some(err);
    }

    /// Whether an account exists for `identity`.
    pub fn has_account(&self, identity: &str) -> bool {
        lock(&self.accounts).contains_key(identity)
    }

    /// Remote calls served so far, failed ones included.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn begin_call(&self) -> Result<(), AccountServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        take_fault(&self.fault)
    }
}

#[async_trait]
impl AccountService for InMemoryAccountService {
    async fn sign_in(&self, credentials: &Credentials) -> Result<(), AccountServiceError> {
        self.begin_call()?;
        let accounts = lock(&self.accounts);
        match accounts.get(credentials.identity()) {
            Some(secret) if secret.as_str() == credentials.secret().expose() => {
                *lock(&self.session) = Some(credentials.identity().to_owned());
                Ok(())
            }
            _ => Err(AccountServiceError::rejected("invalid credentials")),
        }
    }

    async fn create_account(&self, credentials: &Credentials) -> Result<(), AccountServiceError> {
        self.begin_call()?;
        let mut accounts = lock(&self.accounts);
        let identity = credentials.identity();
        if accounts.contains_key(identity) {
            return Err(AccountServiceError::already_exists(identity));
        }
        accounts.insert(
            identity.to_owned(),
            Zeroizing::new(credentials.secret().expose().to_owned()),
        );
        *lock(&self.session) = Some(identity.to_owned());
        debug!(identity, "account created");
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), AccountServiceError> {
        self.begin_call()?;
        lock(&self.session).take();
        Ok(())
    }

    fn current_identity(&self) -> Option<String> {
        lock(&self.session).clone()
    }
}

/// Document store keeping collections as ordered maps.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    collections: Mutex<BTreeMap<String, BTreeMap<String, Value>>>,
    read_fault: Mutex<Option<DocumentStoreError>>,
    write_fault: Mutex<Option<DocumentStoreError>>,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl InMemoryDocumentStore {
    /// Store `document` directly, bypassing fault injection and counters.
    pub fn seed(&self, collection: &str, id: &str, document: Value) {
        lock(&self.collections)
            .entry(collection.to_owned())
            .or_default()
            .insert(id.to_owned(), document);
    }

    /// Current contents of one document.
    pub fn document(&self, collection: &str, id: &str) -> Option<Value> {
        lock(&self.collections)
            .get(collection)
            .and_then(|documents| documents.get(id))
            .cloned()
    }

    /// Number of documents in a collection.
    pub fn len(&self, collection: &str) -> usize {
        lock(&self.collections)
            .get(collection)
            .map_or(0, BTreeMap::len)
    }

    /// Whether a collection holds no documents.
    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }

    /// Fail the next `get` or `list` with a read error.
    pub fn fail_next_read(&self, message: impl Into<String>) {
        *lock(&self.read_fault) = Some(DocumentStoreError::read(message));
    }

    /// Fail the next `set` with a write error.
    pub fn fail_next_write(&self, message: impl Into<String>) {
        *lock(&self.write_fault) = Some(DocumentStoreError::write(message));
    }

    /// Reads served so far.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Writes served so far.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, DocumentStoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        take_fault(&self.read_fault)?;
        Ok(self.document(collection, id))
    }

    async fn set(
        &self,
        collection: &str,
        id: &str,
        document: Value,
    ) -> Result<(), DocumentStoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        take_fault(&self.write_fault)?;
        self.seed(collection, id, document);
        Ok(())
    }

    async fn list(&self, collection: &str) -> Result<Vec<Value>, DocumentStoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        take_fault(&self.read_fault)?;
        Ok(lock(&self.collections)
            .get(collection)
            .map(|documents| documents.values().cloned().collect())
            .unwrap_or_default())
    }
}

/// Live-view store keeping projections keyed by path and id.
#[derive(Debug, Default)]
pub struct InMemoryLiveViewStore {
    projections: Mutex<BTreeMap<(String, String), LiveProjection>>,
    fault: Mutex<Option<LiveViewError>>,
    writes: AtomicUsize,
}

impl InMemoryLiveViewStore {
    /// Projection stored at `path/id`.
    pub fn projection(&self, path: &str, id: &ItemId) -> Option<LiveProjection> {
        lock(&self.projections)
            .get(&(path.to_owned(), id.as_str().to_owned()))
            .cloned()
    }

    /// Fail the next write.
    pub fn fail_next_write(&self, message: impl Into<String>) {
        *lock(&self.fault) = Some(LiveViewError::write(message));
    }

    /// Writes served so far.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LiveViewStore for InMemoryLiveViewStore {
    async fn set(
        &self,
        path: &str,
        id: &ItemId,
        projection: &LiveProjection,
    ) -> Result<(), LiveViewError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        take_fault(&self.fault)?;
        lock(&self.projections).insert(
            (path.to_owned(), id.as_str().to_owned()),
            projection.clone(),
        );
        Ok(())
    }
}

/// Profile snapshot held in memory for the life of the process.
#[derive(Debug, Default)]
pub struct InMemoryProfileSnapshotStore {
    profile: Mutex<Option<Profile>>,
}

impl InMemoryProfileSnapshotStore {
    /// Stored snapshot, if any.
    pub fn current(&self) -> Option<Profile> {
        lock(&self.profile).clone()
    }
}

impl ProfileSnapshotStore for InMemoryProfileSnapshotStore {
    fn load(&self) -> Result<Option<Profile>, ProfileSnapshotError> {
        Ok(self.current())
    }

    fn save(&self, profile: &Profile) -> Result<(), ProfileSnapshotError> {
        *lock(&self.profile) = Some(profile.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), ProfileSnapshotError> {
        lock(&self.profile).take();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Item, ItemKind};
    use rstest::rstest;
    use serde_json::json;

    fn credentials(secret: &str) -> Credentials {
        Credentials::try_from_parts("ada@campus.edu", secret).expect("valid credentials")
    }

    #[rstest]
    #[tokio::test]
    async fn create_account_starts_a_session_and_rejects_duplicates() {
        let service = InMemoryAccountService::default();
        service
            .create_account(&credentials("hunter22"))
            .await
            .expect("account created");
        assert_eq!(service.current_identity().as_deref(), Some("ada@campus.edu"));

        let err = service
            .create_account(&credentials("other"))
            .await
            .expect_err("duplicate rejected");
        assert_eq!(err, AccountServiceError::already_exists("ada@campus.edu"));
    }

    #[rstest]
    #[case("hunter22", true)]
    #[case("wrong", false)]
    #[tokio::test]
    async fn sign_in_checks_the_secret(#[case] secret: &str, #[case] accepted: bool) {
        let service = InMemoryAccountService::default();
        service
            .create_account(&credentials("hunter22"))
            .await
            .expect("account created");
        service.sign_out().await.expect("signed out");

        let result = service.sign_in(&credentials(secret)).await;
        assert_eq!(result.is_ok(), accepted);
        assert_eq!(service.current_identity().is_some(), accepted);
    }

    #[rstest]
    #[tokio::test]
    async fn injected_fault_applies_once() {
        let service = InMemoryAccountService::with_session("ada@campus.edu");
        service.fail_next(AccountServiceError::unavailable("offline"));

        assert!(service.sign_out().await.is_err());
        assert_eq!(service.current_identity().as_deref(), Some("ada@campus.edu"));
        assert!(service.sign_out().await.is_ok());
        assert_eq!(service.current_identity(), None);
        assert_eq!(service.calls(), 2);
    }

    #[rstest]
    #[tokio::test]
    async fn document_store_round_trips_and_counts() {
        let store = InMemoryDocumentStore::default();
        store
            .set("LostItems", "a", json!({"title": "Umbrella"}))
            .await
            .expect("write");
        assert_eq!(
            store.get("LostItems", "a").await.expect("read"),
            Some(json!({"title": "Umbrella"}))
        );
        assert_eq!(store.get("LostItems", "b").await.expect("read"), None);
        assert_eq!(store.list("FoundItems").await.expect("list"), Vec::<Value>::new());
        assert_eq!((store.reads(), store.writes()), (3, 1));
    }

    #[rstest]
    #[tokio::test]
    async fn failed_write_leaves_collection_untouched() {
        let store = InMemoryDocumentStore::default();
        store.fail_next_write("disk full");

        let err = store
            .set("LostItems", "a", json!({}))
            .await
            .expect_err("write fails");
        assert_eq!(err, DocumentStoreError::write("disk full"));
        assert!(store.is_empty("LostItems"));
    }

    #[rstest]
    #[tokio::test]
    async fn live_view_stores_projection_by_path_and_id() {
        let store = InMemoryLiveViewStore::default();
        let item = Item::new(ItemKind::Found, "ada@campus.edu", "Keys", "", "Gym", 0);
        store
            .set(ItemKind::Found.live_path(), &item.id, &item.projection())
            .await
            .expect("write");
        assert_eq!(
            store.projection(ItemKind::Found.live_path(), &item.id),
            Some(item.projection())
        );
        assert_eq!(store.projection(ItemKind::Lost.live_path(), &item.id), None);
    }

    #[rstest]
    fn snapshot_store_saves_and_clears() {
        let store = InMemoryProfileSnapshotStore::default();
        let profile = Profile {
            name: "Ada".to_owned(),
            email: "ada@campus.edu".to_owned(),
            ..Profile::default()
        };
        store.save(&profile).expect("save");
        assert_eq!(store.load().expect("load"), Some(profile));
        store.clear().expect("clear");
        assert_eq!(store.load().expect("load"), None);
    }
}
