//! Per-session state store.
//!
//! The [`SessionStore`] is what the presentation layer holds. It publishes
//! one [`Resource`] slot per tracked resource and drives the [`Gateway`] in
//! response to user events. Every tracked operation follows the same
//! sequence:
//!
//! 1. publish `Loading` on the operation's slot;
//! 2. await the gateway;
//! 3. publish the gateway's result verbatim;
//! 4. on success, update the matching cache entry.
//!
//! Slots are independent. A second call on a slot that is still in flight is
//! not cancelled or serialised; whichever call finishes last wins.
//!
//! Account-scoped calls are tied to the session they started in. Signing
//! out, or a successful login or registration, starts a new session; a call
//! from an earlier session that resolves afterwards is returned to its caller
//! but never published, cached or persisted.

mod slot;

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use mockable::Clock;
use tokio::sync::{Mutex, watch};
use tracing::{debug, warn};

use self::slot::Slot;
use super::ports::{ProfileSnapshotError, ProfileSnapshotStore};
use super::{
    CachePolicy, CacheTable, CachedResource, Credentials, Error, Gateway, Item, ItemId, ItemKind,
    Profile, Resource, Secret,
};

struct Slots {
    login: Slot<()>,
    signup: Slot<()>,
    sign_out: Slot<()>,
    profile: Slot<Profile>,
    edit_profile: Slot<()>,
    lost_list: Slot<Vec<Item>>,
    found_list: Slot<Vec<Item>>,
    report_lost: Slot<()>,
    report_found: Slot<()>,
    item: Slot<Item>,
    update_item: Slot<()>,
    auth: Slot<bool>,
}

impl Slots {
    fn new() -> Self {
        Self {
            login: Slot::new(),
            signup: Slot::new(),
            sign_out: Slot::new(),
            profile: Slot::new(),
            edit_profile: Slot::new(),
            lost_list: Slot::new(),
            found_list: Slot::new(),
            report_lost: Slot::new(),
            report_found: Slot::new(),
            item: Slot::new(),
            update_item: Slot::new(),
            auth: Slot::new(),
        }
    }

    fn list(&self, kind: ItemKind) -> &Slot<Vec<Item>> {
        match kind {
            ItemKind::Lost => &self.lost_list,
            ItemKind::Found => &self.found_list,
        }
    }

    fn report(&self, kind: ItemKind) -> &Slot<()> {
        match kind {
            ItemKind::Lost => &self.report_lost,
            ItemKind::Found => &self.report_found,
        }
    }

    /// Forget data fetched or written in an earlier session.
    fn reset_session_data(&self) {
        self.profile.reset();
        self.edit_profile.reset();
        self.lost_list.reset();
        self.found_list.reset();
        self.report_lost.reset();
        self.report_found.reset();
        self.item.reset();
        self.update_item.reset();
    }

    /// Forget everything tied to the previous account.
    fn reset_account_scoped(&self) {
        self.login.reset();
        self.signup.reset();
        self.auth.reset();
        self.reset_session_data();
    }
}

async fn resolve<T, Fut>(slot: &Slot<T>, operation: &'static str, call: Fut) -> Resource<T>
where
    Fut: Future<Output = Result<T, Error>>,
{
    slot.set(Resource::Loading);
    debug!(operation, "operation started");
    let result = call.await;
    match &result {
        Ok(_) => debug!(operation, "operation succeeded"),
        Err(err) => warn!(operation, code = ?err.code(), error = %err, "operation failed"),
    }
    Resource::from(result)
}

async fn track<T, Fut>(slot: &Slot<T>, operation: &'static str, call: Fut) -> Resource<T>
where
    T: Clone,
    Fut: Future<Output = Result<T, Error>>,
{
    let outcome = resolve(slot, operation, call).await;
    slot.set(outcome.clone());
    outcome
}

/// Generation counter for the signed-in session.
#[derive(Debug, Default)]
struct SessionEpoch(AtomicU64);

impl SessionEpoch {
    fn current(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }

    /// Start a new generation and return it.
    fn advance(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, epoch: u64) -> bool {
        self.current() == epoch
    }
}

/// State holder mediating between the presentation layer and the gateway.
///
/// # Examples
/// ```rust
/// # use std::sync::Arc;
/// # use lostfound::domain::{CachePolicy, RemoteGateway, SessionStore};
/// # use lostfound::outbound::memory::{
/// #     InMemoryAccountService, InMemoryDocumentStore, InMemoryLiveViewStore,
/// #     InMemoryProfileSnapshotStore,
/// # };
/// # use mockable::DefaultClock;
/// let gateway = RemoteGateway::new(
///     Arc::new(InMemoryAccountService::default()),
///     Arc::new(InMemoryDocumentStore::default()),
///     Arc::new(InMemoryLiveViewStore::default()),
/// );
/// let store = SessionStore::new(
///     Arc::new(gateway),
///     Arc::new(InMemoryProfileSnapshotStore::default()),
///     CachePolicy::default(),
///     Arc::new(DefaultClock),
/// );
/// assert!(store.lost_list_state().borrow().is_idle());
/// ```
pub struct SessionStore<G> {
    gateway: Arc<G>,
    snapshots: Arc<dyn ProfileSnapshotStore>,
    cache: CacheTable,
    slots: Slots,
    epoch: SessionEpoch,
    snapshot_io: Mutex<()>,
}

impl<G> SessionStore<G> {
    /// Build a store with every slot `Idle` and every cache entry unloaded.
    pub fn new(
        gateway: Arc<G>,
        snapshots: Arc<dyn ProfileSnapshotStore>,
        policy: CachePolicy,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            gateway,
            snapshots,
            cache: CacheTable::new(policy, clock),
            slots: Slots::new(),
            epoch: SessionEpoch::default(),
            snapshot_io: Mutex::new(()),
        }
    }

    /// Cache bookkeeping, exposed for diagnostics.
    pub fn cache(&self) -> &CacheTable {
        &self.cache
    }

    /// Login outcome.
    pub fn login_state(&self) -> watch::Receiver<Resource<()>> {
        self.slots.login.subscribe()
    }

    /// Signup outcome.
    pub fn signup_state(&self) -> watch::Receiver<Resource<()>> {
        self.slots.signup.subscribe()
    }

    /// Sign-out outcome.
    pub fn sign_out_state(&self) -> watch::Receiver<Resource<()>> {
        self.slots.sign_out.subscribe()
    }

    /// Signed-in user's profile.
    pub fn profile_state(&self) -> watch::Receiver<Resource<Profile>> {
        self.slots.profile.subscribe()
    }

    /// Profile edit outcome.
    pub fn edit_profile_state(&self) -> watch::Receiver<Resource<()>> {
        self.slots.edit_profile.subscribe()
    }

    /// Lost-items list.
    pub fn lost_list_state(&self) -> watch::Receiver<Resource<Vec<Item>>> {
        self.slots.lost_list.subscribe()
    }

    /// Found-items list.
    pub fn found_list_state(&self) -> watch::Receiver<Resource<Vec<Item>>> {
        self.slots.found_list.subscribe()
    }

    /// List for either kind.
    pub fn list_state(&self, kind: ItemKind) -> watch::Receiver<Resource<Vec<Item>>> {
        self.slots.list(kind).subscribe()
    }

    /// Outcome of the last report of this kind.
    pub fn report_state(&self, kind: ItemKind) -> watch::Receiver<Resource<()>> {
        self.slots.report(kind).subscribe()
    }

    /// Single item opened in the detail view.
    pub fn item_state(&self) -> watch::Receiver<Resource<Item>> {
        self.slots.item.subscribe()
    }

    /// Item update outcome.
    pub fn update_item_state(&self) -> watch::Receiver<Resource<()>> {
        self.slots.update_item.subscribe()
    }

    /// Session check outcome.
    pub fn auth_state(&self) -> watch::Receiver<Resource<bool>> {
        self.slots.auth.subscribe()
    }

    /// Return a report slot to `Idle` once its outcome has been shown.
    pub fn reset_report_state(&self, kind: ItemKind) {
        self.slots.report(kind).reset();
    }

    /// Return the sign-out slot to `Idle` once its outcome has been shown.
    pub fn reset_sign_out_state(&self) {
        self.slots.sign_out.reset();
    }

    /// Last locally persisted profile, for painting before the first fetch.
    pub fn cached_profile(&self) -> Result<Option<Profile>, Error> {
        Ok(self.snapshots.load()?)
    }

    /// Run snapshot IO on the blocking pool; adapters may touch the disk.
    ///
    /// IO is serialised, and a save is dropped once its session has ended, so
    /// a stale save never lands after a later clear.
    async fn run_snapshot_io<F>(&self, operation: &'static str, epoch: Option<u64>, io: F)
    where
        F: FnOnce(&dyn ProfileSnapshotStore) -> Result<(), ProfileSnapshotError> + Send + 'static,
    {
        let _guard = self.snapshot_io.lock().await;
        if epoch.is_some_and(|epoch| !self.epoch.is_current(epoch)) {
            debug!(operation, "session ended; snapshot left untouched");
            return;
        }
        let snapshots = Arc::clone(&self.snapshots);
        match tokio::task::spawn_blocking(move || io(snapshots.as_ref())).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => warn!(operation, error = %err, "profile snapshot io failed"),
            Err(err) => warn!(operation, error = %err, "profile snapshot task failed"),
        }
    }

    async fn save_snapshot(&self, epoch: u64, profile: &Profile) {
        let profile = profile.clone();
        self.run_snapshot_io("save_snapshot", Some(epoch), move |snapshots| {
            snapshots.save(&profile)
        })
        .await;
    }

    async fn clear_snapshot(&self) {
        self.run_snapshot_io("clear_snapshot", None, |snapshots| snapshots.clear())
            .await;
    }

    /// Start a new session: earlier calls can no longer publish, and nothing
    /// cached for the previous account survives.
    async fn begin_session(&self) -> u64 {
        let epoch = self.epoch.advance();
        self.cache.clear_all();
        self.slots.reset_session_data();
        self.clear_snapshot().await;
        epoch
    }

    /// Publish `call`'s result only if no new session started meanwhile.
    async fn track_in_session<T, Fut>(
        &self,
        epoch: u64,
        slot: &Slot<T>,
        operation: &'static str,
        call: Fut,
    ) -> Resource<T>
    where
        T: Clone,
        Fut: Future<Output = Result<T, Error>>,
    {
        let outcome = resolve(slot, operation, call).await;
        if self.epoch.is_current(epoch) {
            slot.set(outcome.clone());
        } else {
            debug!(operation, "session ended before the call resolved; result discarded");
        }
        outcome
    }
}

impl<G> SessionStore<G>
where
    G: Gateway,
{
    /// Whether a session is active, from local state.
    pub fn is_authenticated(&self) -> bool {
        self.gateway.current_identity().is_some()
    }

    /// Identity of the active session.
    pub fn current_identity(&self) -> Option<String> {
        self.gateway.current_identity()
    }

    /// Sign in. A successful login starts a new session, so nothing from an
    /// earlier account is served, published or persisted.
    pub async fn login(&self, credentials: &Credentials) -> Resource<()> {
        let outcome = track(
            &self.slots.login,
            "login",
            self.gateway.authenticate(credentials),
        )
        .await;
        if outcome.is_success() {
            self.begin_session().await;
        }
        outcome
    }

    /// Create an account and its profile record.
    pub async fn register(&self, profile: &Profile, secret: &Secret) -> Resource<()> {
        let outcome = track(
            &self.slots.signup,
            "register",
            self.gateway.register(profile, secret),
        )
        .await;
        if outcome.is_success() {
            let epoch = self.begin_session().await;
            self.save_snapshot(epoch, profile).await;
        }
        outcome
    }

    /// End the session and forget every account-scoped value.
    ///
    /// Cache entries are cleared whatever the gateway returns, and the
    /// account-scoped slots go back to `Idle`; only the sign-out slot keeps
    /// its outcome.
    pub async fn sign_out(&self) -> Resource<()> {
        let outcome = track(&self.slots.sign_out, "sign_out", self.gateway.end_session()).await;
        self.epoch.advance();
        self.cache.clear_all();
        self.slots.reset_account_scoped();
        self.clear_snapshot().await;
        outcome
    }

    /// Upsert the profile record.
    pub async fn edit_profile(&self, profile: &Profile) -> Resource<()> {
        let epoch = self.epoch.current();
        let outcome = self
            .track_in_session(
                epoch,
                &self.slots.edit_profile,
                "edit_profile",
                self.gateway.write_profile(profile),
            )
            .await;
        if outcome.is_success() && self.epoch.is_current(epoch) {
            self.cache.invalidate(CachedResource::Profile);
            self.save_snapshot(epoch, profile).await;
        }
        outcome
    }

    /// Returns the outcome and, when the gateway was called, the session it
    /// was called in.
    async fn fetch_cached<T, F, Fut>(
        &self,
        resource: CachedResource,
        slot: &Slot<T>,
        force_refresh: bool,
        call: F,
    ) -> (Resource<T>, Option<u64>)
    where
        T: Clone,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, Error>>,
    {
        if !self.cache.should_fetch(resource, force_refresh) {
            debug!(%resource, "served from cache");
            return (slot.current(), None);
        }
        let epoch = self.epoch.current();
        let outcome = self
            .track_in_session(epoch, slot, resource.as_str(), call())
            .await;
        if outcome.is_success() && self.epoch.is_current(epoch) {
            self.cache.record_success(resource);
        }
        (outcome, Some(epoch))
    }

    /// Fetch the signed-in profile unless the cached copy is fresh.
    pub async fn fetch_profile(&self, force_refresh: bool) -> Resource<Profile> {
        let (outcome, epoch) = self
            .fetch_cached(
                CachedResource::Profile,
                &self.slots.profile,
                force_refresh,
                || self.gateway.read_profile(),
            )
            .await;
        if let (Resource::Success(profile), Some(epoch)) = (&outcome, epoch) {
            self.save_snapshot(epoch, profile).await;
        }
        outcome
    }

    /// Fetch one item list unless the cached copy is fresh.
    pub async fn fetch_items(&self, kind: ItemKind, force_refresh: bool) -> Resource<Vec<Item>> {
        let (outcome, _) = self
            .fetch_cached(
                CachedResource::list_for(kind),
                self.slots.list(kind),
                force_refresh,
                || self.gateway.list_items(kind),
            )
            .await;
        outcome
    }

    /// Fetch the lost list unless the cached copy is fresh.
    pub async fn fetch_lost_items(&self, force_refresh: bool) -> Resource<Vec<Item>> {
        self.fetch_items(ItemKind::Lost, force_refresh).await
    }

    /// Fetch the found list unless the cached copy is fresh.
    pub async fn fetch_found_items(&self, force_refresh: bool) -> Resource<Vec<Item>> {
        self.fetch_items(ItemKind::Found, force_refresh).await
    }

    /// Refetch every cached resource concurrently, bypassing the cache.
    pub async fn refresh_all(&self) {
        tokio::join!(
            self.fetch_profile(true),
            self.fetch_lost_items(true),
            self.fetch_found_items(true),
        );
    }

    /// Report a lost or found item on the board matching its kind.
    pub async fn report_item(&self, item: &Item) -> Resource<()> {
        let kind = item.kind;
        let epoch = self.epoch.current();
        let outcome = self
            .track_in_session(
                epoch,
                self.slots.report(kind),
                "report_item",
                self.gateway.create_item(kind, item),
            )
            .await;
        if outcome.is_success() && self.epoch.is_current(epoch) {
            self.cache.invalidate(CachedResource::list_for(kind));
        }
        outcome
    }

    /// Open one item; `kind` is raw caller input.
    pub async fn get_item(&self, id: &ItemId, kind: &str) -> Resource<Item> {
        let epoch = self.epoch.current();
        self.track_in_session(
            epoch,
            &self.slots.item,
            "get_item",
            self.gateway.get_item(id, kind),
        )
        .await
    }

    /// Rewrite an existing item, e.g. to mark it claimed.
    pub async fn update_item(&self, id: &ItemId, kind: ItemKind, record: &Item) -> Resource<()> {
        let epoch = self.epoch.current();
        let outcome = self
            .track_in_session(
                epoch,
                &self.slots.update_item,
                "update_item",
                self.gateway.update_item(id, kind, record),
            )
            .await;
        if outcome.is_success() && self.epoch.is_current(epoch) {
            self.cache.invalidate(CachedResource::list_for(kind));
        }
        outcome
    }

    /// Check whether a session survives from an earlier launch.
    pub async fn check_session(&self) -> Resource<bool> {
        track(&self.slots.auth, "check_session", self.gateway.check_session()).await
    }
}
