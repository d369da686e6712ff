//! Time-based freshness tracking for cached resources.
//!
//! Every independently cached resource has one [`CacheEntry`]: a `loaded`
//! flag and the wall-clock time of the last successful fetch. A fetch is
//! skipped only while the entry is loaded and younger than the policy TTL.
//!
//! Entries are written only by the task that owns the matching fetch and
//! are held in plain atomics.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::time::Duration;

use mockable::Clock;

use super::ItemKind;

/// Default freshness window for cached resources.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Resource kinds that are cached independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CachedResource {
    /// The signed-in user's profile.
    Profile,
    /// The lost-items list.
    LostList,
    /// The found-items list.
    FoundList,
}

impl CachedResource {
    /// Every cached resource.
    pub const ALL: [Self; 3] = [Self::Profile, Self::LostList, Self::FoundList];

    /// List resource for an item kind.
    pub fn list_for(kind: ItemKind) -> Self {
        match kind {
            ItemKind::Lost => Self::LostList,
            ItemKind::Found => Self::FoundList,
        }
    }

    /// Stable name used in log fields.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::LostList => "lost_list",
            Self::FoundList => "found_list",
        }
    }
}

impl fmt::Display for CachedResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed time-to-live applied to every entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    ttl: Duration,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }
}

impl CachePolicy {
    /// Build a policy with the given TTL.
    pub const fn new(ttl: Duration) -> Self {
        Self { ttl }
    }

    /// Configured time-to-live.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn ttl_millis(&self) -> i64 {
        i64::try_from(self.ttl.as_millis()).unwrap_or(i64::MAX)
    }

    /// Whether a fetch must be issued for an entry in `state` at `now_millis`.
    ///
    /// # Examples
    /// ```
    /// use std::time::Duration;
    /// use lostfound::domain::{CacheEntryState, CachePolicy};
    ///
    /// let policy = CachePolicy::new(Duration::from_secs(60));
    /// let state = CacheEntryState { loaded: true, last_fetch_millis: 1_000 };
    /// assert!(!policy.should_fetch(state, 30_000, false));
    /// assert!(policy.should_fetch(state, 61_000, false));
    /// assert!(policy.should_fetch(state, 30_000, true));
    /// ```
    pub fn should_fetch(&self, state: CacheEntryState, now_millis: i64, force_refresh: bool) -> bool {
        if force_refresh || !state.loaded {
            return true;
        }
        now_millis.saturating_sub(state.last_fetch_millis) >= self.ttl_millis()
    }
}

/// Point-in-time copy of a [`CacheEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheEntryState {
    pub loaded: bool,
    pub last_fetch_millis: i64,
}

/// Freshness record for one cached resource.
#[derive(Debug, Default)]
pub struct CacheEntry {
    loaded: AtomicBool,
    last_fetch_millis: AtomicI64,
}

impl CacheEntry {
    /// Current state of the entry.
    pub fn state(&self) -> CacheEntryState {
        let loaded = self.loaded.load(Ordering::Acquire);
        CacheEntryState {
            loaded,
            last_fetch_millis: self.last_fetch_millis.load(Ordering::Acquire),
        }
    }

    /// Mark the resource as freshly fetched at `now_millis`.
    pub fn record_success(&self, now_millis: i64) {
        self.last_fetch_millis.store(now_millis, Ordering::Release);
        self.loaded.store(true, Ordering::Release);
    }

    /// Forget the resource: `loaded = false`, `last_fetch = 0`.
    pub fn clear(&self) {
        self.loaded.store(false, Ordering::Release);
        self.last_fetch_millis.store(0, Ordering::Release);
    }
}

/// One entry per [`CachedResource`], evaluated against a shared clock.
pub struct CacheTable {
    policy: CachePolicy,
    clock: Arc<dyn Clock>,
    profile: CacheEntry,
    lost_list: CacheEntry,
    found_list: CacheEntry,
}

impl fmt::Debug for CacheTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheTable")
            .field("policy", &self.policy)
            .field("profile", &self.profile.state())
            .field("lost_list", &self.lost_list.state())
            .field("found_list", &self.found_list.state())
            .finish_non_exhaustive()
    }
}

impl CacheTable {
    /// Build an empty table; every entry starts unloaded.
    pub fn new(policy: CachePolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            policy,
            clock,
            profile: CacheEntry::default(),
            lost_list: CacheEntry::default(),
            found_list: CacheEntry::default(),
        }
    }

    /// Policy applied to every entry.
    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    fn entry(&self, resource: CachedResource) -> &CacheEntry {
        match resource {
            CachedResource::Profile => &self.profile,
            CachedResource::LostList => &self.lost_list,
            CachedResource::FoundList => &self.found_list,
        }
    }

    fn now_millis(&self) -> i64 {
        self.clock.utc().timestamp_millis()
    }

    /// Current state of one entry.
    pub fn state(&self, resource: CachedResource) -> CacheEntryState {
        self.entry(resource).state()
    }

    /// `force_refresh ∨ ¬loaded ∨ (now − last_fetch) ≥ ttl`.
    pub fn should_fetch(&self, resource: CachedResource, force_refresh: bool) -> bool {
        self.policy
            .should_fetch(self.state(resource), self.now_millis(), force_refresh)
    }

    /// Stamp a successful fetch with the current time.
    pub fn record_success(&self, resource: CachedResource) {
        self.entry(resource).record_success(self.now_millis());
    }

    /// Drop one entry so the next fetch goes to the gateway.
    pub fn invalidate(&self, resource: CachedResource) {
        self.entry(resource).clear();
    }

    /// Drop every entry.
    pub fn clear_all(&self) {
        for resource in CachedResource::ALL {
            self.invalidate(resource);
        }
    }
}
