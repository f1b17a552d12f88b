//! Time-bounded memoization of remote lookups.
//!
//! The organizer repeatedly asks the same questions of GitHub: what the organization's
//! configuration document says, and which id belongs to a team, project or column name.
//! [`ResolutionCache`] keeps those answers for a while, keyed by organization, lookup kind
//! and lookup key. Each entry expires after the duration of its [`TtlClass`].
//!
//! Only successful lookups are stored. A lookup that fails or finds nothing is asked again
//! on the next access. Concurrent misses for the same key may all compute; the last one to
//! finish wins.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};

use tracing::debug;

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;

/// Expiry policy classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TtlClass {
    /// Organization configuration documents.
    Short,
    /// Name to id lookups for teams, projects and columns.
    Medium,
    Long,
}

/// Durations for each [`TtlClass`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtlPolicy {
    pub short: Duration,
    pub medium: Duration,
    pub long: Duration,
}

impl TtlPolicy {
    pub const DEFAULT_SHORT: Duration = Duration::from_secs(300);
    pub const DEFAULT_MEDIUM: Duration = Duration::from_secs(3600);
    pub const DEFAULT_LONG: Duration = Duration::from_secs(86400);

    pub fn new(short: Duration, medium: Duration, long: Duration) -> Self {
        Self {
            short,
            medium,
            long,
        }
    }

    /// Returns the duration of `class`.
    pub fn ttl(&self, class: TtlClass) -> Duration {
        match class {
            TtlClass::Short => self.short,
            TtlClass::Medium => self.medium,
            TtlClass::Long => self.long,
        }
    }
}

impl Default for TtlPolicy {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_SHORT,
            Self::DEFAULT_MEDIUM,
            Self::DEFAULT_LONG,
        )
    }
}

/// What a cached lookup resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupKind {
    Configuration,
    Team,
    Project,
    Column,
}

impl LookupKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LookupKind::Configuration => "configuration",
            LookupKind::Team => "team",
            LookupKind::Project => "project",
            LookupKind::Column => "column",
        }
    }
}

impl fmt::Display for LookupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies a cached lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub organization: String,
    pub kind: LookupKind,
    pub key: String,
}

impl CacheKey {
    pub fn new(organization: impl Into<String>, kind: LookupKind, key: impl Into<String>) -> Self {
        Self {
            organization: organization.into(),
            kind,
            key: key.into(),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.organization, self.kind, self.key)
    }
}

/// Cache entry with its expiry.
#[derive(Debug, Clone)]
struct CachedValue<V> {
    value: V,
    cached_at: Instant,
    ttl: Duration,
}

impl<V> CachedValue<V> {
    fn new(value: V, ttl: Duration) -> Self {
        Self {
            value,
            cached_at: Instant::now(),
            ttl,
        }
    }

    fn is_valid(&self) -> bool {
        self.cached_at.elapsed() < self.ttl
    }
}

/// Process-local cache of lookup results.
///
/// # Examples
///
/// ```rust
/// use config_manager::cache::{CacheKey, LookupKind, ResolutionCache, TtlClass};
///
/// let cache: ResolutionCache<u64> = ResolutionCache::new();
/// let key = CacheKey::new("my-org", LookupKind::Team, "developers");
///
/// let id = cache.get_or_compute(key.clone(), TtlClass::Medium, || Some(42));
/// assert_eq!(id, Some(42));
///
/// // Served from the cache; the closure is not called.
/// let id = cache.get_or_compute(key, TtlClass::Medium, || unreachable!());
/// assert_eq!(id, Some(42));
/// ```
pub struct ResolutionCache<V> {
    entries: RwLock<HashMap<CacheKey, CachedValue<V>>>,
    policy: TtlPolicy,
}

impl<V: Clone> ResolutionCache<V> {
    /// Creates an empty cache with the default [`TtlPolicy`].
    pub fn new() -> Self {
        Self::with_policy(TtlPolicy::default())
    }

    pub fn with_policy(policy: TtlPolicy) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            policy,
        }
    }

    pub fn policy(&self) -> TtlPolicy {
        self.policy
    }

    /// Returns the cached value for `key` if it has not expired.
    pub fn get(&self, key: &CacheKey) -> Option<V> {
        let entries = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        entries
            .get(key)
            .filter(|entry| entry.is_valid())
            .map(|entry| entry.value.clone())
    }

    /// Stores `value` under `key`, replacing any previous entry.
    pub fn insert(&self, key: CacheKey, ttl_class: TtlClass, value: V) {
        let ttl = self.policy.ttl(ttl_class);
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        entries.retain(|_, entry| entry.is_valid());
        entries.insert(key, CachedValue::new(value, ttl));
    }

    /// Returns the cached value for `key`, or computes and stores it.
    ///
    /// `None` from `compute` is returned as is and not stored.
    pub fn get_or_compute<F>(&self, key: CacheKey, ttl_class: TtlClass, compute: F) -> Option<V>
    where
        F: FnOnce() -> Option<V>,
    {
        if let Some(value) = self.get(&key) {
            debug!(key = %key, "Cache hit");
            return Some(value);
        }

        debug!(key = %key, "Cache miss");
        let value = compute()?;
        self.insert(key, ttl_class, value.clone());
        Some(value)
    }

    /// Async form of [`get_or_compute`](Self::get_or_compute).
    ///
    /// The lock is not held while `compute` runs.
    pub async fn get_or_compute_async<F, Fut>(
        &self,
        key: CacheKey,
        ttl_class: TtlClass,
        compute: F,
    ) -> Option<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Option<V>>,
    {
        if let Some(value) = self.get(&key) {
            debug!(key = %key, "Cache hit");
            return Some(value);
        }

        debug!(key = %key, "Cache miss");
        let value = compute().await?;
        self.insert(key, ttl_class, value.clone());
        Some(value)
    }

    /// Like [`get_or_compute_async`](Self::get_or_compute_async) for lookups that can fail.
    ///
    /// Errors and `Ok(None)` are returned to the caller and not stored.
    pub async fn try_get_or_compute<F, Fut, E>(
        &self,
        key: CacheKey,
        ttl_class: TtlClass,
        compute: F,
    ) -> Result<Option<V>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<V>, E>>,
    {
        if let Some(value) = self.get(&key) {
            debug!(key = %key, "Cache hit");
            return Ok(Some(value));
        }

        debug!(key = %key, "Cache miss");
        let value = compute().await?;
        if let Some(value) = &value {
            self.insert(key, ttl_class, value.clone());
        }
        Ok(value)
    }

    /// Number of stored entries, including expired ones not yet evicted.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V: Clone> Default for ResolutionCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for ResolutionCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolutionCache")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
