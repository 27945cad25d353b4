//! TTL-bounded resource cache partitioned by kind, workspace and id

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use log::debug;
use serde::Serialize;

use super::clock::{Clock, SystemClock};
use crate::resource::ResourceKind;

/// TTL applied when a cache is created with a zero TTL.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Per-kind occupancy and read statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Number of workspace partitions currently resident
    pub workspaces: usize,
    /// Reads that found their target
    pub hits: u64,
    /// Reads that did not
    pub misses: u64,
}

/// Entities of one kind, keyed by workspace id then entity id.
type Partition<V> = HashMap<i64, HashMap<i64, V>>;

#[derive(Debug)]
struct KindState<V> {
    partition: Partition<V>,
    last_reset: Instant,
    hits: u64,
    misses: u64,
}

impl<V> KindState<V> {
    fn new(now: Instant) -> Self {
        Self {
            partition: HashMap::new(),
            last_reset: now,
            hits: 0,
            misses: 0,
        }
    }

    fn record(&mut self, found: bool) {
        if found {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
    }
}

#[derive(Debug)]
struct Inner<V> {
    kinds: HashMap<ResourceKind, KindState<V>>,
    ttl: Duration,
}

impl<V> Inner<V> {
    fn kind_mut(&mut self, kind: ResourceKind, now: Instant) -> &mut KindState<V> {
        self.kinds.entry(kind).or_insert_with(|| KindState::new(now))
    }

    /// Drop every kind older than the TTL and restart its age.
    fn sweep(&mut self, now: Instant) {
        let ttl = self.ttl;
        for (kind, state) in self.kinds.iter_mut() {
            if now.saturating_duration_since(state.last_reset) > ttl {
                debug!(
                    "Cache expired for {} ({} workspaces dropped)",
                    kind,
                    state.partition.len()
                );
                state.partition = HashMap::new();
                state.last_reset = now;
            }
        }
    }
}

/// In-memory cache of decoded Toggl entities.
///
/// Entries are partitioned by [`ResourceKind`], then workspace id, then
/// entity id. A single TTL covers the whole cache, but each kind ages on its
/// own: every read (and every TTL change) first clears the kinds whose last
/// reset is older than the TTL.
///
/// All operations serialize on one mutex. None of them perform I/O or fail;
/// absence is reported as `None`.
///
/// Callers hold the cache as an explicit handle (typically inside an `Arc`),
/// so differently configured caches can coexist.
pub struct ResourceCache<V> {
    inner: Mutex<Inner<V>>,
    clock: Arc<dyn Clock>,
}

impl<V: Clone> ResourceCache<V> {
    /// Create a cache with the given TTL ([`DEFAULT_TTL`] when zero).
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    /// Create a cache reading time from `clock`.
    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        let ttl = if ttl.is_zero() { DEFAULT_TTL } else { ttl };
        let now = clock.now();
        let kinds = ResourceKind::ALL
            .into_iter()
            .map(|kind| (kind, KindState::new(now)))
            .collect();

        Self {
            inner: Mutex::new(Inner { kinds, ttl }),
            clock,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<V>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Lock and run the expiry sweep, as every read does before looking.
    fn lock_swept(&self) -> (MutexGuard<'_, Inner<V>>, Instant) {
        let now = self.clock.now();
        let mut inner = self.lock();
        inner.sweep(now);
        (inner, now)
    }

    /// Look up one entity.
    ///
    /// A stored value counts as a hit whatever it contains.
    pub fn get(&self, kind: ResourceKind, workspace_id: i64, id: i64) -> Option<V> {
        let (mut inner, now) = self.lock_swept();
        let state = inner.kind_mut(kind, now);

        let value = state
            .partition
            .get(&workspace_id)
            .and_then(|entities| entities.get(&id))
            .cloned();
        state.record(value.is_some());
        value
    }

    /// Snapshot of every entity of `kind` in one workspace, keyed by id.
    ///
    /// The returned map is a copy; later cache mutations are not reflected.
    pub fn get_map(&self, kind: ResourceKind, workspace_id: i64) -> Option<HashMap<i64, V>> {
        let (mut inner, now) = self.lock_swept();
        let state = inner.kind_mut(kind, now);

        let map = state.partition.get(&workspace_id).cloned();
        state.record(map.is_some());
        map
    }

    /// Every entity of `kind` in one workspace, in no particular order.
    pub fn get_list(&self, kind: ResourceKind, workspace_id: i64) -> Option<Vec<V>> {
        let (mut inner, now) = self.lock_swept();
        let state = inner.kind_mut(kind, now);

        let list = state
            .partition
            .get(&workspace_id)
            .map(|entities| entities.values().cloned().collect::<Vec<_>>());
        state.record(list.is_some());
        list
    }

    /// Whether a workspace partition of `kind` is resident.
    ///
    /// Unlike the getters this is not counted as a read.
    pub fn contains_workspace(&self, kind: ResourceKind, workspace_id: i64) -> bool {
        let (inner, _) = self.lock_swept();
        inner
            .kinds
            .get(&kind)
            .is_some_and(|state| state.partition.contains_key(&workspace_id))
    }

    /// Insert or overwrite one entity. Does not restart the kind's age.
    pub fn set(&self, kind: ResourceKind, workspace_id: i64, id: i64, value: V) {
        let now = self.clock.now();
        let mut inner = self.lock();
        inner
            .kind_mut(kind, now)
            .partition
            .entry(workspace_id)
            .or_default()
            .insert(id, value);
    }

    /// Evict one entity, returning it if it was cached.
    ///
    /// Moving an entity to another workspace is a `remove` followed by a
    /// `set` under the new workspace id.
    pub fn remove(&self, kind: ResourceKind, workspace_id: i64, id: i64) -> Option<V> {
        let now = self.clock.now();
        let mut inner = self.lock();
        let partition = &mut inner.kind_mut(kind, now).partition;

        let entities = partition.get_mut(&workspace_id)?;
        let removed = entities.remove(&id);
        if entities.is_empty() {
            partition.remove(&workspace_id);
        }
        removed
    }

    /// Discard every entity of one kind and restart its age.
    ///
    /// Other kinds and all statistics are left alone.
    pub fn clear(&self, kind: ResourceKind) {
        let now = self.clock.now();
        let mut inner = self.lock();
        let state = inner.kind_mut(kind, now);
        state.partition = HashMap::new();
        state.last_reset = now;
    }

    /// Current TTL.
    pub fn ttl(&self) -> Duration {
        self.lock().ttl
    }

    /// Replace the TTL and immediately expire kinds older than it.
    pub fn set_ttl(&self, ttl: Duration) {
        let now = self.clock.now();
        let mut inner = self.lock();
        inner.ttl = ttl;
        inner.sweep(now);
    }

    /// Statistics for one kind.
    pub fn stats(&self, kind: ResourceKind) -> CacheStats {
        let inner = self.lock();
        inner
            .kinds
            .get(&kind)
            .map(|state| CacheStats {
                workspaces: state.partition.len(),
                hits: state.hits,
                misses: state.misses,
            })
            .unwrap_or_default()
    }
}

impl<V: Clone> Default for ResourceCache<V> {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}
