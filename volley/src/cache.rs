use std::cell::Cell;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    calculate_valid_bounds, check_overlap, player_in_slot, OverlapResult, Player, Position,
    PositionBounds, Slot,
};

/// A source of the current time, so that expiry can be tested.
pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Cell<Instant>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Cell::new(Instant::now()),
        }
    }

    pub fn advance(&self, duration: Duration) {
        self.now.set(self.now.get() + duration);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

mod duration_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// How long an entry is served after it was computed.
    #[serde(rename = "ttl_ms", with = "duration_millis")]
    pub ttl: Duration,
    /// How often expired entries are purged.
    #[serde(rename = "sweep_interval_ms", with = "duration_millis")]
    pub sweep_interval: Duration,
    /// Maximum number of entries, for each of the two caches.
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(30),
            sweep_interval: Duration::from_secs(60),
            max_entries: 1000,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub constraint_hits: u64,
    pub constraint_misses: u64,
    pub constraint_entries: usize,
    pub constraint_evictions: u64,
    pub validation_hits: u64,
    pub validation_misses: u64,
    pub validation_entries: usize,
    pub validation_evictions: u64,
}

impl CacheStats {
    pub fn constraint_hit_rate(&self) -> f64 {
        hit_rate(self.constraint_hits, self.constraint_misses)
    }

    pub fn validation_hit_rate(&self) -> f64 {
        hit_rate(self.validation_hits, self.validation_misses)
    }
}

fn hit_rate(hits: u64, misses: u64) -> f64 {
    if hits + misses == 0 {
        0.0
    } else {
        hits as f64 / (hits + misses) as f64
    }
}

/// A position rounded to millimeters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct MmPosition {
    x: i64,
    y: i64,
}

impl MmPosition {
    /// `None` for positions that do not fit, which are never cached.
    fn new(position: Position) -> Option<Self> {
        Some(Self {
            x: to_millimeters(position.x)?,
            y: to_millimeters(position.y)?,
        })
    }
}

fn to_millimeters(meters: f64) -> Option<i64> {
    let mm = (meters * 1000.0).round();
    // Also false for NaN and infinities.
    if mm.abs() < i64::MAX as f64 {
        Some(mm as i64)
    } else {
        None
    }
}

/// Only the players that [`calculate_valid_bounds()`] looks at are part of the key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct ConstraintKey {
    slot: Slot,
    is_server: bool,
    dependencies: Vec<(Slot, MmPosition, bool)>,
}

impl ConstraintKey {
    fn new(slot: Slot, others: &[Player], is_server: bool) -> Option<Self> {
        let mut dependencies = Vec::with_capacity(3);
        // The server's bounds do not depend on anyone.
        if !is_server {
            for &dep in slot.dependencies() {
                if let Some(player) = player_in_slot(others, dep) {
                    dependencies.push((dep, MmPosition::new(player.position)?, player.is_server));
                }
            }
        }
        Some(Self {
            slot,
            is_server,
            dependencies,
        })
    }

    fn depends_on(&self, slot: Slot) -> bool {
        self.slot == slot || self.slot.dependencies().contains(&slot)
    }
}

/// A position by the bit patterns of its coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct ExactPosition {
    x: u64,
    y: u64,
}

impl ExactPosition {
    /// `None` for non-finite positions, which are never cached.
    fn new(position: Position) -> Option<Self> {
        if !position.is_finite() {
            return None;
        }
        // Zero has two bit patterns.
        let bits = |v: f64| if v == 0.0 { 0 } else { v.to_bits() };
        Some(Self {
            x: bits(position.x),
            y: bits(position.y),
        })
    }
}

/// The whole lineup is part of the key, including names, since they appear in violations.
///
/// Legality can hinge on a fraction of a millimeter, so positions are kept exact.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct ValidationKey(Vec<(Slot, ExactPosition, bool, String)>);

impl ValidationKey {
    fn new(lineup: &[Player]) -> Option<Self> {
        lineup
            .iter()
            .map(|p| {
                let position = ExactPosition::new(p.position)?;
                Some((p.slot, position, p.is_server, p.name.clone()))
            })
            .collect::<Option<Vec<_>>>()
            .map(ValidationKey)
    }
}

struct Entry<T> {
    value: T,
    created: Instant,
    hits: u64,
}

/// One size-bounded map of entries with expiry, plus its counters.
struct Store<K, T> {
    name: &'static str,
    entries: HashMap<K, Entry<T>>,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl<K: Eq + Hash + Clone, T: Clone> Store<K, T> {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            entries: HashMap::new(),
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }

    fn get(&mut self, key: &K, now: Instant, ttl: Duration) -> Option<T> {
        let fresh = match self.entries.get(key) {
            Some(entry) => now.duration_since(entry.created) < ttl,
            None => false,
        };
        if !fresh {
            self.entries.remove(key);
            self.misses += 1;
            return None;
        }
        self.hits += 1;
        self.entries.get_mut(key).map(|entry| {
            entry.hits += 1;
            entry.value.clone()
        })
    }

    fn insert(&mut self, key: K, value: T, now: Instant, max_entries: usize) {
        if max_entries == 0 {
            return;
        }
        if !self.entries.contains_key(&key) && self.entries.len() >= max_entries {
            self.evict_one();
        }
        self.entries.insert(
            key,
            Entry {
                value,
                created: now,
                hits: 0,
            },
        );
    }

    // Least used first, oldest among equally used.
    fn evict_one(&mut self) {
        let victim = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| (entry.hits, entry.created))
            .map(|(key, _)| key.clone());
        if let Some(key) = victim {
            self.entries.remove(&key);
            self.evictions += 1;
            debug!(cache = self.name, "Evicted least used entry");
        }
    }

    fn sweep(&mut self, now: Instant, ttl: Duration) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| now.duration_since(entry.created) < ttl);
        let removed = before - self.entries.len();
        if removed > 0 {
            debug!(cache = self.name, removed, "Swept expired entries");
        }
        removed
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn reset(&mut self) {
        self.clear();
        self.hits = 0;
        self.misses = 0;
        self.evictions = 0;
    }
}

/// Memoizes constraint and validation results while a player is dragged.
///
/// Each instance is independent, there is no global state. Expired entries
/// are purged opportunistically: whenever the cache is used and the sweep
/// interval has passed since the last purge.
pub struct PerformanceCache<C: Clock = SystemClock> {
    config: CacheConfig,
    clock: C,
    constraints: Store<ConstraintKey, PositionBounds>,
    validations: Store<ValidationKey, OverlapResult>,
    last_sweep: Instant,
}

impl PerformanceCache<SystemClock> {
    pub fn new(config: CacheConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl Default for PerformanceCache<SystemClock> {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

impl<C: Clock> PerformanceCache<C> {
    pub fn with_clock(config: CacheConfig, clock: C) -> Self {
        let last_sweep = clock.now();
        Self {
            config,
            clock,
            constraints: Store::new("constraints"),
            validations: Store::new("validations"),
            last_sweep,
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Cached [`calculate_valid_bounds()`].
    pub fn constraints(
        &mut self,
        slot: Slot,
        others: &[Player],
        is_server: bool,
    ) -> PositionBounds {
        let now = self.tick();
        let Some(key) = ConstraintKey::new(slot, others, is_server) else {
            self.constraints.misses += 1;
            return calculate_valid_bounds(slot, others, is_server);
        };
        if let Some(bounds) = self.constraints.get(&key, now, self.config.ttl) {
            return bounds;
        }
        let bounds = calculate_valid_bounds(slot, others, is_server);
        self.constraints
            .insert(key, bounds.clone(), now, self.config.max_entries);
        bounds
    }

    /// Cached [`check_overlap()`].
    pub fn validate(&mut self, lineup: &[Player]) -> OverlapResult {
        let now = self.tick();
        let Some(key) = ValidationKey::new(lineup) else {
            self.validations.misses += 1;
            return check_overlap(lineup);
        };
        if let Some(result) = self.validations.get(&key, now, self.config.ttl) {
            return result;
        }
        let result = check_overlap(lineup);
        self.validations
            .insert(key, result.clone(), now, self.config.max_entries);
        result
    }

    /// Forgets everything that depends on the position of `slot`.
    ///
    /// Constraint entries for `slot` itself and for every slot constrained by
    /// it are removed. All validation entries are removed.
    pub fn invalidate_slot(&mut self, slot: Slot) {
        let before = self.constraints.entries.len();
        self.constraints.entries.retain(|key, _| !key.depends_on(slot));
        let removed = before - self.constraints.entries.len();
        let validations = self.validations.entries.len();
        self.validations.clear();
        debug!(
            slot = slot.number(),
            constraints = removed,
            validations,
            "Invalidated cache entries"
        );
    }

    /// Removes all expired entries. Returns how many were removed.
    pub fn sweep_expired(&mut self) -> usize {
        let now = self.clock.now();
        self.last_sweep = now;
        self.constraints.sweep(now, self.config.ttl) + self.validations.sweep(now, self.config.ttl)
    }

    /// Removes all entries, keeping the counters.
    pub fn clear(&mut self) {
        self.constraints.clear();
        self.validations.clear();
    }

    /// Removes all entries and zeroes the counters.
    pub fn reset(&mut self) {
        self.constraints.reset();
        self.validations.reset();
        self.last_sweep = self.clock.now();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            constraint_hits: self.constraints.hits,
            constraint_misses: self.constraints.misses,
            constraint_entries: self.constraints.entries.len(),
            constraint_evictions: self.constraints.evictions,
            validation_hits: self.validations.hits,
            validation_misses: self.validations.misses,
            validation_entries: self.validations.entries.len(),
            validation_evictions: self.validations.evictions,
        }
    }

    fn tick(&mut self) -> Instant {
        let now = self.clock.now();
        if now.duration_since(self.last_sweep) >= self.config.sweep_interval {
            self.sweep_expired();
        }
        now
    }
}
