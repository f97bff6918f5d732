//! # Query Cache
//!
//! Call-site memoisation for derived results, keyed by the query that
//! produced them. The event never consults a cache on its own; UI code that
//! re-runs the same filter on every interaction owns one and clears it when
//! it swaps events.
//!
//! ```rust
//! use activity_timeline::{Event, EventQuery, QueryCache, QueryKey, CacheConfig};
//!
//! let event = Event::new("empty");
//! let mut cache: QueryCache<f64> = QueryCache::new(&CacheConfig::default());
//!
//! let key = QueryKey::new("distance", EventQuery::all());
//! let meters = cache.get_or_compute(key, || event.get_distance_in_meters(&EventQuery::all()));
//! assert_eq!(meters, 0.0);
//! ```

use std::collections::HashMap;

use crate::config::CacheConfig;
use crate::data::DataType;
use crate::query::EventQuery;

/// Identifies one derived result: what was computed, over which query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub operation: &'static str,
    pub data_type: Option<DataType>,
    pub query: EventQuery,
}

impl QueryKey {
    pub fn new(operation: &'static str, query: EventQuery) -> Self {
        Self {
            operation,
            data_type: None,
            query,
        }
    }

    pub fn for_type(operation: &'static str, data_type: DataType, query: EventQuery) -> Self {
        Self {
            operation,
            data_type: Some(data_type),
            query,
        }
    }
}

#[derive(Debug)]
struct Slot<V> {
    value: V,
    last_used: u64,
}

/// Least-recently-used cache of query results.
///
/// Eviction scans for the oldest slot, which is fine at the handful of
/// entries a view keeps.
#[derive(Debug)]
pub struct QueryCache<V> {
    capacity: usize,
    slots: HashMap<QueryKey, Slot<V>>,
    tick: u64,
}

impl<V: Clone> QueryCache<V> {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            capacity: config.capacity,
            slots: HashMap::with_capacity(config.capacity),
            tick: 0,
        }
    }

    /// Cached value for `key`, marking it as recently used.
    pub fn get(&mut self, key: &QueryKey) -> Option<V> {
        self.tick += 1;
        let tick = self.tick;
        self.slots.get_mut(key).map(|slot| {
            slot.last_used = tick;
            slot.value.clone()
        })
    }

    /// Store a value, evicting the least recently used entry when full.
    pub fn insert(&mut self, key: QueryKey, value: V) {
        if self.capacity == 0 {
            return;
        }
        if !self.slots.contains_key(&key) && self.slots.len() >= self.capacity {
            self.evict_least_recent();
        }
        self.tick += 1;
        self.slots.insert(
            key,
            Slot {
                value,
                last_used: self.tick,
            },
        );
    }

    /// Cached value for `key`, computing and storing it on a miss.
    pub fn get_or_compute(&mut self, key: QueryKey, compute: impl FnOnce() -> V) -> V {
        if let Some(value) = self.get(&key) {
            return value;
        }
        let value = compute();
        self.insert(key, value.clone());
        value
    }

    /// Drop everything, e.g. after the underlying event changed.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.tick = 0;
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn evict_least_recent(&mut self) {
        let oldest = self
            .slots
            .iter()
            .min_by_key(|(_, slot)| slot.last_used)
            .map(|(key, _)| key.clone());
        if let Some(key) = oldest {
            self.slots.remove(&key);
        }
    }
}
