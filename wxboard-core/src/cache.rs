//! Time-boxed result cache, applied by the surrounding application around the
//! source selector. The core itself never consults it, so each query stays
//! stateless.

use std::{
    collections::HashMap,
    sync::Mutex,
    time::{Duration, Instant},
};

use crate::model::{Source, UnitSystem, WeatherResult};

/// Default freshness window, matching the upstream providers' own update
/// cadence.
pub const DEFAULT_TTL: Duration = Duration::from_secs(600);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    source: Source,
    target: String,
    units: UnitSystem,
}

#[derive(Debug)]
pub struct ResultCache {
    ttl: Duration,
    entries: Mutex<HashMap<CacheKey, (Instant, WeatherResult)>>,
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl ResultCache {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, entries: Mutex::new(HashMap::new()) }
    }

    /// Look up a fresh result for the target, preferring the primary source.
    pub fn lookup(&self, target: &str, units: UnitSystem) -> Option<WeatherResult> {
        let mut entries = self.entries.lock().ok()?;

        for source in Source::all() {
            let key =
                CacheKey { source: *source, target: target.to_string(), units };
            match entries.get(&key) {
                Some((stored_at, result)) if stored_at.elapsed() < self.ttl => {
                    return Some(result.clone());
                }
                Some(_) => {
                    entries.remove(&key);
                }
                None => {}
            }
        }

        None
    }

    /// Store a result under its own source tag.
    pub fn store(&self, target: &str, units: UnitSystem, result: &WeatherResult) {
        let key = CacheKey { source: result.source, target: target.to_string(), units };
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key, (Instant::now(), result.clone()));
        }
    }

    /// Drop everything, e.g. for an explicit refresh.
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }
}
