//! Time-boxed on-disk cache of raw fetch results, one JSON file per
//! (team, phase).  Entries older than the freshness window are treated as
//! misses and left in place; `--force` simply skips the lookup.

use std::path::PathBuf;

use chrono::{Duration, NaiveDateTime};
use log::{debug, warn};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{chrono_util::now_utc, fs_json_util::{read_json, write_json}};

pub const FRESHNESS_HOURS: i64 = 24;

#[derive(Debug, Serialize, Deserialize)]
struct CacheFile<T> {
    cached_at: NaiveDateTime,
    payload: T,
}

pub struct SquadCache {
    dir: PathBuf,
}

impl SquadCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, team: &str, phase: &str) -> PathBuf {
        self.dir.join(format!("{team}_{phase}.json"))
    }

    pub fn load<T: DeserializeOwned>(&self, team: &str, phase: &str) -> Option<T> {
        self.load_at(team, phase, now_utc())
    }

    fn load_at<T: DeserializeOwned>(
        &self,
        team: &str,
        phase: &str,
        now: NaiveDateTime,
    ) -> Option<T> {
        let path = self.path(team, phase);
        if !path.exists() {
            return None;
        }
        let entry: CacheFile<T> = match read_json(&path) {
            Ok(entry) => entry,
            Err(e) => {
                // A corrupt entry is a miss; the next store overwrites it.
                warn!("Ignoring unreadable cache entry {path:?}: {e:#}");
                return None;
            }
        };
        if now - entry.cached_at > Duration::hours(FRESHNESS_HOURS) {
            debug!("Cache entry {path:?} is older than {FRESHNESS_HOURS}h");
            return None;
        }
        Some(entry.payload)
    }

    pub fn store<T: Serialize>(&self, team: &str, phase: &str, payload: &T) -> anyhow::Result<()> {
        fs_err::create_dir_all(&self.dir)?;
        write_json(
            self.path(team, phase),
            &CacheFile {
                cached_at: now_utc(),
                payload,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn scratch_cache(label: &str) -> SquadCache {
        let dir = std::env::temp_dir().join(format!(
            "squad-cache-test-{label}-{}",
            std::process::id()
        ));
        let _ = fs_err::remove_dir_all(&dir);
        SquadCache::new(dir)
    }

    #[test]
    fn fresh_entry_round_trips() {
        let cache = scratch_cache("fresh");
        cache.store("eng", "roster", &vec![1u32, 2, 3]).unwrap();
        let loaded: Option<Vec<u32>> = cache.load("eng", "roster");
        assert_eq!(loaded, Some(vec![1, 2, 3]));
    }

    #[test]
    fn expired_entry_is_a_miss() {
        let cache = scratch_cache("expired");
        cache.store("eng", "roster", &vec![1u32]).unwrap();
        let later = now_utc() + Duration::hours(FRESHNESS_HOURS) + Duration::minutes(1);
        let loaded: Option<Vec<u32>> = cache.load_at("eng", "roster", later);
        assert_eq!(loaded, None);
        // The entry itself is kept on disk
        let still_there: Option<Vec<u32>> = cache.load("eng", "roster");
        assert_eq!(still_there, Some(vec![1]));
    }

    #[test]
    fn missing_and_mismatched_entries_are_misses() {
        let cache = scratch_cache("missing");
        let loaded: Option<Vec<u32>> = cache.load("eng", "stats");
        assert_eq!(loaded, None);
    }

    #[test]
    fn store_overwrites_unconditionally() {
        let cache = scratch_cache("overwrite");
        cache.store("eng", "roster", &vec![1u32]).unwrap();
        cache.store("eng", "roster", &vec![2u32]).unwrap();
        let loaded: Option<Vec<u32>> = cache.load("eng", "roster");
        assert_eq!(loaded, Some(vec![2]));
    }
}
