use crate::error::Result;
use crate::types::report::RepoAnalysis;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

/// Key-value store for final analyses, keyed `owner/repo:branch:sha`.
/// TTL is the orchestrator's concern, not the store's.
pub trait CacheStore: Send + Sync {
    fn get(&self, key: &str) -> Option<RepoAnalysis>;
    fn set(&self, key: &str, record: &RepoAnalysis) -> Result<()>;
}

/// JSON records on disk, one file per key. Keys are hashed so branch names
/// and slashes never leak into file names.
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn clear(&self) -> Result<()> {
        if self.dir.exists() {
            std::fs::remove_dir_all(&self.dir)?;
        }
        Ok(())
    }

    fn record_path(&self, key: &str) -> PathBuf {
        let digest = Sha256::digest(key.as_bytes());
        let mut name = String::with_capacity(64);
        for byte in digest {
            name.push_str(&format!("{byte:02x}"));
        }
        self.dir.join(format!("{name}.json"))
    }
}

impl CacheStore for FileCache {
    fn get(&self, key: &str) -> Option<RepoAnalysis> {
        let content = std::fs::read_to_string(self.record_path(key)).ok()?;
        match serde_json::from_str(&content) {
            Ok(record) => Some(record),
            Err(error) => {
                tracing::warn!(%key, %error, "discarding unreadable cache record");
                None
            }
        }
    }

    fn set(&self, key: &str, record: &RepoAnalysis) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let content = serde_json::to_string_pretty(record)?;
        std::fs::write(self.record_path(key), content)?;
        Ok(())
    }
}

/// In-memory store for tests and one-shot runs.
#[derive(Default)]
pub struct MemoryCache {
    records: Mutex<HashMap<String, RepoAnalysis>>,
}

impl CacheStore for MemoryCache {
    fn get(&self, key: &str) -> Option<RepoAnalysis> {
        self.records
            .lock()
            .ok()
            .and_then(|records| records.get(key).cloned())
    }

    fn set(&self, key: &str, record: &RepoAnalysis) -> Result<()> {
        if let Ok(mut records) = self.records.lock() {
            records.insert(key.to_string(), record.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::report::{CacheMeta, Confidence, Diagnostics, ScoreBreakdown, Stage};
    use chrono::Utc;
    use tempfile::TempDir;

    fn record(repo_id: &str) -> RepoAnalysis {
        RepoAnalysis {
            repo_id: repo_id.to_string(),
            slop_score: 33,
            confidence: Confidence::Medium,
            stage: Stage::Final,
            indicators: vec![],
            breakdown: ScoreBreakdown::default(),
            contributions: vec![],
            diagnostics: Diagnostics::default(),
            cache: CacheMeta::default(),
            analyzed_at: Utc::now(),
        }
    }

    #[test]
    fn file_cache_round_trips_records() {
        let dir = TempDir::new().expect("temp dir should be created");
        let cache = FileCache::new(dir.path().join("cache"));
        let key = "octo/slop:main:abc123";

        assert!(cache.get(key).is_none());
        cache.set(key, &record("octo/slop")).expect("set should succeed");
        let loaded = cache.get(key).expect("record should load");
        assert_eq!(loaded.repo_id, "octo/slop");
        assert_eq!(loaded.slop_score, 33);
    }

    #[test]
    fn distinct_keys_do_not_collide() {
        let dir = TempDir::new().expect("temp dir should be created");
        let cache = FileCache::new(dir.path().join("cache"));
        cache
            .set("a/b:main:sha1", &record("a/b"))
            .expect("set should succeed");
        cache
            .set("a/b:main:sha2", &record("a/b"))
            .expect("set should succeed");
        assert!(cache.get("a/b:main:sha1").is_some());
        assert!(cache.get("a/b:main:sha3").is_none());
    }

    #[test]
    fn clear_removes_all_records() {
        let dir = TempDir::new().expect("temp dir should be created");
        let cache = FileCache::new(dir.path().join("cache"));
        cache
            .set("a/b:main:sha1", &record("a/b"))
            .expect("set should succeed");
        cache.clear().expect("clear should succeed");
        assert!(cache.get("a/b:main:sha1").is_none());
    }

    #[test]
    fn memory_cache_round_trips_records() {
        let cache = MemoryCache::default();
        cache
            .set("k", &record("octo/slop"))
            .expect("set should succeed");
        assert_eq!(cache.get("k").expect("record should load").repo_id, "octo/slop");
    }
}
