use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::constants::cache::{REMOTE_KEY_SEPARATOR, TAXONOMY_CACHE_SOURCE_ID};
use crate::errors::CorpusError;

/// Retrieves a remote object and writes it to a local path.
pub trait ObjectFetcher: Send + Sync {
    /// Write the object stored under `key` to `dest`.
    fn fetch(&self, key: &str, dest: &Path) -> Result<(), CorpusError>;
}

/// Fetcher that copies objects out of a local mirror directory.
pub struct DirectoryFetcher {
    mirror_root: PathBuf,
}

impl DirectoryFetcher {
    /// Serve keys as paths relative to `mirror_root`.
    pub fn new(mirror_root: impl Into<PathBuf>) -> Self {
        Self {
            mirror_root: mirror_root.into(),
        }
    }
}

impl ObjectFetcher for DirectoryFetcher {
    fn fetch(&self, key: &str, dest: &Path) -> Result<(), CorpusError> {
        let source = key
            .split(REMOTE_KEY_SEPARATOR)
            .filter(|segment| !segment.is_empty())
            .fold(self.mirror_root.clone(), |path, segment| path.join(segment));
        fs::copy(&source, dest).map_err(|err| CorpusError::SourceUnavailable {
            source_id: TAXONOMY_CACHE_SOURCE_ID.to_string(),
            reason: format!("cannot fetch '{key}' from {}: {err}", source.display()),
        })?;
        Ok(())
    }
}

/// Local cache of taxonomy reference files (for example O*NET `Skills.txt`).
///
/// Files are fetched once and reused from `cache_dir` afterwards. Nothing is ever
/// evicted.
#[derive(Clone)]
pub struct TaxonomyCache {
    cache_dir: PathBuf,
    prefix: String,
    fetcher: Arc<dyn ObjectFetcher>,
}

impl TaxonomyCache {
    /// Cache files under `cache_dir`, fetching `prefix/<filename>` on a miss.
    pub fn new(
        cache_dir: impl Into<PathBuf>,
        prefix: impl Into<String>,
        fetcher: Arc<dyn ObjectFetcher>,
    ) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            prefix: prefix.into(),
            fetcher,
        }
    }

    /// Directory holding cached files.
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Remote key for `filename`.
    pub fn remote_key(&self, filename: &str) -> String {
        let prefix = self.prefix.trim_end_matches(REMOTE_KEY_SEPARATOR);
        if prefix.is_empty() {
            filename.to_string()
        } else {
            format!("{prefix}{REMOTE_KEY_SEPARATOR}{filename}")
        }
    }

    /// Local path of `filename`, fetching it first when it is not cached yet.
    pub fn ensure_file(&self, filename: &str) -> Result<PathBuf, CorpusError> {
        let full_path = self.cache_dir.join(filename);
        if full_path.is_file() {
            debug!(path = %full_path.display(), "taxonomy cache hit");
            return Ok(full_path);
        }
        fs::create_dir_all(&self.cache_dir)?;
        let key = self.remote_key(filename);
        debug!(key = %key, path = %full_path.display(), "fetching taxonomy file");
        self.fetcher.fetch(&key, &full_path)?;
        Ok(full_path)
    }
}
