//! Cache-first asset serving for offline use.
//!
//! One bucket exists per deployed version. `install` pre-fetches the asset
//! list into it, `activate` removes buckets left behind by older versions,
//! and `fetch` answers requests from the bucket before trying the network.

use super::errors::{CacheError, CacheResult};
use super::network::{CachedResponse, Network};
use super::storage::{CacheBucket, CacheStorage};
use tracing::{debug, info, warn};

/// Asset paths, relative to the base path, that must be available offline.
pub const DEFAULT_ASSETS: &[&str] = &[
    "",
    "index.html",
    "standalone.html",
    "manifest.json",
    "icons/icon-192x192.svg",
    "icons/icon-512x512.svg",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMode {
    /// Top-level document load
    Navigate,
    /// Anything else (scripts, images, manifests, ...)
    Subresource,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub path: String,
    pub mode: RequestMode,
}

impl Request {
    pub fn navigate(path: &str) -> Self {
        Self {
            path: path.to_string(),
            mode: RequestMode::Navigate,
        }
    }

    pub fn subresource(path: &str) -> Self {
        Self {
            path: path.to_string(),
            mode: RequestMode::Subresource,
        }
    }
}

/// Outcome of a best-effort install.
#[derive(Debug, Default)]
pub struct InstallReport {
    pub cached: Vec<String>,
    /// Paths that could not be stored, with the reason
    pub failed: Vec<(String, String)>,
}

impl InstallReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Outcome of the stale-bucket sweep.
#[derive(Debug, Default)]
pub struct ActivateReport {
    pub deleted: Vec<String>,
    /// Buckets that could not be removed, with the reason
    pub failed: Vec<(String, String)>,
}

/// The offline cache for one deployed version.
pub struct OfflineCache<N: Network> {
    storage: CacheStorage,
    network: N,
    cache_name: String,
    base_path: String,
    assets: Vec<String>,
}

impl<N: Network> OfflineCache<N> {
    /// Creates a cache named `<prefix>-<version>`.
    ///
    /// `base_path` is where the deployment lives (e.g. `/` or `/counter/`);
    /// every entry of `assets` is resolved against it.
    pub fn new(
        storage: CacheStorage,
        network: N,
        prefix: &str,
        version: &str,
        base_path: &str,
        assets: &[String],
    ) -> Self {
        let base_path = normalize_base(base_path);
        let assets = assets.iter().map(|a| join_path(&base_path, a)).collect();
        Self {
            storage,
            network,
            cache_name: format!("{prefix}-{version}"),
            base_path,
            assets,
        }
    }

    pub fn cache_name(&self) -> &str {
        &self.cache_name
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Fully resolved asset paths.
    pub fn assets(&self) -> &[String] {
        &self.assets
    }

    pub fn storage(&self) -> &CacheStorage {
        &self.storage
    }

    /// Pre-fetches every asset into the current bucket.
    ///
    /// Each asset is attempted independently. A network failure or a non-2xx
    /// response is logged and recorded in the report; it never aborts the
    /// remaining assets and never fails the install. Only failing to open
    /// the bucket itself is an error.
    pub fn install(&self) -> CacheResult<InstallReport> {
        let mut bucket = self.storage.open(&self.cache_name)?;
        info!(cache = %self.cache_name, assets = self.assets.len(), "installing");

        let mut report = InstallReport::default();
        for path in &self.assets {
            let stored = self
                .network
                .fetch(path)
                .map_err(CacheError::from)
                .and_then(|response| {
                    if response.is_success() {
                        bucket.put(path, &response)
                    } else {
                        Err(CacheError::BadStatus {
                            path: path.clone(),
                            status: response.status,
                        })
                    }
                });

            match stored {
                Ok(()) => report.cached.push(path.clone()),
                Err(e) => {
                    warn!(%path, error = %e, "skipping asset");
                    report.failed.push((path.clone(), e.to_string()));
                }
            }
        }

        info!(
            cache = %self.cache_name,
            cached = report.cached.len(),
            failed = report.failed.len(),
            "install finished"
        );
        Ok(report)
    }

    /// Deletes every bucket other than the current one.
    ///
    /// Every stale bucket is attempted even if an earlier delete fails. Only
    /// failing to enumerate the buckets is an error.
    pub fn activate(&self) -> CacheResult<ActivateReport> {
        let mut report = ActivateReport::default();
        for name in self.storage.keys()? {
            if name == self.cache_name {
                continue;
            }
            info!(cache = %name, "deleting stale cache");
            match self.storage.delete(&name) {
                Ok(_) => report.deleted.push(name),
                Err(e) => {
                    warn!(cache = %name, error = %e, "could not delete stale cache");
                    report.failed.push((name, e.to_string()));
                }
            }
        }
        Ok(report)
    }

    /// Answers a request: cached copy first, then the network.
    ///
    /// A bucket that cannot be opened or read counts as a miss. If the
    /// network fails on a navigation request, the cached index document is
    /// served instead, then the bucket's root entry. Any other network
    /// failure is returned to the caller.
    pub fn fetch(&self, request: &Request) -> CacheResult<CachedResponse> {
        let bucket = match self.storage.open(&self.cache_name) {
            Ok(bucket) => Some(bucket),
            Err(e) => {
                warn!(cache = %self.cache_name, error = %e, "cache unavailable, treating as miss");
                None
            }
        };

        if let Some(hit) = self.lookup(bucket.as_ref(), &request.path) {
            debug!(path = %request.path, "cache hit");
            return Ok(hit);
        }

        match self.network.fetch(&request.path) {
            Ok(response) => Ok(response),
            Err(e) if request.mode == RequestMode::Navigate => {
                warn!(path = %request.path, error = %e, "network failed, serving offline document");
                self.fallback_paths()
                    .iter()
                    .find_map(|fallback| self.lookup(bucket.as_ref(), fallback))
                    .ok_or_else(|| e.into())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn lookup(&self, bucket: Option<&CacheBucket>, path: &str) -> Option<CachedResponse> {
        match bucket?.match_path(path) {
            Ok(found) => found,
            Err(e) => {
                warn!(%path, error = %e, "cache lookup failed, treating as miss");
                None
            }
        }
    }

    fn fallback_paths(&self) -> [String; 2] {
        [
            join_path(&self.base_path, "index.html"),
            self.base_path.clone(),
        ]
    }
}

/// Ensures the base path starts and ends with `/`.
fn normalize_base(base: &str) -> String {
    let trimmed = base.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{trimmed}/")
    }
}

fn join_path(base: &str, asset: &str) -> String {
    format!("{}{}", base, asset.trim_start_matches('/'))
}
