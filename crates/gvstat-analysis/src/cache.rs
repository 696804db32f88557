//! On-disk cache of computed artifacts
//!
//! Aggregations over the full dataset are slow, so their results are stored as
//! JSON next to a [`Fingerprint`] of everything they were computed from:
//!
//! ```text
//! sha256( format tag | artifact kind | parameters (JSON) | input file bytes... )
//! ```
//!
//! A cached artifact is reused only when the stored fingerprint matches the
//! current one. A missing, stale or unreadable cache file leads to
//! recomputation, and a cache that cannot be written is reported and ignored.
//!
//! # Examples
//!
//! ```
//! use gvstat_analysis::cache::{ArtifactCache, FingerprintBuilder};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let cache = ArtifactCache::new(dir.path().join("squares.json"));
//! let fingerprint = FingerprintBuilder::new("squares")
//!     .param(&10_u32)
//!     .unwrap()
//!     .finish();
//!
//! let compute = || Ok::<_, std::convert::Infallible>((0..10_u32).map(|n| n * n).collect::<Vec<_>>());
//! let first = cache.load_or_compute(&fingerprint, compute).unwrap();
//! let second = cache
//!     .load_or_compute(&fingerprint, || -> Result<Vec<u32>, std::convert::Infallible> {
//!         unreachable!("served from cache")
//!     })
//!     .unwrap();
//! assert_eq!(first, second);
//! ```

use std::{
    ffi::OsString,
    fmt,
    fs::{self, File},
    io::{self, BufReader, BufWriter, Write as _},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use sha2::{Digest as _, Sha256};

const CACHE_FORMAT: &str = "gvstat-cache-v1";

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum CacheError {
    #[display("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[display("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
    #[display("failed to encode cache entry: {source}")]
    Encode { source: serde_json::Error },
    #[display("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Hex-encoded SHA-256 digest identifying the inputs of an artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl Fingerprint {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Incremental builder of a [`Fingerprint`].
///
/// Every part is length-prefixed, so distinct input sequences never collide by
/// concatenation.
#[derive(Debug, Clone)]
pub struct FingerprintBuilder {
    hasher: Sha256,
}

impl FingerprintBuilder {
    #[must_use]
    pub fn new(kind: &str) -> Self {
        let builder = Self {
            hasher: Sha256::new(),
        };
        builder.bytes(CACHE_FORMAT.as_bytes()).bytes(kind.as_bytes())
    }

    #[must_use]
    pub fn bytes(mut self, bytes: &[u8]) -> Self {
        self.hasher.update((bytes.len() as u64).to_le_bytes());
        self.hasher.update(bytes);
        self
    }

    /// Adds the JSON encoding of a parameter.
    pub fn param<T>(self, value: &T) -> Result<Self, CacheError>
    where
        T: Serialize + ?Sized,
    {
        let json = serde_json::to_vec(value).map_err(|source| CacheError::Encode { source })?;
        Ok(self.bytes(&json))
    }

    /// Adds the content of an input file.
    pub fn file<P>(mut self, path: P) -> Result<Self, CacheError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let read_error = |source| CacheError::Read {
            path: path.to_owned(),
            source,
        };
        let mut reader = BufReader::new(File::open(path).map_err(read_error)?);
        let len = io::copy(&mut reader, &mut self.hasher).map_err(read_error)?;
        self.hasher.update(len.to_le_bytes());
        Ok(self)
    }

    #[must_use]
    pub fn finish(self) -> Fingerprint {
        Fingerprint(format!("{:x}", self.hasher.finalize()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct CachedArtifact<T> {
    fingerprint: Fingerprint,
    artifact: T,
}

/// Result of looking up a cache file.
#[derive(Debug)]
pub enum Lookup<T> {
    Hit(T),
    Miss,
    Stale,
    Corrupt(CacheError),
}

/// A single cached artifact stored as a JSON file.
#[derive(Debug, Clone)]
pub struct ArtifactCache {
    path: PathBuf,
}

impl ArtifactCache {
    pub fn new<P>(path: P) -> Self
    where
        P: Into<PathBuf>,
    {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn lookup<T>(&self, fingerprint: &Fingerprint) -> Lookup<T>
    where
        T: DeserializeOwned,
    {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Lookup::Miss,
            Err(source) => {
                return Lookup::Corrupt(CacheError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        match serde_json::from_reader::<_, CachedArtifact<T>>(BufReader::new(file)) {
            Ok(cached) if cached.fingerprint == *fingerprint => Lookup::Hit(cached.artifact),
            Ok(_) => Lookup::Stale,
            Err(source) => Lookup::Corrupt(CacheError::Decode {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// Writes the artifact, replacing any previous cache file atomically.
    ///
    /// The temporary file is removed when any step fails.
    pub fn store<T>(&self, fingerprint: &Fingerprint, artifact: &T) -> Result<(), CacheError>
    where
        T: Serialize,
    {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| CacheError::Write {
                path: parent.to_owned(),
                source,
            })?;
        }

        let tmp_path = self.tmp_path();
        let cached = CachedArtifact {
            fingerprint: fingerprint.clone(),
            artifact,
        };
        let result = write_synced(&tmp_path, &cached).and_then(|()| {
            fs::rename(&tmp_path, &self.path).map_err(|source| CacheError::Write {
                path: self.path.clone(),
                source,
            })
        });
        if result.is_err() {
            match fs::remove_file(&tmp_path) {
                Ok(()) => {}
                Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                Err(err) => log::warn!("failed to remove {}: {err}", tmp_path.display()),
            }
        }
        result
    }

    /// Returns the cached artifact if it is current, otherwise computes and stores it.
    ///
    /// Failing to store the fresh artifact is logged, not returned.
    pub fn load_or_compute<T, E, F>(&self, fingerprint: &Fingerprint, compute: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Result<T, E>,
    {
        let path = self.path.display();
        match self.lookup(fingerprint) {
            Lookup::Hit(artifact) => {
                log::info!("using cached artifact {path}");
                return Ok(artifact);
            }
            Lookup::Miss => log::info!("no cached artifact at {path}"),
            Lookup::Stale => log::info!("cached artifact {path} is out of date"),
            Lookup::Corrupt(err) => log::warn!("ignoring unreadable cache: {err}"),
        }

        let artifact = compute()?;
        match self.store(fingerprint, &artifact) {
            Ok(()) => log::info!("cached artifact at {path}"),
            Err(err) => log::warn!("failed to cache artifact: {err}"),
        }
        Ok(artifact)
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }
}

fn write_synced<T>(path: &Path, value: &T) -> Result<(), CacheError>
where
    T: Serialize,
{
    let write_error = |source| CacheError::Write {
        path: path.to_owned(),
        source,
    };
    let mut writer = BufWriter::new(File::create(path).map_err(write_error)?);
    serde_json::to_writer(&mut writer, value).map_err(|source| CacheError::Encode { source })?;
    writer.flush().map_err(write_error)?;
    writer.get_ref().sync_all().map_err(write_error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, collections::BTreeMap};

    use super::*;

    fn fingerprint(param: u32) -> Fingerprint {
        FingerprintBuilder::new("test").param(&param).unwrap().finish()
    }

    #[test]
    fn test_fingerprint_depends_on_every_part() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.csv");
        fs::write(&input, "date,victim_info\n").unwrap();

        let with_file = |kind: &str| {
            FingerprintBuilder::new(kind)
                .param(&1_u32)
                .unwrap()
                .file(&input)
                .unwrap()
                .finish()
        };
        let base = with_file("a");
        assert_eq!(base, with_file("a"));
        assert_ne!(base, with_file("b"));
        assert_ne!(fingerprint(1), fingerprint(2));
        assert_eq!(base.as_str().len(), 64);

        fs::write(&input, "date,victim_info\n2015-01-02,[]\n").unwrap();
        assert_ne!(base, with_file("a"));
    }

    #[test]
    fn test_missing_input_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = FingerprintBuilder::new("x")
            .file(dir.path().join("missing.csv"))
            .unwrap_err();
        assert!(matches!(err, CacheError::Read { .. }));
    }

    #[test]
    fn test_miss_then_hit() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ArtifactCache::new(dir.path().join("nested/artifact.json"));
        let calls = Cell::new(0);
        let compute = || {
            calls.set(calls.get() + 1);
            Ok::<_, io::Error>(vec![1.5_f64, 2.5])
        };

        assert!(matches!(cache.lookup::<Vec<f64>>(&fingerprint(1)), Lookup::Miss));
        assert_eq!(cache.load_or_compute(&fingerprint(1), compute).unwrap(), [1.5, 2.5]);
        assert_eq!(cache.load_or_compute(&fingerprint(1), compute).unwrap(), [1.5, 2.5]);
        assert_eq!(calls.get(), 1);
        assert!(!dir.path().join("nested/artifact.json.tmp").exists());
    }

    #[test]
    fn test_stale_cache_recomputed() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ArtifactCache::new(dir.path().join("artifact.json"));
        cache.store(&fingerprint(1), &"old").unwrap();

        assert!(matches!(cache.lookup::<String>(&fingerprint(2)), Lookup::Stale));
        let value = cache
            .load_or_compute(&fingerprint(2), || Ok::<_, io::Error>("new".to_owned()))
            .unwrap();
        assert_eq!(value, "new");
        assert!(matches!(cache.lookup::<String>(&fingerprint(2)), Lookup::Hit(ref s) if s == "new"));
    }

    #[test]
    fn test_corrupt_cache_recomputed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("artifact.json");
        fs::write(&path, "{not json").unwrap();
        let cache = ArtifactCache::new(&path);

        assert!(matches!(cache.lookup::<u32>(&fingerprint(1)), Lookup::Corrupt(_)));
        let value = cache
            .load_or_compute(&fingerprint(1), || Ok::<_, io::Error>(7_u32))
            .unwrap();
        assert_eq!(value, 7);
        assert!(matches!(cache.lookup::<u32>(&fingerprint(1)), Lookup::Hit(7)));
    }

    #[test]
    fn test_failed_store_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ArtifactCache::new(dir.path().join("artifact.json"));
        cache.store(&fingerprint(1), &1_u32).unwrap();

        // JSON objects need string keys, so this fails halfway through encoding.
        let unencodable = BTreeMap::from([(vec![1_u32], 2_u32)]);
        let err = cache.store(&fingerprint(2), &unencodable).unwrap_err();
        assert!(matches!(err, CacheError::Encode { .. }));
        assert!(!dir.path().join("artifact.json.tmp").exists());
        assert!(matches!(cache.lookup::<u32>(&fingerprint(1)), Lookup::Hit(1)));
    }

    #[test]
    fn test_compute_error_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ArtifactCache::new(dir.path().join("artifact.json"));
        let result = cache.load_or_compute(&fingerprint(1), || -> Result<u32, &str> { Err("boom") });
        assert_eq!(result, Err("boom"));
        assert!(!cache.path().exists());
    }
}
