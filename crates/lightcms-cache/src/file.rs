//! Durable tier backed by one file per key.
//!
//! Directory layout:
//! ```text
//! {root}/
//! +-- VERSION        # "<record format>:<hash algorithm>:<fingerprint>"
//! +-- records/
//!     +-- first-post # one record per source file
//! ```
//!
//! Records are written to a temporary file in `records/` and renamed into
//! place, so a reader never observes a partially written record.

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::record::{self, decode_digest};
use crate::{CacheError, Digest, DurableTier, HashAlgorithm};

/// Version of the on-disk record layout.
pub const RECORD_FORMAT_VERSION: u32 = 1;

const VERSION_FILE: &str = "VERSION";
const RECORDS_DIR: &str = "records";

/// How an existing cache directory is treated on open.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CacheMode {
    /// Wipe the directory and start empty.
    #[default]
    Reset,
    /// Keep existing records if the directory was written with the same record
    /// format, hash algorithm and fingerprint; wipe it otherwise.
    Resume,
}

/// File-based [`DurableTier`] rooted at a directory on disk.
#[derive(Debug)]
pub struct FileTier {
    root: PathBuf,
    records: PathBuf,
}

impl FileTier {
    /// Open the durable tier at `root`.
    ///
    /// `fingerprint` identifies whatever else shapes the stored values, such as
    /// renderer settings. Records written under another fingerprint are never
    /// resumed.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Io`] if the directory cannot be wiped, created or
    /// stamped with its `VERSION` file.
    pub fn open(
        root: impl Into<PathBuf>,
        mode: CacheMode,
        algorithm: HashAlgorithm,
        fingerprint: &str,
    ) -> Result<Self, CacheError> {
        let root = root.into();
        let records = root.join(RECORDS_DIR);
        let version = version_string(algorithm, fingerprint);

        let keep = mode == CacheMode::Resume && version_matches(&root, &version);
        if keep {
            tracing::info!(dir = %root.display(), "Resuming durable cache");
            fs::create_dir_all(&records).map_err(|e| CacheError::io(&records, e))?;
        } else {
            reset(&root, &records, &version)?;
        }

        Ok(Self { root, records })
    }

    /// Cache root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn record_path(&self, key: &str) -> Result<PathBuf, CacheError> {
        let valid = !key.is_empty()
            && key != "."
            && key != ".."
            && !key.contains(['/', '\\', '\0']);
        if !valid {
            return Err(CacheError::InvalidKey(key.to_owned()));
        }
        Ok(self.records.join(key))
    }
}

impl DurableTier for FileTier {
    fn load(
        &self,
        key: &str,
        digest: &Digest,
    ) -> Result<Option<Vec<(String, String)>>, CacheError> {
        let path = self.record_path(key)?;
        let mut file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CacheError::io(path, e)),
        };

        // Check the digest before reading the rest of the record.
        let digest_len = digest.as_bytes().len();
        let mut bytes = vec![0u8; digest_len];
        match file.read_exact(&mut bytes) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                return Err(CacheError::CorruptRecord("record shorter than digest"));
            }
            Err(e) => return Err(CacheError::io(path, e)),
        }
        if decode_digest(&bytes, digest_len)? != *digest {
            return Ok(None);
        }

        file.read_to_end(&mut bytes)
            .map_err(|e| CacheError::io(&path, e))?;
        let (_, fields) = record::decode(&bytes, digest_len)?;
        Ok(Some(fields))
    }

    fn store(
        &self,
        key: &str,
        digest: &Digest,
        fields: &[(String, String)],
    ) -> Result<(), CacheError> {
        let path = self.record_path(key)?;
        let bytes = record::encode(digest, fields)?;

        let mut tmp =
            NamedTempFile::new_in(&self.records).map_err(|e| CacheError::io(&self.records, e))?;
        tmp.write_all(&bytes)
            .map_err(|e| CacheError::io(tmp.path(), e))?;
        tmp.persist(&path)
            .map_err(|e| CacheError::io(&path, e.error))?;
        Ok(())
    }
}

fn version_string(algorithm: HashAlgorithm, fingerprint: &str) -> String {
    format!("{RECORD_FORMAT_VERSION}:{}:{fingerprint}", algorithm.name())
}

fn version_matches(root: &Path, version: &str) -> bool {
    match fs::read_to_string(root.join(VERSION_FILE)) {
        Ok(stored) if stored == version => true,
        Ok(stored) => {
            tracing::info!(stored = %stored, current = %version, "Cache version mismatch");
            false
        }
        Err(_) => {
            tracing::info!(dir = %root.display(), "No cache VERSION file found");
            false
        }
    }
}

fn reset(root: &Path, records: &Path, version: &str) -> Result<(), CacheError> {
    tracing::info!(dir = %root.display(), "Initializing empty durable cache");
    match fs::remove_dir_all(root) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(CacheError::io(root, e)),
    }
    fs::create_dir_all(records).map_err(|e| CacheError::io(records, e))?;
    let version_file = root.join(VERSION_FILE);
    fs::write(&version_file, version).map_err(|e| CacheError::io(version_file, e))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(n, v)| ((*n).to_owned(), (*v).to_owned()))
            .collect()
    }

    const FINGERPRINT: &str = "numbered-newline";

    fn open(root: impl Into<PathBuf>, mode: CacheMode) -> FileTier {
        FileTier::open(root, mode, HashAlgorithm::Sha1, FINGERPRINT).unwrap()
    }

    fn sha1(data: &str) -> Digest {
        HashAlgorithm::Sha1.digest(data.as_bytes())
    }

    #[test]
    fn test_store_and_load() {
        let tmp = TempDir::new().unwrap();
        let tier = open(tmp.path().join("cache"), CacheMode::Reset);
        let stored = fields(&[("Author", "J Doe"), ("}body", "*Intro\nHello")]);

        tier.store("first", &sha1("v1"), &stored).unwrap();

        assert_eq!(tier.load("first", &sha1("v1")).unwrap(), Some(stored));
    }

    #[test]
    fn test_digest_mismatch_misses() {
        let tmp = TempDir::new().unwrap();
        let tier = open(tmp.path(), CacheMode::Reset);

        tier.store("doc", &sha1("v1"), &fields(&[("a", "b")])).unwrap();

        assert_eq!(tier.load("doc", &sha1("v2")).unwrap(), None);
        assert_eq!(tier.load("other", &sha1("v1")).unwrap(), None);
    }

    #[test]
    fn test_store_replaces_record() {
        let tmp = TempDir::new().unwrap();
        let tier = open(tmp.path(), CacheMode::Reset);

        tier.store("doc", &sha1("v1"), &fields(&[("a", "1")])).unwrap();
        tier.store("doc", &sha1("v2"), &fields(&[("a", "2")])).unwrap();

        assert_eq!(tier.load("doc", &sha1("v1")).unwrap(), None);
        assert_eq!(
            tier.load("doc", &sha1("v2")).unwrap(),
            Some(fields(&[("a", "2")]))
        );
        let leftovers = fs::read_dir(tmp.path().join(RECORDS_DIR)).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn test_reset_wipes_existing_records() {
        let tmp = TempDir::new().unwrap();
        let tier = open(tmp.path(), CacheMode::Reset);
        tier.store("doc", &sha1("v1"), &fields(&[("a", "1")])).unwrap();
        fs::write(tmp.path().join("stray"), "x").unwrap();

        let tier = open(tmp.path(), CacheMode::Reset);

        assert_eq!(tier.load("doc", &sha1("v1")).unwrap(), None);
        assert!(!tmp.path().join("stray").exists());
        assert_eq!(
            fs::read_to_string(tmp.path().join(VERSION_FILE)).unwrap(),
            "1:sha1:numbered-newline"
        );
    }

    #[test]
    fn test_resume_keeps_records() {
        let tmp = TempDir::new().unwrap();
        let tier = open(tmp.path(), CacheMode::Reset);
        tier.store("doc", &sha1("v1"), &fields(&[("a", "1")])).unwrap();
        drop(tier);

        let tier = open(tmp.path(), CacheMode::Resume);

        assert_eq!(
            tier.load("doc", &sha1("v1")).unwrap(),
            Some(fields(&[("a", "1")]))
        );
    }

    #[test]
    fn test_resume_with_other_algorithm_wipes() {
        let tmp = TempDir::new().unwrap();
        let tier = open(tmp.path(), CacheMode::Reset);
        tier.store("doc", &sha1("v1"), &fields(&[("a", "1")])).unwrap();

        let tier =
            FileTier::open(tmp.path(), CacheMode::Resume, HashAlgorithm::Sha256, FINGERPRINT)
                .unwrap();

        assert!(!tmp.path().join(RECORDS_DIR).join("doc").exists());
        assert_eq!(
            fs::read_to_string(tmp.path().join(VERSION_FILE)).unwrap(),
            "1:sha256:numbered-newline"
        );
        let digest = HashAlgorithm::Sha256.digest(b"v1");
        assert_eq!(tier.load("doc", &digest).unwrap(), None);
    }

    #[test]
    fn test_resume_with_other_fingerprint_wipes() {
        let tmp = TempDir::new().unwrap();
        let tier = open(tmp.path(), CacheMode::Reset);
        tier.store("doc", &sha1("v1"), &fields(&[("a", "1")])).unwrap();
        drop(tier);

        let tier =
            FileTier::open(tmp.path(), CacheMode::Resume, HashAlgorithm::Sha1, "plain-newline")
                .unwrap();

        assert_eq!(tier.load("doc", &sha1("v1")).unwrap(), None);
        assert_eq!(
            fs::read_to_string(tmp.path().join(VERSION_FILE)).unwrap(),
            "1:sha1:plain-newline"
        );
    }

    #[test]
    fn test_resume_without_version_file_wipes() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join(RECORDS_DIR)).unwrap();
        fs::write(tmp.path().join(RECORDS_DIR).join("doc"), "junk").unwrap();

        open(tmp.path(), CacheMode::Resume);

        assert!(!tmp.path().join(RECORDS_DIR).join("doc").exists());
    }

    #[test]
    fn test_invalid_keys() {
        let tmp = TempDir::new().unwrap();
        let tier = open(tmp.path(), CacheMode::Reset);

        for key in ["", ".", "..", "../escape", "a/b", "a\\b"] {
            let err = tier.store(key, &sha1("v"), &[]).unwrap_err();
            assert!(matches!(err, CacheError::InvalidKey(_)), "{key:?}");
        }
    }

    #[test]
    fn test_truncated_record_is_corrupt() {
        let tmp = TempDir::new().unwrap();
        let tier = open(tmp.path(), CacheMode::Reset);
        fs::write(tmp.path().join(RECORDS_DIR).join("doc"), b"short").unwrap();

        let err = tier.load("doc", &sha1("v")).unwrap_err();
        assert!(matches!(err, CacheError::CorruptRecord(_)));
    }

    #[test]
    fn test_unencodable_field_leaves_no_record() {
        let tmp = TempDir::new().unwrap();
        let tier = open(tmp.path(), CacheMode::Reset);

        let err = tier
            .store("doc", &sha1("v"), &fields(&[("bad", "a\0b")]))
            .unwrap_err();

        assert!(matches!(err, CacheError::UnencodableField(_)));
        assert_eq!(tier.load("doc", &sha1("v")).unwrap(), None);
    }

    #[test]
    fn test_open_fails_when_root_is_a_file() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("blocker");
        fs::write(&blocker, "x").unwrap();

        let err = FileTier::open(
            blocker.join("cache"),
            CacheMode::Reset,
            HashAlgorithm::Sha1,
            FINGERPRINT,
        )
        .unwrap_err();
        assert!(matches!(err, CacheError::Io { .. }));
    }
}
