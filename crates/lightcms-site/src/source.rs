//! Flat directory of document source files.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::DocumentError;

/// Source files stored directly inside one directory.
///
/// A document's name is its file name. Hidden files (leading `.`) and
/// subdirectories are not documents.
#[derive(Clone, Debug)]
pub struct SourceDir {
    root: PathBuf,
}

impl SourceDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Read the raw bytes of document `name`.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::SourceNotFound`] if `name` is not a plain file
    /// name or no such file exists, and [`DocumentError::Io`] for other read
    /// failures.
    pub fn read(&self, name: &str) -> Result<Vec<u8>, DocumentError> {
        if !is_document_name(name) {
            return Err(DocumentError::SourceNotFound(name.to_owned()));
        }
        let path = self.root.join(name);

        match fs::metadata(&path) {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => return Err(DocumentError::SourceNotFound(name.to_owned())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(DocumentError::SourceNotFound(name.to_owned()));
            }
            Err(source) => return Err(DocumentError::Io { path, source }),
        }

        fs::read(&path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => DocumentError::SourceNotFound(name.to_owned()),
            _ => DocumentError::Io { path, source },
        })
    }

    /// Names of all documents, sorted.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Io`] if the directory cannot be listed.
    pub fn names(&self) -> Result<Vec<String>, DocumentError> {
        let entries = fs::read_dir(&self.root).map_err(|source| DocumentError::Io {
            path: self.root.clone(),
            source,
        })?;

        let mut names: Vec<String> = entries
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_ok_and(|t| t.is_file()))
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| is_document_name(name))
            .collect();
        names.sort();
        Ok(names)
    }
}

fn is_document_name(name: &str) -> bool {
    !name.is_empty() && !name.starts_with('.') && !name.contains(['/', '\\', '\0'])
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_read_existing() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("post"), "hello").unwrap();

        let source = SourceDir::new(tmp.path());
        assert_eq!(source.read("post").unwrap(), b"hello".to_vec());
    }

    #[test]
    fn test_read_missing() {
        let tmp = TempDir::new().unwrap();
        let source = SourceDir::new(tmp.path());

        let err = source.read("nope").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_rejects_paths() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("sub")).unwrap();
        fs::write(tmp.path().join("sub").join("inner"), "x").unwrap();
        let source = SourceDir::new(tmp.path().join("sub"));

        for name in ["", ".", "..", "../sub/inner", "a/b", "a\\b", ".hidden"] {
            let err = source.read(name).unwrap_err();
            assert!(err.is_not_found(), "{name:?}");
        }
    }

    #[test]
    fn test_directory_is_not_a_document() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("drafts")).unwrap();

        let source = SourceDir::new(tmp.path());
        assert!(source.read("drafts").unwrap_err().is_not_found());
    }

    #[test]
    fn test_names_sorted_files_only() {
        let tmp = TempDir::new().unwrap();
        for name in ["zeta", "alpha", "mid", ".swap"] {
            fs::write(tmp.path().join(name), "x").unwrap();
        }
        fs::create_dir(tmp.path().join("drafts")).unwrap();

        let source = SourceDir::new(tmp.path());
        assert_eq!(source.names().unwrap(), vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_names_missing_directory() {
        let tmp = TempDir::new().unwrap();
        let source = SourceDir::new(tmp.path().join("absent"));
        assert!(matches!(source.names(), Err(DocumentError::Io { .. })));
    }
}
