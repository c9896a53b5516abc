//! The persistent credential slot.

use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::credential::Credential;
use crate::error::{Error, Result};

/// Key file used when none is configured, relative to the working directory.
pub const DEFAULT_KEY_FILE: &str = "openai_api_key.txt";

/// Somewhere a single API key survives between runs.
pub trait CredentialStore {
    /// Reads the stored key.  `Ok(None)` means the slot is empty.
    fn load(&self) -> Result<Option<Credential>>;

    /// Replaces the stored key.
    fn save(&self, credential: &Credential) -> Result<()>;
}

/// A plain-text file holding the raw key and nothing else.
///
/// The file is opened and closed on every access; no lock is held in between.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Creates a store backed by `path`.  Nothing touches the disk until the first access.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileCredentialStore {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_FILE)
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Option<Credential>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Credential::new(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                // First run: create the slot empty without truncating.
                OpenOptions::new()
                    .write(true)
                    .create(true)
                    .open(&self.path)
                    .map_err(|err| {
                        Error::io(
                            format!("failed to create key file {}", self.path.display()),
                            err,
                        )
                    })?;
                Ok(None)
            }
            Err(err) => Err(Error::io(
                format!("failed to read key file {}", self.path.display()),
                err,
            )),
        }
    }

    fn save(&self, credential: &Credential) -> Result<()> {
        fs::write(&self.path, credential.expose()).map_err(|err| {
            Error::io(
                format!("failed to write key file {}", self.path.display()),
                err,
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_slot_is_created_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_KEY_FILE);
        let store = FileCredentialStore::new(&path);

        assert!(store.load().unwrap().is_none());
        assert!(path.exists());
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("key.txt"));

        store.save(&Credential::new("sk-first").unwrap()).unwrap();
        store.save(&Credential::new("sk-second").unwrap()).unwrap();

        assert_eq!(fs::read_to_string(store.path()).unwrap(), "sk-second");
        assert_eq!(store.load().unwrap(), Credential::new("sk-second"));
    }

    #[test]
    fn trailing_newline_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("key.txt");
        fs::write(&path, "sk-edited\n").unwrap();

        let store = FileCredentialStore::new(&path);
        assert_eq!(store.load().unwrap().unwrap().expose(), "sk-edited");
    }

    #[test]
    fn read_only_slot_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("key.txt");
        fs::write(&path, "sk-locked").unwrap();
        let mut permissions = fs::metadata(&path).unwrap().permissions();
        permissions.set_readonly(true);
        fs::set_permissions(&path, permissions).unwrap();

        let store = FileCredentialStore::new(&path);
        assert_eq!(store.load().unwrap().unwrap().expose(), "sk-locked");
    }

    #[test]
    fn unreadable_slot_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("missing").join("key.txt"));
        assert!(matches!(store.load(), Err(Error::Io { .. })));
    }
}
