use crate::core::error::StoreError;
use crate::models::user::User;
use crate::stores::repository::UserRepository;
use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use std::time::SystemTime;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// On-disk layout: user ID -> user record
type UserMap = BTreeMap<String, User>;

/// Cheap identity of the backing file, used to detect external changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fingerprint {
    modified: Option<SystemTime>,
    len: u64,
}

#[derive(Default)]
struct Cache {
    users: UserMap,
    /// File state as of the last reload or persist; `None` if the file did not exist
    fingerprint: Option<Fingerprint>,
    /// Cleared after a failed persist so the next call reloads from disk
    valid: bool,
}

/// User repository backed by a single pretty-printed JSON file
///
/// Every call first makes sure the in-memory cache mirrors the file, and
/// every mutation rewrites the whole file through a temp file + rename.
/// A single `RwLock` covers both the cache and the file:
/// - writes hold the exclusive lock across reload, mutation and persist
/// - reads hold the shared lock when the cache is fresh, and the exclusive
///   lock when they have to reload first
///
/// Change detection compares modification time and length only. An outside
/// rewrite that keeps the same length within one mtime tick goes unnoticed;
/// use `always_reload` when other writers share the file.
pub struct JsonFileUserRepository {
    path: PathBuf,
    always_reload: bool,
    cache: RwLock<Cache>,
}

impl JsonFileUserRepository {
    /// Open the store, creating missing parent directories
    ///
    /// A missing or empty file is an empty store. The file itself is only
    /// created on the first write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        Self::with_options(path, false)
    }

    /// Like `open`; with `always_reload` the file is re-read on every call
    /// instead of only when its fingerprint changes
    pub fn with_options(path: impl Into<PathBuf>, always_reload: bool) -> Result<Self, StoreError> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }

        let repo = Self {
            path,
            always_reload,
            cache: RwLock::new(Cache::default()),
        };
        repo.load()?;

        Ok(repo)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read the file unconditionally, returning the number of users
    pub fn load(&self) -> Result<usize, StoreError> {
        let mut cache = self.cache.write().map_err(|_| StoreError::LockPoisoned)?;
        self.reload(&mut cache)?;

        info!(
            path = %self.path.display(),
            users = cache.users.len(),
            "User store loaded"
        );

        Ok(cache.users.len())
    }

    fn fingerprint(&self) -> Result<Option<Fingerprint>, StoreError> {
        match fs::metadata(&self.path) {
            Ok(meta) => Ok(Some(Fingerprint {
                modified: meta.modified().ok(),
                len: meta.len(),
            })),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(&self.path, e)),
        }
    }

    fn is_fresh(&self, cache: &Cache) -> Result<bool, StoreError> {
        if self.always_reload || !cache.valid {
            return Ok(false);
        }
        Ok(cache.fingerprint == self.fingerprint()?)
    }

    fn reload(&self, cache: &mut Cache) -> Result<(), StoreError> {
        // Taken before reading: a concurrent external write shows up as a
        // mismatch on the next call rather than being missed.
        let fingerprint = self.fingerprint()?;

        let users = match fs::read(&self.path) {
            Ok(data) => parse_users(&self.path, &data)?,
            Err(e) if e.kind() == ErrorKind::NotFound => UserMap::new(),
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };

        debug!(
            path = %self.path.display(),
            users = users.len(),
            "User store reloaded from disk"
        );

        cache.users = users;
        cache.fingerprint = fingerprint;
        cache.valid = true;
        Ok(())
    }

    fn persist(&self, users: &UserMap) -> Result<Option<Fingerprint>, StoreError> {
        let data = serde_json::to_vec_pretty(users).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })?;

        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| StoreError::io(dir, e))?;
        tmp.write_all(&data)
            .map_err(|e| StoreError::io(tmp.path(), e))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| StoreError::io(tmp.path(), e))?;
        tmp.persist(&self.path)
            .map_err(|e| StoreError::io(&self.path, e.error))?;

        self.fingerprint()
    }

    fn read_with<R>(&self, op: impl FnOnce(&UserMap) -> R) -> Result<R, StoreError> {
        {
            let cache = self.cache.read().map_err(|_| StoreError::LockPoisoned)?;
            if self.is_fresh(&cache)? {
                return Ok(op(&cache.users));
            }
        }

        let mut cache = self.cache.write().map_err(|_| StoreError::LockPoisoned)?;
        if !self.is_fresh(&cache)? {
            self.reload(&mut cache)?;
        }
        Ok(op(&cache.users))
    }

    fn write_with<R>(
        &self,
        op: impl FnOnce(&mut UserMap) -> Result<R, StoreError>,
    ) -> Result<R, StoreError> {
        let mut cache = self.cache.write().map_err(|_| StoreError::LockPoisoned)?;
        if !self.is_fresh(&cache)? {
            self.reload(&mut cache)?;
        }

        let result = op(&mut cache.users)?;

        match self.persist(&cache.users) {
            Ok(fingerprint) => {
                cache.fingerprint = fingerprint;
                Ok(result)
            }
            Err(e) => {
                // The cache now holds a change the file does not
                cache.valid = false;
                warn!(path = %self.path.display(), error = %e, "Failed to persist user store");
                Err(e)
            }
        }
    }
}

fn parse_users(path: &Path, data: &[u8]) -> Result<UserMap, StoreError> {
    if data.iter().all(|b| b.is_ascii_whitespace()) {
        return Ok(UserMap::new());
    }

    serde_json::from_slice(data).map_err(|source| StoreError::Corrupt {
        path: path.to_path_buf(),
        source,
    })
}

impl UserRepository for JsonFileUserRepository {
    fn create(&self, user: &User) -> Result<(), StoreError> {
        self.write_with(|users| {
            users.insert(user.id.clone(), user.clone());
            Ok(())
        })
    }

    fn get_by_id(&self, id: &str) -> Result<User, StoreError> {
        self.read_with(|users| users.get(id).cloned())?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn get_by_username(&self, username: &str) -> Result<User, StoreError> {
        self.read_with(|users| users.values().find(|u| u.username == username).cloned())?
            .ok_or_else(|| StoreError::NotFound(username.to_string()))
    }

    fn update(&self, user: &User) -> Result<(), StoreError> {
        self.write_with(|users| match users.get_mut(&user.id) {
            Some(existing) => {
                *existing = user.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound(user.id.clone())),
        })
    }

    fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.write_with(|users| {
            users
                .remove(id)
                .map(|_| ())
                .ok_or_else(|| StoreError::NotFound(id.to_string()))
        })
    }

    fn list(&self) -> Result<Vec<User>, StoreError> {
        self.read_with(|users| users.values().cloned().collect())
    }

    fn exists(&self, username: &str) -> Result<bool, StoreError> {
        self.read_with(|users| users.values().any(|u| u.username == username))
    }
}
