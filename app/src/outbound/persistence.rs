//! File-backed session snapshot store.
//!
//! Maps the persisted session to three device keys — `user.json`,
//! `coins.json`, `activities.json` — inside a capability-scoped directory.
//! Writes go through a hidden temp file and rename so a crash never leaves a
//! torn entry behind.

use std::io::{self, Write};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use camino::Utf8Path;
use cap_std::fs::{Dir, OpenOptions};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::domain::ports::{PersistedSession, SessionStateRepository, SessionStoreError};
use crate::domain::{ActivityRecord, CoinLedger, User};

const USER_KEY: &str = "user.json";
const COINS_KEY: &str = "coins.json";
const ACTIVITIES_KEY: &str = "activities.json";

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Session snapshot store over a capability-scoped device directory.
pub struct FileSessionStateRepository {
    dir: Dir,
}

impl FileSessionStateRepository {
    /// Open (creating if needed) the storage directory at `root`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionStoreError::Io`] when the directory cannot be
    /// created or opened.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, SessionStoreError> {
        let root = root.as_ref();
        std::fs::create_dir_all(root)
            .map_err(|err| SessionStoreError::io(format!("create {}: {err}", root.display())))?;
        let dir = Dir::open_ambient_dir(root, cap_std::ambient_authority())
            .map_err(|err| SessionStoreError::io(format!("open {}: {err}", root.display())))?;
        Ok(Self { dir })
    }

    fn read_entry<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, SessionStoreError> {
        let contents = match self.dir.read_to_string(key) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(SessionStoreError::io(format!("read {key}: {err}"))),
        };
        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|err| SessionStoreError::serialization(format!("decode {key}: {err}")))
    }

    fn write_entry<T: Serialize>(&self, key: &str, value: &T) -> Result<(), SessionStoreError> {
        let contents = serde_json::to_string_pretty(value)
            .map_err(|err| SessionStoreError::serialization(format!("encode {key}: {err}")))?;
        write_atomic(&self.dir, Utf8Path::new(key), &contents)
    }

    fn remove_entry(&self, key: &str) -> Result<(), SessionStoreError> {
        match self.dir.remove_file(key) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(SessionStoreError::io(format!("remove {key}: {err}"))),
        }
    }
}

#[async_trait]
impl SessionStateRepository for FileSessionStateRepository {
    async fn load(&self) -> Result<Option<PersistedSession>, SessionStoreError> {
        let Some(user) = self.read_entry::<User>(USER_KEY)? else {
            return Ok(None);
        };
        let coins = self.read_entry::<CoinLedger>(COINS_KEY)?.unwrap_or_default();
        let activities = self
            .read_entry::<Vec<ActivityRecord>>(ACTIVITIES_KEY)?
            .unwrap_or_default();
        debug!(activities = activities.len(), "rehydrated session snapshot");
        Ok(Some(PersistedSession {
            user,
            coins,
            activities,
        }))
    }

    async fn save(&self, session: &PersistedSession) -> Result<(), SessionStoreError> {
        self.write_entry(USER_KEY, &session.user)?;
        self.write_entry(COINS_KEY, &session.coins)?;
        self.write_entry(ACTIVITIES_KEY, &session.activities)?;
        debug!(
            balance = session.coins.balance(),
            activities = session.activities.len(),
            "persisted session snapshot"
        );
        Ok(())
    }

    async fn clear(&self) -> Result<(), SessionStoreError> {
        self.remove_entry(USER_KEY)?;
        self.remove_entry(COINS_KEY)?;
        self.remove_entry(ACTIVITIES_KEY)?;
        Ok(())
    }
}

/// Write `contents` to `path` via a hidden temp file and rename.
fn write_atomic(dir: &Dir, path: &Utf8Path, contents: &str) -> Result<(), SessionStoreError> {
    let Some(file_name) = path.file_name() else {
        return Err(SessionStoreError::io(format!(
            "storage key {path} must name a file"
        )));
    };
    let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let tmp_name = format!(".{}.tmp.{}.{}", file_name, std::process::id(), counter);

    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    let result = dir
        .open_with(&tmp_name, &options)
        .and_then(|mut file| {
            file.write_all(contents.as_bytes())?;
            file.sync_all()
        })
        .and_then(|()| rename_over(dir, &tmp_name, file_name));
    if let Err(err) = result {
        // Best-effort cleanup; the temp name is unique per attempt.
        let _ = dir.remove_file(&tmp_name);
        return Err(SessionStoreError::io(format!("write {path}: {err}")));
    }

    // Best-effort directory sync; rename durability is advisory here.
    if let Ok(handle) = dir.open(".") {
        let _ = handle.sync_all();
    }
    Ok(())
}

#[cfg(windows)]
fn rename_over(dir: &Dir, tmp_name: &str, target_name: &str) -> io::Result<()> {
    // Windows rename fails if the target exists, so remove it first.
    match dir.remove_file(target_name) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err),
    }
    dir.rename(tmp_name, dir, target_name)
}

#[cfg(not(windows))]
fn rename_over(dir: &Dir, tmp_name: &str, target_name: &str) -> io::Result<()> {
    dir.rename(tmp_name, dir, target_name)
}
