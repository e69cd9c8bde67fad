//! # File I/O Module
//!
//! Session files and exports, with safety features:
//! - **Atomic writes**: write to `.tmp`, sync, rename, so an interrupted save
//!   never leaves a truncated file
//! - **File locking**: a `.cao.lock` file plus an OS lock stop two windows
//!   from saving the same session
//! - **Version validation**: refuse sessions written by a newer schema
//!
//! ## Example
//!
//! ```rust,no_run
//! use cao_core::file_io::{load_session_or_default, save_session, FileLock};
//! use std::path::Path;
//!
//! let path = Path::new("atelier.cao");
//! let lock = FileLock::acquire(path, "atelier").unwrap();
//! let session = load_session_or_default(path, "atelier").unwrap();
//! save_session(&session, path).unwrap();
//! drop(lock);
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::session::{Session, SCHEMA_VERSION};

/// Default session file extension
pub const SESSION_EXTENSION: &str = "cao";

/// Lock file metadata stored in `.cao.lock` files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockInfo {
    /// User name of the lock holder
    pub user_id: String,
    pub machine: String,
    pub pid: u32,
    pub locked_at: DateTime<Utc>,
}

impl LockInfo {
    pub fn new(user_id: impl Into<String>) -> Self {
        LockInfo {
            user_id: user_id.into(),
            machine: hostname().unwrap_or_else(|| "inconnu".to_string()),
            pid: std::process::id(),
            locked_at: Utc::now(),
        }
    }
}

fn hostname() -> Option<String> {
    #[cfg(windows)]
    {
        std::env::var("COMPUTERNAME").ok()
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOSTNAME")
            .ok()
            .or_else(|| std::env::var("HOST").ok())
    }
}

/// Session lock guard, released on drop.
///
/// Holds an OS-level lock (fs2) on the lock file, which also carries the
/// holder's metadata for the "locked by" message.
pub struct FileLock {
    session_path: PathBuf,
    lock_path: PathBuf,
    _lock_file: File,
    pub info: LockInfo,
}

impl FileLock {
    /// Acquire an exclusive lock on a session file.
    ///
    /// Returns `CalcError::FileLocked` when another live process holds it.
    pub fn acquire(path: &Path, user_id: impl Into<String>) -> CalcResult<Self> {
        let lock_path = lock_path_for(path);
        let info = LockInfo::new(user_id);

        if let Ok(existing) = read_lock_info(&lock_path) {
            if !is_lock_stale(&existing) {
                return Err(CalcError::file_locked(
                    path.display().to_string(),
                    format!("{} ({})", existing.user_id, existing.machine),
                    existing.locked_at.to_rfc3339(),
                ));
            }
            tracing::info!(path = %lock_path.display(), holder = %existing.user_id, "taking over stale lock");
        }

        let mut lock_file = OpenOptions::new()
            .write(true)
            .read(true)
            .create(true)
            .truncate(true)
            .open(&lock_path)
            .map_err(|e| CalcError::file_error("création du verrou", lock_path.display().to_string(), e.to_string()))?;

        lock_file.try_lock_exclusive().map_err(|_| {
            CalcError::file_locked(path.display().to_string(), "un autre processus", "inconnu")
        })?;

        let lock_json = serde_json::to_string_pretty(&info).map_err(|e| CalcError::SerializationError {
            reason: e.to_string(),
        })?;
        lock_file
            .write_all(lock_json.as_bytes())
            .and_then(|_| lock_file.sync_all())
            .map_err(|e| CalcError::file_error("écriture du verrou", lock_path.display().to_string(), e.to_string()))?;

        Ok(FileLock {
            session_path: path.to_path_buf(),
            lock_path,
            _lock_file: lock_file,
            info,
        })
    }

    /// Current holder of a session lock, if any.
    pub fn check(path: &Path) -> Option<LockInfo> {
        read_lock_info(&lock_path_for(path))
            .ok()
            .filter(|info| !is_lock_stale(info))
    }

    pub fn session_path(&self) -> &Path {
        &self.session_path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
    }
}

fn lock_path_for(session_path: &Path) -> PathBuf {
    let mut lock_path = session_path.to_path_buf();
    let extension = lock_path
        .extension()
        .map(|e| format!("{}.lock", e.to_string_lossy()))
        .unwrap_or_else(|| "lock".to_string());
    lock_path.set_extension(extension);
    lock_path
}

fn read_lock_info(lock_path: &Path) -> CalcResult<LockInfo> {
    let contents = read_text(lock_path, "lecture du verrou")?;
    serde_json::from_str(&contents).map_err(|e| CalcError::SerializationError { reason: e.to_string() })
}

/// A lock is stale when its process is gone (same machine) or it is older
/// than a day.
fn is_lock_stale(info: &LockInfo) -> bool {
    if hostname().as_deref() == Some(info.machine.as_str()) {
        #[cfg(unix)]
        {
            if fs::metadata(format!("/proc/{}", info.pid)).is_err() {
                return true;
            }
        }
        #[cfg(windows)]
        {
            use std::process::Command;
            let output = Command::new("tasklist")
                .args(["/FI", &format!("PID eq {}", info.pid), "/NH"])
                .output();
            if let Ok(output) = output {
                let stdout = String::from_utf8_lossy(&output.stdout);
                if !stdout.contains(&info.pid.to_string()) {
                    return true;
                }
            }
        }
    }
    (Utc::now() - info.locked_at).num_hours() > 24
}

fn read_text(path: &Path, operation: &str) -> CalcResult<String> {
    let mut file =
        File::open(path).map_err(|e| CalcError::file_error(operation, path.display().to_string(), e.to_string()))?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| CalcError::file_error(operation, path.display().to_string(), e.to_string()))?;
    Ok(contents)
}

/// Write `contents` to `path` atomically: temp file, fsync, rename.
pub fn write_atomic(path: &Path, contents: &str) -> CalcResult<()> {
    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    let mut tmp_file = File::create(&tmp_path)
        .map_err(|e| CalcError::file_error("création du fichier temporaire", tmp_path.display().to_string(), e.to_string()))?;
    tmp_file
        .write_all(contents.as_bytes())
        .and_then(|_| tmp_file.sync_all())
        .map_err(|e| CalcError::file_error("écriture du fichier temporaire", tmp_path.display().to_string(), e.to_string()))?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CalcError::file_error("renommage final", path.display().to_string(), e.to_string())
    })
}

/// Save a session as pretty JSON with atomic write semantics.
pub fn save_session(session: &Session, path: &Path) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(session).map_err(|e| CalcError::SerializationError {
        reason: e.to_string(),
    })?;
    write_atomic(path, &json)?;
    tracing::info!(path = %path.display(), entries = session.history.len(), "session saved");
    Ok(())
}

/// Load a session file, checking its schema version.
pub fn load_session(path: &Path) -> CalcResult<Session> {
    let contents = read_text(path, "ouverture")?;
    let session: Session = serde_json::from_str(&contents).map_err(|e| CalcError::SerializationError {
        reason: format!("JSON invalide dans {} : {}", path.display(), e),
    })?;
    validate_version(&session.meta.version)?;
    session.settings.validate()?;
    tracing::info!(
        path = %path.display(),
        entries = session.history.len(),
        memo = session.memo.is_some(),
        "session loaded"
    );
    Ok(session)
}

/// Load a session, or start a fresh one when the file does not exist yet.
pub fn load_session_or_default(path: &Path, author: &str) -> CalcResult<Session> {
    if path.exists() {
        load_session(path)
    } else {
        tracing::info!(path = %path.display(), "no session file, starting a new session");
        Ok(Session::new(author))
    }
}

/// Load a session, also reporting whether another user holds its lock.
pub fn load_session_with_lock_check(path: &Path) -> CalcResult<(Session, Option<LockInfo>)> {
    let session = load_session(path)?;
    Ok((session, FileLock::check(path)))
}

/// Major must match; for 0.x the file minor may not be newer.
fn validate_version(file_version: &str) -> CalcResult<()> {
    let parse = |v: &str| -> Vec<u32> { v.split('.').filter_map(|p| p.parse().ok()).collect() };
    let file_parts = parse(file_version);
    let current_parts = parse(SCHEMA_VERSION);
    let mismatch = || CalcError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    match (file_parts.as_slice(), current_parts.as_slice()) {
        ([file_major, rest @ ..], [major, current_rest @ ..]) => {
            if file_major != major {
                return Err(mismatch());
            }
            if *major == 0 {
                if let (Some(file_minor), Some(minor)) = (rest.first(), current_rest.first()) {
                    if file_minor > minor {
                        return Err(mismatch());
                    }
                }
            }
            Ok(())
        }
        _ => Err(mismatch()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env::temp_dir;

    fn temp_session_path(name: &str) -> PathBuf {
        temp_dir().join(format!("cao_test_{}_{}.cao", name, std::process::id()))
    }

    #[test]
    fn test_lock_path_generation() {
        let lock_path = lock_path_for(Path::new("/ateliers/moteur.cao"));
        assert_eq!(lock_path, Path::new("/ateliers/moteur.cao.lock"));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let path = temp_session_path("roundtrip");
        let mut session = Session::new("Atelier");
        session.settings.csv_decimals = 2;
        save_session(&session, &path).unwrap();

        let loaded = load_session(&path).unwrap();
        assert_eq!(loaded.meta.author, "Atelier");
        assert_eq!(loaded.settings.csv_decimals, 2);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_atomic_save_creates_no_tmp_file() {
        let path = temp_session_path("atomic");
        save_session(&Session::default(), &path).unwrap();

        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        assert!(!PathBuf::from(tmp).exists());
        assert!(path.exists());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_starts_fresh() {
        let path = temp_session_path("missing");
        let session = load_session_or_default(&path, "nouveau").unwrap();
        assert_eq!(session.meta.author, "nouveau");
        assert_eq!(load_session(&path).unwrap_err().error_code(), "FILE_ERROR");
    }

    #[test]
    fn test_invalid_json() {
        let path = temp_session_path("invalid");
        fs::write(&path, "pas du json").unwrap();
        assert_eq!(load_session(&path).unwrap_err().error_code(), "SERIALIZATION_ERROR");
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_out_of_range_settings_rejected_on_load() {
        let path = temp_session_path("settings");
        let mut session = Session::new("atelier");
        session.settings.csv_decimals = 70_000;
        save_session(&session, &path).unwrap();
        assert_eq!(load_session(&path).unwrap_err().error_code(), "INVALID_INPUT");

        session.settings.csv_decimals = 4;
        session.settings.gravity = -9.81;
        save_session(&session, &path).unwrap();
        assert_eq!(load_session(&path).unwrap_err().error_code(), "INVALID_INPUT");
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_file_lock_acquire_and_release() {
        let path = temp_session_path("lock");
        File::create(&path).unwrap();

        let lock = FileLock::acquire(&path, "atelier").unwrap();
        assert_eq!(lock.info.user_id, "atelier");
        let lock_path = lock_path_for(&path);
        assert!(lock_path.exists());

        drop(lock);
        assert!(!lock_path.exists());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version(SCHEMA_VERSION).is_ok());
        assert!(validate_version("0.1.5").is_ok());
        assert!(validate_version("1.0.0").is_err());
        assert!(validate_version("0.2.0").is_err());
        assert!(validate_version("abc").is_err());
    }
}
