use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// File name of the persisted session record, fixed across releases so a
/// reinstalled client finds the previous session.
pub const SESSION_FILE: &str = "user-token.json";

/// Every file the client owns under its state directory. `wipe_all` removes
/// exactly these; logout must not leave a stale token behind.
pub const STATE_FILES: &[&str] = &[SESSION_FILE, "search-history.json"];

/// The on-disk shape of a session. Only the access token is persisted; the
/// logged-in flag is re-derived on rehydration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersistedSession {
    #[serde(rename = "accessToken")]
    pub access_token: Option<String>,
}

/// Persistence seam for the session record. The file-backed implementation is
/// the production one; tests swap in `MemorySessionStorage`.
pub trait SessionStorage: Send + Sync {
    fn load(&self) -> io::Result<Option<PersistedSession>>;
    fn save(&self, session: &PersistedSession) -> io::Result<()>;
    /// Removes the session record only.
    fn clear(&self) -> io::Result<()>;
    /// Removes every client-owned state file (logout / withdrawal).
    fn wipe_all(&self) -> io::Result<()>;
}

/// Stores the session as JSON under the client state directory.
pub struct FileSessionStorage {
    dir: PathBuf,
}

impl FileSessionStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn session_path(&self) -> PathBuf {
        self.dir.join(SESSION_FILE)
    }
}

impl SessionStorage for FileSessionStorage {
    fn load(&self) -> io::Result<Option<PersistedSession>> {
        match fs::read_to_string(self.session_path()) {
            Ok(raw) => {
                let session = serde_json::from_str(&raw)
                    .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
                Ok(Some(session))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn save(&self, session: &PersistedSession) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let raw = serde_json::to_string_pretty(session)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(self.session_path(), raw)
    }

    fn clear(&self) -> io::Result<()> {
        match fs::remove_file(self.session_path()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }

    fn wipe_all(&self) -> io::Result<()> {
        for name in STATE_FILES {
            match fs::remove_file(self.dir.join(name)) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}

/// In-memory storage for tests and ephemeral embedders.
#[derive(Default)]
pub struct MemorySessionStorage {
    inner: Mutex<Option<PersistedSession>>,
}

impl SessionStorage for MemorySessionStorage {
    fn load(&self) -> io::Result<Option<PersistedSession>> {
        Ok(self.inner.lock().expect("session storage poisoned").clone())
    }

    fn save(&self, session: &PersistedSession) -> io::Result<()> {
        *self.inner.lock().expect("session storage poisoned") = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> io::Result<()> {
        *self.inner.lock().expect("session storage poisoned") = None;
        Ok(())
    }

    fn wipe_all(&self) -> io::Result<()> {
        self.clear()
    }
}
