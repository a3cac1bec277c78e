//! Key/value persistence for settings and the high score
//!
//! Backends:
//! - `LocalStorage` in the browser
//! - `FileStorage` on native (one JSON file per key)
//! - `MemoryStorage` for tests and headless runs without a data dir
//!
//! Callers treat storage as best effort: failures are logged and the game
//! carries on with defaults.

use std::collections::HashMap;
use std::io;

/// Minimal string key/value store
pub trait Storage {
    /// Stored value for `key`, if any
    fn get(&self, key: &str) -> Option<String>;
    /// Store `value` under `key`
    fn set(&mut self, key: &str, value: &str) -> io::Result<()>;
}

/// In-process store
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use native::FileStorage;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use super::Storage;
    use std::fs;
    use std::io;
    use std::path::PathBuf;

    /// Directory-backed store: `<dir>/<key>.json`
    #[derive(Debug, Clone)]
    pub struct FileStorage {
        dir: PathBuf,
    }

    impl FileStorage {
        pub fn new(dir: impl Into<PathBuf>) -> Self {
            Self { dir: dir.into() }
        }

        fn path_for(&self, key: &str) -> PathBuf {
            let name: String = key
                .chars()
                .map(|c| {
                    if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                        c
                    } else {
                        '_'
                    }
                })
                .collect();
            self.dir.join(format!("{name}.json"))
        }
    }

    impl Storage for FileStorage {
        fn get(&self, key: &str) -> Option<String> {
            let path = self.path_for(key);
            match fs::read_to_string(&path) {
                Ok(contents) => Some(contents),
                Err(e) if e.kind() == io::ErrorKind::NotFound => None,
                Err(e) => {
                    log::warn!("Failed to read {}: {}", path.display(), e);
                    None
                }
            }
        }

        fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
            fs::create_dir_all(&self.dir)?;
            // Write then rename so a crash never leaves a torn file
            let path = self.path_for(key);
            let tmp = path.with_extension("json.tmp");
            fs::write(&tmp, value)?;
            fs::rename(&tmp, &path)
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::LocalStorage;

#[cfg(target_arch = "wasm32")]
mod web {
    use super::Storage;
    use std::io;

    /// Browser `window.localStorage`
    pub struct LocalStorage {
        inner: Option<web_sys::Storage>,
    }

    impl LocalStorage {
        pub fn new() -> Self {
            let inner = web_sys::window()
                .and_then(|w| w.local_storage().ok())
                .flatten();
            if inner.is_none() {
                log::warn!("LocalStorage unavailable, nothing will be saved");
            }
            Self { inner }
        }
    }

    impl Default for LocalStorage {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Storage for LocalStorage {
        fn get(&self, key: &str) -> Option<String> {
            self.inner.as_ref()?.get_item(key).ok().flatten()
        }

        fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
            let Some(storage) = &self.inner else {
                return Err(io::Error::new(io::ErrorKind::Unsupported, "no LocalStorage"));
            };
            storage
                .set_item(key, value)
                .map_err(|e| io::Error::other(format!("{e:?}")))
        }
    }
}
