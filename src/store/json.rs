use super::{check_timetable_name, Namespace, ResourceStore, StoreKey, StoreLayout};
use crate::error::StoreError;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Store fichiers : un fichier JSON par collection, un dossier pour les emplois du temps.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
    layout: StoreLayout,
}

impl JsonFileStore {
    /// Ouvre le store et crée le dossier des emplois du temps au besoin.
    pub fn open<P: AsRef<Path>>(root: P, layout: StoreLayout) -> Result<Self, StoreError> {
        let store = Self {
            root: root.as_ref().to_path_buf(),
            layout,
        };
        let dir = store.timetable_dir();
        fs::create_dir_all(&dir).map_err(|source| StoreError::Io { path: dir, source })?;
        Ok(store)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn timetable_dir(&self) -> PathBuf {
        self.root.join(&self.layout.timetable_dir)
    }

    pub fn path_for(&self, key: &StoreKey) -> Result<PathBuf, StoreError> {
        let path = match key {
            StoreKey::Teachers => self.root.join(&self.layout.teachers),
            StoreKey::Groups => self.root.join(&self.layout.groups),
            StoreKey::Rooms => self.root.join(&self.layout.rooms),
            StoreKey::Constraints => self.root.join(&self.layout.constraints),
            StoreKey::Timetable(name) => {
                check_timetable_name(name)?;
                self.timetable_dir().join(name)
            }
        };
        Ok(path)
    }

    fn namespace_dir(&self, namespace: Namespace) -> PathBuf {
        match namespace {
            Namespace::Timetables => self.timetable_dir(),
        }
    }
}

impl ResourceStore for JsonFileStore {
    fn fetch(&self, key: &StoreKey) -> Result<Option<Value>, StoreError> {
        let path = self.path_for(key)?;
        let data = match fs::read(&path) {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "not found, treating as empty");
                return Ok(None);
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        let value = serde_json::from_slice(&data).map_err(|source| StoreError::Parse {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "read");
        Ok(Some(value))
    }

    fn persist(&self, key: &StoreKey, value: &Value) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        let json = serde_json::to_vec_pretty(value)?;
        let dir = path.parent().unwrap_or_else(|| Path::new(".")).to_path_buf();
        let io_err = |source| StoreError::Io {
            path: path.clone(),
            source,
        };
        let mut tmp = NamedTempFile::new_in(&dir).map_err(|source| StoreError::Io {
            path: dir.clone(),
            source,
        })?;
        tmp.write_all(&json).map_err(io_err)?;
        tmp.flush().map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(&path).map_err(|e| StoreError::Persist {
            path: path.clone(),
            source: e.error,
        })?;
        tracing::info!(path = %path.display(), "written");
        Ok(())
    }

    fn list(&self, namespace: Namespace) -> Result<Vec<String>, StoreError> {
        let dir = self.namespace_dir(namespace);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(StoreError::Io { path: dir, source }),
        };
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| StoreError::Io {
                path: dir.clone(),
                source,
            })?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.ends_with(".json") {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    fn delete_all(&self, namespace: Namespace) -> Result<usize, StoreError> {
        let dir = self.namespace_dir(namespace);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(0),
            Err(source) => return Err(StoreError::Io { path: dir, source }),
        };
        let mut removed = 0;
        for entry in entries {
            let path = entry
                .map_err(|source| StoreError::Io {
                    path: dir.clone(),
                    source,
                })?
                .path();
            if path.is_file() {
                fs::remove_file(&path).map_err(|source| StoreError::Io {
                    path: path.clone(),
                    source,
                })?;
                removed += 1;
            }
        }
        tracing::info!(dir = %dir.display(), removed, "timetables cleared");
        Ok(removed)
    }

    fn modified(&self, key: &StoreKey) -> Result<Option<DateTime<Utc>>, StoreError> {
        let path = self.path_for(key)?;
        Ok(fs::metadata(&path)
            .and_then(|meta| meta.modified())
            .ok()
            .map(DateTime::<Utc>::from))
    }
}
