//! Flat JSON file backend.
//!
//! # Responsibility
//! - Persist one entity collection as a single JSON array document.
//!
//! # Invariants
//! - `save` replaces the whole document via temp file + rename; readers
//!   never observe a partially written file.
//! - A missing document loads as an empty collection (first run).
//! - `configure` creates the target directory at most once per location.

use super::backend::{is_valid_store_name, Backend};
use super::{StoreError, StoreResult};
use crate::model::entity::Entity;
use log::{error, info};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::time::Instant;

const FILE_EXTENSION: &str = "json";

/// JSON document cache for entities of type `E`.
#[derive(Debug)]
pub struct FileCache<E> {
    path: Option<PathBuf>,
    _entity: PhantomData<E>,
}

impl<E> Default for FileCache<E> {
    fn default() -> Self {
        Self {
            path: None,
            _entity: PhantomData,
        }
    }
}

impl<E> FileCache<E> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<E> Backend<E> for FileCache<E>
where
    E: Entity + Serialize + DeserializeOwned,
{
    fn kind(&self) -> &'static str {
        "file_cache"
    }

    fn configure(&mut self, name: &str, connection_url: &str) -> StoreResult<()> {
        let requested = resolve_document_path(name, connection_url)?;

        if let Some(current) = &self.path {
            if *current == requested {
                return Ok(());
            }
            return Err(StoreError::AlreadyConfigured {
                current: current.display().to_string(),
                requested: requested.display().to_string(),
            });
        }

        if let Some(dir) = requested.parent() {
            fs::create_dir_all(dir).map_err(|err| StoreError::io(dir, err))?;
        }

        info!(
            "event=store_configure module=store status=ok backend=file_cache path={}",
            requested.display()
        );
        self.path = Some(requested);
        Ok(())
    }

    fn location(&self) -> Option<String> {
        self.path.as_ref().map(|path| path.display().to_string())
    }

    fn load(&mut self) -> StoreResult<Vec<E>> {
        let path = self.path.as_ref().ok_or(StoreError::NotConfigured)?;
        let started_at = Instant::now();

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    "event=file_read module=store status=ok backend=file_cache missing=true path={}",
                    path.display()
                );
                return Ok(Vec::new());
            }
            Err(err) => {
                error!(
                    "event=file_read module=store status=error backend=file_cache path={} error={}",
                    path.display(),
                    err
                );
                return Err(StoreError::io(path, err));
            }
        };

        let entities: Vec<E> =
            serde_json::from_str(&content).map_err(|source| StoreError::Json {
                path: path.clone(),
                source,
            })?;

        info!(
            "event=file_read module=store status=ok backend=file_cache count={} duration_ms={}",
            entities.len(),
            started_at.elapsed().as_millis()
        );
        Ok(entities)
    }

    fn save(&mut self, entities: &[E]) -> StoreResult<()> {
        let path = self.path.as_ref().ok_or(StoreError::NotConfigured)?;
        let started_at = Instant::now();

        let content =
            serde_json::to_string_pretty(entities).map_err(|source| StoreError::Json {
                path: path.clone(),
                source,
            })?;

        if let Err(err) = replace_file(path, content.as_bytes()) {
            error!(
                "event=file_write module=store status=error backend=file_cache path={} error={}",
                path.display(),
                err
            );
            return Err(err);
        }

        info!(
            "event=file_write module=store status=ok backend=file_cache count={} duration_ms={}",
            entities.len(),
            started_at.elapsed().as_millis()
        );
        Ok(())
    }
}

fn resolve_document_path(name: &str, connection_url: &str) -> StoreResult<PathBuf> {
    let name = name.trim();
    if !is_valid_store_name(name) {
        return Err(StoreError::InvalidName(name.to_string()));
    }

    let dir = connection_url.trim();
    if dir.is_empty() {
        return Err(StoreError::InvalidLocation(
            "connection url cannot be empty".to_string(),
        ));
    }

    let file_name = if Path::new(name)
        .extension()
        .is_some_and(|ext| ext == FILE_EXTENSION)
    {
        name.to_string()
    } else {
        format!("{name}.{FILE_EXTENSION}")
    };

    Ok(Path::new(dir).join(file_name))
}

fn replace_file(path: &Path, bytes: &[u8]) -> StoreResult<()> {
    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    fs::write(&tmp_path, bytes).map_err(|err| StoreError::io(&tmp_path, err))?;
    if let Err(err) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(StoreError::io(path, err));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::resolve_document_path;
    use crate::store::StoreError;
    use std::path::PathBuf;

    #[test]
    fn document_path_appends_json_extension_once() {
        assert_eq!(
            resolve_document_path("Tasks", "/tmp/cache").unwrap(),
            PathBuf::from("/tmp/cache/Tasks.json")
        );
        assert_eq!(
            resolve_document_path("Tasks.json", "/tmp/cache").unwrap(),
            PathBuf::from("/tmp/cache/Tasks.json")
        );
    }

    #[test]
    fn document_path_rejects_blank_location_and_bad_names() {
        assert!(matches!(
            resolve_document_path("Tasks", "  "),
            Err(StoreError::InvalidLocation(_))
        ));
        assert!(matches!(
            resolve_document_path("a/b", "/tmp"),
            Err(StoreError::InvalidName(_))
        ));
    }
}
