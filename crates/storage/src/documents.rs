//! Filesystem-backed document store.
//!
//! One directory per collection, one JSON document per record. Callers only
//! see the gateway operations (insert/get/list/delete); the layout on disk
//! is an implementation detail and may change with the backend.

use std::fs;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use records::{RecordId, Result, ServiceError};

/// A persistable record: the store assigns identity and creation time on
/// insert when the document does not carry them yet.
pub trait Document: Serialize + DeserializeOwned {
    /// Human-readable collection member name used in error messages
    const KIND: &'static str;

    fn id(&self) -> &str;
    fn set_id(&mut self, id: RecordId);
    fn created_at(&self) -> Option<DateTime<Utc>>;
    fn set_created_at(&mut self, at: DateTime<Utc>);
}

/// Handle to one named collection of documents.
#[derive(Debug, Clone)]
pub struct Collection<T> {
    name: &'static str,
    dir: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: Document> Collection<T> {
    fn new(root: &Path, name: &'static str) -> Self {
        Self {
            name,
            dir: root.join(name),
            _marker: PhantomData,
        }
    }

    /// Resolve a document path, refusing ids that could escape the
    /// collection directory. Generated ids are uuids, so anything outside
    /// this character set never names a real document.
    fn document_path(&self, id: &str) -> Option<PathBuf> {
        let safe = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        safe.then(|| self.dir.join(format!("{id}.json")))
    }

    /// Insert a document, assigning a uuid identifier and a UTC creation
    /// timestamp when unset, and return the completed document.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Persistence` on a duplicate identifier or any
    /// filesystem/serialization failure.
    pub fn insert(&self, mut doc: T) -> Result<T> {
        fs::create_dir_all(&self.dir).map_err(|err| {
            ServiceError::persistence(format!("failed to open collection {}: {err}", self.name))
        })?;

        if doc.id().is_empty() {
            doc.set_id(Uuid::new_v4().to_string());
        }
        if doc.created_at().is_none() {
            doc.set_created_at(Utc::now());
        }

        let path = self.document_path(doc.id()).ok_or_else(|| {
            ServiceError::persistence(format!("invalid {} id: {}", T::KIND, doc.id()))
        })?;
        if path.exists() {
            return Err(ServiceError::persistence(format!(
                "duplicate {} id: {}",
                T::KIND,
                doc.id()
            )));
        }

        let json = serde_json::to_vec_pretty(&doc)
            .map_err(|err| ServiceError::persistence(format!("failed to encode {}: {err}", T::KIND)))?;
        fs::write(&path, json).map_err(|err| {
            ServiceError::persistence(format!("failed to write {}: {err}", path.display()))
        })?;

        Ok(doc)
    }

    /// Fetch one document by id.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` on a miss and
    /// `ServiceError::Persistence` on unreadable or corrupt documents.
    pub fn get(&self, id: &str) -> Result<T> {
        let path = self
            .document_path(id)
            .ok_or_else(|| ServiceError::not_found(T::KIND, id))?;

        let raw = match fs::read(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(ServiceError::not_found(T::KIND, id));
            }
            Err(err) => {
                return Err(ServiceError::persistence(format!(
                    "failed to read {}: {err}",
                    path.display()
                )));
            }
        };

        serde_json::from_slice(&raw).map_err(|err| {
            ServiceError::persistence(format!("corrupt {} document {id}: {err}", T::KIND))
        })
    }

    /// List documents ordered by creation timestamp, newest first.
    ///
    /// `limit <= 0` means unbounded; `offset` skips from the newest end.
    pub fn list(&self, limit: i64, offset: usize) -> Result<Vec<T>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            // A collection nothing was ever inserted into is simply empty
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                return Err(ServiceError::persistence(format!(
                    "failed to open collection {}: {err}",
                    self.name
                )));
            }
        };

        let mut docs: Vec<T> = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| {
                ServiceError::persistence(format!("failed to scan {}: {err}", self.name))
            })?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let raw = fs::read(&path).map_err(|err| {
                ServiceError::persistence(format!("failed to read {}: {err}", path.display()))
            })?;
            let doc = serde_json::from_slice(&raw).map_err(|err| {
                ServiceError::persistence(format!(
                    "corrupt {} document {}: {err}",
                    T::KIND,
                    path.display()
                ))
            })?;
            docs.push(doc);
        }

        docs.sort_by(|a, b| b.created_at().cmp(&a.created_at()));

        let iter = docs.into_iter().skip(offset);
        if limit > 0 {
            Ok(iter.take(limit as usize).collect())
        } else {
            Ok(iter.collect())
        }
    }

    /// Delete one document by id.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` when no such document exists.
    pub fn delete(&self, id: &str) -> Result<()> {
        let path = self
            .document_path(id)
            .ok_or_else(|| ServiceError::not_found(T::KIND, id))?;

        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                Err(ServiceError::not_found(T::KIND, id))
            }
            Err(err) => Err(ServiceError::persistence(format!(
                "failed to delete {}: {err}",
                path.display()
            ))),
        }
    }
}

/// Root of the document store; hands out collection handles.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    root: PathBuf,
}

impl DocumentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn collection<T: Document>(&self, name: &'static str) -> Collection<T> {
        Collection::new(&self.root, name)
    }
}
