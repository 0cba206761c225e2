use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::models::{Document, Id, Prices, Recipe, RecipePatch};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("recipe {0} not found")]
    RecipeNotFound(Id),
    #[error("failed to write '{}': {source}", .path.display())]
    Io { path: PathBuf, source: std::io::Error },
    #[error("failed to serialize document: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("'{}' could not be read at startup; refusing to overwrite it", .0.display())]
    Protected(PathBuf),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Why a document could not be read. Only `Missing` is safe to overwrite.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("file does not exist")]
    Missing,
    #[error("failed to read file: {0}")]
    Unreadable(std::io::Error),
    #[error("failed to parse document: {0}")]
    Malformed(serde_json::Error),
}

/// The in-memory mirror of the JSON document plus the file it lives in.
///
/// Writers hold the write lock across mutation and file write, so the file
/// never sees interleaved saves.
pub struct DocumentStore {
    path: PathBuf,
    doc: RwLock<Document>,
    protected: bool,
}

impl DocumentStore {
    /// Load the document at `path`; falls back to an empty one on any error.
    ///
    /// If the file exists but cannot be read or parsed, the store serves the
    /// empty document and rejects every save, leaving the file as it was.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (doc, protected) = match Self::read_document(&path) {
            Ok(doc) => (doc, false),
            Err(LoadError::Missing) => {
                warn!(path = %path.display(), "no document on disk; starting empty");
                (Document::default(), false)
            }
            Err(e) => {
                error!(path = %path.display(), "{e}; starting empty and leaving the file untouched");
                (Document::default(), true)
            }
        };
        Self { path, doc: RwLock::new(doc), protected }
    }

    pub fn path(&self) -> &Path { &self.path }

    /// True when saves are refused because the file on disk was not understood.
    pub fn is_protected(&self) -> bool { self.protected }

    pub fn read_document(path: &Path) -> Result<Document, LoadError> {
        let bytes = std::fs::read(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => LoadError::Missing,
            _ => LoadError::Unreadable(e),
        })?;
        let doc = serde_json::from_slice::<Document>(&bytes).map_err(LoadError::Malformed)?;
        info!(path = %path.display(), recipes = doc.recipes.len(), "loaded document");
        Ok(doc)
    }

    /// Read and parse the document. Never fails: a missing or corrupt file
    /// yields `{recipes: [], prices: {}}` and a warning.
    pub fn load(path: &Path) -> Document {
        Self::read_document(path).unwrap_or_else(|e| {
            warn!(path = %path.display(), "{e}; using an empty document");
            Document::default()
        })
    }

    /// Overwrite `path` with the whole document, pretty-printed UTF-8.
    pub fn save(path: &Path, doc: &Document) -> StoreResult<()> {
        let mut bytes = serde_json::to_vec_pretty(doc).map_err(|e| {
            error!("failed to serialize document: {e}");
            StoreError::Serialize(e)
        })?;
        bytes.push(b'\n');
        std::fs::write(path, bytes).map_err(|source| {
            error!(path = %path.display(), "failed to save document: {source}");
            StoreError::Io { path: path.to_path_buf(), source }
        })?;
        debug!(path = %path.display(), "document saved");
        Ok(())
    }

    fn ensure_writable(&self) -> StoreResult<()> {
        if self.protected {
            error!(path = %self.path.display(), "save refused: document was not loaded from disk");
            return Err(StoreError::Protected(self.path.clone()));
        }
        Ok(())
    }

    // lock poisoning is ignored
    fn read(&self) -> RwLockReadGuard<'_, Document> {
        self.doc.read().unwrap_or_else(|p| p.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Document> {
        self.doc.write().unwrap_or_else(|p| p.into_inner())
    }

    pub fn snapshot(&self) -> Document { self.read().clone() }

    pub fn recipes(&self) -> Vec<Recipe> { self.read().recipes.clone() }

    pub fn prices(&self) -> Value { self.read().prices.clone() }

    /// Merge `patch` into the first recipe with `id` and persist.
    ///
    /// An unknown id leaves the document untouched. A failed save keeps the
    /// in-memory change.
    pub fn update_recipe(&self, id: Id, patch: &RecipePatch) -> StoreResult<Recipe> {
        let mut doc = self.write();
        let recipe = doc.recipes.iter_mut().find(|r| r.has_id(id)).ok_or(StoreError::RecipeNotFound(id))?;
        self.ensure_writable()?;
        recipe.apply(patch);
        let updated = recipe.clone();
        Self::save(&self.path, &doc)?;
        Ok(updated)
    }

    /// Replace the whole prices mapping and persist.
    pub fn replace_prices(&self, prices: Prices) -> StoreResult<Prices> {
        self.ensure_writable()?;
        let mut doc = self.write();
        doc.prices = Value::Object(prices.clone());
        Self::save(&self.path, &doc)?;
        Ok(prices)
    }
}
