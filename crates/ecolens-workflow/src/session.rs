//! Session-scoped key/value storage
//!
//! Holds the record between workflow stages. Everything here is transient
//! and cleared on logout.

use ecolens_domain::{DataSource, ProductRecord};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Keys of the persisted session layout
pub mod keys {
    /// JSON-serialized product record
    pub const PRODUCT_DATA: &str = "productData";
    /// Raw free-text input that produced the record
    pub const ORIGINAL_INPUT: &str = "originalInput";
    /// Selected data source tag
    pub const DATA_SOURCE: &str = "dataSource";
    /// Selected entry mode
    pub const SELECTED_OPTION: &str = "selectedOption";
    /// Signed-in user (display only)
    pub const USERNAME: &str = "username";
}

/// Errors from session storage
#[derive(Error, Debug)]
pub enum SessionError {
    /// Reading or writing the backing file failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A stored value could not be decoded
    #[error("Corrupt session value for '{key}': {message}")]
    Corrupt {
        /// Key holding the bad value
        key: String,
        /// Decoder message
        message: String,
    },

    /// Encoding a value failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Trait for session storage backends
pub trait SessionStore {
    /// Read a value
    fn get(&self, key: &str) -> Result<Option<String>, SessionError>;

    /// Write a value
    fn set(&mut self, key: &str, value: &str) -> Result<(), SessionError>;

    /// Delete a value
    fn remove(&mut self, key: &str) -> Result<(), SessionError>;

    /// Delete every value
    fn clear(&mut self) -> Result<(), SessionError>;
}

/// Typed accessors over any [`SessionStore`]
pub trait SessionExt: SessionStore {
    /// Stored product record, if any
    fn product_data(&self) -> Result<Option<ProductRecord>, SessionError> {
        match self.get(keys::PRODUCT_DATA)? {
            Some(json) => serde_json::from_str(&json)
                .map(Some)
                .map_err(|e| SessionError::Corrupt {
                    key: keys::PRODUCT_DATA.to_string(),
                    message: e.to_string(),
                }),
            None => Ok(None),
        }
    }

    /// Store the product record
    fn save_product_data(&mut self, record: &ProductRecord) -> Result<(), SessionError> {
        let json = serde_json::to_string(record)?;
        self.set(keys::PRODUCT_DATA, &json)
    }

    /// Stored data source; unknown tags are ignored
    fn data_source(&self) -> Result<Option<DataSource>, SessionError> {
        Ok(self
            .get(keys::DATA_SOURCE)?
            .and_then(|tag| DataSource::parse(&tag)))
    }

    /// Store the data source
    fn set_data_source(&mut self, source: DataSource) -> Result<(), SessionError> {
        self.set(keys::DATA_SOURCE, source.as_str())
    }

    /// Signed-in user
    fn username(&self) -> Result<Option<String>, SessionError> {
        self.get(keys::USERNAME)
    }
}

impl<T: SessionStore + ?Sized> SessionExt for T {}

/// In-memory session
#[derive(Debug, Default, Clone)]
pub struct MemorySession {
    values: BTreeMap<String, String>,
}

impl MemorySession {
    /// Create an empty session
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the session holds nothing
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl SessionStore for MemorySession {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SessionError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), SessionError> {
        self.values.remove(key);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), SessionError> {
        self.values.clear();
        Ok(())
    }
}

/// Session persisted as a JSON object in a file
///
/// Every write rewrites the whole file, so a separate process (the next CLI
/// invocation) sees the latest state.
#[derive(Debug, Clone)]
pub struct FileSession {
    path: PathBuf,
}

impl FileSession {
    /// Use the file at `path`; it is created on first write
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, SessionError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&contents).map_err(|e| SessionError::Corrupt {
            key: self.path.display().to_string(),
            message: e.to_string(),
        })
    }

    fn store(&self, values: &BTreeMap<String, String>) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(values)?)?;
        Ok(())
    }
}

impl SessionStore for FileSession {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SessionError> {
        let mut values = self.load()?;
        values.insert(key.to_string(), value.to_string());
        self.store(&values)
    }

    fn remove(&mut self, key: &str) -> Result<(), SessionError> {
        let mut values = self.load()?;
        if values.remove(key).is_some() {
            self.store(&values)?;
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
