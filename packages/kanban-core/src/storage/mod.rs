pub mod board_store;
pub mod local;
pub mod memory;

pub use board_store::{board_key, BoardStore, BOARDS_KEY};
pub use local::LocalStore;
pub use memory::MemoryStore;

/// String-keyed durable storage, one document per key.
/// Implementations: LocalStore (filesystem), MemoryStore (in-process).
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value in one step.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Returns whether a value was present.
    fn remove(&self, key: &str) -> Result<bool, StorageError>;

    fn contains(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.get(key)?.is_some())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Encoding error: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Refusing to overwrite non-empty value for {0} with empty content")]
    EmptyWrite(String),
}

/// A stored document that could not be turned into a well-formed value.
/// Never fatal: the store logs it and reports the value as absent.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Duplicate {scope} id: {id}")]
    DuplicateId { scope: &'static str, id: String },

    /// A card collection with set semantics holds the same entry twice.
    #[error("Duplicate {scope}: {value}")]
    DuplicateEntry { scope: &'static str, value: String },
}
