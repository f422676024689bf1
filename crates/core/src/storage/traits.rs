use crate::errors::CoreError;

/// String key-value persistence for small pieces of client state
/// (palette assignments and the like).
///
/// Implementations must be shareable across services, hence `Send + Sync`
/// and `&self` receivers.
pub trait KeyValueStore: Send + Sync {
    /// Read a value. `Ok(None)` when the key has never been written.
    fn get(&self, key: &str) -> Result<Option<String>, CoreError>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<(), CoreError>;

    /// Delete a key. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), CoreError>;
}
