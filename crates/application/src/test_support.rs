//! Shared test doubles for service tests

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::error::ApplicationError;
use crate::ports::KeyValueStore;

/// In-process key-value store that records every write
#[derive(Debug, Default)]
pub struct MemoryKv {
    values: Mutex<HashMap<String, String>>,
    writes: Mutex<usize>,
}

impl MemoryKv {
    pub fn with_value(key: &str, value: &str) -> Self {
        let kv = Self::default();
        kv.values.lock().insert(key.to_string(), value.to_string());
        kv
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    pub fn write_count(&self) -> usize {
        *self.writes.lock()
    }
}

impl KeyValueStore for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<String>, ApplicationError> {
        Ok(self.values.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ApplicationError> {
        *self.writes.lock() += 1;
        self.values.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store whose writes always fail
#[derive(Debug, Default)]
pub struct ReadOnlyKv;

impl KeyValueStore for ReadOnlyKv {
    fn get(&self, _key: &str) -> Result<Option<String>, ApplicationError> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), ApplicationError> {
        Err(ApplicationError::Storage("quota exceeded".into()))
    }
}
