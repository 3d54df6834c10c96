//! Cart persistence seam
//!
//! A string key/value store, the same shape as browser local storage.
//! The cart writes its whole snapshot under one key on every mutation.

use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex};

pub trait CartStorage {
    /// Read the raw value stored under `key`
    fn read(&self, key: &str) -> io::Result<Option<String>>;

    /// Replace the value stored under `key`
    fn write(&self, key: &str, value: &str) -> io::Result<()>;
}

/// In-memory storage; clones share the same map
#[derive(Debug, Clone, Default)]
pub struct MemoryCartStorage {
    inner: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryCartStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> io::Error {
    io::Error::other("cart storage lock poisoned")
}

impl CartStorage for MemoryCartStorage {
    fn read(&self, key: &str) -> io::Result<Option<String>> {
        let map = self.inner.lock().map_err(|_| poisoned())?;
        Ok(map.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> io::Result<()> {
        let mut map = self.inner.lock().map_err(|_| poisoned())?;
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl<T: CartStorage + ?Sized> CartStorage for Arc<T> {
    fn read(&self, key: &str) -> io::Result<Option<String>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> io::Result<()> {
        (**self).write(key, value)
    }
}
