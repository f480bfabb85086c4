//! 会话存储能力
//!
//! 浏览器 sessionStorage 的抽象：生命周期等于一次会话，不跨会话共享，
//! 只由外部会话生命周期清空。

use crate::error::SessionStoreError;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// 品牌文档在会话存储中的键
pub const BRAND_DATA_KEY: &str = "brandData";

/// 会话级键值存储
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: String) -> Result<(), SessionStoreError>;

    fn clear(&self);
}

/// 内存会话存储
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: String) -> Result<(), SessionStoreError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value);
        Ok(())
    }

    fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemorySessionStore::new();
        assert!(store.is_empty());
        assert_eq!(store.get(BRAND_DATA_KEY), None);

        store.set(BRAND_DATA_KEY, "{}".to_string()).unwrap();
        assert_eq!(store.get(BRAND_DATA_KEY).as_deref(), Some("{}"));
        assert_eq!(store.len(), 1);

        store.clear();
        assert!(store.is_empty());
    }
}
