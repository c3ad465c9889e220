//! In-process document store.
//!
//! Holds a single JSON tree and mimics the Realtime Database semantics the
//! storefront relies on: `null` is absence, `update` merges one level deep,
//! `push` generates a fresh key. Failures can be injected to exercise the
//! error paths of callers.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use serde_json::{Map, Value};
use uuid::Uuid;

use super::{DocumentStore, StoreError};

/// In-memory [`DocumentStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    root: Mutex<Map<String, Value>>,
    failing_reads: AtomicU32,
    writes_failing: AtomicBool,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with `books` records keyed by id.
    #[must_use]
    pub fn with_books(books: Map<String, Value>) -> Self {
        let store = Self::new();
        if let Ok(mut root) = store.root.lock() {
            root.insert(super::BOOKS_PATH.to_string(), Value::Object(books));
        }
        store
    }

    /// Make the next `count` reads fail.
    pub fn fail_next_reads(&self, count: u32) {
        self.failing_reads.store(count, Ordering::SeqCst);
    }

    /// Make every write fail until switched back.
    pub fn set_writes_failing(&self, failing: bool) {
        self.writes_failing.store(failing, Ordering::SeqCst);
    }

    /// Snapshot of the value at `path`, for assertions.
    #[must_use]
    pub fn snapshot(&self, path: &str) -> Option<Value> {
        let root = self.root.lock().ok()?;
        lookup(&root, &segments(path)).cloned()
    }

    fn check_read(&self) -> Result<(), StoreError> {
        let took = self
            .failing_reads
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if took {
            return Err(StoreError::Unavailable("injected read failure".to_string()));
        }
        Ok(())
    }

    fn check_write(&self) -> Result<(), StoreError> {
        if self.writes_failing.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected write failure".to_string()));
        }
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Map<String, Value>>, StoreError> {
        self.root
            .lock()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))
    }
}

fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

fn lookup<'a>(root: &'a Map<String, Value>, segments: &[&str]) -> Option<&'a Value> {
    let (first, rest) = segments.split_first()?;
    rest.iter()
        .try_fold(root.get(*first)?, |node, key| node.as_object()?.get(*key))
}

/// Walk to the object at `segments`, creating intermediate objects.
fn lookup_mut<'a>(
    root: &'a mut Map<String, Value>,
    segments: &[&str],
) -> Result<&'a mut Map<String, Value>, StoreError> {
    let mut node = root;
    for key in segments {
        let child = node
            .entry((*key).to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if child.is_null() {
            *child = Value::Object(Map::new());
        }
        node = child
            .as_object_mut()
            .ok_or_else(|| StoreError::InvalidPath(segments.join("/")))?;
    }
    Ok(node)
}

impl DocumentStore for MemoryStore {
    async fn get(&self, path: &str) -> Result<Option<Value>, StoreError> {
        self.check_read()?;
        let root = self.lock()?;
        Ok(lookup(&root, &segments(path)).filter(|v| !v.is_null()).cloned())
    }

    async fn query(
        &self,
        path: &str,
        field: &str,
        value: &str,
    ) -> Result<Option<Value>, StoreError> {
        self.check_read()?;
        let root = self.lock()?;
        let Some(Value::Object(children)) = lookup(&root, &segments(path)) else {
            return Ok(None);
        };

        let matches: Map<String, Value> = children
            .iter()
            .filter(|(_, child)| child.get(field).and_then(Value::as_str) == Some(value))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        Ok((!matches.is_empty()).then_some(Value::Object(matches)))
    }

    async fn update(&self, path: &str, fields: Map<String, Value>) -> Result<(), StoreError> {
        self.check_write()?;
        let mut root = self.lock()?;
        let target = lookup_mut(&mut root, &segments(path))?;
        for (key, value) in fields {
            if value.is_null() {
                target.remove(&key);
            } else {
                target.insert(key, value);
            }
        }
        Ok(())
    }

    async fn remove(&self, path: &str) -> Result<(), StoreError> {
        self.check_write()?;
        let segs = segments(path);
        let Some((last, parent)) = segs.split_last() else {
            return Err(StoreError::InvalidPath(path.to_string()));
        };
        let mut root = self.lock()?;
        let parent = lookup_mut(&mut root, parent)?;
        parent.remove(*last);
        Ok(())
    }

    async fn push(&self, path: &str, value: Value) -> Result<String, StoreError> {
        self.check_write()?;
        let key = format!("-{}", Uuid::new_v4().simple());
        let mut root = self.lock()?;
        let parent = lookup_mut(&mut root, &segments(path))?;
        parent.insert(key.clone(), value);
        Ok(key)
    }
}
