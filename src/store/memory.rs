//! In-memory ObjectStore used by tests in place of S3.
//!
//! Records per-operation call counts so tests can assert which store calls
//! a stage made (or that none were made at all), and can inject a probe
//! failure to exercise the "exists error vs not present" distinction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};

use super::object_store::{ObjectInfo, ObjectStore};
use crate::error::EtlError;

struct StoredObject {
    bytes: Vec<u8>,
    last_modified: DateTime<Utc>,
}

#[derive(Default)]
pub struct MemoryObjectStore {
    objects: Mutex<HashMap<(String, String), StoredObject>>,
    clock: AtomicI64,
    puts: AtomicUsize,
    gets: AtomicUsize,
    probes: AtomicUsize,
    lists: AtomicUsize,
    fail_probes: AtomicBool,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `exists` probe fail (simulates access denied).
    pub fn fail_probes(&self) {
        self.fail_probes.store(true, Ordering::SeqCst);
    }

    pub fn put_calls(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
            + self.gets.load(Ordering::SeqCst)
            + self.probes.load(Ordering::SeqCst)
            + self.lists.load(Ordering::SeqCst)
    }

    /// Monotonic fake timestamps so listing order is deterministic.
    fn tick(&self) -> DateTime<Utc> {
        let seq = self.clock.fetch_add(1, Ordering::SeqCst) + 1;
        DateTime::<Utc>::from_timestamp(seq, 0).unwrap()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put(&self, bucket: &str, key: &str, bytes: Vec<u8>) -> Result<(), EtlError> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        let last_modified = self.tick();
        self.objects.lock().unwrap().insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                bytes,
                last_modified,
            },
        );
        Ok(())
    }

    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, EtlError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.objects
            .lock()
            .unwrap()
            .get(&(bucket.to_string(), key.to_string()))
            .map(|object| object.bytes.clone())
            .ok_or_else(|| EtlError::NotFound(format!("s3://{bucket}/{key}")))
    }

    async fn exists(&self, bucket: &str, key: &str) -> Result<bool, EtlError> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        if self.fail_probes.load(Ordering::SeqCst) {
            return Err(EtlError::Transfer(anyhow::anyhow!(
                "access denied probing s3://{bucket}/{key}"
            )));
        }
        Ok(self
            .objects
            .lock()
            .unwrap()
            .contains_key(&(bucket.to_string(), key.to_string())))
    }

    async fn list(&self, bucket: &str) -> Result<Vec<ObjectInfo>, EtlError> {
        self.lists.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .objects
            .lock()
            .unwrap()
            .iter()
            .filter(|((b, _), _)| b == bucket)
            .map(|((_, key), object)| ObjectInfo {
                key: key.clone(),
                last_modified: object.last_modified,
            })
            .collect())
    }
}
