//! Mock implementations for unit testing without NATS, Wikimapia or Telegram.
//!
//! Enabled with the `test-support` feature:
//!
//! ```toml
//! [dev-dependencies]
//! wikimapia-bot = { path = "...", features = ["test-support"] }
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};

use bytes::Bytes;
use wikimapia_types::{Locale, Place, PlaceDetail, PlaceId};

use crate::analytics::AnalyticsEvent;
use crate::traits::{Analytics, KeyValue, PhotoSource, PlaceLookup};

#[derive(Debug)]
pub struct MockError(pub &'static str);

impl std::fmt::Display for MockError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for MockError {}

// ── MemoryKv ──────────────────────────────────────────────────────────────────

/// In-memory key-value store with switchable read/write failures.
#[derive(Clone, Default)]
pub struct MemoryKv {
    entries: Arc<Mutex<HashMap<String, Bytes>>>,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn raw(&self, key: &str) -> Option<Bytes> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    pub fn insert_raw(&self, key: &str, value: &[u8]) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), Bytes::copy_from_slice(value));
    }
}

impl KeyValue for MemoryKv {
    type Error = MockError;

    async fn get(&self, key: String) -> Result<Option<Bytes>, MockError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(MockError("kv read failed"));
        }
        Ok(self.entries.lock().unwrap().get(&key).cloned())
    }

    async fn put(&self, key: String, value: Bytes) -> Result<(), MockError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(MockError("kv write failed"));
        }
        self.entries.lock().unwrap().insert(key, value);
        Ok(())
    }
}

// ── MockLookup ────────────────────────────────────────────────────────────────

/// Scripted places lookup that records every call.
#[derive(Clone, Default)]
pub struct MockLookup {
    nearby: Arc<Mutex<Vec<Place>>>,
    details: Arc<Mutex<HashMap<PlaceId, PlaceDetail>>>,
    fail_nearby: Arc<AtomicBool>,
    panic_nearby: Arc<AtomicBool>,
    nearby_calls: Arc<Mutex<Vec<(f64, f64, Locale)>>>,
    detail_calls: Arc<Mutex<Vec<(PlaceId, Locale)>>>,
}

impl MockLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Places returned by every nearby search
    pub fn set_nearby(&self, places: Vec<Place>) {
        *self.nearby.lock().unwrap() = places;
    }

    /// Register a detail record; unknown ids fail the lookup
    pub fn add_detail(&self, id: PlaceId, detail: PlaceDetail) {
        self.details.lock().unwrap().insert(id, detail);
    }

    pub fn fail_nearby(&self, fail: bool) {
        self.fail_nearby.store(fail, Ordering::SeqCst);
    }

    /// Make the next nearby searches panic, to exercise the event boundary
    pub fn panic_nearby(&self, panic: bool) {
        self.panic_nearby.store(panic, Ordering::SeqCst);
    }

    pub fn nearby_calls(&self) -> Vec<(f64, f64, Locale)> {
        self.nearby_calls.lock().unwrap().clone()
    }

    pub fn detail_calls(&self) -> Vec<(PlaceId, Locale)> {
        self.detail_calls.lock().unwrap().clone()
    }
}

impl PlaceLookup for MockLookup {
    type Error = MockError;

    async fn nearby(
        &self,
        latitude: f64,
        longitude: f64,
        locale: Locale,
    ) -> Result<Vec<Place>, MockError> {
        self.nearby_calls.lock().unwrap().push((latitude, longitude, locale));
        if self.panic_nearby.load(Ordering::SeqCst) {
            panic!("nearby lookup exploded");
        }
        if self.fail_nearby.load(Ordering::SeqCst) {
            return Err(MockError("nearby lookup failed"));
        }
        Ok(self.nearby.lock().unwrap().clone())
    }

    async fn detail(&self, id: PlaceId, locale: Locale) -> Result<PlaceDetail, MockError> {
        self.detail_calls.lock().unwrap().push((id, locale));
        self.details
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(MockError("place not found"))
    }
}

// ── MockPhotoSource ───────────────────────────────────────────────────────────

/// Serves each URL's own text as the photo body, except URLs marked failing.
#[derive(Clone, Default)]
pub struct MockPhotoSource {
    failing: Arc<Mutex<HashSet<String>>>,
    attempts: Arc<Mutex<Vec<String>>>,
}

impl MockPhotoSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(self, url: &str) -> Self {
        self.failing.lock().unwrap().insert(url.to_string());
        self
    }

    /// Every URL fetched so far, in order
    pub fn attempts(&self) -> Vec<String> {
        self.attempts.lock().unwrap().clone()
    }
}

impl PhotoSource for MockPhotoSource {
    type Error = MockError;

    async fn fetch(&self, url: &str) -> Result<Bytes, MockError> {
        self.attempts.lock().unwrap().push(url.to_string());
        if self.failing.lock().unwrap().contains(url) {
            return Err(MockError("download failed"));
        }
        Ok(Bytes::copy_from_slice(url.as_bytes()))
    }
}

// ── MockAnalytics ─────────────────────────────────────────────────────────────

/// Records every tracked event.
#[derive(Clone, Default)]
pub struct MockAnalytics {
    events: Arc<Mutex<Vec<AnalyticsEvent>>>,
}

impl MockAnalytics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AnalyticsEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn event_names(&self) -> Vec<String> {
        self.events().into_iter().map(|e| e.name).collect()
    }

    pub fn event_count(&self) -> usize {
        self.events.lock().unwrap().len()
    }
}

impl Analytics for MockAnalytics {
    type Error = std::convert::Infallible;

    async fn track(&self, event: AnalyticsEvent) -> Result<(), Self::Error> {
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}
