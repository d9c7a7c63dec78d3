use bytes::Bytes;
use std::future::Future;
use wikimapia_types::{Locale, Place, PlaceDetail, PlaceId};

use crate::analytics::AnalyticsEvent;

/// Remote places lookup: nearby search and single-place details.
pub trait PlaceLookup: Send + Sync + Clone + 'static {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Places around a coordinate, nearest first.
    fn nearby(
        &self,
        latitude: f64,
        longitude: f64,
        locale: Locale,
    ) -> impl Future<Output = Result<Vec<Place>, Self::Error>> + Send;

    fn detail(
        &self,
        id: PlaceId,
        locale: Locale,
    ) -> impl Future<Output = Result<PlaceDetail, Self::Error>> + Send;
}

/// Durable string-keyed storage.
///
/// One trait, two operations. Implement this to back the locale store with
/// something other than NATS KV in tests.
pub trait KeyValue: Send + Sync + Clone + 'static {
    type Error: std::error::Error + Send + Sync + 'static;

    fn get(&self, key: String) -> impl Future<Output = Result<Option<Bytes>, Self::Error>> + Send;

    fn put(
        &self,
        key: String,
        value: Bytes,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

/// Download a remote resource into memory.
pub trait PhotoSource: Send + Sync + Clone + 'static {
    type Error: std::error::Error + Send + Sync + 'static;

    fn fetch(&self, url: &str) -> impl Future<Output = Result<Bytes, Self::Error>> + Send;
}

/// One-way usage tracking. The caller never waits on the result.
pub trait Analytics: Send + Sync + Clone + 'static {
    type Error: std::error::Error + Send + Sync + 'static;

    fn track(&self, event: AnalyticsEvent) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

/// A disabled sink: `None` drops every event.
impl<A: Analytics> Analytics for Option<A> {
    type Error = A::Error;

    async fn track(&self, event: AnalyticsEvent) -> Result<(), Self::Error> {
        match self {
            Some(inner) => inner.track(event).await,
            None => Ok(()),
        }
    }
}
