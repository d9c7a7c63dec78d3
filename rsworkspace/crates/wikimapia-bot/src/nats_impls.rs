use async_nats::jetstream::kv;
use bytes::Bytes;
use wikimapia_client::WikimapiaClient;
use wikimapia_types::{Locale, Place, PlaceDetail, PlaceId};

use crate::errors::BotError;
use crate::traits::{KeyValue, PhotoSource, PlaceLookup};

/// Concrete `KeyValue` backed by a NATS KV bucket.
#[derive(Clone)]
pub struct NatsKv {
    store: kv::Store,
}

impl NatsKv {
    pub fn new(store: kv::Store) -> Self {
        Self { store }
    }
}

impl KeyValue for NatsKv {
    type Error = BotError;

    async fn get(&self, key: String) -> Result<Option<Bytes>, BotError> {
        self.store
            .get(key)
            .await
            .map_err(|e| BotError::Kv(e.to_string()))
    }

    async fn put(&self, key: String, value: Bytes) -> Result<(), BotError> {
        self.store
            .put(key, value)
            .await
            .map(|_revision| ())
            .map_err(|e| BotError::Kv(e.to_string()))
    }
}

/// Concrete `PhotoSource` backed by a `reqwest::Client`.
impl PhotoSource for reqwest::Client {
    type Error = reqwest::Error;

    async fn fetch(&self, url: &str) -> Result<Bytes, reqwest::Error> {
        self.get(url).send().await?.error_for_status()?.bytes().await
    }
}

/// Concrete `PlaceLookup` backed by the Wikimapia API.
impl PlaceLookup for WikimapiaClient {
    type Error = wikimapia_client::Error;

    async fn nearby(
        &self,
        latitude: f64,
        longitude: f64,
        locale: Locale,
    ) -> Result<Vec<Place>, Self::Error> {
        WikimapiaClient::nearby(self, latitude, longitude, locale).await
    }

    async fn detail(&self, id: PlaceId, locale: Locale) -> Result<PlaceDetail, Self::Error> {
        self.place(id, locale).await
    }
}
