//! Wikimapia API client

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};
use wikimapia_types::{Locale, Photo, Place, PlaceDetail, PlaceId};

use crate::config::WikimapiaConfig;
use crate::error::{Error, Result};

const FUNCTION_NEAREST: &str = "place.getnearest";
const FUNCTION_BY_ID: &str = "place.getbyid";
const DETAIL_BLOCKS: &str = "main,photos";

/// Wikimapia API client
#[derive(Clone)]
pub struct WikimapiaClient {
    http: Client,
    config: WikimapiaConfig,
}

impl WikimapiaClient {
    /// Create a new client
    pub fn new(config: WikimapiaConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { http, config })
    }

    /// Places closest to the given coordinates, nearest first
    pub async fn nearby(
        &self,
        latitude: f64,
        longitude: f64,
        locale: Locale,
    ) -> Result<Vec<Place>> {
        let params = self.nearby_params(latitude, longitude, locale);
        let body = self.call(&params).await?;
        let places = parse_nearby(&body)?;
        debug!("Nearby search at {},{} returned {} places", latitude, longitude, places.len());
        Ok(places)
    }

    /// Full record of a single place
    pub async fn place(&self, id: PlaceId, locale: Locale) -> Result<PlaceDetail> {
        let params = self.detail_params(id, locale);
        let body = self.call(&params).await?;
        parse_detail(&body)
    }

    fn nearby_params(
        &self,
        latitude: f64,
        longitude: f64,
        locale: Locale,
    ) -> Vec<(&'static str, String)> {
        let mut params = self.common_params(FUNCTION_NEAREST, locale);
        params.push(("lat", latitude.to_string()));
        params.push(("lon", longitude.to_string()));
        params.push(("count", self.config.nearby_count.to_string()));
        params
    }

    fn detail_params(&self, id: PlaceId, locale: Locale) -> Vec<(&'static str, String)> {
        let mut params = self.common_params(FUNCTION_BY_ID, locale);
        params.push(("id", id.to_string()));
        params.push(("data_blocks", DETAIL_BLOCKS.to_string()));
        params
    }

    fn common_params(&self, function: &str, locale: Locale) -> Vec<(&'static str, String)> {
        vec![
            ("key", self.config.api_key.clone()),
            ("function", function.to_string()),
            ("format", "json".to_string()),
            ("language", locale.code().to_string()),
        ]
    }

    async fn call(&self, params: &[(&'static str, String)]) -> Result<String> {
        let response = self
            .http
            .get(&self.config.base_url)
            .query(params)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!("Wikimapia API returned {}: {}", status, body);
            return Err(Error::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }
}

/// Error block Wikimapia embeds in an otherwise successful HTTP response
#[derive(Debug, Deserialize)]
struct ApiDebug {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

/// Wikimapia sends ids as numbers, occasionally as numeric strings
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(u64),
    Text(String),
}

impl RawId {
    fn into_place_id(self) -> Option<PlaceId> {
        match self {
            RawId::Number(id) => Some(PlaceId(id)),
            RawId::Text(id) => id.trim().parse().ok().map(PlaceId),
        }
    }
}

#[derive(Debug, Deserialize)]
struct NearbyResponse {
    #[serde(default)]
    debug: Option<ApiDebug>,
    #[serde(default)]
    places: Vec<NearbyPlace>,
}

#[derive(Debug, Deserialize)]
struct NearbyPlace {
    id: RawId,
    #[serde(default)]
    title: String,
}

#[derive(Debug, Deserialize)]
struct DetailResponse {
    #[serde(default)]
    debug: Option<ApiDebug>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    urlhtml: String,
    #[serde(default)]
    photos: Vec<RawPhoto>,
}

#[derive(Debug, Deserialize)]
struct RawPhoto {
    #[serde(default)]
    big_url: String,
}

fn check_debug(debug: Option<ApiDebug>) -> Result<()> {
    match debug {
        Some(d) if d.code != 0 => Err(Error::Api {
            code: d.code,
            message: d.message,
        }),
        _ => Ok(()),
    }
}

fn parse_nearby(body: &str) -> Result<Vec<Place>> {
    let response: NearbyResponse = serde_json::from_str(body)?;
    check_debug(response.debug)?;

    let places = response
        .places
        .into_iter()
        .filter_map(|raw| {
            let id = raw.id.into_place_id();
            if id.is_none() {
                warn!("Skipping nearby place with unparseable id: {}", raw.title);
            }
            id.map(|id| Place { id, title: raw.title })
        })
        .collect();

    Ok(places)
}

fn parse_detail(body: &str) -> Result<PlaceDetail> {
    let response: DetailResponse = serde_json::from_str(body)?;
    check_debug(response.debug)?;

    Ok(PlaceDetail {
        title: response.title,
        description: response.description,
        url_html: response.urlhtml,
        photos: response
            .photos
            .into_iter()
            .filter(|p| !p.big_url.is_empty())
            .map(|p| Photo { big_url: p.big_url })
            .collect(),
    })
}
