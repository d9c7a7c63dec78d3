//! Places returned by the nearby search and the detail lookup

use serde::{Deserialize, Serialize};
use std::fmt;

/// Remote-system-assigned place identifier
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PlaceId(pub u64);

impl fmt::Display for PlaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One nearby point of interest
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Place {
    pub id: PlaceId,
    pub title: String,
}

impl Place {
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id: PlaceId(id),
            title: title.into(),
        }
    }
}

/// A photo attached to a place
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Photo {
    /// URL of the large rendition
    pub big_url: String,
}

/// Expanded record for one selected place
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PlaceDetail {
    pub title: String,
    /// Free text of unbounded length
    pub description: String,
    /// Reference link, already formatted as HTML
    pub url_html: String,
    pub photos: Vec<Photo>,
}
