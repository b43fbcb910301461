//! Postal code to coordinates to nearby providers.
//!
//! Every failure on this path degrades to "no providers"; nothing here returns an error
//! to the screening service.

mod google;
mod providers;
mod resolver;

pub use google::GoogleMapsClient;
pub use providers::{EmptyReason, ProviderFinder, ProviderLookup, ProviderSearch};
pub use resolver::LocationResolver;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Free-text postal code as entered by the respondent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationQuery(pub String);

impl LocationQuery {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Trimmed query, or `None` when nothing usable was entered.
    pub fn normalized(&self) -> Option<&str> {
        let trimmed = self.0.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.normalized().is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// Upstream place record, passed through without validation or re-ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provider {
    pub name: Option<String>,
    pub address: Option<String>,
    pub rating: Option<f32>,
}

/// Parameters of a single nearby search.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbySearch {
    pub location: Coordinate,
    pub keyword: String,
    pub radius_m: u32,
    pub place_type: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("maps API key is not configured")]
    MissingCredentials,
    #[error("maps request failed: {0}")]
    Transport(String),
    #[error("maps service responded with HTTP {0}")]
    Status(u16),
    #[error("maps service returned {status}: {message}")]
    Upstream { status: String, message: String },
    #[error("unable to decode maps response: {0}")]
    Decode(String),
    #[error("unable to build maps client: {0}")]
    Client(String),
}

/// Address to coordinates lookup. `Ok(None)` means the service found nothing.
#[async_trait]
pub trait GeocodingGateway: Send + Sync {
    async fn geocode(&self, address: &str) -> Result<Option<Coordinate>, GatewayError>;
}

/// Keyword search around a coordinate, in the service's own ranking order.
#[async_trait]
pub trait PlacesGateway: Send + Sync {
    async fn nearby(&self, search: &NearbySearch) -> Result<Vec<Provider>, GatewayError>;
}
