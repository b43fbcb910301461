use std::sync::Arc;

use tracing::{debug, warn};

use super::{Coordinate, GeocodingGateway, LocationQuery};

/// Single-attempt, fail-soft geocoding of a postal code.
pub struct LocationResolver<G> {
    gateway: Arc<G>,
}

impl<G> Clone for LocationResolver<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
        }
    }
}

impl<G> LocationResolver<G>
where
    G: GeocodingGateway + 'static,
{
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    pub async fn resolve(&self, query: &LocationQuery) -> Option<Coordinate> {
        let address = query.normalized()?;

        match self.gateway.geocode(address).await {
            Ok(Some(coordinate)) => {
                debug!(
                    latitude = coordinate.latitude,
                    longitude = coordinate.longitude,
                    "postal code resolved"
                );
                Some(coordinate)
            }
            Ok(None) => {
                debug!("geocoding returned no results");
                None
            }
            Err(error) => {
                warn!(%error, "geocoding failed; continuing without location");
                None
            }
        }
    }
}
