use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use super::resolver::LocationResolver;
use super::{
    Coordinate, GatewayError, GeocodingGateway, LocationQuery, NearbySearch, PlacesGateway,
    Provider,
};
use crate::config::{MapsConfig, DEFAULT_SEARCH_KEYWORD, DEFAULT_SEARCH_RADIUS_M};

/// Fixed search parameters applied to every lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSearch {
    pub keyword: String,
    pub radius_m: u32,
    pub place_type: Option<String>,
}

impl Default for ProviderSearch {
    fn default() -> Self {
        Self {
            keyword: DEFAULT_SEARCH_KEYWORD.to_string(),
            radius_m: DEFAULT_SEARCH_RADIUS_M,
            place_type: Some("doctor".to_string()),
        }
    }
}

impl ProviderSearch {
    pub fn from_config(config: &MapsConfig) -> Self {
        Self {
            keyword: config.search_keyword.clone(),
            radius_m: config.search_radius_m,
            ..Self::default()
        }
    }
}

/// Why a lookup ended without providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyReason {
    NoQuery,
    Unresolved,
    SearchFailed,
    NoResults,
}

/// Terminal state of the resolve-then-search pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderLookup {
    Found {
        coordinate: Coordinate,
        providers: Vec<Provider>,
    },
    Empty(EmptyReason),
}

impl ProviderLookup {
    pub fn providers(&self) -> &[Provider] {
        match self {
            ProviderLookup::Found { providers, .. } => providers,
            ProviderLookup::Empty(_) => &[],
        }
    }

    pub fn into_providers(self) -> Vec<Provider> {
        match self {
            ProviderLookup::Found { providers, .. } => providers,
            ProviderLookup::Empty(_) => Vec::new(),
        }
    }

    pub fn empty_reason(&self) -> Option<EmptyReason> {
        match self {
            ProviderLookup::Found { .. } => None,
            ProviderLookup::Empty(reason) => Some(*reason),
        }
    }
}

/// Composes the location resolver with the places-search gateway.
pub struct ProviderFinder<G, P> {
    resolver: LocationResolver<G>,
    places: Arc<P>,
    search: ProviderSearch,
}

impl<G, P> ProviderFinder<G, P>
where
    G: GeocodingGateway + 'static,
    P: PlacesGateway + 'static,
{
    pub fn new(resolver: LocationResolver<G>, places: Arc<P>, search: ProviderSearch) -> Self {
        Self {
            resolver,
            places,
            search,
        }
    }

    /// Providers near `coordinate`, in upstream order. An absent coordinate or a failed
    /// search yields an empty list; the places service is not called without a coordinate.
    pub async fn find_nearby(
        &self,
        coordinate: Option<Coordinate>,
        keyword: &str,
        radius_m: u32,
    ) -> Vec<Provider> {
        match coordinate {
            Some(location) => self
                .search_at(location, keyword, radius_m)
                .await
                .unwrap_or_default(),
            None => Vec::new(),
        }
    }

    /// Full pipeline for a postal code using the configured keyword and radius.
    pub async fn lookup(&self, query: &LocationQuery) -> ProviderLookup {
        if query.is_empty() {
            return ProviderLookup::Empty(EmptyReason::NoQuery);
        }

        let Some(coordinate) = self.resolver.resolve(query).await else {
            return ProviderLookup::Empty(EmptyReason::Unresolved);
        };

        match self
            .search_at(coordinate, &self.search.keyword, self.search.radius_m)
            .await
        {
            Ok(providers) if providers.is_empty() => ProviderLookup::Empty(EmptyReason::NoResults),
            Ok(providers) => ProviderLookup::Found {
                coordinate,
                providers,
            },
            Err(_) => ProviderLookup::Empty(EmptyReason::SearchFailed),
        }
    }

    async fn search_at(
        &self,
        location: Coordinate,
        keyword: &str,
        radius_m: u32,
    ) -> Result<Vec<Provider>, GatewayError> {
        let request = NearbySearch {
            location,
            keyword: keyword.to_string(),
            radius_m,
            place_type: self.search.place_type.clone(),
        };

        match self.places.nearby(&request).await {
            Ok(providers) => {
                debug!(count = providers.len(), "places search completed");
                Ok(providers)
            }
            Err(error) => {
                warn!(%error, "places search failed; returning no providers");
                Err(error)
            }
        }
    }
}
