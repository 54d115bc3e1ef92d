use crate::models::Coordinates;
use crate::services::traits::Geocoder;
use anyhow::{Context, Result};
use async_trait::async_trait;
use rand::Rng;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

/// Boston city center, the anchor for fallback coordinates.
const CITY_CENTER: Coordinates = Coordinates {
    lat: 42.3601,
    lng: -71.0589,
};

const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/search";

/// Free-text address resolver backed by the public Nominatim API.
///
/// Listings come without coordinates, so every recommendation batch is
/// resolved here before it can be placed on the map.
pub struct NominatimGeocoder {
    client: Client,
}

/// Nominatim returns lat/lon as strings.
#[derive(Debug, Deserialize)]
struct NominatimHit {
    lat: String,
    lon: String,
}

impl NominatimGeocoder {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent("PropBotApp/1.0")
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    async fn lookup(&self, address: &str) -> Result<Option<Coordinates>> {
        let query = format!("{address}, Boston, MA");
        let response = self
            .client
            .get(NOMINATIM_URL)
            .query(&[("q", query.as_str()), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .context("Failed to reach geocoding service")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("HTTP {status} for geocoding lookup");
        }

        let hits: Vec<NominatimHit> = response
            .json()
            .await
            .context("Failed to decode geocoding response")?;

        match hits.first() {
            Some(hit) => {
                let lat = hit.lat.parse().context("Invalid latitude in response")?;
                let lng = hit.lon.parse().context("Invalid longitude in response")?;
                Ok(Some(Coordinates { lat, lng }))
            }
            None => Ok(None),
        }
    }

    /// Random point within ±0.025° of the city center, stands in for any
    /// address Nominatim cannot resolve.
    fn fallback() -> Coordinates {
        let mut rng = rand::thread_rng();
        Coordinates {
            lat: CITY_CENTER.lat + (rng.gen::<f64>() - 0.5) * 0.05,
            lng: CITY_CENTER.lng + (rng.gen::<f64>() - 0.5) * 0.05,
        }
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, address: &str) -> Coordinates {
        match self.lookup(address).await {
            Ok(Some(coords)) => coords,
            Ok(None) => {
                debug!("No geocoding hit for {address:?}, using fallback point");
                Self::fallback()
            }
            Err(e) => {
                warn!("Geocoding error for {address:?}: {e:#}");
                Self::fallback()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_points_stay_near_the_city_center() {
        for _ in 0..100 {
            let point = NominatimGeocoder::fallback();
            assert!((point.lat - CITY_CENTER.lat).abs() <= 0.025);
            assert!((point.lng - CITY_CENTER.lng).abs() <= 0.025);
        }
    }

    #[test]
    fn nominatim_hits_parse_string_coordinates() {
        let json = r#"[{"lat": "42.3554", "lon": "-71.0723", "display_name": "Back Bay"}]"#;
        let hits: Vec<NominatimHit> = serde_json::from_str(json).unwrap();
        assert_eq!(hits[0].lat, "42.3554");
        assert_eq!(hits[0].lon, "-71.0723");
    }
}
