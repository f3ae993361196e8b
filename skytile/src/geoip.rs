//! Initial coordinate lookup by public IP address.
//!
//! Uses the keyless `ipapi.co` JSON endpoint.

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::coord::GeoCoordinate;
use crate::provider::{AsyncHttpClient, ProviderError};

/// Lookup endpoint.
pub const IPAPI_URL: &str = "https://ipapi.co/json/";

/// Errors from the IP lookup.
#[derive(Debug, Error)]
pub enum GeoIpError {
    #[error("lookup request failed: {0}")]
    Http(#[from] ProviderError),

    #[error("invalid lookup response: {0}")]
    Parse(#[from] serde_json::Error),

    /// The service answered with an error body (rate limit, reserved range).
    #[error("lookup service refused: {0}")]
    Service(String),

    #[error("lookup response has no coordinates")]
    MissingCoordinates,
}

/// A located position with optional place names.
#[derive(Debug, Clone, PartialEq)]
pub struct IpLocation {
    pub coordinate: GeoCoordinate,
    pub city: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    latitude: Option<f64>,
    longitude: Option<f64>,
    city: Option<String>,
    country_name: Option<String>,
    #[serde(default)]
    error: bool,
    reason: Option<String>,
}

/// Parses an `ipapi.co` JSON body.
pub fn parse_response(body: &[u8]) -> Result<IpLocation, GeoIpError> {
    let response: IpApiResponse = serde_json::from_slice(body)?;

    if response.error {
        return Err(GeoIpError::Service(
            response.reason.unwrap_or_else(|| "unknown error".to_string()),
        ));
    }

    match (response.longitude, response.latitude) {
        (Some(longitude), Some(latitude)) => Ok(IpLocation {
            coordinate: GeoCoordinate::new(longitude, latitude),
            city: response.city,
            country: response.country_name,
        }),
        _ => Err(GeoIpError::MissingCoordinates),
    }
}

/// Looks up the caller's approximate position.
pub async fn locate<C: AsyncHttpClient>(http_client: &C) -> Result<IpLocation, GeoIpError> {
    let body = http_client.get(IPAPI_URL).await?;
    let location = parse_response(&body)?;
    debug!(coord = %location.coordinate, city = ?location.city, "Located by IP");
    Ok(location)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MockAsyncHttpClient;

    const SAMPLE: &str = r#"{
        "ip": "203.0.113.7",
        "city": "Buenos Aires",
        "country_name": "Argentina",
        "latitude": -34.6037,
        "longitude": -58.3816
    }"#;

    #[test]
    fn test_parse_sample() {
        let location = parse_response(SAMPLE.as_bytes()).unwrap();
        assert_eq!(location.coordinate, GeoCoordinate::new(-58.3816, -34.6037));
        assert_eq!(location.city.as_deref(), Some("Buenos Aires"));
        assert_eq!(location.country.as_deref(), Some("Argentina"));
    }

    #[test]
    fn test_parse_error_body() {
        let body = br#"{"error": true, "reason": "RateLimited"}"#;
        match parse_response(body) {
            Err(GeoIpError::Service(reason)) => assert_eq!(reason, "RateLimited"),
            other => panic!("Expected service error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_missing_coordinates() {
        let body = br#"{"city": "Nowhere"}"#;
        assert!(matches!(
            parse_response(body),
            Err(GeoIpError::MissingCoordinates)
        ));
    }

    #[test]
    fn test_parse_not_json() {
        assert!(matches!(
            parse_response(b"<html>"),
            Err(GeoIpError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn test_locate_uses_client() {
        let client = MockAsyncHttpClient {
            response: Ok(SAMPLE.as_bytes().to_vec()),
        };
        let location = locate(&client).await.unwrap();
        assert_eq!(location.coordinate.latitude, -34.6037);
    }

    #[tokio::test]
    async fn test_locate_propagates_http_error() {
        let client = MockAsyncHttpClient {
            response: Err(ProviderError::HttpError("Connection refused".to_string())),
        };
        assert!(matches!(locate(&client).await, Err(GeoIpError::Http(_))));
    }
}
