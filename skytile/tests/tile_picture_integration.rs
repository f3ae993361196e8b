//! Integration tests for tile picture resolution.
//!
//! These tests drive the public API end to end against a stub HTTP service:
//! - coordinate → tile → shuffled candidates → HTTP → decode
//! - probe order follows the seeded plan and stops at the first hit
//! - misses of every kind (404, bad bytes, hung request) are skipped
//!
//! Run with: `cargo test --test tile_picture_integration`

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use image::{DynamicImage, ImageFormat, RgbImage};
use parking_lot::Mutex;

use skytile::coord::GeoCoordinate;
use skytile::picture::{FetchOptions, FixedClock, TilePictureFetcher};
use skytile::provider::{AsyncHttpClient, ProviderError};
use skytile::resolver::{HttpImageLoader, ResolveError};

// ============================================================================
// Helper Functions
// ============================================================================

const BUENOS_AIRES: (f64, f64) = (-58.3816, -34.6037);

fn reference() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 7, 18, 0, 0).unwrap()
}

fn jpeg_bytes() -> Vec<u8> {
    let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(16, 16, image::Rgb([30, 90, 150])));
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, ImageFormat::Jpeg).unwrap();
    buffer.into_inner()
}

/// How the stub answers a URL.
#[derive(Clone)]
enum Reply {
    Image,
    Garbage,
    Hang,
}

/// HTTP stub that answers 404 unless a rule matches, recording every request.
struct StubService {
    rules: Vec<(String, Reply)>,
    requests: Mutex<Vec<String>>,
    jpeg: Vec<u8>,
}

impl StubService {
    fn new(rules: Vec<(&str, Reply)>) -> Self {
        Self {
            rules: rules
                .into_iter()
                .map(|(pattern, reply)| (pattern.to_string(), reply))
                .collect(),
            requests: Mutex::new(Vec::new()),
            jpeg: jpeg_bytes(),
        }
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }
}

impl AsyncHttpClient for StubService {
    async fn get(&self, url: &str) -> Result<Vec<u8>, ProviderError> {
        self.requests.lock().push(url.to_string());
        let reply = self
            .rules
            .iter()
            .find(|(pattern, _)| url.contains(pattern.as_str()))
            .map(|(_, reply)| reply.clone());

        match reply {
            Some(Reply::Image) => Ok(self.jpeg.clone()),
            Some(Reply::Garbage) => Ok(b"<html>busy</html>".to_vec()),
            Some(Reply::Hang) => std::future::pending().await,
            None => Err(ProviderError::HttpStatus {
                status: 404,
                url: url.to_string(),
            }),
        }
    }
}

fn fetcher(
    service: StubService,
    seed: u64,
) -> TilePictureFetcher<HttpImageLoader<StubService>, FixedClock> {
    TilePictureFetcher::new(HttpImageLoader::new(service))
        .with_clock(FixedClock(reference()))
        .with_seed(seed)
}

fn requests(fetcher: &TilePictureFetcher<HttpImageLoader<StubService>, FixedClock>) -> Vec<String> {
    fetcher.resolver().loader().http_client().requests()
}

// ============================================================================
// Integration Tests
// ============================================================================

/// Only MODIS two days back exists; the fetcher must find and decode it.
#[tokio::test]
async fn test_resolves_only_available_tile() {
    let service = StubService::new(vec![(
        "MODIS_Terra_CorrectedReflectance_TrueColor/default/2026-03-05/",
        Reply::Image,
    )]);
    let fetcher = fetcher(service, 42);
    let options = FetchOptions::default().with_lookback_days(3);

    let picture = fetcher
        .get_tile_picture(BUENOS_AIRES.0, BUENOS_AIRES.1, options)
        .await
        .unwrap();

    assert_eq!(picture.dimensions(), (16, 16));
    assert!(picture
        .url()
        .starts_with("https://gibs.earthdata.nasa.gov/wmts/epsg3857/best/MODIS_Terra_CorrectedReflectance_TrueColor/default/2026-03-05/GoogleMapsCompatible_Level9/9/308/172.jpg?t="));

    let probed = requests(&fetcher);
    assert!(probed.len() <= 6);
    assert_eq!(probed.last().map(String::as_str), Some(picture.url()));
}

/// Requests follow the seeded plan exactly and stop at the first hit.
#[tokio::test]
async fn test_probe_order_matches_plan() {
    let coord = GeoCoordinate::new(BUENOS_AIRES.0, BUENOS_AIRES.1);
    let options = FetchOptions::default().with_lookback_days(10);

    let planner = fetcher(StubService::new(vec![]), 7);
    let (_, plan) = planner.plan(coord, options);
    let planned: Vec<String> = plan.urls().map(str::to_string).collect();

    // Make the 6th planned candidate the only one that exists.
    let service = StubService::new(vec![(planned[5].as_str(), Reply::Image)]);
    let fetcher = fetcher(service, 7);
    let picture = fetcher
        .get_tile_picture(coord.longitude, coord.latitude, options)
        .await
        .unwrap();

    assert_eq!(picture.url(), planned[5]);
    assert_eq!(requests(&fetcher), planned[..6].to_vec());
}

/// With nothing available every candidate is tried once, then the call fails.
#[tokio::test]
async fn test_exhaustion_probes_every_candidate_once() {
    let fetcher = fetcher(StubService::new(vec![]), 3);
    let options = FetchOptions::default().with_lookback_days(5);

    let err = fetcher
        .get_tile_picture(BUENOS_AIRES.0, BUENOS_AIRES.1, options)
        .await
        .unwrap_err();

    assert_eq!(err, ResolveError::Exhausted { attempts: 10 });
    assert_eq!(
        err.to_string(),
        "no tiles available for these coordinates in the date range"
    );

    let mut probed = requests(&fetcher);
    probed.sort();
    probed.dedup();
    assert_eq!(probed.len(), 10);
}

/// A body that is not an image counts as a miss, not a failure of the call.
#[tokio::test]
async fn test_undecodable_body_is_skipped() {
    let service = StubService::new(vec![
        ("VIIRS_SNPP_CorrectedReflectance_TrueColor", Reply::Garbage),
        ("MODIS_Terra_CorrectedReflectance_TrueColor", Reply::Image),
    ]);
    let fetcher = fetcher(service, 11);

    let picture = fetcher
        .get_tile_picture(BUENOS_AIRES.0, BUENOS_AIRES.1, FetchOptions::default())
        .await
        .unwrap();

    // VIIRS comes first for every date, so exactly one garbage probe precedes the hit.
    assert!(picture.url().contains("MODIS_Terra"));
    assert_eq!(requests(&fetcher).len(), 2);
}

/// A request that never answers is abandoned after the attempt timeout.
#[tokio::test(start_paused = true)]
async fn test_hung_request_times_out_and_moves_on() {
    let service = StubService::new(vec![
        ("VIIRS_SNPP_CorrectedReflectance_TrueColor", Reply::Hang),
        ("MODIS_Terra_CorrectedReflectance_TrueColor", Reply::Image),
    ]);
    let fetcher = fetcher(service, 13).with_attempt_timeout(Some(Duration::from_secs(2)));

    let picture = fetcher
        .get_tile_picture(BUENOS_AIRES.0, BUENOS_AIRES.1, FetchOptions::default())
        .await
        .unwrap();

    assert!(picture.url().contains("MODIS_Terra"));
    assert_eq!(requests(&fetcher).len(), 2);
}

/// Overlapping calls on one fetcher each run their own chain.
#[tokio::test]
async fn test_concurrent_calls_are_independent() {
    let service = StubService::new(vec![("/default/2026-03-01/", Reply::Image)]);
    let fetcher = Arc::new(fetcher(service, 17));
    let options = FetchOptions::default().with_lookback_days(7);

    let (a, b) = tokio::join!(
        fetcher.get_tile_picture(BUENOS_AIRES.0, BUENOS_AIRES.1, options),
        fetcher.get_tile_picture(-74.0060, 40.7128, options),
    );

    assert!(a.unwrap().url().contains("/9/308/172.jpg"));
    assert!(b.unwrap().url().contains("/9/192/150.jpg"));
}

/// Out-of-range input is clamped rather than rejected.
#[tokio::test]
async fn test_out_of_range_coordinates_are_clamped() {
    let service = StubService::new(vec![("/9/0/511.jpg", Reply::Image)]);
    let fetcher = fetcher(service, 19);
    let options = FetchOptions::default().with_zoom(42).with_lookback_days(1);

    let picture = fetcher.get_tile_picture(500.0, 95.0, options).await.unwrap();
    assert!(picture.url().contains("/GoogleMapsCompatible_Level9/9/0/511.jpg"));
}
