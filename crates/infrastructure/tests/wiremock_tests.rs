//! Integration tests for infrastructure crate
//!
//! Tests cover:
//! - Geocoding adapter against a mock geocoding API
//! - Weather adapter against mock Open-Meteo and OpenWeatherMap APIs
//! - A full dashboard refresh wired from real adapters

#![allow(clippy::expect_used)]

use std::sync::Arc;

use application::{
    DashboardService, GeoResolver, GeocodingPort, KeyValueStore, LocationStore,
    LocationStoreConfig, RefreshStatus, WEATHER_SNAPSHOT_KEY, WeatherOrchestrator, WeatherPort,
};
use domain::GeoLocation;
use infrastructure::{
    FixedPositionAdapter, GeocodingAdapter, GeocodingAppConfig, InMemoryStore, WeatherAdapter,
    WeatherAppConfig, WeatherProvider,
};
use secrecy::SecretString;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Fixtures
// ============================================================================

fn search_response() -> serde_json::Value {
    serde_json::json!({
        "results": [
            {
                "name": "Kazan",
                "latitude": 55.78874,
                "longitude": 49.12214,
                "admin1": "Tatarstan",
                "country": "Russia"
            }
        ]
    })
}

/// 2024-05-01 00:00 UTC onwards, Moscow offset: two local days
fn forecast_response() -> serde_json::Value {
    serde_json::json!({
        "utc_offset_seconds": 10800,
        "current": {
            "time": 1714564800,
            "temperature_2m": 14.2,
            "apparent_temperature": 12.9,
            "relative_humidity_2m": 48,
            "surface_pressure": 995.1,
            "wind_speed_10m": 11.3,
            "weather_code": 2,
            "is_day": 1
        },
        "hourly": {
            "time": [1714521600, 1714532400, 1714543200, 1714608000],
            "temperature_2m": [6.1, 5.4, 9.8, 7.0],
            "apparent_temperature": [4.0, 3.2, 8.1, 5.5],
            "relative_humidity_2m": [80, 84, 61, 70],
            "surface_pressure": [996.0, 995.6, 995.2, 994.0],
            "wind_speed_10m": [7.2, 6.8, 9.4, 5.0],
            "weather_code": [0, 0, 3, 61],
            "is_day": [0, 0, 1, 0]
        }
    })
}

fn geocoding_adapter(server: &MockServer) -> GeocodingAdapter {
    let config = GeocodingAppConfig {
        base_url: server.uri(),
        ..GeocodingAppConfig::default()
    };
    GeocodingAdapter::with_config(config.client_config()).expect("geocoding adapter")
}

fn weather_adapter(server: &MockServer) -> WeatherAdapter {
    let config = WeatherAppConfig {
        base_url: Some(server.uri()),
        timeout_secs: 5,
        ..WeatherAppConfig::default()
    };
    WeatherAdapter::from_config(&config).expect("weather adapter")
}

// ============================================================================
// Geocoding adapter
// ============================================================================

mod geocoding_adapter_tests {
    use super::*;

    #[tokio::test]
    async fn search_maps_candidates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("name", "Kazan"))
            .and(query_param("count", "6"))
            .respond_with(ResponseTemplate::new(200).set_body_json(search_response()))
            .expect(1)
            .mount(&server)
            .await;

        let candidates = geocoding_adapter(&server)
            .search("Kazan", 6)
            .await
            .expect("search");

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].display_name(), "Kazan, Tatarstan, Russia");
    }

    #[tokio::test]
    async fn reverse_returns_none_when_nothing_is_near() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/reverse"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let place = geocoding_adapter(&server)
            .reverse(&GeoLocation::new_unchecked(0.0, -160.0))
            .await
            .expect("reverse");
        assert!(place.is_none());
    }

    #[tokio::test]
    async fn server_error_is_network() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let result = geocoding_adapter(&server).search("Kazan", 6).await;
        assert!(matches!(
            result,
            Err(application::ApplicationError::Network(_))
        ));
    }
}

// ============================================================================
// Weather adapter
// ============================================================================

mod weather_adapter_tests {
    use super::*;

    #[tokio::test]
    async fn open_meteo_series() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .and(query_param("forecast_days", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_response()))
            .expect(1)
            .mount(&server)
            .await;

        let series = weather_adapter(&server)
            .fetch_series(&GeoLocation::new_unchecked(55.79, 49.12), 3)
            .await
            .expect("series");

        assert_eq!(series.samples.len(), 4);
        assert_eq!(series.utc_offset_seconds, Some(10800));
        let now = series.now().expect("current reading");
        assert_eq!(now.condition_text, "Partly cloudy");
    }

    #[tokio::test]
    async fn open_weather_map_series() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("appid", "owm-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "weather": [{"id": 800, "description": "clear sky", "icon": "01d"}],
                "main": {"temp": 17.3, "humidity": 42},
                "dt": 1714564800,
                "timezone": 10800
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "list": [
                    {
                        "dt": 1714564800,
                        "main": {"temp": 17.0},
                        "weather": [{"id": 800, "description": "clear sky", "icon": "01d"}]
                    }
                ]
            })))
            .mount(&server)
            .await;

        let config = WeatherAppConfig {
            provider: WeatherProvider::OpenWeatherMap,
            base_url: Some(server.uri()),
            api_key: Some(SecretString::from("owm-key")),
            ..WeatherAppConfig::default()
        };
        let adapter = WeatherAdapter::from_config(&config).expect("adapter");
        let series = adapter
            .fetch_series(&GeoLocation::new_unchecked(55.79, 49.12), 3)
            .await
            .expect("series");

        assert_eq!(series.samples.len(), 1);
        assert_eq!(series.now().map(|s| s.icon_ref.as_str()), Some("01d"));
    }

    #[tokio::test]
    async fn malformed_body_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("oops"))
            .mount(&server)
            .await;

        let result = weather_adapter(&server)
            .fetch_series(&GeoLocation::new_unchecked(55.79, 49.12), 3)
            .await;
        assert!(matches!(
            result,
            Err(application::ApplicationError::InvalidResponse(_))
        ));
    }
}

// ============================================================================
// Full dashboard
// ============================================================================

mod dashboard_tests {
    use super::*;

    async fn mount_apis(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(search_response()))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_response()))
            .mount(server)
            .await;
    }

    fn dashboard(server: &MockServer, storage: Arc<InMemoryStore>) -> DashboardService {
        let resolver = Arc::new(GeoResolver::new(Arc::new(geocoding_adapter(server))));
        let orchestrator = Arc::new(WeatherOrchestrator::new(
            Arc::new(weather_adapter(server)),
            resolver.clone(),
            storage.clone(),
        ));
        let store = LocationStore::load(storage, LocationStoreConfig::default());
        DashboardService::new(
            resolver,
            Arc::new(FixedPositionAdapter::unavailable()),
            orchestrator,
            store,
        )
    }

    #[tokio::test]
    async fn add_and_refresh() {
        let server = MockServer::start().await;
        mount_apis(&server).await;
        let storage = Arc::new(InMemoryStore::new());
        let mut service = dashboard(&server, storage.clone());

        let location = service
            .add_location_by_name("Kazan")
            .await
            .expect("add kazan");
        assert_eq!(location.display_name, "Kazan, Tatarstan, Russia");

        let report = service.refresh().await.expect("refresh");
        assert_eq!(report.status, RefreshStatus::Complete);

        let snapshot = service.weather();
        let view = snapshot.get(&location.id).expect("view for kazan");
        assert_eq!(view.forecast.len(), 2);
        // a past day is labelled by its weekday
        assert_eq!(
            view.forecast[0].date,
            chrono::NaiveDate::from_ymd_opt(2024, 5, 1).expect("date")
        );
        assert_eq!(view.forecast[0].day_label, "Wednesday");
        assert_eq!(view.utc_offset_seconds, Some(10_800));
        assert_eq!(view.forecast[0].sample_count, 3);
        assert!(storage.get(WEATHER_SNAPSHOT_KEY).expect("read").is_some());
    }

    #[tokio::test]
    async fn locate_without_position_fails() {
        let server = MockServer::start().await;
        let mut service = dashboard(&server, Arc::new(InMemoryStore::new()));

        let result = service.add_current_location().await;
        assert!(matches!(
            result,
            Err(application::ApplicationError::PositionUnavailable(_))
        ));
        assert!(service.locations().is_empty());
    }

    #[tokio::test]
    async fn weather_outage_marks_location_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(search_response()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let mut service = dashboard(&server, Arc::new(InMemoryStore::new()));
        service
            .add_location_by_name("Kazan")
            .await
            .expect("add kazan");

        let report = service.refresh().await.expect("refresh");
        assert_eq!(report.status, RefreshStatus::Failed);
        assert!(report.is_page_error());
    }
}
