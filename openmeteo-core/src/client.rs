//! Orchestration of forecast, geocoding and air-quality calls.
//!
//! Every call goes through [`OpenMeteoClient`]. The `try_*` and typed methods
//! return [`QueryError`]; [`OpenMeteoClient::query`] and
//! [`OpenMeteoClient::query_air_quality`] collapse any failure to `None` and
//! log it.

use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::{
    config::Config,
    error::QueryError,
    model::{AirQuality, GeocodingApiResponse, WeatherForecast, decode_json},
    options::CurrentOptions,
    query::EncodeQuery,
    request::{AirQualityOptions, GeocodingOptions, WeatherForecastOptions},
    transport::{HttpTransport, Transport},
};

/// The shapes a forecast query can take.
///
/// The `From` conversions let [`OpenMeteoClient::query`] accept a place name,
/// coordinates, or fully specified options directly.
#[derive(Debug, Clone, PartialEq)]
pub enum ForecastQuery {
    /// Geocode the name, then fetch every current-weather parameter.
    Location(String),
    /// Geocode with explicit options, then fetch every current-weather parameter.
    Geocoding(GeocodingOptions),
    /// Geocode the name, then fetch with the given options at the found coordinates.
    LocationWith { location: String, options: WeatherForecastOptions },
    /// Fetch directly; the options already carry coordinates.
    Options(WeatherForecastOptions),
}

impl From<&str> for ForecastQuery {
    fn from(location: &str) -> Self {
        ForecastQuery::Location(location.to_string())
    }
}

impl From<String> for ForecastQuery {
    fn from(location: String) -> Self {
        ForecastQuery::Location(location)
    }
}

impl From<GeocodingOptions> for ForecastQuery {
    fn from(options: GeocodingOptions) -> Self {
        ForecastQuery::Geocoding(options)
    }
}

impl From<WeatherForecastOptions> for ForecastQuery {
    fn from(options: WeatherForecastOptions) -> Self {
        ForecastQuery::Options(options)
    }
}

impl From<(f64, f64)> for ForecastQuery {
    fn from((latitude, longitude): (f64, f64)) -> Self {
        ForecastQuery::Options(WeatherForecastOptions::new(latitude, longitude))
    }
}

impl<S: Into<String>> From<(S, WeatherForecastOptions)> for ForecastQuery {
    fn from((location, options): (S, WeatherForecastOptions)) -> Self {
        ForecastQuery::LocationWith { location: location.into(), options }
    }
}

enum ForecastStep {
    AwaitingGeocode { geocoding: GeocodingOptions, forecast: WeatherForecastOptions },
    AwaitingForecast(WeatherForecastOptions),
    Done(WeatherForecast),
}

impl From<ForecastQuery> for ForecastStep {
    fn from(query: ForecastQuery) -> Self {
        match query {
            ForecastQuery::Location(name) => ForecastStep::AwaitingGeocode {
                geocoding: GeocodingOptions::new(name),
                forecast: current_weather_options(),
            },
            ForecastQuery::Geocoding(geocoding) => {
                ForecastStep::AwaitingGeocode { geocoding, forecast: current_weather_options() }
            }
            ForecastQuery::LocationWith { location, options } => ForecastStep::AwaitingGeocode {
                geocoding: GeocodingOptions::new(location),
                forecast: options,
            },
            ForecastQuery::Options(options) => ForecastStep::AwaitingForecast(options),
        }
    }
}

/// Forecast options used when the caller only named a place.
fn current_weather_options() -> WeatherForecastOptions {
    WeatherForecastOptions { current: CurrentOptions::all(), ..WeatherForecastOptions::default() }
}

/// Client for the Open-Meteo APIs.
///
/// Holds one [`Transport`]; clone the transport (or share the client) rather
/// than building a new one per request.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient<T = HttpTransport> {
    transport: T,
}

impl OpenMeteoClient<HttpTransport> {
    pub fn new() -> Result<Self, QueryError> {
        Ok(Self::with_transport(HttpTransport::new()?))
    }

    pub fn from_config(config: &Config) -> Result<Self, QueryError> {
        Ok(Self::with_transport(HttpTransport::from_settings(&config.http)?))
    }
}

impl<T: Transport> OpenMeteoClient<T> {
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn fetch<R: DeserializeOwned>(&self, url: String) -> Result<R, QueryError> {
        let body = self.transport.get(&url).await?;
        decode_json(&body).map_err(|source| QueryError::Decode { url, source })
    }

    /// One forecast call with the given options.
    pub async fn forecast(
        &self,
        options: &WeatherForecastOptions,
    ) -> Result<WeatherForecast, QueryError> {
        self.fetch(options.url()).await
    }

    pub async fn forecast_at(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<WeatherForecast, QueryError> {
        self.forecast(&WeatherForecastOptions::new(latitude, longitude)).await
    }

    pub async fn geocode(
        &self,
        options: &GeocodingOptions,
    ) -> Result<GeocodingApiResponse, QueryError> {
        self.fetch(options.url()).await
    }

    pub async fn location_data(&self, location: &str) -> Result<GeocodingApiResponse, QueryError> {
        self.geocode(&GeocodingOptions::new(location)).await
    }

    /// `(latitude, longitude)` of the first match for `location`.
    pub async fn location_coordinates(&self, location: &str) -> Result<(f64, f64), QueryError> {
        let response = self.location_data(location).await?;
        response
            .locations
            .first()
            .map(|loc| (loc.latitude, loc.longitude))
            .ok_or_else(|| QueryError::NotFound(location.to_string()))
    }

    pub async fn air_quality(&self, options: &AirQualityOptions) -> Result<AirQuality, QueryError> {
        self.fetch(options.url()).await
    }

    /// Run a forecast query to completion.
    ///
    /// Name-based queries geocode first and use the first location found; if
    /// there is none the query stops with [`QueryError::NotFound`] before any
    /// forecast request is made.
    #[instrument(skip_all)]
    pub async fn try_query(
        &self,
        query: impl Into<ForecastQuery>,
    ) -> Result<WeatherForecast, QueryError> {
        let mut step = ForecastStep::from(query.into());
        loop {
            step = match step {
                ForecastStep::AwaitingGeocode { geocoding, mut forecast } => {
                    let response = self.geocode(&geocoding).await?;
                    let Some(found) = response.locations.first() else {
                        return Err(QueryError::NotFound(geocoding.name));
                    };
                    debug!(
                        name = %found.name,
                        latitude = found.latitude,
                        longitude = found.longitude,
                        "Resolved location"
                    );
                    forecast.set_coordinates(found.latitude, found.longitude);
                    ForecastStep::AwaitingForecast(forecast)
                }
                ForecastStep::AwaitingForecast(forecast) => {
                    ForecastStep::Done(self.forecast(&forecast).await?)
                }
                ForecastStep::Done(forecast) => return Ok(forecast),
            };
        }
    }

    /// Like [`Self::try_query`], but any failure is logged and becomes `None`.
    pub async fn query(&self, query: impl Into<ForecastQuery>) -> Option<WeatherForecast> {
        match self.try_query(query).await {
            Ok(forecast) => Some(forecast),
            Err(e) => {
                warn!(error = %e, "Forecast query failed");
                None
            }
        }
    }

    pub async fn query_air_quality(&self, options: &AirQualityOptions) -> Option<AirQuality> {
        match self.air_quality(options).await {
            Ok(air) => Some(air),
            Err(e) => {
                warn!(error = %e, "Air quality query failed");
                None
            }
        }
    }
}

/// Synchronous front end over [`OpenMeteoClient`].
///
/// Each call blocks on the same async code path using a private
/// single-threaded runtime. Do not use it from inside another tokio runtime.
#[derive(Debug)]
pub struct BlockingClient<T = HttpTransport> {
    inner: OpenMeteoClient<T>,
    runtime: tokio::runtime::Runtime,
}

impl BlockingClient<HttpTransport> {
    pub fn new() -> Result<Self, QueryError> {
        Self::with_client(OpenMeteoClient::new()?)
    }
}

impl<T: Transport> BlockingClient<T> {
    pub fn with_client(inner: OpenMeteoClient<T>) -> Result<Self, QueryError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(QueryError::Runtime)?;
        Ok(Self { inner, runtime })
    }

    pub fn client(&self) -> &OpenMeteoClient<T> {
        &self.inner
    }

    pub fn try_query(&self, query: impl Into<ForecastQuery>) -> Result<WeatherForecast, QueryError> {
        self.runtime.block_on(self.inner.try_query(query))
    }

    pub fn query(&self, query: impl Into<ForecastQuery>) -> Option<WeatherForecast> {
        self.runtime.block_on(self.inner.query(query))
    }

    pub fn query_air_quality(&self, options: &AirQualityOptions) -> Option<AirQuality> {
        self.runtime.block_on(self.inner.query_air_quality(options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{CurrentParameter, HourlyParameter, Parameter};
    use async_trait::async_trait;
    use std::{collections::VecDeque, sync::Mutex};

    /// Replays canned responses in order and records every requested URL.
    #[derive(Debug, Default)]
    struct FakeTransport {
        responses: Mutex<VecDeque<Result<String, QueryError>>>,
        requests: Mutex<Vec<String>>,
    }

    impl FakeTransport {
        fn replying(responses: impl IntoIterator<Item = Result<String, QueryError>>) -> Self {
            Self { responses: Mutex::new(responses.into_iter().collect()), ..Self::default() }
        }

        fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for FakeTransport {
        async fn get(&self, url: &str) -> Result<String, QueryError> {
            self.requests.lock().unwrap().push(url.to_string());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| panic!("unexpected request to {url}"))
        }
    }

    fn ok(body: &str) -> Result<String, QueryError> {
        Ok(body.to_string())
    }

    fn status(code: u16) -> Result<String, QueryError> {
        Err(QueryError::Status {
            url: "http://fake".to_string(),
            status: code,
            body: String::new(),
        })
    }

    const BERLIN: &str = r#"{"results": [
        {"name": "Berlin", "latitude": 52.52, "longitude": 13.41},
        {"name": "Berlin", "latitude": 39.79, "longitude": -74.93}
    ]}"#;

    const FORECAST: &str = r#"{"latitude": 52.52, "longitude": 13.42, "timezone": "GMT",
        "current": {"time": "2024-01-15T12:00", "interval": 900, "temperature_2m": 5.5}}"#;

    #[tokio::test]
    async fn direct_query_is_a_single_request() {
        let client = OpenMeteoClient::with_transport(FakeTransport::replying([ok(FORECAST)]));

        let forecast = client.try_query((52.52, 13.41)).await.unwrap();

        assert_eq!(forecast.timezone, "GMT");
        let requests = client.transport().requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].starts_with(
            "https://api.open-meteo.com/v1/forecast?latitude=52.52&longitude=13.41&"
        ));
        assert!(!requests[0].contains("current="));
    }

    #[tokio::test]
    async fn location_query_geocodes_then_fetches_current_weather() {
        let client =
            OpenMeteoClient::with_transport(FakeTransport::replying([ok(BERLIN), ok(FORECAST)]));

        let forecast = client.query("Berlin").await.unwrap();
        let current = forecast.current.unwrap();
        assert_eq!(current.get(CurrentParameter::Temperature2m), Some(5.5));

        let requests = client.transport().requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0], "https://geocoding-api.open-meteo.com/v1/search?name=Berlin");
        assert!(requests[1].contains("latitude=52.52&longitude=13.41&"));

        let all_current = CurrentOptions::all().to_query_value();
        assert!(requests[1].ends_with(&format!("&current={all_current}")));
    }

    #[tokio::test]
    async fn geocoding_options_are_forwarded() {
        let client =
            OpenMeteoClient::with_transport(FakeTransport::replying([ok(BERLIN), ok(FORECAST)]));
        let geocoding = GeocodingOptions {
            count: 1,
            language: "de".into(),
            ..GeocodingOptions::new("Berlin")
        };

        assert!(client.query(geocoding).await.is_some());
        assert_eq!(
            client.transport().requests()[0],
            "https://geocoding-api.open-meteo.com/v1/search?name=Berlin&count=1&language=de"
        );
    }

    #[tokio::test]
    async fn location_with_explicit_options_keeps_them() {
        let client =
            OpenMeteoClient::with_transport(FakeTransport::replying([ok(BERLIN), ok(FORECAST)]));
        let mut options = WeatherForecastOptions::default();
        options.hourly.add(HourlyParameter::Rain);

        client.try_query(("Berlin", options)).await.unwrap();

        let forecast_url = &client.transport().requests()[1];
        assert!(forecast_url.contains("latitude=52.52&longitude=13.41&"));
        assert!(forecast_url.contains("&hourly=rain&"));
        assert!(!forecast_url.contains("current="));
    }

    #[tokio::test]
    async fn unixtime_forecast_decodes() {
        let body = r#"{"latitude": 52.52, "current": {"time": 1705320000, "interval": 900},
            "hourly": {"time": [1705276800, 1705280400], "rain": [0.0, null]}}"#;
        let client = OpenMeteoClient::with_transport(FakeTransport::replying([ok(body)]));
        let mut options = WeatherForecastOptions {
            timeformat: "unixtime".into(),
            ..WeatherForecastOptions::new(52.52, 13.41)
        };
        options.hourly.add(HourlyParameter::Rain);

        let forecast = client.query(options).await.unwrap();

        assert_eq!(forecast.current.unwrap().time.as_unix(), Some(1705320000));
        assert_eq!(forecast.hourly.unwrap().len(), 2);
        assert!(client.transport().requests()[0].contains("&timeformat=unixtime&"));
    }

    #[tokio::test]
    async fn no_match_stops_before_forecast() {
        let client = OpenMeteoClient::with_transport(FakeTransport::replying([ok(
            r#"{"generationtime_ms": 0.5}"#,
        )]));

        let err = client.try_query("Atlantis").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(client.transport().requests().len(), 1);
    }

    #[tokio::test]
    async fn no_match_collapses_to_none() {
        let client =
            OpenMeteoClient::with_transport(FakeTransport::replying([ok(r#"{"results": []}"#)]));

        assert!(client.query("Atlantis").await.is_none());
        assert_eq!(client.transport().requests().len(), 1);
    }

    #[tokio::test]
    async fn transport_failure_collapses_to_none() {
        let client = OpenMeteoClient::with_transport(FakeTransport::replying([status(500)]));
        assert!(client.query((1.0, 2.0)).await.is_none());

        let client = OpenMeteoClient::with_transport(FakeTransport::replying([status(503)]));
        assert!(client.query("Berlin").await.is_none());
        assert_eq!(client.transport().requests().len(), 1);
    }

    #[tokio::test]
    async fn typed_surface_keeps_error_kind() {
        let client =
            OpenMeteoClient::with_transport(FakeTransport::replying([status(400), ok("[]x")]));

        let err = client.forecast_at(0.0, 0.0).await.unwrap_err();
        assert!(matches!(err, QueryError::Status { status: 400, .. }));

        let err = client.forecast_at(0.0, 0.0).await.unwrap_err();
        assert!(matches!(err, QueryError::Decode { .. }));
    }

    #[tokio::test]
    async fn location_coordinates_uses_first_result() {
        let client = OpenMeteoClient::with_transport(FakeTransport::replying([
            ok(BERLIN),
            ok(r#"{"results": []}"#),
        ]));

        assert_eq!(client.location_coordinates("Berlin").await.unwrap(), (52.52, 13.41));
        assert!(client.location_coordinates("Nowhere").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn air_quality_query() {
        let body = r#"{"latitude": 52.55, "hourly": {"time": ["2024-01-15T00:00"], "pm10": [9.1]}}"#;
        let client = OpenMeteoClient::with_transport(FakeTransport::replying([ok(body), status(502)]));
        let mut options = AirQualityOptions::new(52.5235, 13.4115);
        options.hourly = crate::options::AirQualityHourlyOptions::all();

        let air = client.query_air_quality(&options).await.unwrap();
        assert!(air.hourly.is_some());

        let url = &client.transport().requests()[0];
        assert!(url.starts_with("https://air-quality-api.open-meteo.com/v1/air-quality?"));
        assert!(url.ends_with(&format!(
            "&hourly={}",
            crate::params::AirQualityHourlyParameter::all()
                .iter()
                .map(|p| p.as_str())
                .collect::<Vec<_>>()
                .join(",")
        )));

        assert!(client.query_air_quality(&options).await.is_none());
    }

    #[test]
    fn blocking_client_runs_the_same_flow() {
        let client =
            OpenMeteoClient::with_transport(FakeTransport::replying([ok(BERLIN), ok(FORECAST)]));
        let blocking = BlockingClient::with_client(client).unwrap();

        let forecast = blocking.query("Berlin").unwrap();
        assert_eq!(forecast.latitude, 52.52);
        assert_eq!(blocking.client().transport().requests().len(), 2);
    }

    #[test]
    fn query_conversions() {
        assert_eq!(ForecastQuery::from("Oslo"), ForecastQuery::Location("Oslo".into()));
        assert_eq!(
            ForecastQuery::from((1.0, 2.0)),
            ForecastQuery::Options(WeatherForecastOptions::new(1.0, 2.0))
        );
        assert!(matches!(
            ForecastQuery::from(("Oslo".to_string(), WeatherForecastOptions::default())),
            ForecastQuery::LocationWith { .. }
        ));
    }
}
