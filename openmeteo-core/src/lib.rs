//! Client library for the Open-Meteo weather, geocoding and air-quality APIs.
//!
//! This crate defines:
//! - Closed parameter vocabularies and ordered, duplicate-free option sets
//! - Request option bundles and their deterministic query-string encoding
//! - Response records, the HTTP transport, and the orchestration client
//! - Persisted configuration for front ends
//!
//! It is used by `openmeteo-cli`, but can also be reused by other binaries or services.

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod options;
pub mod params;
pub mod query;
pub mod request;
pub mod transport;
pub mod weathercode;

pub use client::{BlockingClient, ForecastQuery, OpenMeteoClient};
pub use config::{Config, HttpSettings, UnitDefaults};
pub use error::{ParameterError, QueryError};
pub use model::{
    AirQuality, CurrentValues, CurrentWeather, GeocodingApiResponse, LocationData, TimeSeries,
    Timestamp, WeatherForecast,
};
pub use options::{
    AirQualityHourlyOptions, CurrentOptions, DailyOptions, HourlyOptions, Minutely15Options,
    OptionSet, WeatherModelOptions,
};
pub use params::{
    AirQualityHourlyParameter, CurrentParameter, DailyParameter, HourlyParameter,
    Minutely15Parameter, Parameter, WeatherModel,
};
pub use query::EncodeQuery;
pub use request::{AirQualityOptions, GeocodingOptions, WeatherForecastOptions};
pub use transport::{HttpTransport, Transport};
pub use weathercode::weathercode_to_string;
