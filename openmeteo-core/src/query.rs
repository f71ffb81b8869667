//! Rendering option bundles into request URLs.
//!
//! Parameter order is fixed per bundle so the same bundle always yields the
//! same URL. Free-form values are form-encoded; list values are the
//! comma-joined wire names of an [`OptionSet`], with the commas left as-is.

use url::form_urlencoded;

use crate::{
    options::OptionSet,
    params::Parameter,
    request::{AirQualityOptions, GeocodingOptions, WeatherForecastOptions},
};

pub const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";
pub const GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
pub const AIR_QUALITY_URL: &str = "https://air-quality-api.open-meteo.com/v1/air-quality";

/// A bundle that knows its endpoint and how to render its query string.
pub trait EncodeQuery {
    const ENDPOINT: &'static str;

    /// The query string without a leading `?`.
    fn encode_query(&self) -> String;

    fn url(&self) -> String {
        merge_url(Self::ENDPOINT, &self.encode_query())
    }
}

/// Append `query` to `base`, starting a query string or extending an existing one.
pub fn merge_url(base: &str, query: &str) -> String {
    if query.is_empty() {
        return base.to_string();
    }
    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{base}{separator}{query}")
}

/// Accumulates `name=value` pairs joined by `&`.
#[derive(Debug, Default)]
struct QueryBuilder {
    query: String,
}

impl QueryBuilder {
    fn pair(&mut self, name: &str, value: &str) -> &mut Self {
        if !self.query.is_empty() {
            self.query.push('&');
        }
        self.query.push_str(name);
        self.query.push('=');
        self.query.push_str(value);
        self
    }

    fn text(&mut self, name: &str, value: &str) -> &mut Self {
        let encoded: String = form_urlencoded::byte_serialize(value.as_bytes()).collect();
        self.pair(name, &encoded)
    }

    fn text_if_set(&mut self, name: &str, value: &str) -> &mut Self {
        if !value.is_empty() {
            self.text(name, value);
        }
        self
    }

    fn number(&mut self, name: &str, value: impl ToString) -> &mut Self {
        self.pair(name, &value.to_string())
    }

    fn list<P: Parameter>(&mut self, name: &str, options: &OptionSet<P>) -> &mut Self {
        if !options.is_empty() {
            self.pair(name, &options.to_query_value());
        }
        self
    }

    fn finish(&mut self) -> String {
        std::mem::take(&mut self.query)
    }
}

impl EncodeQuery for WeatherForecastOptions {
    const ENDPOINT: &'static str = FORECAST_URL;

    fn encode_query(&self) -> String {
        QueryBuilder::default()
            .number("latitude", self.latitude)
            .number("longitude", self.longitude)
            .text("temperature_unit", &self.temperature_unit)
            .text("windspeed_unit", &self.windspeed_unit)
            .text("precipitation_unit", &self.precipitation_unit)
            .text_if_set("timezone", &self.timezone)
            .text("timeformat", &self.timeformat)
            .number("past_days", self.past_days)
            .text_if_set("start_date", &self.start_date)
            .text_if_set("end_date", &self.end_date)
            .list("hourly", &self.hourly)
            .list("daily", &self.daily)
            .text("cell_selection", &self.cell_selection)
            .list("models", &self.models)
            .list("current", &self.current)
            .list("minutely_15", &self.minutely_15)
            .finish()
    }
}

impl EncodeQuery for GeocodingOptions {
    const ENDPOINT: &'static str = GEOCODING_URL;

    fn encode_query(&self) -> String {
        let mut query = QueryBuilder::default();
        query.text("name", &self.name);
        if self.count > 0 {
            query.number("count", self.count);
        }
        query
            .text_if_set("format", &self.format)
            .text_if_set("language", &self.language)
            .finish()
    }
}

impl EncodeQuery for AirQualityOptions {
    const ENDPOINT: &'static str = AIR_QUALITY_URL;

    fn encode_query(&self) -> String {
        QueryBuilder::default()
            .number("latitude", self.latitude)
            .number("longitude", self.longitude)
            .text_if_set("domains", &self.domains)
            .text_if_set("timeformat", &self.timeformat)
            .text_if_set("timezone", &self.timezone)
            .list("hourly", &self.hourly)
            .finish()
    }
}
