//! Option bundles describing one API call each.
//!
//! The bundles are plain records. Empty strings mean "leave this parameter
//! out of the query"; the encoder in [`crate::query`] applies that rule.

use chrono::NaiveDate;

use crate::options::{
    AirQualityHourlyOptions, CurrentOptions, DailyOptions, HourlyOptions, Minutely15Options,
    WeatherModelOptions,
};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Settings for a call to the forecast endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherForecastOptions {
    pub latitude: f64,
    pub longitude: f64,
    /// `celsius` or `fahrenheit`.
    pub temperature_unit: String,
    /// `kmh`, `ms`, `mph` or `kn`.
    pub windspeed_unit: String,
    /// `mm` or `inch`.
    pub precipitation_unit: String,
    /// IANA name or `auto`; empty leaves the API default (GMT).
    pub timezone: String,
    pub hourly: HourlyOptions,
    pub daily: DailyOptions,
    /// Kept for compatibility with older callers; the encoder does not send it.
    pub current_weather: bool,
    /// `iso8601` or `unixtime`.
    pub timeformat: String,
    pub past_days: u32,
    pub start_date: String,
    pub end_date: String,
    /// `land`, `sea` or `nearest`.
    pub cell_selection: String,
    pub models: WeatherModelOptions,
    pub current: CurrentOptions,
    pub minutely_15: Minutely15Options,
}

impl Default for WeatherForecastOptions {
    fn default() -> Self {
        Self {
            latitude: 0.0,
            longitude: 0.0,
            temperature_unit: "celsius".to_string(),
            windspeed_unit: "kmh".to_string(),
            precipitation_unit: "mm".to_string(),
            timezone: String::new(),
            hourly: HourlyOptions::new(),
            daily: DailyOptions::new(),
            current_weather: true,
            timeformat: "iso8601".to_string(),
            past_days: 0,
            start_date: String::new(),
            end_date: String::new(),
            cell_selection: "land".to_string(),
            models: WeatherModelOptions::new(),
            current: CurrentOptions::new(),
            minutely_15: Minutely15Options::new(),
        }
    }
}

impl WeatherForecastOptions {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude, ..Self::default() }
    }

    /// Restrict the forecast to `start..=end`, formatted as `YYYY-MM-DD`.
    pub fn with_date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = start.format(DATE_FORMAT).to_string();
        self.end_date = end.format(DATE_FORMAT).to_string();
        self
    }

    pub fn set_coordinates(&mut self, latitude: f64, longitude: f64) {
        self.latitude = latitude;
        self.longitude = longitude;
    }
}

/// Settings for a call to the geocoding (place search) endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeocodingOptions {
    pub name: String,
    /// Maximum number of results; `0` leaves the API default.
    pub count: u32,
    /// `json` or `protobuf`; empty leaves the API default.
    pub format: String,
    /// Two-letter language code for translated names.
    pub language: String,
}

impl GeocodingOptions {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }
}

/// Settings for a call to the air-quality endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct AirQualityOptions {
    pub latitude: f64,
    pub longitude: f64,
    /// `auto`, `cams_europe` or `cams_global`.
    pub domains: String,
    pub timeformat: String,
    pub timezone: String,
    pub hourly: AirQualityHourlyOptions,
}

impl Default for AirQualityOptions {
    fn default() -> Self {
        Self {
            latitude: 0.0,
            longitude: 0.0,
            domains: "auto".to_string(),
            timeformat: "iso8601".to_string(),
            timezone: String::new(),
            hourly: AirQualityHourlyOptions::new(),
        }
    }
}

impl AirQualityOptions {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude, ..Self::default() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{DailyParameter, HourlyParameter};

    #[test]
    fn empty_weather_forecast_options() {
        let options = WeatherForecastOptions::default();

        assert!(options.current_weather);
        assert_eq!(options.latitude, 0.0);
        assert_eq!(options.longitude, 0.0);
        assert_eq!(options.temperature_unit, "celsius");
        assert_eq!(options.windspeed_unit, "kmh");
        assert_eq!(options.precipitation_unit, "mm");
        assert_eq!(options.timeformat, "iso8601");
        assert_eq!(options.cell_selection, "land");
        assert_eq!(options.past_days, 0);
        assert!(options.timezone.is_empty());
        assert!(options.daily.is_empty());
        assert!(options.hourly.is_empty());
        assert!(options.current.is_empty());
    }

    #[test]
    fn latitude_longitude_constructor() {
        let options = WeatherForecastOptions::new(2.4, 3.5);

        assert_eq!(options.latitude, 2.4);
        assert_eq!(options.longitude, 3.5);
        assert!(options.current_weather);
    }

    #[test]
    fn full_construction_with_struct_update() {
        let options = WeatherForecastOptions {
            temperature_unit: "fahrenheit".into(),
            timezone: "auto".into(),
            current_weather: false,
            past_days: 1,
            ..WeatherForecastOptions::new(10.5, 20.5)
        };

        assert!(!options.current_weather);
        assert_eq!(options.latitude, 10.5);
        assert_eq!(options.longitude, 20.5);
        assert_eq!(options.temperature_unit, "fahrenheit");
        assert_eq!(options.windspeed_unit, "kmh");
        assert_eq!(options.timezone, "auto");
        assert_eq!(options.past_days, 1);
    }

    #[test]
    fn daily_and_hourly_by_name() {
        let mut options = WeatherForecastOptions::new(10.5, 20.5);

        options.daily.add_name("sunset").unwrap();
        options.daily.add_name("sunrise").unwrap();
        assert_eq!(options.daily.len(), 2);
        assert!(options.daily.contains(DailyParameter::Sunrise));

        options.hourly.add_name("cloudcover_low").unwrap();
        options.hourly.add_name("cloudcover_high").unwrap();
        assert_eq!(options.hourly.len(), 2);
        assert!(options.hourly.contains(HourlyParameter::CloudCoverHigh));
    }

    #[test]
    fn date_range_is_formatted_as_iso_dates() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 12).unwrap();
        let options = WeatherForecastOptions::default().with_date_range(start, end);

        assert_eq!(options.start_date, "2024-01-05");
        assert_eq!(options.end_date, "2024-01-12");
    }

    #[test]
    fn bundles_own_their_collections() {
        let mut first = WeatherForecastOptions::default();
        first.hourly.add(HourlyParameter::Rain);

        let second = first.clone();
        first.hourly.clear();

        assert!(second.hourly.contains(HourlyParameter::Rain));
    }

    #[test]
    fn geocoding_defaults() {
        let options = GeocodingOptions::new("Berlin");
        assert_eq!(options.name, "Berlin");
        assert_eq!(options.count, 0);
        assert!(options.format.is_empty());
        assert!(options.language.is_empty());
    }

    #[test]
    fn air_quality_defaults() {
        let options = AirQualityOptions::new(52.5235, 13.4115);
        assert_eq!(options.domains, "auto");
        assert_eq!(options.timeformat, "iso8601");
        assert!(options.timezone.is_empty());
        assert!(options.hourly.is_empty());
    }
}
