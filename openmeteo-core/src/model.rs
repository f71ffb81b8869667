use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::params::Parameter;

/// Decode a JSON body, matching object keys case-insensitively.
///
/// Every key is lowercased before deserialising, so the response records
/// below only ever see lowercase field names.
pub fn decode_json<T: DeserializeOwned>(body: &str) -> serde_json::Result<T> {
    let value: Value = serde_json::from_str(body)?;
    serde_json::from_value(lowercase_keys(value))
}

fn lowercase_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter().map(|(k, v)| (k.to_lowercase(), lowercase_keys(v))).collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(lowercase_keys).collect()),
        other => other,
    }
}

/// A time axis entry: text in `iso8601` mode, seconds since the epoch in `unixtime` mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Unix(i64),
    Iso(String),
}

impl Timestamp {
    pub fn as_unix(&self) -> Option<i64> {
        match self {
            Timestamp::Unix(secs) => Some(*secs),
            Timestamp::Iso(_) => None,
        }
    }

    pub fn as_iso(&self) -> Option<&str> {
        match self {
            Timestamp::Iso(text) => Some(text),
            Timestamp::Unix(_) => None,
        }
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Timestamp::Iso(String::new())
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timestamp::Unix(secs) => write!(f, "{secs}"),
            Timestamp::Iso(text) => f.write_str(text),
        }
    }
}

impl From<&str> for Timestamp {
    fn from(text: &str) -> Self {
        Timestamp::Iso(text.to_string())
    }
}

impl From<i64> for Timestamp {
    fn from(secs: i64) -> Self {
        Timestamp::Unix(secs)
    }
}

/// Response of the forecast endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherForecast {
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
    pub generationtime_ms: f64,
    pub utc_offset_seconds: i64,
    pub timezone: String,
    pub timezone_abbreviation: String,
    pub current_weather: Option<CurrentWeather>,
    pub current_units: Option<BTreeMap<String, String>>,
    pub current: Option<CurrentValues>,
    pub hourly_units: Option<BTreeMap<String, String>>,
    pub hourly: Option<TimeSeries>,
    pub daily_units: Option<BTreeMap<String, String>>,
    pub daily: Option<TimeSeries>,
    pub minutely_15_units: Option<BTreeMap<String, String>>,
    pub minutely_15: Option<TimeSeries>,
}

/// The legacy `current_weather` block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrentWeather {
    pub time: Timestamp,
    pub temperature: f64,
    pub windspeed: f64,
    pub winddirection: f64,
    pub weathercode: i32,
    pub is_day: i32,
}

/// The `current` block: one value per requested current parameter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrentValues {
    pub time: Timestamp,
    pub interval: i64,
    #[serde(flatten)]
    pub values: BTreeMap<String, Value>,
}

impl CurrentValues {
    pub fn get<P: Parameter>(&self, param: P) -> Option<f64> {
        self.values.get(param.as_str()).and_then(Value::as_f64)
    }
}

/// A column-oriented series: `time` plus one column per requested parameter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeSeries {
    pub time: Vec<Timestamp>,
    #[serde(flatten)]
    pub columns: BTreeMap<String, Vec<Value>>,
}

impl TimeSeries {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn column<P: Parameter>(&self, param: P) -> Option<&[Value]> {
        self.columns.get(param.as_str()).map(Vec::as_slice)
    }

    /// Numeric column; `null` entries (missing data) come back as `None`.
    pub fn values<P: Parameter>(&self, param: P) -> Option<Vec<Option<f64>>> {
        self.column(param).map(|col| col.iter().map(Value::as_f64).collect())
    }

    /// Text column, e.g. `sunrise`/`sunset` in `iso8601` mode.
    pub fn texts<P: Parameter>(&self, param: P) -> Option<Vec<Option<&str>>> {
        self.column(param).map(|col| col.iter().map(Value::as_str).collect())
    }
}

/// Response of the geocoding endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocodingApiResponse {
    #[serde(rename = "results")]
    pub locations: Vec<LocationData>,
    pub generationtime_ms: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationData {
    pub id: i64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
    pub feature_code: String,
    pub country_code: String,
    pub country: String,
    pub country_id: i64,
    pub timezone: String,
    pub population: i64,
    pub postcodes: Vec<String>,
    pub admin1: String,
    pub admin2: String,
    pub admin3: String,
    pub admin4: String,
    pub admin1_id: i64,
    pub admin2_id: i64,
    pub admin3_id: i64,
    pub admin4_id: i64,
}

/// Response of the air-quality endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AirQuality {
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
    pub generationtime_ms: f64,
    pub utc_offset_seconds: i64,
    pub timezone: String,
    pub timezone_abbreviation: String,
    pub hourly_units: Option<BTreeMap<String, String>>,
    pub hourly: Option<TimeSeries>,
}
