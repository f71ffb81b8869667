use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::request::{AirQualityOptions, GeocodingOptions, WeatherForecastOptions};

/// Units applied to every forecast request built from this config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitDefaults {
    pub temperature_unit: String,
    pub windspeed_unit: String,
    pub precipitation_unit: String,
}

impl Default for UnitDefaults {
    fn default() -> Self {
        Self {
            temperature_unit: "celsius".to_string(),
            windspeed_unit: "kmh".to_string(),
            precipitation_unit: "mm".to_string(),
        }
    }
}

/// Settings for the shared HTTP client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    /// Whole-request timeout. `None` keeps the transport's own behaviour.
    pub timeout_secs: Option<u64>,
    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: None,
            user_agent: concat!("openmeteo-rs/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// timezone = "auto"
/// language = "de"
///
/// [units]
/// temperature_unit = "fahrenheit"
///
/// [http]
/// timeout_secs = 10
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub units: UnitDefaults,
    /// Timezone for forecast and air-quality requests, e.g. "auto" or "Europe/Berlin".
    pub timezone: Option<String>,
    /// Language for geocoding results.
    pub language: Option<String>,
    pub http: HttpSettings,
}

impl Config {
    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, use defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("com", "open-meteo", "openmeteo-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Copy configured units and timezone onto a forecast request.
    pub fn apply_to_forecast(&self, options: &mut WeatherForecastOptions) {
        options.temperature_unit.clone_from(&self.units.temperature_unit);
        options.windspeed_unit.clone_from(&self.units.windspeed_unit);
        options.precipitation_unit.clone_from(&self.units.precipitation_unit);
        if let Some(tz) = &self.timezone {
            options.timezone.clone_from(tz);
        }
    }

    pub fn apply_to_geocoding(&self, options: &mut GeocodingOptions) {
        if let Some(language) = &self.language {
            options.language.clone_from(language);
        }
    }

    pub fn apply_to_air_quality(&self, options: &mut AirQualityOptions) {
        if let Some(tz) = &self.timezone {
            options.timezone.clone_from(tz);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("absent.toml")).unwrap();

        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.units.temperature_unit, "celsius");
        assert!(cfg.http.timeout_secs.is_none());
    }

    #[test]
    fn save_then_load_keeps_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.units.temperature_unit = "fahrenheit".into();
        cfg.timezone = Some("auto".into());
        cfg.http.timeout_secs = Some(10);
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "language = \"de\"\n[units]\nwindspeed_unit = \"ms\"\n").unwrap();

        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.language.as_deref(), Some("de"));
        assert_eq!(cfg.units.windspeed_unit, "ms");
        assert_eq!(cfg.units.temperature_unit, "celsius");
    }

    #[test]
    fn invalid_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "units = 3").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn applies_defaults_to_requests() {
        let cfg = Config {
            units: UnitDefaults {
                temperature_unit: "fahrenheit".into(),
                windspeed_unit: "mph".into(),
                precipitation_unit: "inch".into(),
            },
            timezone: Some("America/New_York".into()),
            language: Some("fr".into()),
            http: HttpSettings::default(),
        };

        let mut forecast = WeatherForecastOptions::new(40.7, -74.0);
        cfg.apply_to_forecast(&mut forecast);
        assert_eq!(forecast.temperature_unit, "fahrenheit");
        assert_eq!(forecast.windspeed_unit, "mph");
        assert_eq!(forecast.precipitation_unit, "inch");
        assert_eq!(forecast.timezone, "America/New_York");

        let mut geocoding = GeocodingOptions::new("Lyon");
        cfg.apply_to_geocoding(&mut geocoding);
        assert_eq!(geocoding.language, "fr");

        let mut air = AirQualityOptions::new(40.7, -74.0);
        cfg.apply_to_air_quality(&mut air);
        assert_eq!(air.timezone, "America/New_York");
    }

    #[test]
    fn unset_timezone_leaves_request_untouched() {
        let mut forecast = WeatherForecastOptions { timezone: "GMT".into(), ..Default::default() };
        Config::default().apply_to_forecast(&mut forecast);
        assert_eq!(forecast.timezone, "GMT");
    }
}
