use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use inquire::{Select, Text};
use openmeteo_core::{
    AirQualityOptions, Config, CurrentOptions, EncodeQuery, GeocodingOptions, OpenMeteoClient,
    OptionSet, Parameter, WeatherForecastOptions, weathercode_to_string,
};
use tracing::{debug, warn};

use crate::output;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "openmeteo", version, about = "Open-Meteo weather CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set default units, timezone and language interactively.
    Configure,

    /// Show the forecast for a place name (looked up via geocoding).
    Forecast {
        /// Place name, e.g. "Berlin".
        location: String,

        #[command(flatten)]
        selection: ForecastArgs,

        /// Print the geocoding URL and the forecast URL template instead of fetching.
        #[arg(long)]
        url: bool,
    },

    /// Show the forecast for explicit coordinates.
    At {
        #[arg(allow_negative_numbers = true)]
        latitude: f64,
        #[arg(allow_negative_numbers = true)]
        longitude: f64,

        #[command(flatten)]
        selection: ForecastArgs,

        /// Print the request URL instead of fetching it.
        #[arg(long)]
        url: bool,
    },

    /// Search for places by name.
    Geocode {
        name: String,

        /// Maximum number of matches.
        #[arg(long, default_value_t = 5)]
        count: u32,

        /// Language for translated place names, e.g. "de".
        #[arg(long)]
        language: Option<String>,

        #[arg(long)]
        url: bool,
    },

    /// Show hourly air quality for coordinates.
    AirQuality {
        #[arg(allow_negative_numbers = true)]
        latitude: f64,
        #[arg(allow_negative_numbers = true)]
        longitude: f64,

        /// Comma-separated variables, e.g. "pm10,pm2_5". Defaults to all.
        #[arg(long, value_delimiter = ',')]
        hourly: Vec<String>,

        #[arg(long)]
        url: bool,
    },

    /// Describe a WMO weather code.
    Weathercode { code: i32 },
}

/// Variable selection and range flags shared by the forecast commands.
#[derive(Debug, Default, Args)]
pub struct ForecastArgs {
    /// Comma-separated current variables, e.g. "temperature_2m,weathercode".
    #[arg(long, value_delimiter = ',')]
    pub current: Vec<String>,

    #[arg(long, value_delimiter = ',')]
    pub hourly: Vec<String>,

    #[arg(long, value_delimiter = ',')]
    pub daily: Vec<String>,

    #[arg(long = "minutely-15", value_delimiter = ',')]
    pub minutely_15: Vec<String>,

    /// Weather models, e.g. "icon_seamless,gfs_seamless".
    #[arg(long, value_delimiter = ',')]
    pub models: Vec<String>,

    #[arg(long)]
    pub past_days: Option<u32>,

    /// First day, YYYY-MM-DD.
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// Last day, YYYY-MM-DD.
    #[arg(long)]
    pub end_date: Option<NaiveDate>,

    /// Overrides the configured timezone.
    #[arg(long)]
    pub timezone: Option<String>,
}

impl ForecastArgs {
    /// Build forecast options from the configured defaults plus these flags.
    ///
    /// With no variables selected at all, every current variable is requested.
    pub fn to_options(
        &self,
        config: &Config,
        latitude: f64,
        longitude: f64,
    ) -> Result<WeatherForecastOptions> {
        let mut options = WeatherForecastOptions::new(latitude, longitude);
        config.apply_to_forecast(&mut options);

        add_names(&mut options.current, &self.current)?;
        add_names(&mut options.hourly, &self.hourly)?;
        add_names(&mut options.daily, &self.daily)?;
        add_names(&mut options.minutely_15, &self.minutely_15)?;
        add_names(&mut options.models, &self.models)?;

        if options.current.is_empty()
            && options.hourly.is_empty()
            && options.daily.is_empty()
            && options.minutely_15.is_empty()
        {
            options.current = CurrentOptions::all();
        }

        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) if end < start => {
                bail!("--end-date {end} is before --start-date {start}")
            }
            _ => {}
        }

        if let Some(days) = self.past_days {
            options.past_days = days;
        }
        if let Some(start) = self.start_date {
            options.start_date = start.format("%Y-%m-%d").to_string();
        }
        if let Some(end) = self.end_date {
            options.end_date = end.format("%Y-%m-%d").to_string();
        }
        if let Some(tz) = &self.timezone {
            options.timezone.clone_from(tz);
        }

        Ok(options)
    }
}

fn add_names<P: Parameter>(set: &mut OptionSet<P>, names: &[String]) -> Result<()> {
    for name in names {
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        set.add_name(name).with_context(|| {
            let known: Vec<&str> = P::all().iter().map(|p| p.as_str()).collect();
            format!("Valid {} parameters: {}", P::VOCABULARY, known.join(", "))
        })?;
    }
    Ok(())
}

impl Command {
    /// Whether the command only prints locally built output.
    fn is_offline(&self) -> bool {
        matches!(
            self,
            Command::Weathercode { .. }
                | Command::Forecast { url: true, .. }
                | Command::At { url: true, .. }
                | Command::Geocode { url: true, .. }
                | Command::AirQuality { url: true, .. }
        )
    }
}

/// Offline commands fall back to defaults when the config file is unreadable.
fn resolve_config(loaded: Result<Config>, offline: bool) -> Result<Config> {
    match loaded {
        Ok(config) => Ok(config),
        Err(e) if offline => {
            warn!(error = %format!("{e:#}"), "Ignoring unreadable configuration");
            Ok(Config::default())
        }
        Err(e) => Err(e),
    }
}

/// The two requests a location forecast makes. The forecast coordinates are
/// placeholders until the first geocoding match fills them in.
fn forecast_dry_run(location: &str, options: &WeatherForecastOptions) -> [String; 2] {
    [GeocodingOptions::new(location).url(), options.url()]
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        if let Command::Weathercode { code } = self.command {
            println!("{code}: {}", weathercode_to_string(code));
            return Ok(());
        }

        let config = resolve_config(Config::load(), self.command.is_offline())?;
        debug!(?config, "Loaded configuration");

        match self.command {
            Command::Configure => configure(config)?,
            Command::Forecast { location, selection, url } => {
                let options = selection.to_options(&config, 0.0, 0.0)?;
                if url {
                    for request in forecast_dry_run(&location, &options) {
                        println!("{request}");
                    }
                    return Ok(());
                }
                let client = OpenMeteoClient::from_config(&config)?;
                let forecast = client
                    .try_query((location.as_str(), options))
                    .await
                    .with_context(|| format!("Failed to get forecast for '{location}'"))?;
                print!("{}", output::render_forecast(&forecast));
            }
            Command::At { latitude, longitude, selection, url } => {
                let options = selection.to_options(&config, latitude, longitude)?;
                if url {
                    println!("{}", options.url());
                    return Ok(());
                }
                let client = OpenMeteoClient::from_config(&config)?;
                let forecast =
                    client.forecast(&options).await.context("Failed to get forecast")?;
                print!("{}", output::render_forecast(&forecast));
            }
            Command::Geocode { name, count, language, url } => {
                let mut options = GeocodingOptions { count, ..GeocodingOptions::new(name) };
                config.apply_to_geocoding(&mut options);
                if let Some(language) = language {
                    options.language = language;
                }
                if url {
                    println!("{}", options.url());
                    return Ok(());
                }
                let client = OpenMeteoClient::from_config(&config)?;
                let response = client
                    .geocode(&options)
                    .await
                    .with_context(|| format!("Failed to look up '{}'", options.name))?;
                print!("{}", output::render_locations(&response));
            }
            Command::AirQuality { latitude, longitude, hourly, url } => {
                let mut options = AirQualityOptions::new(latitude, longitude);
                config.apply_to_air_quality(&mut options);
                add_names(&mut options.hourly, &hourly)?;
                if options.hourly.is_empty() {
                    options.hourly = OptionSet::all();
                }
                if url {
                    println!("{}", options.url());
                    return Ok(());
                }
                let client = OpenMeteoClient::from_config(&config)?;
                let air =
                    client.air_quality(&options).await.context("Failed to get air quality")?;
                print!("{}", output::render_air_quality(&air));
            }
            Command::Weathercode { .. } => {}
        }

        Ok(())
    }
}

fn configure(mut config: Config) -> Result<()> {
    let units = &mut config.units;

    units.temperature_unit =
        select("Temperature unit", &["celsius", "fahrenheit"], &units.temperature_unit)?;
    units.windspeed_unit =
        select("Wind speed unit", &["kmh", "ms", "mph", "kn"], &units.windspeed_unit)?;
    units.precipitation_unit =
        select("Precipitation unit", &["mm", "inch"], &units.precipitation_unit)?;

    let timezone = Text::new("Timezone (IANA name or \"auto\", empty for GMT):")
        .with_default(config.timezone.as_deref().unwrap_or("auto"))
        .prompt()
        .context("Failed to read timezone")?;
    config.timezone = non_empty(timezone);

    let language = Text::new("Language for place names (e.g. \"en\", empty for default):")
        .with_default(config.language.as_deref().unwrap_or(""))
        .prompt()
        .context("Failed to read language")?;
    config.language = non_empty(language);

    config.save()?;
    println!("Configuration saved to {}", Config::config_file_path()?.display());
    Ok(())
}

fn select(prompt: &str, choices: &[&str], current: &str) -> Result<String> {
    let start = choices.iter().position(|c| *c == current).unwrap_or(0);
    let choice = Select::new(prompt, choices.to_vec())
        .with_starting_cursor(start)
        .prompt()
        .with_context(|| format!("Failed to read {}", prompt.to_lowercase()))?;
    Ok(choice.to_string())
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
