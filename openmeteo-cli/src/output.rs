//! Plain-text rendering of API responses.

use std::collections::BTreeMap;

use openmeteo_core::{
    AirQuality, GeocodingApiResponse, TimeSeries, WeatherForecast, weathercode_to_string,
};
use serde_json::Value;

/// Columns holding WMO codes get a description appended.
const WEATHERCODE_COLUMNS: [&str; 2] = ["weathercode", "weather_code"];

type Units = Option<BTreeMap<String, String>>;

pub fn render_forecast(forecast: &WeatherForecast) -> String {
    let mut lines = vec![format!(
        "Forecast for {:.4}, {:.4} ({}, elevation {} m)",
        forecast.latitude,
        forecast.longitude,
        display_timezone(&forecast.timezone),
        forecast.elevation
    )];

    if let Some(current) = &forecast.current {
        lines.push(String::new());
        lines.push(format!("Current conditions at {}:", current.time));
        for (name, value) in &current.values {
            let shown = format_value(name, value, &forecast.current_units);
            lines.push(format!("  {name:<28} {shown}"));
        }
    }

    if let Some(legacy) = &forecast.current_weather {
        lines.push(String::new());
        lines.push(format!(
            "Current weather at {}: {} °, wind {} from {}°, {}",
            legacy.time,
            legacy.temperature,
            legacy.windspeed,
            legacy.winddirection,
            weathercode_to_string(legacy.weathercode)
        ));
    }

    render_series(
        &mut lines,
        "15-minutely",
        forecast.minutely_15.as_ref(),
        &forecast.minutely_15_units,
    );
    render_series(&mut lines, "Hourly", forecast.hourly.as_ref(), &forecast.hourly_units);
    render_series(&mut lines, "Daily", forecast.daily.as_ref(), &forecast.daily_units);
    finish(lines)
}

pub fn render_locations(response: &GeocodingApiResponse) -> String {
    if response.locations.is_empty() {
        return "No matching locations.\n".to_string();
    }

    let lines = response
        .locations
        .iter()
        .enumerate()
        .map(|(i, loc)| {
            let region: Vec<&str> = [loc.admin1.as_str(), loc.country.as_str()]
                .into_iter()
                .filter(|s| !s.is_empty())
                .collect();
            format!(
                "{}. {} ({}) lat {:.4}, lon {:.4}, {}",
                i + 1,
                loc.name,
                region.join(", "),
                loc.latitude,
                loc.longitude,
                display_timezone(&loc.timezone)
            )
        })
        .collect();
    finish(lines)
}

pub fn render_air_quality(air: &AirQuality) -> String {
    let mut lines = vec![format!(
        "Air quality for {:.4}, {:.4} ({})",
        air.latitude,
        air.longitude,
        display_timezone(&air.timezone)
    )];
    render_series(&mut lines, "Hourly", air.hourly.as_ref(), &air.hourly_units);
    finish(lines)
}

fn render_series(
    lines: &mut Vec<String>,
    title: &str,
    series: Option<&TimeSeries>,
    units: &Units,
) {
    let Some(series) = series else { return };
    if series.is_empty() {
        return;
    }

    lines.push(String::new());
    lines.push(format!("{title}:"));
    for (row, time) in series.time.iter().enumerate() {
        let cells: Vec<String> = series
            .columns
            .iter()
            .map(|(name, column)| {
                let value = column.get(row).unwrap_or(&Value::Null);
                format!("{name}={}", format_value(name, value, units))
            })
            .collect();
        lines.push(format!("  {time}  {}", cells.join("  ")));
    }
}

/// One line per entry, each newline-terminated.
fn finish(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn format_value(name: &str, value: &Value, units: &Units) -> String {
    let unit = units
        .as_ref()
        .and_then(|u| u.get(name))
        .filter(|u| !u.is_empty() && u.as_str() != "wmo code");

    let text = match value {
        Value::Null => return "-".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };

    let code = value.as_i64().and_then(|c| i32::try_from(c).ok());
    if let Some(code) = code.filter(|_| WEATHERCODE_COLUMNS.contains(&name)) {
        return format!("{text} ({})", weathercode_to_string(code));
    }

    match unit {
        Some(unit) => format!("{text} {unit}"),
        None => text,
    }
}

fn display_timezone(timezone: &str) -> &str {
    if timezone.is_empty() { "GMT" } else { timezone }
}
