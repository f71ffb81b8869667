//! Closed vocabularies of the parameter names the Open-Meteo APIs accept.
//!
//! Every vocabulary is declared once through `vocabulary!`, which pairs a
//! variant with its wire name and derives the lookup tables from that single
//! list. Declaration order is the order [`Parameter::all`] reports.

use std::{fmt, str::FromStr};

use crate::error::ParameterError;

/// A member of one of the fixed parameter vocabularies.
pub trait Parameter:
    Copy + Eq + fmt::Debug + fmt::Display + FromStr<Err = ParameterError> + 'static
{
    /// Human-readable vocabulary name, used in error messages.
    const VOCABULARY: &'static str;

    /// Every member, in declaration order.
    fn all() -> &'static [Self];

    /// Wire name sent in the query string.
    fn as_str(&self) -> &'static str;
}

macro_rules! vocabulary {
    (
        $(#[$meta:meta])*
        pub enum $name:ident ($vocabulary:literal) {
            $( $variant:ident => $wire:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $( $variant, )+
        }

        impl $name {
            const ALL: &'static [$name] = &[$( $name::$variant, )+];
        }

        impl Parameter for $name {
            const VOCABULARY: &'static str = $vocabulary;

            fn all() -> &'static [Self] {
                Self::ALL
            }

            fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $wire, )+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParameterError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $( $wire => Ok($name::$variant), )+
                    _ => Err(ParameterError::Unknown {
                        vocabulary: $vocabulary,
                        name: value.to_string(),
                    }),
                }
            }
        }
    };
}

vocabulary! {
    /// Variables for the `current` block of a forecast request.
    pub enum CurrentParameter ("current") {
        Temperature2m => "temperature_2m",
        RelativeHumidity2m => "relativehumidity_2m",
        ApparentTemperature => "apparent_temperature",
        IsDay => "is_day",
        Precipitation => "precipitation",
        Rain => "rain",
        Showers => "showers",
        Snowfall => "snowfall",
        WeatherCode => "weathercode",
        CloudCover => "cloudcover",
        PressureMsl => "pressure_msl",
        SurfacePressure => "surface_pressure",
        WindSpeed10m => "windspeed_10m",
        WindDirection10m => "winddirection_10m",
        WindGusts10m => "windgusts_10m",
    }
}

vocabulary! {
    /// Hourly forecast variables.
    pub enum HourlyParameter ("hourly") {
        Temperature2m => "temperature_2m",
        RelativeHumidity2m => "relativehumidity_2m",
        Dewpoint2m => "dewpoint_2m",
        ApparentTemperature => "apparent_temperature",
        PrecipitationProbability => "precipitation_probability",
        Precipitation => "precipitation",
        Rain => "rain",
        Showers => "showers",
        Snowfall => "snowfall",
        SnowDepth => "snow_depth",
        FreezingLevelHeight => "freezinglevel_height",
        WeatherCode => "weathercode",
        PressureMsl => "pressure_msl",
        SurfacePressure => "surface_pressure",
        CloudCover => "cloudcover",
        CloudCoverLow => "cloudcover_low",
        CloudCoverMid => "cloudcover_mid",
        CloudCoverHigh => "cloudcover_high",
        Visibility => "visibility",
        Evapotranspiration => "evapotranspiration",
        Et0FaoEvapotranspiration => "et0_fao_evapotranspiration",
        VaporPressureDeficit => "vapor_pressure_deficit",
        Cape => "cape",
        WindSpeed10m => "windspeed_10m",
        WindSpeed80m => "windspeed_80m",
        WindSpeed120m => "windspeed_120m",
        WindSpeed180m => "windspeed_180m",
        WindDirection10m => "winddirection_10m",
        WindDirection80m => "winddirection_80m",
        WindDirection120m => "winddirection_120m",
        WindDirection180m => "winddirection_180m",
        WindGusts10m => "windgusts_10m",
        Temperature80m => "temperature_80m",
        Temperature120m => "temperature_120m",
        Temperature180m => "temperature_180m",
        SoilTemperature0cm => "soil_temperature_0cm",
        SoilTemperature6cm => "soil_temperature_6cm",
        SoilTemperature18cm => "soil_temperature_18cm",
        SoilTemperature54cm => "soil_temperature_54cm",
        SoilMoisture0To1cm => "soil_moisture_0_1cm",
        SoilMoisture1To3cm => "soil_moisture_1_3cm",
        SoilMoisture3To9cm => "soil_moisture_3_9cm",
        SoilMoisture9To27cm => "soil_moisture_9_27cm",
        SoilMoisture27To81cm => "soil_moisture_27_81cm",
        ShortwaveRadiation => "shortwave_radiation",
        DirectRadiation => "direct_radiation",
        DiffuseRadiation => "diffuse_radiation",
        DirectNormalIrradiance => "direct_normal_irradiance",
        TerrestrialRadiation => "terrestrial_radiation",
        ShortwaveRadiationInstant => "shortwave_radiation_instant",
        DirectRadiationInstant => "direct_radiation_instant",
        DiffuseRadiationInstant => "diffuse_radiation_instant",
        DirectNormalIrradianceInstant => "direct_normal_irradiance_instant",
        TerrestrialRadiationInstant => "terrestrial_radiation_instant",
        UvIndex => "uv_index",
        UvIndexClearSky => "uv_index_clear_sky",
        IsDay => "is_day",
        LiftedIndex => "lifted_index",
        ConvectiveInhibition => "convective_inhibition",
    }
}

vocabulary! {
    /// Daily aggregate forecast variables.
    pub enum DailyParameter ("daily") {
        WeatherCode => "weathercode",
        Temperature2mMax => "temperature_2m_max",
        Temperature2mMin => "temperature_2m_min",
        ApparentTemperatureMax => "apparent_temperature_max",
        ApparentTemperatureMin => "apparent_temperature_min",
        Sunrise => "sunrise",
        Sunset => "sunset",
        PrecipitationSum => "precipitation_sum",
        RainSum => "rain_sum",
        ShowersSum => "showers_sum",
        SnowfallSum => "snowfall_sum",
        PrecipitationHours => "precipitation_hours",
        WindSpeed10mMax => "windspeed_10m_max",
        WindGusts10mMax => "windgusts_10m_max",
        WindDirection10mDominant => "winddirection_10m_dominant",
        ShortwaveRadiationSum => "shortwave_radiation_sum",
        Et0FaoEvapotranspiration => "et0_fao_evapotranspiration",
    }
}

vocabulary! {
    /// Variables available at 15-minute resolution.
    pub enum Minutely15Parameter ("minutely_15") {
        Temperature2m => "temperature_2m",
        RelativeHumidity2m => "relative_humidity_2m",
        DewPoint2m => "dew_point_2m",
        ApparentTemperature => "apparent_temperature",
        ShortwaveRadiation => "shortwave_radiation",
        DirectRadiation => "direct_radiation",
        DirectNormalIrradiance => "direct_normal_irradiance",
        GlobalTiltedIrradiance => "global_tilted_irradiance",
        TerrestrialRadiation => "terrestrial_radiation",
        DiffuseRadiation => "diffuse_radiation",
        SunshineDuration => "sunshine_duration",
        LightningPotential => "lightning_potential",
        Precipitation => "precipitation",
        Snowfall => "snowfall",
        Rain => "rain",
        Showers => "showers",
        SnowfallHeight => "snowfall_height",
        FreezingLevelHeight => "freezing_level_height",
        Cape => "cape",
        WindSpeed10m => "wind_speed_10m",
        WindSpeed80m => "wind_speed_80m",
        WindDirection10m => "wind_direction_10m",
        WindDirection80m => "wind_direction_80m",
        WindGusts10m => "wind_gusts_10m",
        Visibility => "visibility",
        WeatherCode => "weather_code",
    }
}

vocabulary! {
    /// Numerical weather models selectable through `models`.
    pub enum WeatherModel ("models") {
        BestMatch => "best_match",
        EcmwfIfs04 => "ecmwf_ifs04",
        MetnoNordic => "metno_nordic",
        GfsSeamless => "gfs_seamless",
        GfsGlobal => "gfs_global",
        GfsHrrr => "gfs_hrrr",
        JmaSeamless => "jma_seamless",
        JmaMsm => "jma_msm",
        JmaGsm => "jma_gsm",
        IconSeamless => "icon_seamless",
        IconGlobal => "icon_global",
        IconEu => "icon_eu",
        IconD2 => "icon_d2",
        GemSeamless => "gem_seamless",
        GemGlobal => "gem_global",
        GemRegional => "gem_regional",
        GemHrdpsContinental => "gem_hrdps_continental",
        MeteofranceSeamless => "meteofrance_seamless",
        MeteofranceArpegeWorld => "meteofrance_arpege_world",
        MeteofranceArpegeEurope => "meteofrance_arpege_europe",
        MeteofranceAromeFrance => "meteofrance_arome_france",
        MeteofranceAromeFranceHd => "meteofrance_arome_france_hd",
    }
}

vocabulary! {
    /// Hourly variables of the air-quality API.
    pub enum AirQualityHourlyParameter ("air quality hourly") {
        Pm10 => "pm10",
        Pm2_5 => "pm2_5",
        CarbonMonoxide => "carbon_monoxide",
        NitrogenDioxide => "nitrogen_dioxide",
        SulphurDioxide => "sulphur_dioxide",
        Ozone => "ozone",
        AerosolOpticalDepth => "aerosol_optical_depth",
        Dust => "dust",
        UvIndex => "uv_index",
        UvIndexClearSky => "uv_index_clear_sky",
        Ammonia => "ammonia",
        AlderPollen => "alder_pollen",
        BirchPollen => "birch_pollen",
        GrassPollen => "grass_pollen",
        MugwortPollen => "mugwort_pollen",
        OlivePollen => "olive_pollen",
        RagweedPollen => "ragweed_pollen",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn assert_vocabulary_roundtrips<P: Parameter + std::hash::Hash>() {
        let mut seen = HashSet::new();
        for param in P::all() {
            let parsed: P = param.as_str().parse().expect("wire name should parse");
            assert_eq!(*param, parsed);
            assert!(seen.insert(param.as_str()), "duplicate wire name {param}");
        }
    }

    #[test]
    fn every_vocabulary_roundtrips_through_its_wire_name() {
        assert_vocabulary_roundtrips::<CurrentParameter>();
        assert_vocabulary_roundtrips::<HourlyParameter>();
        assert_vocabulary_roundtrips::<DailyParameter>();
        assert_vocabulary_roundtrips::<Minutely15Parameter>();
        assert_vocabulary_roundtrips::<WeatherModel>();
        assert_vocabulary_roundtrips::<AirQualityHourlyParameter>();
    }

    #[test]
    fn all_follows_declaration_order() {
        let all = CurrentParameter::all();
        assert_eq!(all.len(), 15);
        assert_eq!(all[0], CurrentParameter::Temperature2m);
        assert_eq!(all[14], CurrentParameter::WindGusts10m);
        assert!(all.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = "sunshine".parse::<DailyParameter>().unwrap_err();
        assert_eq!(
            err,
            ParameterError::Unknown { vocabulary: "daily", name: "sunshine".to_string() }
        );
        assert!(err.to_string().contains("not a known daily parameter"));
    }

    #[test]
    fn parsing_is_case_sensitive() {
        assert!("Sunset".parse::<DailyParameter>().is_err());
        assert_eq!("sunset".parse::<DailyParameter>(), Ok(DailyParameter::Sunset));
    }

    #[test]
    fn display_uses_wire_name() {
        assert_eq!(HourlyParameter::SoilMoisture3To9cm.to_string(), "soil_moisture_3_9cm");
        assert_eq!(WeatherModel::IconD2.to_string(), "icon_d2");
    }
}
