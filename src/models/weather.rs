//! Weather models: raw current conditions and the rounded snapshot

use serde::{Deserialize, Serialize};

/// Current conditions as reported by the forecast service, unrounded
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CurrentConditions {
    /// Temperature in Celsius
    pub temperature_c: f64,
    /// Relative humidity percentage (0-100)
    pub relative_humidity_pct: i32,
    /// Wind speed in km/h
    pub wind_speed_kmh: f64,
    /// WMO weather code
    pub weather_code: i32,
    /// Whether the sun is currently up at the location
    pub is_day: bool,
}

/// Display-ready current weather. Immutable once built.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct WeatherSnapshot {
    /// Temperature in Celsius, rounded to the nearest degree
    pub temperature_c: i32,
    /// WMO weather code, verbatim from the forecast service
    pub weather_code: i32,
    /// Wind speed in km/h, rounded to the nearest unit
    pub wind_speed_kmh: i32,
    /// Relative humidity percentage, verbatim
    pub humidity_pct: i32,
    pub is_day: bool,
}

impl WeatherSnapshot {
    /// Round raw conditions to whole display units.
    ///
    /// Humidity and the weather code pass through verbatim.
    #[must_use]
    pub fn from_conditions(current: &CurrentConditions) -> Self {
        Self {
            temperature_c: current.temperature_c.round() as i32,
            weather_code: current.weather_code,
            wind_speed_kmh: current.wind_speed_kmh.round() as i32,
            humidity_pct: current.relative_humidity_pct,
            is_day: current.is_day,
        }
    }

    /// Format temperature with unit
    #[must_use]
    pub fn format_temperature(&self) -> String {
        format!("{}°C", self.temperature_c)
    }

    /// Format wind speed with unit
    #[must_use]
    pub fn format_wind(&self) -> String {
        format!("{} km/h", self.wind_speed_kmh)
    }

    /// Format relative humidity
    #[must_use]
    pub fn format_humidity(&self) -> String {
        format!("{}%", self.humidity_pct)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounding_from_conditions() {
        let current = CurrentConditions {
            temperature_c: 18.4,
            relative_humidity_pct: 60,
            wind_speed_kmh: 11.7,
            weather_code: 2,
            is_day: true,
        };

        let snapshot = WeatherSnapshot::from_conditions(&current);
        assert_eq!(snapshot.temperature_c, 18);
        assert_eq!(snapshot.wind_speed_kmh, 12);
        assert_eq!(snapshot.humidity_pct, 60);
        assert_eq!(snapshot.weather_code, 2);
        assert!(snapshot.is_day);
    }

    #[test]
    fn test_rounding_goes_up_from_half() {
        let current = CurrentConditions {
            temperature_c: 20.5,
            relative_humidity_pct: 45,
            wind_speed_kmh: 7.5,
            weather_code: 0,
            is_day: false,
        };

        let snapshot = WeatherSnapshot::from_conditions(&current);
        assert_eq!(snapshot.temperature_c, 21);
        assert_eq!(snapshot.wind_speed_kmh, 8);
    }

    #[test]
    fn test_formatting() {
        let snapshot = WeatherSnapshot {
            temperature_c: 18,
            weather_code: 2,
            wind_speed_kmh: 12,
            humidity_pct: 60,
            is_day: true,
        };
        assert_eq!(snapshot.format_temperature(), "18°C");
        assert_eq!(snapshot.format_wind(), "12 km/h");
        assert_eq!(snapshot.format_humidity(), "60%");
    }
}
