//! Table-driven classification of WMO weather codes.
//!
//! The classifier is a pure, total function: every integer code maps to
//! a result, with unmapped codes treated as clear sky.

/// Display category for a classified weather code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionCategory {
    Clear,
    Cloudy,
    Fog,
    Drizzle,
    Rain,
    FreezingRain,
    Snow,
    SnowGrains,
    RainShowers,
    SnowShowers,
    Thunderstorm,
    ThunderstormHail,
}

/// Icon hint for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherIcon {
    Sun,
    Moon,
    Cloud,
    CloudFog,
    CloudRain,
    CloudSnow,
    Snowflake,
    Zap,
}

/// Animation hint for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconAnimation {
    None,
    SpinSlow,
    Float,
    Pulse,
}

/// Classified weather condition with display hints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeatherClassification {
    pub description: &'static str,
    pub category: ConditionCategory,
    pub icon: WeatherIcon,
    pub animation: IconAnimation,
    pub is_daytime: bool,
}

/// Classify a WMO weather code into a description and display hints.
///
/// `is_day` only changes the clear-sky cases: sun vs moon icon, with
/// the slow spin running in daylight only. Codes outside the table
/// classify exactly like code 0.
#[must_use]
pub fn classify(code: i32, is_day: bool) -> WeatherClassification {
    let clear = |description: &'static str| WeatherClassification {
        description,
        category: ConditionCategory::Clear,
        icon: if is_day {
            WeatherIcon::Sun
        } else {
            WeatherIcon::Moon
        },
        animation: if is_day {
            IconAnimation::SpinSlow
        } else {
            IconAnimation::None
        },
        is_daytime: is_day,
    };

    let condition = |description: &'static str,
                     category: ConditionCategory,
                     icon: WeatherIcon,
                     animation: IconAnimation| WeatherClassification {
        description,
        category,
        icon,
        animation,
        is_daytime: is_day,
    };

    match code {
        0 => clear("Clear sky"),
        1 => clear("Mainly clear"),
        2 => condition(
            "Partly cloudy",
            ConditionCategory::Cloudy,
            WeatherIcon::Cloud,
            IconAnimation::Float,
        ),
        3 => condition(
            "Overcast",
            ConditionCategory::Cloudy,
            WeatherIcon::Cloud,
            IconAnimation::Float,
        ),
        45 | 48 => condition(
            "Fog",
            ConditionCategory::Fog,
            WeatherIcon::CloudFog,
            IconAnimation::Float,
        ),
        51 | 53 | 55 => condition(
            "Drizzle",
            ConditionCategory::Drizzle,
            WeatherIcon::CloudRain,
            IconAnimation::Float,
        ),
        61 | 63 | 65 => condition(
            "Rain",
            ConditionCategory::Rain,
            WeatherIcon::CloudRain,
            IconAnimation::Float,
        ),
        66 | 67 => condition(
            "Freezing Rain",
            ConditionCategory::FreezingRain,
            WeatherIcon::CloudSnow,
            IconAnimation::Float,
        ),
        71 | 73 | 75 => condition(
            "Snow fall",
            ConditionCategory::Snow,
            WeatherIcon::Snowflake,
            IconAnimation::Pulse,
        ),
        77 => condition(
            "Snow grains",
            ConditionCategory::SnowGrains,
            WeatherIcon::Snowflake,
            IconAnimation::Pulse,
        ),
        80 | 81 | 82 => condition(
            "Rain showers",
            ConditionCategory::RainShowers,
            WeatherIcon::CloudRain,
            IconAnimation::Float,
        ),
        85 | 86 => condition(
            "Snow showers",
            ConditionCategory::SnowShowers,
            WeatherIcon::CloudSnow,
            IconAnimation::Float,
        ),
        95 => condition(
            "Thunderstorm",
            ConditionCategory::Thunderstorm,
            WeatherIcon::Zap,
            IconAnimation::Pulse,
        ),
        96 | 99 => condition(
            "Thunderstorm with hail",
            ConditionCategory::ThunderstormHail,
            WeatherIcon::Zap,
            IconAnimation::Pulse,
        ),
        _ => clear("Clear sky"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_clear_sky_day() {
        let classification = classify(0, true);
        assert_eq!(classification.description, "Clear sky");
        assert_eq!(classification.category, ConditionCategory::Clear);
        assert_eq!(classification.icon, WeatherIcon::Sun);
        assert_eq!(classification.animation, IconAnimation::SpinSlow);
        assert!(classification.is_daytime);
    }

    #[test]
    fn test_clear_sky_night() {
        let classification = classify(0, false);
        assert_eq!(classification.description, "Clear sky");
        assert_eq!(classification.icon, WeatherIcon::Moon);
        assert_eq!(classification.animation, IconAnimation::None);
        assert!(!classification.is_daytime);
    }

    #[rstest]
    #[case(61)]
    #[case(63)]
    #[case(65)]
    fn test_rain_codes_classify_alike(#[case] code: i32) {
        let classification = classify(code, true);
        assert_eq!(classification.category, ConditionCategory::Rain);
        assert_eq!(classification.description, "Rain");
        assert_eq!(classify(code, false), classify(code, true).with_night());
    }

    #[rstest]
    #[case(-1)]
    #[case(4)]
    #[case(37)]
    #[case(60)]
    #[case(100)]
    #[case(i32::MAX)]
    #[case(i32::MIN)]
    fn test_unmapped_codes_fall_back_to_clear(#[case] code: i32) {
        assert_eq!(classify(code, true), classify(0, true));
        assert_eq!(classify(code, false), classify(0, false));
    }

    #[rstest]
    #[case(1, "Mainly clear", ConditionCategory::Clear)]
    #[case(2, "Partly cloudy", ConditionCategory::Cloudy)]
    #[case(3, "Overcast", ConditionCategory::Cloudy)]
    #[case(45, "Fog", ConditionCategory::Fog)]
    #[case(48, "Fog", ConditionCategory::Fog)]
    #[case(51, "Drizzle", ConditionCategory::Drizzle)]
    #[case(55, "Drizzle", ConditionCategory::Drizzle)]
    #[case(66, "Freezing Rain", ConditionCategory::FreezingRain)]
    #[case(67, "Freezing Rain", ConditionCategory::FreezingRain)]
    #[case(71, "Snow fall", ConditionCategory::Snow)]
    #[case(75, "Snow fall", ConditionCategory::Snow)]
    #[case(77, "Snow grains", ConditionCategory::SnowGrains)]
    #[case(80, "Rain showers", ConditionCategory::RainShowers)]
    #[case(82, "Rain showers", ConditionCategory::RainShowers)]
    #[case(85, "Snow showers", ConditionCategory::SnowShowers)]
    #[case(86, "Snow showers", ConditionCategory::SnowShowers)]
    #[case(95, "Thunderstorm", ConditionCategory::Thunderstorm)]
    #[case(96, "Thunderstorm with hail", ConditionCategory::ThunderstormHail)]
    #[case(99, "Thunderstorm with hail", ConditionCategory::ThunderstormHail)]
    fn test_code_table(
        #[case] code: i32,
        #[case] description: &str,
        #[case] category: ConditionCategory,
    ) {
        let classification = classify(code, true);
        assert_eq!(classification.description, description);
        assert_eq!(classification.category, category);
    }

    #[rstest]
    #[case(2)]
    #[case(45)]
    #[case(61)]
    #[case(95)]
    fn test_day_flag_only_changes_clear_cases(#[case] code: i32) {
        let day = classify(code, true);
        let night = classify(code, false);
        assert_eq!(day.icon, night.icon);
        assert_eq!(day.animation, night.animation);
        assert_eq!(day.description, night.description);
        assert!(day.is_daytime);
        assert!(!night.is_daytime);
    }

    impl WeatherClassification {
        fn with_night(mut self) -> Self {
            self.is_daytime = false;
            self
        }
    }
}
