//! Severe-condition evaluation
//!
//! Turns a weather snapshot into the advisory conditions shown in the alerts
//! panel. Each rule is an independent range check, so one snapshot can raise
//! anywhere from zero to four conditions.

use serde::{Deserialize, Serialize};

use crate::models::{WeatherSnapshot, round_half_up};

/// Temperature (°F) at or above which extreme heat is reported
pub const EXTREME_HEAT_F: f64 = 95.0;
/// Temperature (°F) at or below which freezing is reported
pub const FREEZING_F: f64 = 32.0;
/// Wind speed (mph) at or above which a wind advisory is reported
pub const HIGH_WIND_MPH: f64 = 20.0;
/// Condition labels that raise a severe weather alert
pub const SEVERE_LABELS: [&str; 4] = ["Thunderstorm", "Tornado", "Hurricane", "Snow"];

/// Kind of advisory condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConditionKind {
    ExtremeHeat,
    Freezing,
    HighWind,
    SevereWeather,
}

impl ConditionKind {
    /// Tag used by the presentation layer
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ExtremeHeat => "extreme-heat",
            Self::Freezing => "freezing",
            Self::HighWind => "high-wind",
            Self::SevereWeather => "severe-weather",
        }
    }
}

/// An advisory raised for a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(rename = "type")]
    pub kind: ConditionKind,
    pub title: String,
    pub message: String,
}

impl Condition {
    fn new(kind: ConditionKind, title: &str, message: String) -> Self {
        Self {
            kind,
            title: title.to_string(),
            message,
        }
    }
}

/// Round for display, halves toward positive infinity; `+ 0.0` turns a
/// rounded `-0` into `0`.
fn whole(value: f64) -> f64 {
    round_half_up(value) + 0.0
}

/// Evaluate all condition rules against `snapshot`.
///
/// Conditions are returned in display order: heat, freezing, wind, severe weather.
#[must_use]
pub fn evaluate(snapshot: &WeatherSnapshot) -> Vec<Condition> {
    let mut conditions = Vec::new();
    let temperature = snapshot.temperature;

    if temperature >= EXTREME_HEAT_F {
        conditions.push(Condition::new(
            ConditionKind::ExtremeHeat,
            "Extreme Heat Warning",
            format!(
                "Current temperature is {}°F. Stay hydrated and avoid prolonged sun exposure.",
                whole(temperature)
            ),
        ));
    }

    if temperature <= FREEZING_F {
        conditions.push(Condition::new(
            ConditionKind::Freezing,
            "Freezing Conditions Alert",
            format!(
                "Current temperature is {}°F. Watch for ice and dress warmly.",
                whole(temperature)
            ),
        ));
    }

    if snapshot.wind_speed >= HIGH_WIND_MPH {
        conditions.push(Condition::new(
            ConditionKind::HighWind,
            "High Wind Advisory",
            format!(
                "Strong winds at {} mph. Secure loose objects outdoors.",
                whole(snapshot.wind_speed)
            ),
        ));
    }

    if SEVERE_LABELS.contains(&snapshot.condition.as_str()) {
        conditions.push(Condition::new(
            ConditionKind::SevereWeather,
            "Severe Weather Alert",
            format!(
                "{} conditions reported. Take necessary precautions.",
                snapshot.condition
            ),
        ));
    }

    tracing::debug!(
        count = conditions.len(),
        location = %snapshot.name,
        "Evaluated weather conditions"
    );

    conditions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sample_snapshot;
    use rstest::rstest;

    fn kinds(conditions: &[Condition]) -> Vec<ConditionKind> {
        conditions.iter().map(|c| c.kind).collect()
    }

    #[test]
    fn test_mild_weather_raises_nothing() {
        assert!(evaluate(&sample_snapshot()).is_empty());
    }

    #[test]
    fn test_hot_windy_thunderstorm() {
        let mut snapshot = sample_snapshot();
        snapshot.temperature = 96.0;
        snapshot.wind_speed = 25.0;
        snapshot.condition = "Thunderstorm".to_string();

        let conditions = evaluate(&snapshot);
        assert_eq!(
            kinds(&conditions),
            vec![
                ConditionKind::ExtremeHeat,
                ConditionKind::HighWind,
                ConditionKind::SevereWeather
            ]
        );
        assert_eq!(
            conditions[0].message,
            "Current temperature is 96°F. Stay hydrated and avoid prolonged sun exposure."
        );
        assert_eq!(
            conditions[1].message,
            "Strong winds at 25 mph. Secure loose objects outdoors."
        );
        assert_eq!(
            conditions[2].message,
            "Thunderstorm conditions reported. Take necessary precautions."
        );
    }

    #[rstest]
    #[case(95.0, Some(ConditionKind::ExtremeHeat))]
    #[case(94.9, None)]
    #[case(32.0, Some(ConditionKind::Freezing))]
    #[case(32.1, None)]
    #[case(-12.0, Some(ConditionKind::Freezing))]
    fn test_temperature_thresholds_are_inclusive(
        #[case] temperature: f64,
        #[case] expected: Option<ConditionKind>,
    ) {
        let mut snapshot = sample_snapshot();
        snapshot.temperature = temperature;
        assert_eq!(kinds(&evaluate(&snapshot)), expected.into_iter().collect::<Vec<_>>());
    }

    #[rstest]
    #[case(20.0, true)]
    #[case(19.99, false)]
    fn test_wind_threshold(#[case] wind_speed: f64, #[case] fires: bool) {
        let mut snapshot = sample_snapshot();
        snapshot.wind_speed = wind_speed;
        let conditions = evaluate(&snapshot);
        assert_eq!(conditions.iter().any(|c| c.kind == ConditionKind::HighWind), fires);
    }

    #[rstest]
    #[case("Thunderstorm", true)]
    #[case("Tornado", true)]
    #[case("Hurricane", true)]
    #[case("Snow", true)]
    #[case("Rain", false)]
    #[case("snow", false)]
    fn test_severe_labels(#[case] label: &str, #[case] fires: bool) {
        let mut snapshot = sample_snapshot();
        snapshot.condition = label.to_string();
        let conditions = evaluate(&snapshot);
        assert_eq!(conditions.len(), usize::from(fires));
        if fires {
            assert!(conditions[0].message.starts_with(label));
        }
    }

    #[test]
    fn test_freezing_message_rounds_temperature() {
        let mut snapshot = sample_snapshot();
        snapshot.temperature = 28.6;
        let conditions = evaluate(&snapshot);
        assert_eq!(conditions[0].title, "Freezing Conditions Alert");
        assert_eq!(
            conditions[0].message,
            "Current temperature is 29°F. Watch for ice and dress warmly."
        );
    }

    #[test]
    fn test_negative_zero_is_printed_as_zero() {
        let mut snapshot = sample_snapshot();
        snapshot.temperature = -0.4;
        assert_eq!(
            evaluate(&snapshot)[0].message,
            "Current temperature is 0°F. Watch for ice and dress warmly."
        );
    }

    #[rstest]
    #[case(-2.5, "-2")]
    #[case(-0.5, "0")]
    #[case(-3.5, "-3")]
    #[case(2.5, "3")]
    fn test_half_degrees_round_up(#[case] temperature: f64, #[case] shown: &str) {
        let mut snapshot = sample_snapshot();
        snapshot.temperature = temperature;
        assert_eq!(
            evaluate(&snapshot)[0].message,
            format!("Current temperature is {shown}°F. Watch for ice and dress warmly.")
        );
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let mut snapshot = sample_snapshot();
        snapshot.temperature = 20.0;
        snapshot.condition = "Snow".to_string();
        assert_eq!(evaluate(&snapshot), evaluate(&snapshot));
    }

    #[test]
    fn test_kind_serializes_as_kebab_case() {
        let json = serde_json::to_value(ConditionKind::SevereWeather).unwrap();
        assert_eq!(json, "severe-weather");
        assert_eq!(ConditionKind::HighWind.as_str(), "high-wind");
    }
}
