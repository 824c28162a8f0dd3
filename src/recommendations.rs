//! Clothing advice and activity suggestions derived from current conditions

use serde::Serialize;

use crate::models::WeatherSnapshot;

/// A named group of suggested activities
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityGroup {
    pub name: &'static str,
    pub suggestions: [&'static str; 4],
}

const HOT_WEATHER: ActivityGroup = ActivityGroup {
    name: "Hot Weather Activities",
    suggestions: ["Swimming", "Beach visit", "Water parks", "Ice cream break"],
};

const OUTDOOR: ActivityGroup = ActivityGroup {
    name: "Outdoor Activities",
    suggestions: ["Hiking", "Park visit", "Cycling", "Outdoor dining"],
};

const INDOOR: ActivityGroup = ActivityGroup {
    name: "Indoor Activities",
    suggestions: ["Museums", "Indoor sports", "Shopping", "Movie theater"],
};

const MILD_WEATHER: ActivityGroup = ActivityGroup {
    name: "Mild Weather Activities",
    suggestions: ["Photography", "City walks", "Sightseeing", "Café visits"],
};

const COLD_WEATHER: ActivityGroup = ActivityGroup {
    name: "Cold Weather Activities",
    suggestions: ["Indoor sports", "Hot chocolate", "Museums", "Movie marathon"],
};

const GENERAL: ActivityGroup = ActivityGroup {
    name: "General Activities",
    suggestions: ["Local exploration", "Restaurant visit", "Shopping", "Cultural sites"],
};

/// Practical advice for the current conditions. `hour` is the local hour
/// of day (0-23) and only affects the sunscreen hint.
#[must_use]
pub fn recommendations(snapshot: &WeatherSnapshot, hour: u32) -> Vec<&'static str> {
    let mut advice = Vec::new();
    let temperature = snapshot.temperature;
    let condition = snapshot.condition.as_str();

    if temperature < 32.0 {
        advice.push("Freezing conditions - wear warm layers");
    } else if temperature > 85.0 {
        advice.push("Hot conditions - stay hydrated");
    }

    match condition {
        "Rain" => advice.push("Bring an umbrella"),
        "Snow" => advice.push("Snow expected - dress warmly"),
        "Clear" => advice.push("Clear skies - great for outdoor activities"),
        "Thunderstorm" => advice.push("Thunderstorm warning - stay indoors"),
        _ => {}
    }

    if (10..=16).contains(&hour) && condition == "Clear" {
        advice.push("High UV levels - use sunscreen");
    }

    if snapshot.wind_speed > 20.0 {
        advice.push("Strong winds - be cautious outdoors");
    }

    if snapshot.humidity > 80 {
        advice.push("High humidity - stay hydrated");
    }

    advice
}

/// Activity groups that suit the current conditions; never empty
#[must_use]
pub fn activities(snapshot: &WeatherSnapshot) -> Vec<ActivityGroup> {
    let mut groups = Vec::new();
    let temperature = snapshot.temperature;

    match snapshot.condition.as_str() {
        "Clear" if temperature > 75.0 => groups.push(HOT_WEATHER),
        "Clear" if temperature > 60.0 => groups.push(OUTDOOR),
        "Rain" => groups.push(INDOOR),
        "Clouds" => groups.push(MILD_WEATHER),
        _ => {}
    }

    if temperature < 40.0 {
        groups.push(COLD_WEATHER);
    }

    if groups.is_empty() {
        groups.push(GENERAL);
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sample_snapshot;
    use rstest::rstest;

    fn snapshot(temperature: f64, condition: &str) -> WeatherSnapshot {
        let mut snapshot = sample_snapshot();
        snapshot.temperature = temperature;
        snapshot.condition = condition.to_string();
        snapshot
    }

    #[test]
    fn test_clear_midday() {
        let advice = recommendations(&snapshot(70.0, "Clear"), 12);
        assert_eq!(
            advice,
            vec![
                "Clear skies - great for outdoor activities",
                "High UV levels - use sunscreen"
            ]
        );
    }

    #[rstest]
    #[case(9, false)]
    #[case(10, true)]
    #[case(16, true)]
    #[case(17, false)]
    fn test_sunscreen_window(#[case] hour: u32, #[case] expected: bool) {
        let advice = recommendations(&snapshot(70.0, "Clear"), hour);
        assert_eq!(advice.contains(&"High UV levels - use sunscreen"), expected);
    }

    #[test]
    fn test_cold_wet_windy_humid() {
        let mut cold = snapshot(20.0, "Snow");
        cold.wind_speed = 21.0;
        cold.humidity = 85;
        assert_eq!(
            recommendations(&cold, 8),
            vec![
                "Freezing conditions - wear warm layers",
                "Snow expected - dress warmly",
                "Strong winds - be cautious outdoors",
                "High humidity - stay hydrated"
            ]
        );
    }

    #[test]
    fn test_thresholds_are_strict() {
        let mut edge = snapshot(32.0, "Mist");
        edge.wind_speed = 20.0;
        edge.humidity = 80;
        assert!(recommendations(&edge, 12).is_empty());
        assert!(recommendations(&snapshot(85.0, "Haze"), 12).is_empty());
        assert_eq!(
            recommendations(&snapshot(85.5, "Haze"), 12),
            vec!["Hot conditions - stay hydrated"]
        );
    }

    #[rstest]
    #[case(80.0, "Clear", vec!["Hot Weather Activities"])]
    #[case(65.0, "Clear", vec!["Outdoor Activities"])]
    #[case(55.0, "Clear", vec!["General Activities"])]
    #[case(55.0, "Rain", vec!["Indoor Activities"])]
    #[case(35.0, "Rain", vec!["Indoor Activities", "Cold Weather Activities"])]
    #[case(50.0, "Clouds", vec!["Mild Weather Activities"])]
    #[case(25.0, "Snow", vec!["Cold Weather Activities"])]
    #[case(50.0, "Drizzle", vec!["General Activities"])]
    fn test_activity_groups(
        #[case] temperature: f64,
        #[case] condition: &str,
        #[case] expected: Vec<&str>,
    ) {
        let names: Vec<_> = activities(&snapshot(temperature, condition))
            .iter()
            .map(|g| g.name)
            .collect();
        assert_eq!(names, expected);
    }
}
