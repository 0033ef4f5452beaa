use serde::Serialize;

/// Normalized weather condition exposed to clients.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    Sunny,
    #[default]
    Cloudy,
    Rainy,
    Stormy,
    Snowy,
    Misty,
    Foggy,
}

impl Condition {
    /// Map an upstream weather category (`weather[0].main`) onto the fixed vocabulary.
    ///
    /// Matching is exact and case-sensitive. Unknown categories become `Cloudy`.
    pub fn from_upstream(main: &str) -> Self {
        match main {
            "Clear" => Condition::Sunny,
            "Clouds" => Condition::Cloudy,
            "Rain" | "Drizzle" => Condition::Rainy,
            "Thunderstorm" => Condition::Stormy,
            "Snow" => Condition::Snowy,
            "Mist" => Condition::Misty,
            "Fog" => Condition::Foggy,
            _ => Condition::Cloudy,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Sunny => "sunny",
            Condition::Cloudy => "cloudy",
            Condition::Rainy => "rainy",
            Condition::Stormy => "stormy",
            Condition::Snowy => "snowy",
            Condition::Misty => "misty",
            Condition::Foggy => "foggy",
        }
    }

    #[cfg(test)]
    pub(crate) const fn all() -> &'static [Condition] {
        &[
            Condition::Sunny,
            Condition::Cloudy,
            Condition::Rainy,
            Condition::Stormy,
            Condition::Snowy,
            Condition::Misty,
            Condition::Foggy,
        ]
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_categories_map_to_vocabulary() {
        let table = [
            ("Clear", Condition::Sunny),
            ("Clouds", Condition::Cloudy),
            ("Rain", Condition::Rainy),
            ("Drizzle", Condition::Rainy),
            ("Thunderstorm", Condition::Stormy),
            ("Snow", Condition::Snowy),
            ("Mist", Condition::Misty),
            ("Fog", Condition::Foggy),
        ];

        for (raw, expected) in table {
            assert_eq!(Condition::from_upstream(raw), expected, "category {raw}");
        }
    }

    #[test]
    fn unknown_categories_default_to_cloudy() {
        for raw in ["Haze", "Smoke", "Tornado", "", "rain", "CLEAR", " Clear"] {
            assert_eq!(Condition::from_upstream(raw), Condition::Cloudy, "category {raw:?}");
        }
    }

    #[test]
    fn serializes_lowercase() {
        for c in Condition::all() {
            let json = serde_json::to_string(c).unwrap();
            assert_eq!(json, format!("\"{}\"", c.as_str()));
        }
    }
}
