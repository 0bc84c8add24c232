use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::weather::WindLevel;

/// Weather condition that selects which effect set is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    #[default]
    None,
    Clear,
    Rain,
    Drizzle,
    Thunder,
    Snow,
    Clouds,
    Fog,
    Wind,
}

impl Condition {
    /// Every recognised condition, in declaration order
    pub const ALL: [Condition; 9] = [
        Condition::None,
        Condition::Clear,
        Condition::Rain,
        Condition::Drizzle,
        Condition::Thunder,
        Condition::Snow,
        Condition::Clouds,
        Condition::Fog,
        Condition::Wind,
    ];

    /// Parse a condition name. Anything unrecognised (including an empty
    /// string) falls back to `Condition::None`.
    pub fn parse_lenient(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }

    /// Parse an optional condition name; an absent value means `None`.
    pub fn from_optional(name: Option<&str>) -> Self {
        name.map(Self::parse_lenient).unwrap_or_default()
    }

    /// Lowercase name used in config files and the browser API
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::None => "none",
            Condition::Clear => "clear",
            Condition::Rain => "rain",
            Condition::Drizzle => "drizzle",
            Condition::Thunder => "thunder",
            Condition::Snow => "snow",
            Condition::Clouds => "clouds",
            Condition::Fog => "fog",
            Condition::Wind => "wind",
        }
    }

    /// Fixed wind bias for this condition
    pub fn wind(&self) -> WindLevel {
        let level = match self {
            Condition::Thunder => 0.25,
            Condition::Rain | Condition::Drizzle => 0.2,
            Condition::Snow => 0.1,
            Condition::Clouds => 0.08,
            Condition::Fog => 0.05,
            Condition::Clear | Condition::None | Condition::Wind => 0.0,
        };
        WindLevel::new(level)
    }

    /// Rain, drizzle and thunder all share the streaking rain pool
    pub fn is_rain_family(&self) -> bool {
        matches!(self, Condition::Rain | Condition::Drizzle | Condition::Thunder)
    }

    /// Whether lightning flashes are rolled each frame
    pub fn has_flashes(&self) -> bool {
        *self == Condition::Thunder
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned by the strict `FromStr` impl; callers that want the
/// degrade-to-none behaviour use `Condition::parse_lenient`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown weather condition: {0:?}")]
pub struct UnknownCondition(pub String);

impl FromStr for Condition {
    type Err = UnknownCondition;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Condition::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == name)
            .ok_or(UnknownCondition(s.to_string()))
    }
}
