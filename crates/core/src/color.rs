//! Enumerations shared by the light model and its transports.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A lamp color of a standard three-phase light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Color {
    Green,
    Yellow,
    Red,
}

impl Color {
    /// Phase order within one cycle.
    pub const ALL: [Color; 3] = [Color::Green, Color::Yellow, Color::Red];

    pub fn as_str(self) -> &'static str {
        match self {
            Color::Green => "GREEN",
            Color::Yellow => "YELLOW",
            Color::Red => "RED",
        }
    }

    /// Position of the lamp in a vertical housing, counted from the top.
    pub fn slot(self) -> usize {
        match self {
            Color::Green => 0,
            Color::Yellow => 1,
            Color::Red => 2,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of light hardware being simulated.
///
/// Only [`LightVariant::Standard`] has a defined display. The flashing and
/// stop-sign variants are carried as data so stored lights keep their type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LightVariant {
    #[default]
    Standard,
    Flashing,
    StopSign,
}

impl LightVariant {
    pub fn as_str(self) -> &'static str {
        match self {
            LightVariant::Standard => "STANDARD",
            LightVariant::Flashing => "FLASHING",
            LightVariant::StopSign => "STOP_SIGN",
        }
    }

    /// Parse the wire name (`STANDARD`, `FLASHING`, `STOP_SIGN`), ignoring case.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_uppercase().as_str() {
            "STANDARD" => Some(LightVariant::Standard),
            "FLASHING" => Some(LightVariant::Flashing),
            "STOP_SIGN" => Some(LightVariant::StopSign),
            _ => None,
        }
    }
}

impl fmt::Display for LightVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Systems a light can be attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SupportedSystem {
    #[default]
    #[serde(rename = "TRAFFIC LIGHT")]
    TrafficLight,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Color::Yellow).unwrap(), "\"YELLOW\"");
        let c: Color = serde_json::from_str("\"RED\"").unwrap();
        assert_eq!(c, Color::Red);
    }

    #[test]
    fn variant_wire_names() {
        assert_eq!(
            serde_json::to_string(&LightVariant::StopSign).unwrap(),
            "\"STOP_SIGN\""
        );
        assert_eq!(LightVariant::parse("flashing"), Some(LightVariant::Flashing));
        assert_eq!(LightVariant::parse("blinking"), None);
    }

    #[test]
    fn supported_system_wire_name_has_space() {
        assert_eq!(
            serde_json::to_string(&SupportedSystem::TrafficLight).unwrap(),
            "\"TRAFFIC LIGHT\""
        );
    }

    #[test]
    fn slots_follow_phase_order() {
        let slots: Vec<usize> = Color::ALL.iter().map(|c| c.slot()).collect();
        assert_eq!(slots, vec![0, 1, 2]);
    }
}
