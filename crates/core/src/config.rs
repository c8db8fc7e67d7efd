//! Transport-facing light input and its validation.

use uuid::Uuid;

use crate::color::LightVariant;
use crate::error::LightError;

pub const DEFAULT_GREEN_TIME: i64 = 60;
pub const DEFAULT_YELLOW_TIME: i64 = 6;
pub const DEFAULT_RED_TIME: i64 = 120;

/// Input for creating or replacing a light.
///
/// Durations are carried as signed integers exactly as received so that
/// negative values can be reported instead of silently rejected by the
/// type system. [`LightConfig::validate`] enforces the timing invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LightConfig {
    /// Id of an existing light to replace. `None` allocates a new id.
    pub id: Option<Uuid>,
    pub green_time: i64,
    pub yellow_time: i64,
    pub red_time: i64,
    pub cycle_repeat_amount: Option<i64>,
    pub signal_count: i64,
    pub supported_light_type: LightVariant,
}

impl Default for LightConfig {
    fn default() -> Self {
        LightConfig {
            id: None,
            green_time: DEFAULT_GREEN_TIME,
            yellow_time: DEFAULT_YELLOW_TIME,
            red_time: DEFAULT_RED_TIME,
            cycle_repeat_amount: None,
            signal_count: 0,
            supported_light_type: LightVariant::Standard,
        }
    }
}

/// Phase durations that passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Phases {
    pub green: u32,
    pub yellow: u32,
    pub red: u32,
}

impl Phases {
    pub fn total(&self) -> u64 {
        u64::from(self.green) + u64::from(self.yellow) + u64::from(self.red)
    }
}

impl LightConfig {
    /// A standard light with the given phase durations and no other options.
    pub fn new(green_time: i64, yellow_time: i64, red_time: i64) -> Self {
        LightConfig {
            green_time,
            yellow_time,
            red_time,
            ..LightConfig::default()
        }
    }

    pub fn with_cycle_repeat_amount(mut self, amount: i64) -> Self {
        self.cycle_repeat_amount = Some(amount);
        self
    }

    pub fn with_signal_count(mut self, signal_count: i64) -> Self {
        self.signal_count = signal_count;
        self
    }

    /// Build a config from an untyped JSON object.
    ///
    /// Every field is checked individually so that a wrongly typed value
    /// (a string where an integer belongs, a float, a bool) is reported
    /// against the field it arrived in. Omitted fields take their defaults.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, LightError> {
        let obj = value
            .as_object()
            .ok_or_else(|| LightError::validation("body", "expected a JSON object"))?;

        let mut config = LightConfig::default();

        if let Some(raw) = obj.get("id").filter(|v| !v.is_null()) {
            let text = raw
                .as_str()
                .ok_or_else(|| type_error("id", "a UUID string", raw))?;
            let id = Uuid::parse_str(text)
                .map_err(|e| LightError::validation("id", format!("not a valid UUID: {}", e)))?;
            config.id = Some(id);
        }
        if let Some(raw) = obj.get("green_time") {
            config.green_time = integer_field("green_time", raw)?;
        }
        if let Some(raw) = obj.get("yellow_time") {
            config.yellow_time = integer_field("yellow_time", raw)?;
        }
        if let Some(raw) = obj.get("red_time") {
            config.red_time = integer_field("red_time", raw)?;
        }
        if let Some(raw) = obj.get("cycle_repeat_amount").filter(|v| !v.is_null()) {
            config.cycle_repeat_amount = Some(integer_field("cycle_repeat_amount", raw)?);
        }
        if let Some(raw) = obj.get("signal_count") {
            config.signal_count = integer_field("signal_count", raw)?;
        }
        if let Some(raw) = obj.get("supported_light_type").filter(|v| !v.is_null()) {
            let text = raw
                .as_str()
                .ok_or_else(|| type_error("supported_light_type", "a string", raw))?;
            config.supported_light_type = LightVariant::parse(text).ok_or_else(|| {
                LightError::validation(
                    "supported_light_type",
                    format!("unknown light type '{}'", text),
                )
            })?;
        }

        Ok(config)
    }

    /// Check the timing invariants and return the normalized durations.
    pub fn validate(&self) -> Result<Phases, LightError> {
        let phases = Phases {
            green: duration("green_time", self.green_time)?,
            yellow: duration("yellow_time", self.yellow_time)?,
            red: duration("red_time", self.red_time)?,
        };
        if let Some(amount) = self.cycle_repeat_amount {
            duration("cycle_repeat_amount", amount)?;
        }
        if phases.total() == 0 {
            return Err(LightError::validation(
                "total_time",
                "total light color times must be greater than zero",
            ));
        }
        Ok(phases)
    }
}

/// Parse a duration typed by a person, e.g. at an interactive prompt.
pub fn parse_duration(field: &str, raw: &str) -> Result<u32, LightError> {
    let value: i64 = raw.trim().parse().map_err(|_| {
        LightError::validation(
            field,
            format!("must be a non-negative integer, but '{}' was passed", raw.trim()),
        )
    })?;
    duration(field, value)
}

pub(crate) fn duration(field: &str, value: i64) -> Result<u32, LightError> {
    if value < 0 {
        return Err(LightError::validation(
            field,
            format!("must be a non-negative integer, but {} was passed", value),
        ));
    }
    u32::try_from(value).map_err(|_| {
        LightError::validation(
            field,
            format!("must be at most {}, but {} was passed", u32::MAX, value),
        )
    })
}

fn integer_field(field: &str, value: &serde_json::Value) -> Result<i64, LightError> {
    value
        .as_i64()
        .ok_or_else(|| type_error(field, "an integer", value))
}

fn type_error(field: &str, expected: &str, got: &serde_json::Value) -> LightError {
    LightError::validation(
        field,
        format!("must be {}, but {} was passed", expected, json_type_name(got)),
    )
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(n) if n.is_f64() => "float",
        serde_json::Value::Number(_) => "out-of-range integer",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
