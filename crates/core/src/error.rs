use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::LightVariant;

/// Errors raised by the traffic light model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LightError {
    /// Construction input is malformed or breaks a timing invariant.
    Validation { field: String, message: String },
    /// Rendering was requested for a light type with no display.
    UnsupportedLightType { light_type: LightVariant },
    /// Color resolution landed outside every phase. Indicates a corrupted
    /// entity and is not recoverable.
    InvariantViolation { message: String },
}

impl LightError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        LightError::Validation {
            field: field.to_owned(),
            message: message.into(),
        }
    }

    /// Whether this error came from input validation (as opposed to a
    /// model-level failure).
    pub fn is_validation(&self) -> bool {
        matches!(self, LightError::Validation { .. })
    }

    /// Serialize to a flat JSON object for transports.
    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "error": self.to_string(),
            "detail": self,
        })
    }
}

impl fmt::Display for LightError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LightError::Validation { field, message } => {
                write!(f, "invalid {}: {}", field, message)
            }
            LightError::UnsupportedLightType { light_type } => {
                write!(
                    f,
                    "light type {} for traffic light not supported",
                    light_type
                )
            }
            LightError::InvariantViolation { message } => {
                write!(f, "traffic light invariant violated: {}", message)
            }
        }
    }
}

impl std::error::Error for LightError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_value_nests_tagged_detail() {
        let err = LightError::validation("red_time", "must be a non-negative integer");
        let json = err.to_json_value();
        assert_eq!(json["error"], "invalid red_time: must be a non-negative integer");
        assert_eq!(json["detail"]["kind"], "validation");
        assert_eq!(json["detail"]["field"], "red_time");

        let err = LightError::InvariantViolation {
            message: "count out of range".into(),
        };
        assert_eq!(err.to_json_value()["detail"]["kind"], "invariant_violation");
    }
}
