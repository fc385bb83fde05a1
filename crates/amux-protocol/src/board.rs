use std::collections::HashMap;

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Per-team state→column overrides: outer key is a team name, key, or id;
/// inner key is a workflow state name.
pub type TeamStateOverrides = HashMap<String, HashMap<String, String>>;

/// How issue workflow states map onto board columns.
///
/// Encodes as a bare JSON string (`"auto"`, or the internal `"custom"`
/// marker when custom mode is set but carries no overrides yet) or as the
/// raw override object once overrides are present — matching the wire
/// format a hand-written `linear.json` would use.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum StateMapping {
    #[default]
    Auto,
    Custom(Option<TeamStateOverrides>),
}

impl Serialize for StateMapping {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            StateMapping::Auto => serializer.serialize_str("auto"),
            StateMapping::Custom(None) => serializer.serialize_str("custom"),
            StateMapping::Custom(Some(overrides)) => overrides.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for StateMapping {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        match value {
            Value::String(s) if s == "auto" => Ok(StateMapping::Auto),
            Value::String(s) if s == "custom" => Ok(StateMapping::Custom(None)),
            Value::String(other) => Err(DeError::custom(format!(
                "unknown stateMapping mode '{other}', expected \"auto\", \"custom\", or an object"
            ))),
            Value::Object(_) => {
                let overrides: TeamStateOverrides =
                    serde_json::from_value(value).map_err(DeError::custom)?;
                Ok(StateMapping::Custom(Some(overrides)))
            }
            other => Err(DeError::custom(format!(
                "stateMapping must be a string or object, got {other}"
            ))),
        }
    }
}

/// Ordered board columns (default `Todo, In Progress, In Review, Done`).
pub type BoardColumns = Vec<String>;

fn default_columns() -> BoardColumns {
    vec![
        "Todo".to_string(),
        "In Progress".to_string(),
        "In Review".to_string(),
        "Done".to_string(),
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardConfig {
    #[serde(default = "default_columns")]
    pub columns: BoardColumns,
    #[serde(default)]
    pub state_mapping: StateMapping,
    #[serde(default)]
    pub wip_limits: HashMap<String, u32>,
    #[serde(default)]
    pub show_canceled: bool,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            columns: default_columns(),
            state_mapping: StateMapping::default(),
            wip_limits: HashMap::new(),
            show_canceled: false,
        }
    }
}
