use crate::clock::Clock;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// `YYYY-MM-DD HH:MM:SS`, zero-padded, 24-hour clock
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format a local date/time the way the date endpoint reports it
pub fn format_date(at: NaiveDateTime) -> String {
    at.format(DATE_FORMAT).to_string()
}

/// JSON schema describing a tool's input
///
/// Field order is part of the wire format: `type`, `properties`, `required`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSchema {
    #[serde(rename = "type")]
    pub schema_type: String,
    pub properties: serde_json::Map<String, serde_json::Value>,
    pub required: Vec<String>,
}

impl InputSchema {
    /// An object schema that takes no arguments
    pub fn empty_object() -> Self {
        Self {
            schema_type: "object".to_string(),
            properties: serde_json::Map::new(),
            required: Vec::new(),
        }
    }
}

/// Metadata for one capability advertised on the discovery endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub input_schema: InputSchema,
    /// URL path of the tool's endpoint
    pub path: String,
    /// HTTP verb used to invoke the tool
    pub method: String,
}

/// Body of the discovery endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryDocument {
    pub tools: Vec<ToolDescriptor>,
}

/// Body of the date endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateResponse {
    pub date: String,
}

impl DateResponse {
    pub fn at(at: NaiveDateTime) -> Self {
        Self {
            date: format_date(at),
        }
    }

    /// Read the clock and format the result. Never cached.
    pub fn now(clock: &dyn Clock) -> Self {
        Self::at(clock.now())
    }
}
