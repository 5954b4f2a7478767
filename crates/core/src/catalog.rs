// Static tool catalog served on the discovery endpoint

use crate::types::{DiscoveryDocument, InputSchema, ToolDescriptor};

/// Path of the date endpoint
pub const DATE_PATH: &str = "/get-date";

pub const GET_CURRENT_DATE: &str = "get_current_date";

pub const GET_CURRENT_DATE_DESCRIPTION: &str =
    "Retrieves the current date and time from a local Flask server.";

/// Descriptor for the date endpoint
pub fn get_current_date_descriptor() -> ToolDescriptor {
    ToolDescriptor {
        name: GET_CURRENT_DATE.to_string(),
        description: GET_CURRENT_DATE_DESCRIPTION.to_string(),
        input_schema: InputSchema::empty_object(),
        path: DATE_PATH.to_string(),
        method: "GET".to_string(),
    }
}

/// The full catalog. One entry, identical on every call.
pub fn discovery_document() -> DiscoveryDocument {
    DiscoveryDocument {
        tools: vec![get_current_date_descriptor()],
    }
}
