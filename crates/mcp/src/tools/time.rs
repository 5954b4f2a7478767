// Clock tools: current local date and offset-shifted time

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{json_schema_integer, json_schema_object, Tool};
use anyhow::{Context, Result};
use datetool_core::catalog::GET_CURRENT_DATE;
use datetool_core::{Clock, DateResponse, TimeSnapshot};
use serde::Deserialize;
use std::sync::Arc;

pub const GET_CURRENT_TIME: &str = "get_current_time";

/// Tool reporting the local date the same way `/get-date` does
pub struct GetCurrentDateTool {
    clock: Arc<dyn Clock>,
}

impl GetCurrentDateTool {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

#[async_trait::async_trait]
impl Tool for GetCurrentDateTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: GET_CURRENT_DATE.to_string(),
            description: "Get the current local date and time as YYYY-MM-DD HH:MM:SS".to_string(),
            input_schema: json_schema_object(serde_json::json!({}), vec![]),
        }
    }

    async fn execute(&self, _arguments: serde_json::Value) -> Result<CallToolResult> {
        let response = DateResponse::now(self.clock.as_ref());
        Ok(CallToolResult::text(serde_json::to_string(&response)?))
    }
}

/// Tool reporting the current instant shifted by a whole number of hours
pub struct GetCurrentTimeTool {
    clock: Arc<dyn Clock>,
    default_offset_hours: i32,
}

impl GetCurrentTimeTool {
    pub fn new(clock: Arc<dyn Clock>, default_offset_hours: i32) -> Self {
        Self {
            clock,
            default_offset_hours,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct GetCurrentTimeArgs {
    #[serde(default)]
    utc_offset_hours: Option<i32>,
}

#[async_trait::async_trait]
impl Tool for GetCurrentTimeTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: GET_CURRENT_TIME.to_string(),
            description: "Get the current time".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "utc_offset_hours": json_schema_integer(&format!(
                        "Hours to shift from UTC, -23 to 23 (default: {})",
                        self.default_offset_hours
                    ))
                }),
                vec![],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: GetCurrentTimeArgs = if arguments.is_null() {
            GetCurrentTimeArgs::default()
        } else {
            serde_json::from_value(arguments).context("Invalid arguments for get_current_time")?
        };
        let offset = args.utc_offset_hours.unwrap_or(self.default_offset_hours);

        match TimeSnapshot::at(self.clock.now_utc(), offset) {
            Ok(snapshot) => Ok(CallToolResult::text(serde_json::to_string(&snapshot)?)),
            Err(e) => Ok(CallToolResult::error(e.to_string())),
        }
    }
}
