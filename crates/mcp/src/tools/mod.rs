pub mod time;
mod registry;

pub use registry::{json_schema_integer, json_schema_object, Tool, ToolRegistry};
pub use time::{GetCurrentDateTool, GetCurrentTimeTool};
