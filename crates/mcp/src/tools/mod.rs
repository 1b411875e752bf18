pub mod favor;
mod registry;

pub use favor::{ChangeFavorabilityTool, GetFavorabilityTool};
pub use registry::{json_schema_number, json_schema_object, Tool, ToolRegistry};
