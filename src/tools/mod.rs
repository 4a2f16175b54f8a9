//! Tools the dialogue model can call.

pub mod registry;
pub mod routes;
pub mod submit;
pub mod tool;

pub use registry::ToolRegistry;
pub use routes::{ToolRouteState, tool_routes};
pub use submit::SubmitRegistrationTool;
pub use tool::*;
