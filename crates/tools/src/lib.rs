//! Planner tool surface.
//!
//! Defines the [`Tool`] trait and [`ToolRegistry`], plus the seventeen
//! remote-callable planner operations over the three scoped collections.

pub mod registry;
pub mod tool;
pub mod tools;

pub use registry::{RegistryError, ToolRegistry};
pub use tool::{Tool, ToolContext, ToolDefinition, ToolError};
pub use tools::register_all;
