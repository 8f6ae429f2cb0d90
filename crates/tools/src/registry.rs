use std::collections::BTreeMap;
use std::sync::Arc;

use crate::tool::{Tool, ToolDefinition};

/// The planner's tool catalogue, keyed by wire name.
///
/// Backed by an ordered map so a catalogue listing always comes out in
/// the same name order, regardless of registration order. Individual
/// tools sit behind `Arc` so lookups hand out shareable handles.
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: BTreeMap::new(),
        }
    }

    /// Add a tool under its definition name. A second tool claiming an
    /// already-registered name is rejected rather than silently replaced.
    pub fn register(&mut self, tool: impl Tool + 'static) -> Result<(), RegistryError> {
        let def = tool.definition();
        if self.tools.contains_key(&def.name) {
            return Err(RegistryError::DuplicateName(def.name));
        }
        tracing::debug!(tool = %def.name, "Registered tool");
        self.tools.insert(def.name, Arc::new(tool));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Every registered definition, sorted by tool name.
    pub fn list(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|t| t.definition()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Tool with name '{0}' is already registered")]
    DuplicateName(String),
}
