//! Registry of enabled tools.

use super::{ToolDefinition, ToolFilter, builtin_tools};
use crate::validation::ProductionPolicy;
use log::{debug, warn};
use std::collections::HashMap;

/// What environment protection needs to know about a tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolMetadata {
    pub name: String,
    pub read_only: bool,
    pub policy: ProductionPolicy,
}

/// Lookup of tool metadata by name.
pub trait ToolCatalog: Send + Sync {
    /// Metadata for a registered tool, or `None` if the name is unknown.
    fn tool_metadata(&self, name: &str) -> Option<ToolMetadata>;
}

/// Ordered set of tool definitions, indexed by name.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<ToolDefinition>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry of every built-in tool.
    pub fn with_builtin_tools() -> Self {
        Self::filtered(&ToolFilter::default())
    }

    /// A registry of the built-in tools the filter allows.
    pub fn filtered(filter: &ToolFilter) -> Self {
        let all = builtin_tools();
        for unknown in filter.unknown_tool_names(all.iter().map(|tool| tool.name.as_str())) {
            warn!("Tool filter names unknown tool '{}'", unknown);
        }

        let mut registry = Self::new();
        for tool in all {
            if filter.allows(&tool) {
                registry.register(tool);
            } else {
                debug!("Tool '{}' disabled by filter", tool.name);
            }
        }
        registry
    }

    /// Add a tool, replacing any existing tool with the same name.
    pub fn register(&mut self, tool: ToolDefinition) -> Option<ToolDefinition> {
        match self.index.get(&tool.name) {
            Some(&position) => Some(std::mem::replace(&mut self.tools[position], tool)),
            None => {
                self.index.insert(tool.name.clone(), self.tools.len());
                self.tools.push(tool);
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.index.get(name).map(|&position| &self.tools[position])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Definitions in registration order.
    pub fn definitions(&self) -> &[ToolDefinition] {
        &self.tools
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl ToolCatalog for ToolRegistry {
    fn tool_metadata(&self, name: &str) -> Option<ToolMetadata> {
        self.get(name).map(ToolDefinition::metadata)
    }
}
