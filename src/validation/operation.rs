//! READ/WRITE classification of tool calls.

use crate::tools::ToolMetadata;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a tool call observes or mutates PingOne state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationType {
    Read,
    Write,
}

impl OperationType {
    /// Classify from a tool's read-only annotation.
    pub fn from_read_only(read_only: bool) -> Self {
        if read_only { Self::Read } else { Self::Write }
    }

    /// Classify a tool call. Unknown tools classify as [`OperationType::Read`].
    pub fn for_tool(metadata: Option<&ToolMetadata>) -> Self {
        metadata.map_or(Self::Read, |tool| Self::from_read_only(tool.read_only))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
