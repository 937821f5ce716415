//! Include/exclude filtering of the tool set.
//!
//! Exclusions always win. With no inclusions configured every tool not
//! excluded is enabled; otherwise a tool must be named directly or belong
//! to an included collection.

use super::{Collection, ToolDefinition};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolFilter {
    pub include_tools: Vec<String>,
    pub exclude_tools: Vec<String>,
    pub include_collections: Vec<Collection>,
    pub exclude_collections: Vec<Collection>,
}

impl ToolFilter {
    pub fn allows(&self, tool: &ToolDefinition) -> bool {
        if self.exclude_tools.iter().any(|name| *name == tool.name)
            || self.exclude_collections.contains(&tool.collection)
        {
            return false;
        }

        if self.include_tools.is_empty() && self.include_collections.is_empty() {
            return true;
        }

        self.include_tools.iter().any(|name| *name == tool.name)
            || self.include_collections.contains(&tool.collection)
    }

    /// Tool names in the filter that match none of `known`.
    pub fn unknown_tool_names<'a>(&self, known: impl Iterator<Item = &'a str>) -> Vec<String> {
        let known: Vec<&str> = known.collect();
        self.include_tools
            .iter()
            .chain(&self.exclude_tools)
            .filter(|name| !known.contains(&name.as_str()))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tool(name: &str, collection: Collection) -> ToolDefinition {
        ToolDefinition::new(name, collection, true)
    }

    #[test]
    fn test_empty_filter_allows_everything() {
        let filter = ToolFilter::default();
        assert!(filter.allows(&tool("list_populations", Collection::Populations)));
    }

    #[test]
    fn test_exclusion_beats_inclusion() {
        let filter = ToolFilter {
            include_tools: vec!["list_populations".to_string()],
            exclude_collections: vec![Collection::Populations],
            ..ToolFilter::default()
        };
        assert!(!filter.allows(&tool("list_populations", Collection::Populations)));
    }

    #[test]
    fn test_inclusion_by_name_or_collection() {
        let filter = ToolFilter {
            include_tools: vec!["get_application".to_string()],
            include_collections: vec![Collection::Directory],
            ..ToolFilter::default()
        };
        assert!(filter.allows(&tool("get_application", Collection::Applications)));
        assert!(filter.allows(&tool(
            "get_total_identities_by_environment",
            Collection::Directory
        )));
        assert!(!filter.allows(&tool("list_applications", Collection::Applications)));
    }

    #[test]
    fn test_unknown_tool_names() {
        let filter = ToolFilter {
            include_tools: vec!["list_populations".to_string()],
            exclude_tools: vec!["list_populatons".to_string()],
            ..ToolFilter::default()
        };
        let unknown = filter.unknown_tool_names(["list_populations"].into_iter());
        assert_eq!(unknown, vec!["list_populatons".to_string()]);
    }
}
