pub mod note;

use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::ToolError;
use crate::note::NoteStore;

/// Result of a tool call, in the MCP tool result shape:
///
/// ```json
/// { "content": [{ "type": "text", "text": "..." }], "isError": false }
/// ```
///
/// `is_error` marks a recovered error: the call completed, but the operation
/// failed and the text explains why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolOutput {
    pub content: Vec<ToolContent>,
    #[serde(rename = "isError", default)]
    pub is_error: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ToolContent {
    #[serde(rename = "text")]
    Text { text: String },
}

impl ToolOutput {
    /// Create a successful text result.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text { text: text.into() }],
            is_error: false,
        }
    }

    /// Create a recovered-error text result.
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text { text: text.into() }],
            is_error: true,
        }
    }

    /// All text content joined with newlines.
    pub fn as_text(&self) -> String {
        self.content
            .iter()
            .map(|c| match c {
                ToolContent::Text { text } => text.as_str(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Trait for note tools.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name used in calls.
    fn name(&self) -> &str;

    /// Description of what the tool does.
    fn description(&self) -> &str;

    /// JSON Schema for tool parameters.
    fn parameters(&self) -> serde_json::Value;

    /// Execute the tool. `Err` is a fault; storage failures come back as
    /// `Ok` with [`ToolOutput::is_error`] set.
    async fn execute(
        &self,
        params: HashMap<String, serde_json::Value>,
    ) -> Result<ToolOutput, ToolError>;
}

/// Extension trait for Tool to build its published definition.
pub trait ToolSchema: Tool {
    fn to_schema(&self) -> serde_json::Value {
        json!({
            "name": self.name(),
            "description": self.description(),
            "inputSchema": self.parameters(),
        })
    }
}

impl<T: Tool + ?Sized> ToolSchema for T {}

/// Lock-free tool registry using DashMap.
pub struct ToolRegistry {
    tools: DashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: DashMap::new(),
        }
    }

    /// Registry with the four note tools bound to `store`.
    pub fn with_note_tools(store: Arc<NoteStore>) -> Self {
        let registry = Self::new();
        note::register_note_tools(&registry, store);
        registry
    }

    /// Register a tool.
    pub fn register(&self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).map(|r| r.value().clone())
    }

    /// Check if a tool is registered.
    pub fn has(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// All tool definitions, sorted by name.
    pub fn get_definitions(&self) -> Vec<serde_json::Value> {
        let mut tools: Vec<Arc<dyn Tool>> =
            self.tools.iter().map(|e| e.value().clone()).collect();
        tools.sort_by(|a, b| a.name().cmp(b.name()));
        tools.iter().map(|t| t.to_schema()).collect()
    }

    /// Execute a tool by name with given parameters.
    pub async fn execute(
        &self,
        name: &str,
        params: HashMap<String, serde_json::Value>,
    ) -> Result<ToolOutput, ToolError> {
        let tool = self.get(name).ok_or_else(|| {
            warn!("Rejected call to unknown tool: {}", name);
            ToolError::NotFound(name.to_string())
        })?;

        debug!("Executing tool: {}", name);
        tool.execute(params).await.inspect_err(|e| {
            warn!("Tool {} rejected call: {}", name, e);
        })
    }

    /// Get list of registered tool names, sorted.
    pub fn tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// Number of registered tools.
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

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echo the text argument."
        }

        fn parameters(&self) -> serde_json::Value {
            json!({ "type": "object", "properties": {}, "required": [] })
        }

        async fn execute(
            &self,
            params: HashMap<String, serde_json::Value>,
        ) -> Result<ToolOutput, ToolError> {
            match params.get("text").and_then(|v| v.as_str()) {
                Some(t) => Ok(ToolOutput::text(t)),
                None => Err(ToolError::InvalidParams("text is required".into())),
            }
        }
    }

    #[test]
    fn test_tool_output_serializes_mcp_shape() {
        let out = ToolOutput::error("Error reading note: boom");
        let value = serde_json::to_value(&out).unwrap();
        assert_eq!(value["isError"], true);
        assert_eq!(value["content"][0]["type"], "text");
        assert_eq!(value["content"][0]["text"], "Error reading note: boom");
        assert_eq!(out.as_text(), "Error reading note: boom");
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = ToolRegistry::new();
        assert!(registry.is_empty());

        registry.register(Arc::new(EchoTool));
        assert_eq!(registry.len(), 1);
        assert!(registry.has("echo"));
        assert!(registry.get("missing").is_none());
        assert_eq!(registry.tool_names(), vec!["echo".to_string()]);

        let defs = registry.get_definitions();
        assert_eq!(defs[0]["name"], "echo");
        assert_eq!(defs[0]["inputSchema"]["type"], "object");
    }

    #[tokio::test]
    async fn test_execute_unknown_tool_faults() {
        let registry = ToolRegistry::new();
        let err = registry.execute("nope", HashMap::new()).await.unwrap_err();
        assert!(matches!(err, ToolError::NotFound(name) if name == "nope"));
    }

    #[tokio::test]
    async fn test_execute_passes_through() {
        let registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool));

        let mut params = HashMap::new();
        params.insert("text".to_string(), json!("hi"));
        let out = registry.execute("echo", params).await.unwrap();
        assert_eq!(out, ToolOutput::text("hi"));

        let err = registry.execute("echo", HashMap::new()).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidParams(_)));
    }
}
