use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::error;

use crate::error::{NoteError, ToolError};
use crate::note::NoteStore;

use super::{Tool, ToolOutput, ToolRegistry};

/// Register clear_note, write_note, read_note and append_note.
pub fn register_note_tools(registry: &ToolRegistry, store: Arc<NoteStore>) {
    registry.register(Arc::new(ClearNoteTool::new(store.clone())));
    registry.register(Arc::new(WriteNoteTool::new(store.clone())));
    registry.register(Arc::new(ReadNoteTool::new(store.clone())));
    registry.register(Arc::new(AppendNoteTool::new(store)));
}

/// `content` must be a non-empty string.
fn required_content(params: &HashMap<String, serde_json::Value>) -> Result<&str, ToolError> {
    match params.get("content").and_then(|v| v.as_str()) {
        Some(c) if !c.is_empty() => Ok(c),
        _ => Err(ToolError::InvalidParams("Content is required".to_string())),
    }
}

/// Only an explicit `false` turns the separator off.
fn include_separator(params: &HashMap<String, serde_json::Value>) -> bool {
    params.get("include_separator").and_then(|v| v.as_bool()) != Some(false)
}

fn recovered(action: &str, e: NoteError) -> ToolOutput {
    error!("Error {} note: {}", action, e);
    ToolOutput::error(format!("Error {} note: {}", action, e))
}

// ====== ClearNoteTool ======

pub struct ClearNoteTool {
    store: Arc<NoteStore>,
}

impl ClearNoteTool {
    pub fn new(store: Arc<NoteStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for ClearNoteTool {
    fn name(&self) -> &str {
        "clear_note"
    }

    fn description(&self) -> &str {
        "Clears the current note, making it empty."
    }

    fn parameters(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {},
            "required": []
        })
    }

    async fn execute(
        &self,
        _params: HashMap<String, serde_json::Value>,
    ) -> Result<ToolOutput, ToolError> {
        Ok(match self.store.clear().await {
            Ok(()) => ToolOutput::text("Note cleared successfully."),
            Err(e) => recovered("clearing", e),
        })
    }
}

// ====== WriteNoteTool ======

pub struct WriteNoteTool {
    store: Arc<NoteStore>,
}

impl WriteNoteTool {
    pub fn new(store: Arc<NoteStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for WriteNoteTool {
    fn name(&self) -> &str {
        "write_note"
    }

    fn description(&self) -> &str {
        "Replaces the current note with a new string."
    }

    fn parameters(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "content": {
                    "type": "string",
                    "description": "The content to write to the note"
                }
            },
            "required": ["content"]
        })
    }

    async fn execute(
        &self,
        params: HashMap<String, serde_json::Value>,
    ) -> Result<ToolOutput, ToolError> {
        let content = required_content(&params)?;

        Ok(match self.store.write(content).await {
            Ok(()) => ToolOutput::text("Note written successfully."),
            Err(e) => recovered("writing", e),
        })
    }
}

// ====== ReadNoteTool ======

pub struct ReadNoteTool {
    store: Arc<NoteStore>,
}

impl ReadNoteTool {
    pub fn new(store: Arc<NoteStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for ReadNoteTool {
    fn name(&self) -> &str {
        "read_note"
    }

    fn description(&self) -> &str {
        "Returns the current content of the note."
    }

    fn parameters(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {},
            "required": []
        })
    }

    async fn execute(
        &self,
        _params: HashMap<String, serde_json::Value>,
    ) -> Result<ToolOutput, ToolError> {
        Ok(match self.store.read().await {
            Ok(note) => ToolOutput::text(note.into_content()),
            Err(e) => recovered("reading", e),
        })
    }
}

// ====== AppendNoteTool ======

pub struct AppendNoteTool {
    store: Arc<NoteStore>,
}

impl AppendNoteTool {
    pub fn new(store: Arc<NoteStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for AppendNoteTool {
    fn name(&self) -> &str {
        "append_note"
    }

    fn description(&self) -> &str {
        "Appends new text to the current note, starting with a new line. Optionally includes a separator line."
    }

    fn parameters(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "content": {
                    "type": "string",
                    "description": "The content to append to the note"
                },
                "include_separator": {
                    "type": "boolean",
                    "description": "Whether to include a separator line (---) before the new content",
                    "default": true
                }
            },
            "required": ["content"]
        })
    }

    async fn execute(
        &self,
        params: HashMap<String, serde_json::Value>,
    ) -> Result<ToolOutput, ToolError> {
        let content = required_content(&params)?;
        let include_separator = include_separator(&params);

        Ok(match self.store.append(content, include_separator).await {
            Ok(()) => ToolOutput::text("Note appended successfully."),
            Err(e) => recovered("appending to", e),
        })
    }
}
