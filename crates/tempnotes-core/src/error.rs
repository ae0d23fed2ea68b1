use std::path::PathBuf;

/// Core error types for tempnotes.
#[derive(Debug, thiserror::Error)]
pub enum TempNotesError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Note error: {0}")]
    Note(#[from] NoteError),

    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("Invalid config: {0}")]
    Invalid(String),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Storage failures. The tool layer reports these as recovered errors.
#[derive(Debug, thiserror::Error)]
pub enum NoteError {
    #[error("Failed to create note directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Faults: malformed requests that abort the call.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    NotFound(String),

    #[error("Invalid parameters: {0}")]
    InvalidParams(String),
}

pub type Result<T> = std::result::Result<T, TempNotesError>;
