pub mod file_store;

use std::path::{Path, PathBuf};

pub use file_store::NoteStore;

/// Separator placed between existing content and appended content.
pub const SEPARATOR: &str = "\n\n---\n\n";

/// Blank-line gap used when appending without a separator.
pub const PARAGRAPH_BREAK: &str = "\n\n";

/// Where the note lives: a directory plus a fixed file name inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLocation {
    dir: PathBuf,
    file_name: String,
}

impl StorageLocation {
    pub fn new(dir: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            file_name: file_name.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Full path of the note file.
    pub fn note_path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }
}

/// Outcome of reading the note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteRead {
    /// The note file exists; its contents verbatim.
    Found(String),
    /// No note file yet.
    Absent,
}

impl NoteRead {
    /// Note text, with an absent note read as empty.
    pub fn into_content(self) -> String {
        match self {
            NoteRead::Found(content) => content,
            NoteRead::Absent => String::new(),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, NoteRead::Absent)
    }
}

/// Whitespace for blank-note detection: Unicode White_Space plus U+FEFF
/// (byte-order mark), minus U+0085 (next line).
pub fn is_note_whitespace(c: char) -> bool {
    c == '\u{FEFF}' || (c.is_whitespace() && c != '\u{85}')
}

/// True when `text` holds nothing but [`is_note_whitespace`] characters.
pub fn is_blank(text: &str) -> bool {
    text.chars().all(is_note_whitespace)
}

/// Build the full note text after appending `content` to `existing`.
///
/// Empty or blank (see [`is_blank`]) existing text gets no prefix, so a fresh
/// note never starts with a separator. Otherwise the addition is prefixed with
/// [`SEPARATOR`] or, when `include_separator` is false, [`PARAGRAPH_BREAK`].
pub fn compose_append(existing: &str, content: &str, include_separator: bool) -> String {
    if is_blank(existing) {
        return format!("{}{}", existing, content);
    }

    let prefix = if include_separator {
        SEPARATOR
    } else {
        PARAGRAPH_BREAK
    };
    format!("{}{}{}", existing, prefix, content)
}
