//! In-memory document buffer with an undo/redo event log.
//!
//! Every change goes through an [`Event`]. A whole-buffer replacement is a
//! single [`Event::Batch`] so it undoes in one step.

use super::filetype::FileType;
use std::ops::Range;
use std::path::{Path, PathBuf};

/// A reversible change to a document's text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// `text` was inserted at byte offset `position`
    Insert { position: usize, text: String },
    /// `deleted_text` was removed from byte range `range`
    Delete {
        range: Range<usize>,
        deleted_text: String,
    },
    /// Several events applied and undone as one step
    Batch {
        events: Vec<Event>,
        description: String,
    },
}

impl Event {
    /// Event that reverts this one
    pub fn inverse(&self) -> Event {
        match self {
            Event::Insert { position, text } => Event::Delete {
                range: *position..*position + text.len(),
                deleted_text: text.clone(),
            },
            Event::Delete {
                range,
                deleted_text,
            } => Event::Insert {
                position: range.start,
                text: deleted_text.clone(),
            },
            Event::Batch {
                events,
                description,
            } => Event::Batch {
                events: events.iter().rev().map(Event::inverse).collect(),
                description: description.clone(),
            },
        }
    }
}

/// Linear undo history. Appending after an undo drops the redo tail.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    entries: Vec<Event>,
    current: usize,
}

impl EventLog {
    pub fn append(&mut self, event: Event) {
        self.entries.truncate(self.current);
        self.entries.push(event);
        self.current = self.entries.len();
    }

    pub fn can_undo(&self) -> bool {
        self.current > 0
    }

    pub fn can_redo(&self) -> bool {
        self.current < self.entries.len()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Step back, returning the inverse of the undone event
    pub fn undo(&mut self) -> Option<Event> {
        if !self.can_undo() {
            return None;
        }
        self.current -= 1;
        Some(self.entries[self.current].inverse())
    }

    /// Step forward, returning the event to re-apply
    pub fn redo(&mut self) -> Option<Event> {
        if !self.can_redo() {
            return None;
        }
        let event = self.entries[self.current].clone();
        self.current += 1;
        Some(event)
    }
}

/// The text of one open file
#[derive(Debug, Clone, Default)]
pub struct Document {
    text: String,
    path: Option<PathBuf>,
    filetype: FileType,
    /// Cursor as a byte offset into `text`
    cursor: usize,
    log: EventLog,
    /// Log index at the last save or load
    saved_index: usize,
}

impl Document {
    /// New, unsaved document
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Document backed by `path`; the file type is detected from the name.
    pub fn with_path(text: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            text: text.into(),
            filetype: FileType::detect_from_path(&path),
            path: Some(path),
            ..Default::default()
        }
    }

    /// Load a document from disk
    pub fn open(path: &Path) -> std::io::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::with_path(text, path))
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Name shown in messages: the file name, or "untitled"
    pub fn display_name(&self) -> String {
        self.path
            .as_deref()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "untitled".to_string())
    }

    pub fn filetype(&self) -> FileType {
        self.filetype
    }

    pub fn set_filetype(&mut self, filetype: FileType) {
        if self.filetype != filetype {
            tracing::debug!(
                "{}: file type {:?} -> {:?}",
                self.display_name(),
                self.filetype,
                filetype
            );
            self.filetype = filetype;
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Move the cursor, clamped to the text and to a char boundary.
    pub fn set_cursor(&mut self, position: usize) {
        let mut position = position.min(self.text.len());
        while !self.text.is_char_boundary(position) {
            position -= 1;
        }
        self.cursor = position;
    }

    pub fn is_modified(&self) -> bool {
        self.log.current_index() != self.saved_index
    }

    pub fn can_undo(&self) -> bool {
        self.log.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.log.can_redo()
    }

    /// Insert `text` at byte offset `position` as one undo step.
    ///
    /// Panics if `position` is not a char boundary of the current text.
    pub fn insert(&mut self, position: usize, text: &str) {
        let event = Event::Insert {
            position,
            text: text.to_string(),
        };
        self.apply(&event);
        self.log.append(event);
        self.set_cursor(position + text.len());
    }

    /// Replace the entire text as one undoable edit and move the cursor to
    /// the start.
    pub fn replace_all(&mut self, new_text: &str, description: &str) {
        let old_text = self.text.clone();
        let batch = Event::Batch {
            events: vec![
                Event::Delete {
                    range: 0..self.text.len(),
                    deleted_text: old_text,
                },
                Event::Insert {
                    position: 0,
                    text: new_text.to_string(),
                },
            ],
            description: description.to_string(),
        };
        self.apply(&batch);
        self.log.append(batch);
        self.cursor = 0;
    }

    /// Revert the last edit. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(event) = self.log.undo() else {
            return false;
        };
        self.apply(&event);
        true
    }

    /// Re-apply the last undone edit. Returns false when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(event) = self.log.redo() else {
            return false;
        };
        self.apply(&event);
        true
    }

    /// Write the text to `path`, adopt it as the document's path and mark the
    /// document saved.
    pub fn save_as(&mut self, path: &Path) -> std::io::Result<()> {
        std::fs::write(path, &self.text)?;
        self.path = Some(path.to_path_buf());
        self.saved_index = self.log.current_index();
        Ok(())
    }

    fn apply(&mut self, event: &Event) {
        match event {
            Event::Insert { position, text } => {
                self.text.insert_str(*position, text);
            }
            Event::Delete { range, .. } => {
                self.text.replace_range(range.clone(), "");
            }
            Event::Batch { events, .. } => {
                for event in events {
                    self.apply(event);
                }
            }
        }
        self.set_cursor(self.cursor);
    }
}
