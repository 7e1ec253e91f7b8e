//! File type detection from file names.

use serde::Serialize;
use std::path::Path;

/// File types the plugin distinguishes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum FileType {
    /// No file type assigned (new, unsaved document)
    #[default]
    None,
    C,
    Cpp,
    Json,
    Xml,
    Html,
    Markdown,
    /// Markdown with embedded HTML (`.mdml`)
    MarkdownHtml,
    Text,
}

impl FileType {
    /// Canonical extension of this file type, `None` for [`FileType::None`]
    pub fn extension(self) -> Option<&'static str> {
        match self {
            FileType::None => None,
            FileType::C => Some("c"),
            FileType::Cpp => Some("cpp"),
            FileType::Json => Some("json"),
            FileType::Xml => Some("xml"),
            FileType::Html => Some("html"),
            FileType::Markdown => Some("md"),
            FileType::MarkdownHtml => Some("mdml"),
            FileType::Text => Some("txt"),
        }
    }

    /// Detect the file type of a path from its extension.
    ///
    /// Unknown extensions are plain text; a path without extension has no type.
    pub fn detect_from_path(path: &Path) -> Self {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return FileType::None;
        };
        match ext.to_ascii_lowercase().as_str() {
            "c" | "h" => FileType::C,
            "cpp" | "cxx" | "cc" | "hpp" | "hxx" | "hh" => FileType::Cpp,
            "json" => FileType::Json,
            "xml" | "xsd" | "xsl" | "svg" | "rss" => FileType::Xml,
            "html" | "htm" | "xhtml" => FileType::Html,
            "md" | "markdown" => FileType::Markdown,
            "mdml" => FileType::MarkdownHtml,
            _ => FileType::Text,
        }
    }

    /// C or C++ source
    pub fn is_c_family(self) -> bool {
        matches!(self, FileType::C | FileType::Cpp)
    }

    pub fn is_markdown(self) -> bool {
        matches!(self, FileType::Markdown | FileType::MarkdownHtml)
    }
}
