//! Content-region detection before handing text to a formatter.
//!
//! Finds the first opening delimiter and the last closing delimiter, each
//! scanned independently. This is a heuristic for stripping log-style
//! prefixes and suffixes around embedded JSON or XML; delimiters inside string
//! literals are not recognized.

use serde::Serialize;

/// How to locate the region of interest in a larger text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrimStrategy {
    /// Pass the whole text
    #[default]
    None,
    /// From the first `[`/`{` to the last `]`/`}`
    Json,
    /// From the first `<` to the last `>`
    Xml,
}

impl TrimStrategy {
    /// Opening and closing delimiter sets, `None` for [`TrimStrategy::None`]
    fn delimiters(self) -> Option<(&'static [u8], &'static [u8])> {
        match self {
            TrimStrategy::None => None,
            TrimStrategy::Json => Some((b"[{", b"]}")),
            TrimStrategy::Xml => Some((b"<", b">")),
        }
    }
}

/// Byte range `begin..end` selected from the input. Always `begin <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrimRange {
    pub begin: usize,
    pub end: usize,
}

impl TrimRange {
    pub fn whole(text: &str) -> Self {
        Self {
            begin: 0,
            end: text.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.begin
    }

    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    /// Slice `text` with this range.
    ///
    /// The delimiters are ASCII, so both offsets fall on char boundaries of
    /// the text the range was computed from.
    pub fn apply<'a>(&self, text: &'a str) -> &'a str {
        &text[self.begin..self.end]
    }
}

/// Compute the content range of `text` for `strategy`.
///
/// - no opening delimiter: begin is 0
/// - no closing delimiter: end is the text length
/// - last closing delimiter before `begin`: end is the text length
pub fn find_range(text: &str, strategy: TrimStrategy) -> TrimRange {
    let Some((open, close)) = strategy.delimiters() else {
        return TrimRange::whole(text);
    };
    let bytes = text.as_bytes();

    let begin = bytes
        .iter()
        .position(|b| open.contains(b))
        .unwrap_or(0);
    let end = bytes
        .iter()
        .rposition(|b| close.contains(b))
        .map(|idx| idx + 1)
        .filter(|&end| end > begin)
        .unwrap_or(bytes.len());

    TrimRange { begin, end }
}
