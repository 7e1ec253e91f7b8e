//! Reader for the host's key-file configuration format.
//!
//! The format is the GLib key file used by `geany.conf`:
//!
//! ```text
//! # comment
//! [group]
//! key=value
//! ```
//!
//! Values are stored raw and unescaped on access. Only `#` starts a comment;
//! `;` is an ordinary character because list-like values (favourites) use it
//! as a delimiter.

use std::collections::HashMap;

/// A parsed key file: groups of key/value pairs, in no particular order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyFile {
    groups: HashMap<String, HashMap<String, String>>,
}

/// Error produced for a line that is neither a group header, an entry,
/// a comment nor blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyFileError {
    /// 1-based line number
    pub line: usize,
    pub message: String,
}

impl std::fmt::Display for KeyFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for KeyFileError {}

impl KeyFile {
    /// Parse key-file text.
    ///
    /// Later duplicate keys override earlier ones, and a group that appears
    /// twice is merged.
    pub fn parse(text: &str) -> Result<Self, KeyFileError> {
        let mut groups: HashMap<String, HashMap<String, String>> = HashMap::new();
        let mut current: Option<String> = None;

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim_start();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(rest) = line.strip_prefix('[') {
                let name = rest.trim_end().strip_suffix(']').ok_or_else(|| KeyFileError {
                    line: line_no,
                    message: format!("unterminated group header: {}", raw.trim()),
                })?;
                if name.is_empty() || name.contains(['[', ']']) {
                    return Err(KeyFileError {
                        line: line_no,
                        message: format!("invalid group name: {:?}", name),
                    });
                }
                groups.entry(name.to_string()).or_default();
                current = Some(name.to_string());
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                return Err(KeyFileError {
                    line: line_no,
                    message: format!("expected key=value, found {:?}", raw.trim()),
                });
            };
            let key = key.trim_end();
            if key.is_empty() {
                return Err(KeyFileError {
                    line: line_no,
                    message: "empty key".to_string(),
                });
            }
            let Some(group) = current.as_ref() else {
                return Err(KeyFileError {
                    line: line_no,
                    message: format!("key {:?} outside of any group", key),
                });
            };

            groups
                .entry(group.clone())
                .or_default()
                .insert(key.to_string(), value.trim_start().to_string());
        }

        Ok(Self { groups })
    }

    /// Raw value as written in the file (no unescaping)
    pub fn raw(&self, group: &str, key: &str) -> Option<&str> {
        self.groups.get(group)?.get(key).map(String::as_str)
    }

    /// String value with key-file escape sequences resolved.
    pub fn get_string(&self, group: &str, key: &str) -> Option<String> {
        self.raw(group, key).map(unescape)
    }

    /// Integer value; `None` when missing or not a number.
    pub fn get_integer(&self, group: &str, key: &str) -> Option<i64> {
        self.raw(group, key)?.trim().parse().ok()
    }

}

/// Resolve `\s`, `\n`, `\t`, `\r` and `\\`. Unknown escapes are kept verbatim.
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('s') => out.push(' '),
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
