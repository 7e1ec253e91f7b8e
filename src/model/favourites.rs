//! Favourites: a configured quick-open list of files.
//!
//! The configuration is a single `;`-delimited string read as label/path
//! pairs, e.g. `Notes;$HOME/notes.md;---;Scratch;/tmp/scratch.txt`. A label
//! of `---` is a separator and consumes only one field.

use crate::primitives::path_utils::expand_home_var;
use std::path::{Path, PathBuf};

/// Field that marks a separator instead of a label
pub const SEPARATOR_TOKEN: &str = "---";

/// One parsed favourites item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Favourite {
    Entry { label: String, path: PathBuf },
    Separator,
}

impl Favourite {
    pub fn entry(label: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Favourite::Entry {
            label: label.into(),
            path: path.into(),
        }
    }
}

/// Parse a favourites string. `$HOME` in paths is replaced by `home`.
///
/// A field is only read while another one follows it, so a trailing label
/// without a path and a trailing `---` are both ignored.
pub fn parse(config: &str, home: Option<&Path>) -> Vec<Favourite> {
    if config.is_empty() {
        return Vec::new();
    }

    let fields: Vec<&str> = config.split(';').collect();
    let mut rest = fields.as_slice();
    let mut items = Vec::new();
    while let [label, path, ..] = rest {
        if *label == SEPARATOR_TOKEN {
            items.push(Favourite::Separator);
            rest = &rest[1..];
            continue;
        }
        items.push(Favourite::Entry {
            label: label.to_string(),
            path: expand_home_var(path, home),
        });
        rest = &rest[2..];
    }
    if let [last] = rest {
        tracing::debug!("Ignoring trailing favourites field {:?}", last);
    }
    items
}

/// Escape a label for menus that treat `_` as a mnemonic marker, and render
/// `>>` as `»`.
pub fn menu_label(label: &str) -> String {
    label.replace('_', "__").replace(">>", "»")
}

/// Item of the favourites menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FavouriteMenuItem {
    /// Activating opens `path`
    Open { label: String, path: PathBuf },
    Separator,
}

/// Menu built from the favourites list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavouritesMenu {
    pub items: Vec<FavouriteMenuItem>,
}

impl FavouritesMenu {
    /// Build the menu, dropping dangling entries.
    ///
    /// An entry is kept when its path is a regular file or lies under
    /// `scratch_prefix` (such files are created on first open).
    pub fn build(favourites: &[Favourite], scratch_prefix: &Path) -> Self {
        let items = favourites
            .iter()
            .filter_map(|fav| match fav {
                Favourite::Separator => Some(FavouriteMenuItem::Separator),
                Favourite::Entry { label, path } => {
                    if path.is_file() || path.starts_with(scratch_prefix) {
                        Some(FavouriteMenuItem::Open {
                            label: menu_label(label),
                            path: path.clone(),
                        })
                    } else {
                        tracing::debug!("Skipping dangling favourite {:?} -> {:?}", label, path);
                        None
                    }
                }
            })
            .collect();
        Self { items }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Paths of all openable entries, in menu order
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.items.iter().filter_map(|item| match item {
            FavouriteMenuItem::Open { path, .. } => Some(path.as_path()),
            FavouriteMenuItem::Separator => None,
        })
    }
}
