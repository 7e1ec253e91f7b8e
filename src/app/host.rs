//! Contract between the plugin and the editor hosting it.

use crate::model::document::Document;
use crate::model::favourites::FavouritesMenu;
use std::path::Path;

/// Tabs of the host's message window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageTab {
    Status = 0,
    Compiler = 1,
    Messages = 2,
    Scratch = 3,
    Terminal = 4,
}

impl MessageTab {
    /// Tab for a configured index; `None` outside 0..=4
    pub fn from_index(index: i64) -> Option<Self> {
        match index {
            0 => Some(MessageTab::Status),
            1 => Some(MessageTab::Compiler),
            2 => Some(MessageTab::Messages),
            3 => Some(MessageTab::Scratch),
            4 => Some(MessageTab::Terminal),
            _ => None,
        }
    }
}

/// Severity of a message-window entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

/// Services the plugin needs from its host editor.
///
/// The host calls into the plugin for one user action at a time, so no
/// method needs to be reentrant.
pub trait Host {
    /// Document of the active editor tab, if any
    fn current_document(&mut self) -> Option<&mut Document>;

    /// Ask the user for one line of text. `None` means cancelled.
    fn prompt_text(&mut self, title: &str, label: &str, default: &str) -> Option<String>;

    /// Open `path` in a new tab (or focus it if already open)
    fn open_file(&mut self, path: &Path) -> std::io::Result<()>;

    /// Trigger the host's own find dialog
    fn send_find_command(&mut self);

    /// Pop up the favourites menu at the pointer
    fn popup_favourites(&mut self, menu: &FavouritesMenu);

    /// Show or hide one of the host's named menu items
    fn set_menu_item_visible(&mut self, item: &str, visible: bool);

    /// Append a line to the status tab
    fn status_add(&mut self, text: &str);

    /// Append an entry to the messages tab, scoped to a document
    fn msg_add(&mut self, severity: Severity, document: Option<&str>, text: &str);

    fn switch_message_tab(&mut self, tab: MessageTab);
}
