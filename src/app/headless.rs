//! A [`Host`] without a user interface.
//!
//! Holds at most one document, answers prompts from a preset value and
//! records everything the plugin asks of it. Used by the `ggu` binary and
//! by tests.

use super::host::{Host, MessageTab, Severity};
use crate::model::document::Document;
use crate::model::favourites::FavouritesMenu;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// One entry added to the message window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub severity: Severity,
    pub document: Option<String>,
    pub text: String,
}

#[derive(Debug, Default)]
pub struct HeadlessHost {
    pub document: Option<Document>,
    /// Answer returned by every prompt; `None` cancels
    pub prompt_answer: Option<String>,
    /// Titles of the prompts shown so far
    pub prompts: Vec<String>,
    pub opened: Vec<PathBuf>,
    pub find_requests: usize,
    pub favourites_popups: usize,
    pub last_favourites_menu: Option<FavouritesMenu>,
    pub menu_visibility: HashMap<String, bool>,
    pub status: Vec<String>,
    pub messages: Vec<Message>,
    pub message_tab: Option<MessageTab>,
}

impl HeadlessHost {
    pub fn with_document(document: Document) -> Self {
        Self {
            document: Some(document),
            ..Default::default()
        }
    }

    /// Answer the next prompts with `answer`.
    pub fn answering(mut self, answer: impl Into<String>) -> Self {
        self.prompt_answer = Some(answer.into());
        self
    }

    /// Error entries, in the order they were added
    pub fn errors(&self) -> impl Iterator<Item = &Message> {
        self.messages
            .iter()
            .filter(|m| m.severity == Severity::Error)
    }
}

impl Host for HeadlessHost {
    fn current_document(&mut self) -> Option<&mut Document> {
        self.document.as_mut()
    }

    fn prompt_text(&mut self, title: &str, _label: &str, _default: &str) -> Option<String> {
        self.prompts.push(title.to_string());
        self.prompt_answer.clone()
    }

    fn open_file(&mut self, path: &Path) -> std::io::Result<()> {
        let document = Document::open(path)?;
        self.opened.push(path.to_path_buf());
        self.document = Some(document);
        Ok(())
    }

    fn send_find_command(&mut self) {
        self.find_requests += 1;
    }

    fn popup_favourites(&mut self, menu: &FavouritesMenu) {
        self.favourites_popups += 1;
        self.last_favourites_menu = Some(menu.clone());
    }

    fn set_menu_item_visible(&mut self, item: &str, visible: bool) {
        self.menu_visibility.insert(item.to_string(), visible);
    }

    fn status_add(&mut self, text: &str) {
        tracing::debug!("status: {}", text);
        self.status.push(text.to_string());
    }

    fn msg_add(&mut self, severity: Severity, document: Option<&str>, text: &str) {
        self.messages.push(Message {
            severity,
            document: document.map(str::to_string),
            text: text.to_string(),
        });
    }

    fn switch_message_tab(&mut self, tab: MessageTab) {
        self.message_tab = Some(tab);
    }
}
