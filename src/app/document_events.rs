//! Host document signals: new, open, activate and save.

use super::{Host, PluginState, INSERT_INCLUDE_ITEM};
use crate::model::filetype::FileType;

impl PluginState {
    pub fn on_document_new(&mut self, host: &mut dyn Host) {
        self.current_doc_is_new = true;
        update_include_item(host);
    }

    pub fn on_document_open(&mut self, host: &mut dyn Host) {
        if let Some(doc) = host.current_document() {
            tracing::debug!("Opened {} as {:?}", doc.display_name(), doc.filetype());
        }
    }

    /// Track whether the newly focused document has been saved before and
    /// refresh menu items that depend on its file type.
    pub fn on_document_activate(&mut self, host: &mut dyn Host) {
        self.current_doc_is_new = host
            .current_document()
            .is_some_and(|doc| doc.path().is_none());
        update_include_item(host);
    }

    /// A document saved for the first time keeps the file type it was
    /// created with. Markdown is replaced by the type its new name implies.
    pub fn on_document_save(&mut self, host: &mut dyn Host) {
        let was_new = std::mem::replace(&mut self.current_doc_is_new, false);
        if !was_new {
            return;
        }
        let Some(doc) = host.current_document() else {
            return;
        };
        let Some(path) = doc.path() else {
            return;
        };
        let detected = FileType::detect_from_path(path);
        if doc.filetype().is_markdown() && doc.filetype() != detected {
            doc.set_filetype(detected);
        }
        update_include_item(host);
    }
}

/// Show the include item for C-family documents. Without a document, or
/// for a file type with no extension, the visibility is left as it was.
fn update_include_item(host: &mut dyn Host) {
    let Some(filetype) = host.current_document().map(|doc| doc.filetype()) else {
        return;
    };
    if filetype.extension().is_none() {
        return;
    }
    host.set_menu_item_visible(INSERT_INCLUDE_ITEM, filetype.is_c_family());
}
