//! Plugin layer: lifecycle, key bindings, menus and action dispatch.
//!
//! A [`PluginState`] is created when the host loads the plugin, passed by
//! reference to every callback together with the [`Host`], and consumed by
//! [`PluginState::unload`].

mod document_events;
mod favourites_actions;
mod filter_actions;
pub mod headless;
pub mod host;

pub use host::{Host, MessageTab, Severity};

use crate::config::PluginConfig;
use crate::model::favourites::{self, Favourite, FavouritesMenu};
use crate::services::filter::FilterError;
use rust_i18n::t;
use std::path::{Path, PathBuf};

/// Menu item the host shows only for C and C++ documents
pub const INSERT_INCLUDE_ITEM: &str = "insert_include";

/// Host menu items hidden while the plugin is loaded
pub const UNCLUTTERED_MENU_ITEMS: [&str; 4] = [
    "menu_open_selected_file1",
    "menu_reload_as1",
    "menu_close_all1",
    "close_other_documents1",
];

/// User-triggerable plugin actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    JsonPretty,
    XmlPretty,
    Pipe,
    Favourites,
    Search,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::XmlPretty,
        Action::JsonPretty,
        Action::Pipe,
        Action::Favourites,
        Action::Search,
    ];

    /// Stable key binding name registered with the host
    pub fn keybinding_name(self) -> &'static str {
        match self {
            Action::JsonPretty => "ggu_json_pretty",
            Action::XmlPretty => "ggu_xml_pretty",
            Action::Pipe => "ggu_pipe",
            Action::Favourites => "ggu_favourites",
            Action::Search => "ggu_search_dialog",
        }
    }

    pub fn from_keybinding_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|action| action.keybinding_name() == name)
    }

    /// Translated label for menus and the key binding preferences
    pub fn label(self) -> String {
        match self {
            Action::JsonPretty => t!("action.json_pretty").to_string(),
            Action::XmlPretty => t!("action.xml_pretty").to_string(),
            Action::Pipe => t!("action.pipe").to_string(),
            Action::Favourites => t!("action.favourites").to_string(),
            Action::Search => t!("action.search").to_string(),
        }
    }
}

/// A key binding registered with the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBinding {
    pub action: Action,
    pub name: &'static str,
    pub label: String,
}

/// Result of dispatching one action
#[derive(Debug)]
pub enum ActionOutcome {
    /// The document was replaced with the filter output
    Applied,
    /// Non-editing action completed (menu popup, find dialog, ...)
    Handled,
    /// No document is open
    NoDocument,
    /// The user dismissed the prompt or entered nothing
    Cancelled,
    /// The filter failed; a message was added to the message window
    Failed(FilterError),
}

impl ActionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ActionOutcome::Applied | ActionOutcome::Handled)
    }
}

/// Everything the plugin owns between load and unload
#[derive(Debug)]
pub struct PluginState {
    config: PluginConfig,
    keybindings: Vec<KeyBinding>,
    tools_menu: Vec<Action>,
    favourites: Vec<Favourite>,
    favourites_menu: Option<FavouritesMenu>,
    /// Whether the active document has never been saved
    current_doc_is_new: bool,
    /// Directory for filter scratch files (system temp dir when `None`)
    scratch_dir: Option<PathBuf>,
}

impl PluginState {
    /// Set the plugin up: key bindings, tools menu, favourites and the
    /// configured message window tab. Also hides [`UNCLUTTERED_MENU_ITEMS`].
    pub fn load(config: PluginConfig, home_dir: Option<&Path>, host: &mut dyn Host) -> Self {
        if let Some(tab) = config.msgwin_tab.and_then(MessageTab::from_index) {
            host.switch_message_tab(tab);
        }
        for item in UNCLUTTERED_MENU_ITEMS {
            host.set_menu_item_visible(item, false);
        }

        let keybindings = Action::ALL
            .into_iter()
            .map(|action| KeyBinding {
                action,
                name: action.keybinding_name(),
                label: action.label(),
            })
            .collect();

        let favourites = favourites::parse(&config.favourites, home_dir);
        let favourites_menu = if config.favourites.is_empty() {
            None
        } else {
            Some(FavouritesMenu::build(&favourites, &config.scratch_prefix))
        };

        tracing::info!(
            "Plugin loaded: {} favourites, {} shown",
            favourites.len(),
            favourites_menu.as_ref().map_or(0, |m| m.items.len())
        );

        Self {
            config,
            keybindings,
            tools_menu: vec![Action::JsonPretty, Action::XmlPretty, Action::Pipe],
            favourites,
            favourites_menu,
            current_doc_is_new: false,
            scratch_dir: None,
        }
    }

    /// Tear the plugin down, releasing menus and bindings.
    pub fn unload(self) {
        tracing::info!(
            "Plugin unloaded: releasing {} key bindings, {} tools menu items{}",
            self.keybindings.len(),
            self.tools_menu.len(),
            if self.favourites_menu.is_some() {
                " and the favourites menu"
            } else {
                ""
            }
        );
    }

    /// Put filter scratch files in `dir` instead of the system temp dir.
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }

    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    pub fn keybindings(&self) -> &[KeyBinding] {
        &self.keybindings
    }

    /// Actions added to the host's tools menu, in order
    pub fn tools_menu(&self) -> &[Action] {
        &self.tools_menu
    }

    /// All configured favourites, including dangling ones
    pub fn favourites(&self) -> &[Favourite] {
        &self.favourites
    }

    /// The favourites menu; `None` when no favourites are configured
    pub fn favourites_menu(&self) -> Option<&FavouritesMenu> {
        self.favourites_menu.as_ref()
    }

    pub fn current_doc_is_new(&self) -> bool {
        self.current_doc_is_new
    }

    /// Run `action` against the host's current state.
    pub fn activate(&mut self, action: Action, host: &mut dyn Host) -> ActionOutcome {
        tracing::debug!("Activating {:?}", action);
        match action {
            Action::JsonPretty => self.exec_json_pretty(host),
            Action::XmlPretty => self.exec_xml_pretty(host),
            Action::Pipe => self.exec_pipe(host),
            Action::Favourites => {
                if let Some(menu) = &self.favourites_menu {
                    host.popup_favourites(menu);
                }
                ActionOutcome::Handled
            }
            Action::Search => {
                host.send_find_command();
                ActionOutcome::Handled
            }
        }
    }

    /// Dispatch by key binding name; `None` for names this plugin does not own.
    pub fn activate_keybinding(
        &mut self,
        name: &str,
        host: &mut dyn Host,
    ) -> Option<ActionOutcome> {
        let action = Action::from_keybinding_name(name)?;
        Some(self.activate(action, host))
    }
}
