use serde::{Deserialize, Serialize};
use tui_dispatch_debug::debug::{ron_string, DebugSection, DebugState};

use crate::api::DEFAULT_LIST_LIMIT;
use crate::artwork::Artwork;
use crate::favorites::FavoritesStore;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonSummary {
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonDetails {
    pub id: u32,
    pub name: String,
    pub types: Vec<String>,
    pub abilities: Vec<String>,
    pub stats: Vec<PokemonStat>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonStat {
    pub name: String,
    pub base_value: u32,
}

/// The full-screen page underneath any overlay.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Screen {
    #[default]
    Main,
    Info,
}

/// What the user currently sees: a page, or the favorites overlay on top of Main.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewState {
    Main,
    Info,
    FavoritesModal,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MainFocus {
    #[default]
    Dropdown,
    Entry,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum ArtworkState {
    #[default]
    Idle,
    Loading,
    Ready(Artwork),
    Unavailable(String),
}

impl ArtworkState {
    pub fn is_loading(&self) -> bool {
        matches!(self, ArtworkState::Loading)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeKind {
    Error,
    Info,
}

/// A modal message box. It overlays whatever is visible without changing the view.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            text: text.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingLookup {
    pub seq: u64,
    pub name: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoritesModal {
    pub open: bool,
    pub cursor: usize,
    /// Marked rows, as indices into `FavoritesStore::list()`.
    pub marked: Vec<usize>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppState {
    pub terminal_size: (u16, u16),
    pub list_limit: u32,
    pub screen: Screen,
    pub focus: MainFocus,

    pub names: Vec<PokemonSummary>,
    pub names_loading: bool,
    pub dropdown_cursor: usize,
    pub dropdown_value: String,
    pub entry: String,

    pub lookup_seq: u64,
    pub lookup: Option<PendingLookup>,
    pub details: Option<PokemonDetails>,
    pub artwork: ArtworkState,

    pub favorites: FavoritesStore,
    pub favorites_modal: FavoritesModal,

    pub notice: Option<Notice>,
    pub tick: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DEFAULT_LIST_LIMIT)
    }
}

impl AppState {
    pub fn new(list_limit: u32) -> Self {
        Self {
            terminal_size: (80, 24),
            list_limit,
            screen: Screen::Main,
            focus: MainFocus::Dropdown,
            names: Vec::new(),
            names_loading: false,
            dropdown_cursor: 0,
            dropdown_value: String::new(),
            entry: String::new(),
            lookup_seq: 0,
            lookup: None,
            details: None,
            artwork: ArtworkState::Idle,
            favorites: FavoritesStore::default(),
            favorites_modal: FavoritesModal::default(),
            notice: None,
            tick: 0,
        }
    }

    pub fn view_state(&self) -> ViewState {
        if self.favorites_modal.open {
            return ViewState::FavoritesModal;
        }
        match self.screen {
            Screen::Main => ViewState::Main,
            Screen::Info => ViewState::Info,
        }
    }

    /// Dropdown selection wins over the free-text entry when both are filled.
    pub fn effective_query(&self) -> Option<String> {
        let dropdown = self.dropdown_value.trim();
        if !dropdown.is_empty() {
            return Some(dropdown.to_string());
        }
        let entry = self.entry.trim();
        if !entry.is_empty() {
            return Some(entry.to_string());
        }
        None
    }

    pub fn cursor_name(&self) -> Option<&str> {
        self.names
            .get(self.dropdown_cursor)
            .map(|summary| summary.name.as_str())
    }

    pub fn is_busy(&self) -> bool {
        self.names_loading || self.lookup.is_some() || self.artwork.is_loading()
    }
}

impl DebugState for AppState {
    fn debug_sections(&self) -> Vec<DebugSection> {
        vec![
            DebugSection::new("View")
                .entry("view", ron_string(&self.view_state()))
                .entry("focus", ron_string(&self.focus))
                .entry("notice", ron_string(&self.notice)),
            DebugSection::new("Search")
                .entry("names", ron_string(&self.names.len()))
                .entry("cursor", ron_string(&self.dropdown_cursor))
                .entry("dropdown", ron_string(&self.dropdown_value))
                .entry("entry", ron_string(&self.entry)),
            DebugSection::new("Lookup")
                .entry("seq", ron_string(&self.lookup_seq))
                .entry("pending", ron_string(&self.lookup))
                .entry(
                    "details",
                    ron_string(&self.details.as_ref().map(|details| details.name.clone())),
                )
                .entry("artwork_loading", ron_string(&self.artwork.is_loading())),
            DebugSection::new("Favorites")
                .entry("names", ron_string(&self.favorites.list()))
                .entry("marked", ron_string(&self.favorites_modal.marked)),
        ]
    }
}
