// UI collaborator seams
//
// The reader's on-screen surface is a black box to the harness. Everything
// the original suite reached through a device-automation framework is
// expressed here as two traits: a driver for interactions and a resource
// table for localized strings.

pub mod map;

use serde::{Deserialize, Serialize};

use crate::error::{BookrigError, Result};

/// On-screen elements the harness asserts against, by identifier.
/// These are contracts with the reader, not harness-owned views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementId {
    CoverImageView,
    AddBookButton,
    AddDeviceBookButton,
    PlayPause,
    TableOfContents,
    BookmarkButton,
    Settings,
    Search,
}

impl ElementId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementId::CoverImageView => "coverImageView",
            ElementId::AddBookButton => "addBookButton",
            ElementId::AddDeviceBookButton => "addDeviceBookButton",
            ElementId::PlayPause => "playPause",
            ElementId::TableOfContents => "tableOfContents",
            ElementId::BookmarkButton => "bookmark",
            ElementId::Settings => "settings",
            ElementId::Search => "search",
        }
    }
}

/// Symbolic keys for localized display strings supplied by the reader
/// package: button labels and the folder names the file picker shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StringKey {
    AddBookTag,
    AddDeviceBookTag,
    InternalStorage,
    Folder1,
    Folder2,
    Folder3,
    Folder4,
}

impl StringKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            StringKey::AddBookTag => "tagButtonAddBook",
            StringKey::AddDeviceBookTag => "tagButtonAddDeviceBook",
            StringKey::InternalStorage => "internalStorage",
            StringKey::Folder1 => "folder1",
            StringKey::Folder2 => "folder2",
            StringKey::Folder3 => "folder3",
            StringKey::Folder4 => "folder4",
        }
    }
}

/// Driver for device-level UI interaction. Implementations click real
/// screens; tests script one in memory.
pub trait UiDriver {
    /// Click the view showing the given text. Errors if no such view.
    fn click_text(&mut self, text: &str) -> Result<()>;

    /// Scroll the active scrollable until the text is visible, then click it.
    fn scroll_to_text(&mut self, text: &str) -> Result<()>;

    /// Whether an element with the given identifier is currently displayed.
    fn element_present(&self, element: ElementId) -> bool;

    /// Whether a system prompt with the given label is on screen.
    fn prompt_present(&self, text: &str) -> bool;

    /// Accept the system prompt with the given label.
    fn accept_prompt(&mut self, text: &str) -> Result<()>;
}

/// Localized string lookup, supplied by the reader package.
pub trait StringResources {
    fn string(&self, key: StringKey) -> Option<String>;

    /// Resolve a key, failing the harness when the reader package does not
    /// carry it. A missing label would otherwise click the wrong element.
    fn require(&self, key: StringKey) -> Result<String> {
        self.string(key)
            .ok_or_else(|| BookrigError::MissingString(key.as_str().to_string()))
    }
}
