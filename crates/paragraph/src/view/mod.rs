// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! The live, editable element a block renders into.
//!
//! [`BlockView`] is a handle in the DOM sense: cloning it does not copy the
//! element, every clone talks to the same node. The block keeps one handle
//! and gives another to the host, and both observe the user's edits.

use strum_macros::EnumString;

cfg_if::cfg_if! {
    if #[cfg(feature = "sys")] {
        mod detached;
        mod fragment;
        mod fragment_creator;

        pub use detached::DetachedView;
        pub use fragment::Fragment;
    }
}

#[cfg(feature = "js")]
mod element;
#[cfg(feature = "js")]
pub use element::ElementView;

/// Called with the element the event was delivered to, so handlers never
/// need to hold a handle of their own.
pub type KeyUpHandler<V> = Box<dyn Fn(&V, KeyCode)>;

#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    #[error("No global `window` exists")]
    NoWindow,
    #[error("The `window` does not have a `document`")]
    NoDocument,
    #[error("Failed to create the `{0}` element")]
    CreateElement(String),
    #[error("JavaScript error: {0}")]
    Js(String),
}

/// Physical key identifier, as found in `KeyboardEvent.code`.
#[derive(Clone, Debug, PartialEq, Eq, EnumString)]
pub enum KeyCode {
    Backspace,
    Delete,
    #[strum(default)]
    Other(String),
}

impl KeyCode {
    pub fn from_code(code: &str) -> Self {
        // `Other` is the catch-all, so parsing never fails.
        code.parse()
            .unwrap_or_else(|_| KeyCode::Other(code.to_owned()))
    }

    pub fn is_deletion(&self) -> bool {
        matches!(self, KeyCode::Backspace | KeyCode::Delete)
    }
}

pub trait BlockView: Clone + 'static {
    /// Create a fresh, detached root element for a block.
    fn create() -> Result<Self, ViewError>;

    fn add_class(&self, class: &str) -> Result<(), ViewError>;

    fn set_editable(&self, editable: bool);

    fn is_editable(&self) -> bool;

    /// Stored as `data-placeholder`; styling shows it while the view is empty.
    fn set_placeholder(&self, placeholder: &str) -> Result<(), ViewError>;

    fn placeholder(&self) -> Option<String>;

    fn inner_html(&self) -> String;

    fn set_inner_html(&self, html: &str);

    fn text_content(&self) -> String;

    /// Bind a key-released handler, replacing any previous one. The binding
    /// lives exactly as long as the element handles do.
    fn on_key_up(&self, handler: KeyUpHandler<Self>) -> Result<(), ViewError>;
}

/// Some browsers leave a stray `<br>` behind in a contenteditable element
/// once the user deletes everything in it, which makes the block look
/// non-empty to the placeholder styling. After a deletion key, collapse a
/// view with no text back to truly empty.
///
/// Returns whether the view was cleared.
pub fn clear_if_blank<V: BlockView>(view: &V, key: &KeyCode) -> bool {
    if !key.is_deletion() {
        return false;
    }
    if view.text_content().is_empty() && !view.inner_html().is_empty() {
        tracing::debug!(?key, "clearing leftover markup from emptied view");
        view.set_inner_html("");
        return true;
    }
    false
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn key_codes_parse_from_dom_strings() {
        assert_eq!(KeyCode::from_code("Backspace"), KeyCode::Backspace);
        assert_eq!(KeyCode::from_code("Delete"), KeyCode::Delete);
        assert_eq!(
            KeyCode::from_code("KeyA"),
            KeyCode::Other("KeyA".to_owned())
        );
    }

    #[test]
    fn only_backspace_and_delete_are_deletions() {
        assert!(KeyCode::Backspace.is_deletion());
        assert!(KeyCode::Delete.is_deletion());
        assert!(!KeyCode::from_code("Enter").is_deletion());
    }

    #[cfg(feature = "sys")]
    #[test]
    fn stray_line_break_is_cleared_after_backspace() {
        let view = DetachedView::create().unwrap();
        view.set_inner_html("<br>");
        assert!(clear_if_blank(&view, &KeyCode::Backspace));
        assert_eq!(view.inner_html(), "");
    }

    #[cfg(feature = "sys")]
    #[test]
    fn other_keys_leave_the_view_alone() {
        let view = DetachedView::create().unwrap();
        view.set_inner_html("<br>");
        assert!(!clear_if_blank(&view, &KeyCode::from_code("KeyA")));
        assert_eq!(view.inner_html(), "<br>");
    }

    #[cfg(feature = "sys")]
    #[test]
    fn views_with_text_are_not_cleared() {
        let view = DetachedView::create().unwrap();
        view.set_inner_html("a<br>");
        assert!(!clear_if_blank(&view, &KeyCode::Delete));
        assert_eq!(view.inner_html(), "a<br>");
    }
}
