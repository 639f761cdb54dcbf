// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use super::fragment::Fragment;
use super::{BlockView, KeyCode, KeyUpHandler, ViewError};

#[derive(Default)]
struct DetachedElement {
    classes: Vec<String>,
    dataset: BTreeMap<String, String>,
    editable: bool,
    content: Fragment,
    key_up: Option<Rc<dyn Fn(&DetachedView, KeyCode)>>,
}

/// An element that lives only in memory.
///
/// Content assigned through [`BlockView::set_inner_html`] is parsed and
/// re-serialised the way a browser element would do it, so reading it back
/// gives the normalised markup, not the raw string.
#[derive(Clone, Default)]
pub struct DetachedView {
    element: Rc<RefCell<DetachedElement>>,
}

impl DetachedView {
    pub fn classes(&self) -> Vec<String> {
        self.element.borrow().classes.clone()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.element.borrow().classes.iter().any(|c| c == class)
    }

    pub fn has_key_up_handler(&self) -> bool {
        self.element.borrow().key_up.is_some()
    }

    /// Deliver a key-released event, as the browser would after the user
    /// lets go of `code`. Does nothing when no handler is bound.
    pub fn dispatch_key_up(&self, code: &str) {
        // Release the borrow before calling out; the handler reads and
        // writes this same element.
        let handler = self.element.borrow().key_up.clone();
        if let Some(handler) = handler {
            handler(self, KeyCode::from_code(code));
        }
    }

    /// Whether two handles refer to the same element.
    pub fn same_element(&self, other: &DetachedView) -> bool {
        Rc::ptr_eq(&self.element, &other.element)
    }
}

impl BlockView for DetachedView {
    fn create() -> Result<Self, ViewError> {
        Ok(Self::default())
    }

    fn add_class(&self, class: &str) -> Result<(), ViewError> {
        let mut element = self.element.borrow_mut();
        // `classList.add` semantics: whitespace-separated, no duplicates.
        for class in class.split_ascii_whitespace() {
            if !element.classes.iter().any(|c| c == class) {
                element.classes.push(class.to_owned());
            }
        }
        Ok(())
    }

    fn set_editable(&self, editable: bool) {
        self.element.borrow_mut().editable = editable;
    }

    fn is_editable(&self) -> bool {
        self.element.borrow().editable
    }

    fn set_placeholder(&self, placeholder: &str) -> Result<(), ViewError> {
        self.element
            .borrow_mut()
            .dataset
            .insert("placeholder".to_owned(), placeholder.to_owned());
        Ok(())
    }

    fn placeholder(&self) -> Option<String> {
        self.element.borrow().dataset.get("placeholder").cloned()
    }

    fn inner_html(&self) -> String {
        self.element.borrow().content.to_html()
    }

    fn set_inner_html(&self, html: &str) {
        self.element.borrow_mut().content = Fragment::parse(html);
    }

    fn text_content(&self) -> String {
        self.element.borrow().content.text_content()
    }

    fn on_key_up(
        &self,
        handler: KeyUpHandler<Self>,
    ) -> Result<(), ViewError> {
        self.element.borrow_mut().key_up = Some(Rc::from(handler));
        Ok(())
    }
}

impl std::fmt::Debug for DetachedView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let element = self.element.borrow();
        f.debug_struct("DetachedView")
            .field("classes", &element.classes)
            .field("dataset", &element.dataset)
            .field("editable", &element.editable)
            .field("inner_html", &element.content.to_html())
            .field("key_up", &element.key_up.is_some())
            .finish()
    }
}

#[cfg(test)]
mod test {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn clones_share_one_element() {
        let view = DetachedView::create().unwrap();
        let other = view.clone();
        other.set_inner_html("shared");
        assert_eq!(view.inner_html(), "shared");
        assert!(view.same_element(&other));
        assert!(!view.same_element(&DetachedView::default()));
    }

    #[test]
    fn classes_are_deduplicated() {
        let view = DetachedView::create().unwrap();
        view.add_class("ce-paragraph").unwrap();
        view.add_class("cdx-block ce-paragraph").unwrap();
        assert_eq!(view.classes(), vec!["ce-paragraph", "cdx-block"]);
    }

    #[test]
    fn key_up_without_handler_is_ignored() {
        let view = DetachedView::create().unwrap();
        view.set_inner_html("<br>");
        view.dispatch_key_up("Backspace");
        assert_eq!(view.inner_html(), "<br>");
    }

    #[test]
    fn handler_can_touch_the_element_it_is_bound_to() {
        let view = DetachedView::create().unwrap();
        let seen = Rc::new(Cell::new(0));
        let inner_seen = Rc::clone(&seen);
        view.on_key_up(Box::new(move |target, key| {
            if key.is_deletion() {
                target.set_inner_html("");
            }
            inner_seen.set(inner_seen.get() + 1);
        }))
        .unwrap();

        view.set_inner_html("text");
        view.dispatch_key_up("KeyX");
        assert_eq!(view.inner_html(), "text");
        view.dispatch_key_up("Delete");
        assert_eq!(view.inner_html(), "");
        assert_eq!(seen.get(), 2);
    }

    #[test]
    fn binding_a_handler_does_not_keep_the_element_alive() {
        let view = DetachedView::create().unwrap();
        view.on_key_up(Box::new(|_, _| {})).unwrap();
        assert_eq!(Rc::strong_count(&view.element), 1);
    }

    #[test]
    fn placeholder_is_kept_in_the_dataset() {
        let view = DetachedView::create().unwrap();
        assert_eq!(view.placeholder(), None);
        view.set_placeholder("Text").unwrap();
        assert_eq!(view.placeholder().as_deref(), Some("Text"));
    }
}
