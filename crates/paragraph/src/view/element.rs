// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{HtmlElement, KeyboardEvent};

use super::{BlockView, KeyCode, KeyUpHandler, ViewError};

const KEY_UP: &str = "keyup";

/// Removes its listener from the element when dropped, so a listener never
/// outlives the last Rust handle to the view.
struct KeyUpListener {
    element: HtmlElement,
    closure: Closure<dyn Fn(KeyboardEvent)>,
}

impl Drop for KeyUpListener {
    fn drop(&mut self) {
        let _ = self.element.remove_event_listener_with_callback(
            KEY_UP,
            self.closure.as_ref().unchecked_ref(),
        );
    }
}

/// A browser element, rendered into the page by the host.
#[derive(Clone)]
pub struct ElementView {
    element: HtmlElement,
    listener: Rc<RefCell<Option<KeyUpListener>>>,
}

impl ElementView {
    /// Wrap an element the host hands back, e.g. in `save`. The wrapper
    /// does not own any listener.
    pub fn from_element(element: HtmlElement) -> Self {
        Self {
            element,
            listener: Rc::default(),
        }
    }

    pub fn element(&self) -> &HtmlElement {
        &self.element
    }
}

fn to_view_error(error: wasm_bindgen::JsValue) -> ViewError {
    ViewError::Js(
        error
            .as_string()
            .unwrap_or_else(|| format!("{error:?}")),
    )
}

impl BlockView for ElementView {
    fn create() -> Result<Self, ViewError> {
        let window = web_sys::window().ok_or(ViewError::NoWindow)?;
        let document = window.document().ok_or(ViewError::NoDocument)?;
        let element = document
            .create_element("div")
            .map_err(|_| ViewError::CreateElement("div".to_owned()))?
            .dyn_into::<HtmlElement>()
            .map_err(|_| ViewError::CreateElement("div".to_owned()))?;
        Ok(Self::from_element(element))
    }

    fn add_class(&self, class: &str) -> Result<(), ViewError> {
        let class_list = self.element.class_list();
        for class in class.split_ascii_whitespace() {
            class_list.add_1(class).map_err(to_view_error)?;
        }
        Ok(())
    }

    fn set_editable(&self, editable: bool) {
        self.element
            .set_content_editable(if editable { "true" } else { "false" });
    }

    fn is_editable(&self) -> bool {
        self.element.content_editable() == "true"
    }

    fn set_placeholder(&self, placeholder: &str) -> Result<(), ViewError> {
        self.element
            .dataset()
            .set("placeholder", placeholder)
            .map_err(to_view_error)
    }

    fn placeholder(&self) -> Option<String> {
        self.element.dataset().get("placeholder")
    }

    fn inner_html(&self) -> String {
        self.element.inner_html()
    }

    fn set_inner_html(&self, html: &str) {
        self.element.set_inner_html(html);
    }

    fn text_content(&self) -> String {
        self.element.text_content().unwrap_or_default()
    }

    fn on_key_up(
        &self,
        handler: KeyUpHandler<Self>,
    ) -> Result<(), ViewError> {
        // Dropping the previous listener unbinds it.
        self.listener.borrow_mut().take();

        let target = self.element.clone();
        let closure = Closure::<dyn Fn(KeyboardEvent)>::new(
            move |event: KeyboardEvent| {
                let view = ElementView::from_element(target.clone());
                handler(&view, KeyCode::from_code(&event.code()));
            },
        );
        self.element
            .add_event_listener_with_callback(
                KEY_UP,
                closure.as_ref().unchecked_ref(),
            )
            .map_err(to_view_error)?;

        *self.listener.borrow_mut() = Some(KeyUpListener {
            element: self.element.clone(),
            closure,
        });
        Ok(())
    }
}

impl std::fmt::Debug for ElementView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElementView")
            .field("inner_html", &self.element.inner_html())
            .field("key_up", &self.listener.borrow().is_some())
            .finish()
    }
}
