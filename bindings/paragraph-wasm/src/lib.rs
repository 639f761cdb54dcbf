// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! The paragraph block as an Editor.js tool class.
//!
//! The host constructs it with
//! `new Paragraph({ data, config, api, readOnly })` and reads the static
//! getters (`toolbox`, `pasteConfig`, ...) off the class.

use std::rc::Rc;
use std::str::FromStr;

use js_sys::{Array, Function, Object, Reflect};
use paragraph_block::{
    capabilities, AnimationFrameScheduler, BlockConfig, BlockData,
    BlockParams, ElementView, HostApi, HydrationMode, PasteEvent, StaticHost,
    TextBlock,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement};

/// Reads `target[key]`, treating `undefined`, `null` and non-objects as
/// missing.
fn get(target: &JsValue, key: &str) -> Option<JsValue> {
    if !target.is_object() {
        return None;
    }
    Reflect::get(target, &JsValue::from_str(key))
        .ok()
        .filter(|value| !value.is_undefined() && !value.is_null())
}

fn get_string(target: &JsValue, key: &str) -> Option<String> {
    get(target, key).and_then(|value| value.as_string())
}

fn object(entries: &[(&str, JsValue)]) -> Result<JsValue, JsValue> {
    let object = Object::new();
    for (key, value) in entries {
        Reflect::set(&object, &JsValue::from_str(key), value)?;
    }
    Ok(object.into())
}

fn to_js_error(error: impl std::fmt::Display) -> JsValue {
    js_sys::Error::new(&error.to_string()).into()
}

/// `{ text }` to [`BlockData`]. Anything that is not an object counts as no
/// data at all; an object without a string `text` is the empty paragraph.
fn block_data_from_js(value: &JsValue) -> Option<BlockData> {
    value
        .is_object()
        .then(|| BlockData::new(get_string(value, "text").unwrap_or_default()))
}

fn block_data_to_js(data: &BlockData) -> Result<JsValue, JsValue> {
    object(&[("text", JsValue::from_str(&data.text))])
}

fn config_from_js(value: &JsValue) -> BlockConfig {
    let mut config = BlockConfig::default();
    if let Some(placeholder) = get_string(value, "placeholder") {
        config = config.with_placeholder(placeholder);
    }
    if let Some(preserve_blank) =
        get(value, "preserveBlank").and_then(|v| v.as_bool())
    {
        config = config.with_preserve_blank(preserve_blank);
    }
    if let Some(hydration) = get_string(value, "hydration") {
        match HydrationMode::from_str(&hydration) {
            Ok(mode) => config = config.with_hydration(mode),
            Err(_) => {
                tracing::warn!(%hydration, "unknown hydration mode, ignoring")
            }
        }
    }
    config
}

fn paste_event_from_js(event: &JsValue) -> Option<PasteEvent> {
    let detail = get(event, "detail")?;
    match get_string(event, "type")?.as_str() {
        "tag" => {
            let element = get(&detail, "data")?.dyn_into::<Element>().ok()?;
            Some(PasteEvent::Tag {
                tag: element.tag_name(),
                inner_html: element.inner_html(),
            })
        }
        "file" => Some(PasteEvent::File {
            mime_type: get(&detail, "file")
                .and_then(|file| get_string(&file, "type"))
                .unwrap_or_default(),
        }),
        "pattern" => Some(PasteEvent::Pattern {
            key: get_string(&detail, "key").unwrap_or_default(),
            data: get_string(&detail, "data").unwrap_or_default(),
        }),
        other => {
            tracing::debug!(kind = other, "unknown paste event type");
            None
        }
    }
}

/// The `api` object Editor.js hands to every tool.
struct JsHostApi {
    api: JsValue,
}

impl HostApi for JsHostApi {
    fn block_class(&self) -> String {
        get(&self.api, "styles")
            .and_then(|styles| get_string(&styles, "block"))
            .unwrap_or_else(|| StaticHost::default().block_class())
    }

    fn translate(&self, key: &str) -> String {
        let Some(i18n) = get(&self.api, "i18n") else {
            return key.to_owned();
        };
        let Some(t) =
            get(&i18n, "t").and_then(|t| t.dyn_into::<Function>().ok())
        else {
            return key.to_owned();
        };
        match t.call1(&i18n, &JsValue::from_str(key)) {
            Ok(translated) => {
                translated.as_string().unwrap_or_else(|| key.to_owned())
            }
            Err(error) => {
                tracing::warn!(?error, key, "api.i18n.t failed");
                key.to_owned()
            }
        }
    }
}

#[wasm_bindgen]
pub struct Paragraph {
    inner: TextBlock<ElementView>,
}

#[wasm_bindgen]
impl Paragraph {
    #[wasm_bindgen(constructor)]
    pub fn new(params: JsValue) -> Self {
        console_error_panic_hook::set_once();

        let data = get(&params, "data").and_then(|d| block_data_from_js(&d));
        let config = get(&params, "config")
            .map(|c| config_from_js(&c))
            .unwrap_or_default();
        let api = get(&params, "api").unwrap_or(JsValue::UNDEFINED);
        let read_only = get(&params, "readOnly")
            .and_then(|v| v.as_bool())
            .unwrap_or(false);

        Self {
            inner: TextBlock::new(BlockParams {
                data,
                config,
                api: Rc::new(JsHostApi { api }),
                read_only,
                scheduler: Rc::new(AnimationFrameScheduler),
            }),
        }
    }

    pub fn render(&mut self) -> Result<HtmlElement, JsValue> {
        self.inner
            .render()
            .map(|view| view.element().clone())
            .map_err(to_js_error)
    }

    pub fn save(&self, element: HtmlElement) -> Result<JsValue, JsValue> {
        block_data_to_js(&self.inner.save(&ElementView::from_element(element)))
    }

    pub fn merge(&mut self, data: JsValue) {
        self.inner
            .merge(BlockData::from_optional(block_data_from_js(&data)));
    }

    pub fn validate(&self, saved: JsValue) -> bool {
        self.inner.validate(&BlockData::from_optional(block_data_from_js(
            &saved,
        )))
    }

    #[wasm_bindgen(js_name = onPaste)]
    pub fn on_paste(&mut self, event: JsValue) {
        if let Some(event) = paste_event_from_js(&event) {
            self.inner.on_paste(&event);
        }
    }

    #[wasm_bindgen(getter)]
    pub fn data(&mut self) -> Result<JsValue, JsValue> {
        block_data_to_js(self.inner.data())
    }

    #[wasm_bindgen(setter)]
    pub fn set_data(&mut self, data: JsValue) {
        self.inner.set_data(block_data_from_js(&data));
    }

    #[wasm_bindgen(getter = DEFAULT_PLACEHOLDER)]
    pub fn default_placeholder() -> String {
        capabilities().default_placeholder.to_owned()
    }

    #[wasm_bindgen(getter = conversionConfig)]
    pub fn conversion_config() -> Result<JsValue, JsValue> {
        let conversion = &capabilities().conversion_config;
        object(&[
            ("export", JsValue::from_str(conversion.export)),
            ("import", JsValue::from_str(conversion.import)),
        ])
    }

    /// `{ text: { br: true } }`: per field, the tags the sanitiser keeps.
    #[wasm_bindgen(getter = sanitize)]
    pub fn sanitize() -> Result<JsValue, JsValue> {
        let sanitize = Object::new();
        for (field, tags) in capabilities().sanitize.fields() {
            let entries: Vec<(&str, JsValue)> = tags
                .iter()
                .map(|tag| (*tag, JsValue::TRUE))
                .collect();
            Reflect::set(
                &sanitize,
                &JsValue::from_str(field),
                &object(&entries)?,
            )?;
        }
        Ok(sanitize.into())
    }

    #[wasm_bindgen(getter = isReadOnlySupported)]
    pub fn is_read_only_supported() -> bool {
        capabilities().is_read_only_supported
    }

    #[wasm_bindgen(getter = pasteConfig)]
    pub fn paste_config() -> Result<JsValue, JsValue> {
        let tags: Array = capabilities()
            .paste_config
            .tags
            .iter()
            .map(|tag| JsValue::from_str(tag))
            .collect();
        object(&[("tags", tags.into())])
    }

    #[wasm_bindgen(getter = toolbox)]
    pub fn toolbox() -> Result<JsValue, JsValue> {
        let toolbox = &capabilities().toolbox;
        object(&[
            ("icon", JsValue::from_str(toolbox.icon)),
            ("title", JsValue::from_str(toolbox.title)),
        ])
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use wasm_bindgen_test::*;

    use super::*;

    wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

    fn params(text: Option<&str>, read_only: bool) -> JsValue {
        let data = match text {
            Some(text) => {
                object(&[("text", JsValue::from_str(text))]).unwrap()
            }
            None => JsValue::UNDEFINED,
        };
        object(&[("data", data), ("readOnly", JsValue::from_bool(read_only))])
            .unwrap()
    }

    #[wasm_bindgen_test]
    fn render_and_save_roundtrip_through_js_objects() {
        let mut paragraph =
            Paragraph::new(params(Some("Hello <b>x</b>"), false));
        let element = paragraph.render().unwrap();
        assert_eq!(element.inner_html(), "Hello <b>x</b>");
        assert_eq!(element.content_editable(), "true");
        assert!(element.class_list().contains("ce-paragraph"));
        assert!(element.class_list().contains("cdx-block"));

        let saved = paragraph.save(element).unwrap();
        assert_eq!(
            get_string(&saved, "text").as_deref(),
            Some("Hello <b>x</b>")
        );
    }

    #[wasm_bindgen_test]
    fn read_only_paragraphs_are_not_editable() {
        let mut paragraph = Paragraph::new(params(None, true));
        let element = paragraph.render().unwrap();
        assert_eq!(element.content_editable(), "false");
        assert_eq!(
            element.get_attribute("data-placeholder").as_deref(),
            Some("Text")
        );
    }

    #[wasm_bindgen_test]
    fn validate_rejects_blank_text() {
        let paragraph = Paragraph::new(params(None, false));
        let blank = object(&[("text", JsValue::from_str("  "))]).unwrap();
        let filled = object(&[("text", JsValue::from_str("a"))]).unwrap();
        assert!(!paragraph.validate(blank));
        assert!(paragraph.validate(filled));
    }

    #[wasm_bindgen_test]
    fn js_api_provides_class_and_translations() {
        let api = js_sys::eval(
            "({ styles: { block: 'host-block' }, \
               i18n: { t: (key) => key === 'Text' ? 'Texte' : key } })",
        )
        .unwrap();
        let host = JsHostApi { api };
        assert_eq!(host.block_class(), "host-block");
        assert_eq!(host.translate("Text"), "Texte");
        assert_eq!(host.translate("Other"), "Other");
    }

    #[wasm_bindgen_test]
    fn missing_api_falls_back_to_defaults() {
        let host = JsHostApi {
            api: JsValue::UNDEFINED,
        };
        assert_eq!(host.block_class(), "cdx-block");
        assert_eq!(host.translate("Text"), "Text");
    }

    #[wasm_bindgen_test]
    fn static_descriptors_have_the_expected_shape() {
        assert_eq!(Paragraph::default_placeholder(), "Text");
        assert!(Paragraph::is_read_only_supported());

        let sanitize = Paragraph::sanitize().unwrap();
        let text = get(&sanitize, "text").unwrap();
        assert_eq!(get(&text, "br").and_then(|v| v.as_bool()), Some(true));

        let paste = Paragraph::paste_config().unwrap();
        let tags: Array = get(&paste, "tags").unwrap().unchecked_into();
        assert_eq!(tags.get(0).as_string().as_deref(), Some("P"));
    }
}
