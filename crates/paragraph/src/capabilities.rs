// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Static descriptors the editor host queries before it ever constructs a
//! block: what to show in the toolbox, which pasted tags to route here, which
//! tags survive sanitising, and how to convert to and from other block types.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;

pub const DEFAULT_PLACEHOLDER: &str = "Text";

/// Class carried by every paragraph root element, next to the host's own
/// block class.
pub const WRAPPER_CLASS: &str = "ce-paragraph";

const TOOLBOX_ICON: &str = r#"<svg width="24" height="24" viewBox="0 0 24 24" fill="none" xmlns="http://www.w3.org/2000/svg"><path d="M8 9V7.2C8 7.08954 8.08954 7 8.2 7L12 7M16 9V7.2C16 7.08954 15.9105 7 15.8 7L12 7M12 7L12 17M12 17H10M12 17H14" stroke="black" stroke-width="2" stroke-linecap="round"/></svg>"#;

/// Which field of the saved data carries the content when converting this
/// block into another type (`export`) or another type into this one
/// (`import`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConversionConfig {
    pub export: &'static str,
    pub import: &'static str,
}

/// Allowed tags per data field. Tags not listed are expected to be stripped
/// by the host's sanitiser; this crate only declares the policy.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SanitizePolicy {
    fields: BTreeMap<&'static str, Vec<&'static str>>,
}

impl SanitizePolicy {
    fn allow(mut self, field: &'static str, tag: &'static str) -> Self {
        self.fields.entry(field).or_default().push(tag);
        self
    }

    /// Tag names are compared case-insensitively, as HTML tag names are.
    pub fn allows(&self, field: &str, tag: &str) -> bool {
        self.fields
            .get(field)
            .map(|tags| tags.iter().any(|t| t.eq_ignore_ascii_case(tag)))
            .unwrap_or(false)
    }

    pub fn fields(
        &self,
    ) -> impl Iterator<Item = (&'static str, &[&'static str])> + '_ {
        self.fields.iter().map(|(f, tags)| (*f, tags.as_slice()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PasteConfig {
    /// Upper-case tag names of pasted elements the host routes to this block.
    pub tags: Vec<&'static str>,
}

impl PasteConfig {
    pub fn handles_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toolbox {
    pub icon: &'static str,
    pub title: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Capabilities {
    pub default_placeholder: &'static str,
    pub conversion_config: ConversionConfig,
    pub sanitize: SanitizePolicy,
    pub is_read_only_supported: bool,
    pub paste_config: PasteConfig,
    pub toolbox: Toolbox,
}

static CAPABILITIES: Lazy<Capabilities> = Lazy::new(|| Capabilities {
    default_placeholder: DEFAULT_PLACEHOLDER,
    conversion_config: ConversionConfig {
        export: "text",
        import: "text",
    },
    sanitize: SanitizePolicy::default().allow("text", "br"),
    is_read_only_supported: true,
    paste_config: PasteConfig { tags: vec!["P"] },
    toolbox: Toolbox {
        icon: TOOLBOX_ICON,
        title: "Text",
    },
});

pub fn capabilities() -> &'static Capabilities {
    &CAPABILITIES
}
