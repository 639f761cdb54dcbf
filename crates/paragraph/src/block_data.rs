// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use strum_macros::{AsRefStr, Display, EnumString};

use crate::capabilities::DEFAULT_PLACEHOLDER;

/// The persisted and exchanged form of a paragraph.
///
/// `text` is an HTML fragment. Whatever tags it carries are the host
/// sanitiser's business; the block only ever treats it as opaque markup.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BlockData {
    pub text: String,
}

impl BlockData {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Hosts may hand over nothing at all, or an object with no `text`.
    /// Both mean "empty paragraph".
    pub fn from_optional(data: Option<BlockData>) -> Self {
        data.unwrap_or_default()
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Plain string concatenation. No attempt is made to balance tags
    /// across the boundary; the view's HTML parser is tolerant of that.
    pub fn concat(&self, other: &BlockData) -> BlockData {
        let mut text =
            String::with_capacity(self.text.len() + other.text.len());
        text.push_str(&self.text);
        text.push_str(&other.text);
        BlockData { text }
    }
}

impl From<&str> for BlockData {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for BlockData {
    fn from(text: String) -> Self {
        Self { text }
    }
}

/// When a data write reaches an already rendered view.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, AsRefStr, Display, EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum HydrationMode {
    /// Write on the next frame. Only the latest pending write is applied.
    #[default]
    Deferred,
    /// Write into the view before `set_data` returns.
    Immediate,
}

/// Tool configuration as supplied by the host. Every field is optional.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BlockConfig {
    pub placeholder: Option<String>,
    pub preserve_blank: Option<bool>,
    pub hydration: HydrationMode,
}

impl BlockConfig {
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_preserve_blank(mut self, preserve_blank: bool) -> Self {
        self.preserve_blank = Some(preserve_blank);
        self
    }

    pub fn with_hydration(mut self, hydration: HydrationMode) -> Self {
        self.hydration = hydration;
        self
    }

    /// Apply defaults. An empty placeholder counts as no placeholder.
    pub fn resolve(&self) -> ResolvedConfig {
        let placeholder = match self.placeholder.as_deref() {
            Some(p) if !p.is_empty() => p.to_owned(),
            _ => DEFAULT_PLACEHOLDER.to_owned(),
        };
        ResolvedConfig {
            placeholder,
            preserve_blank: self.preserve_blank.unwrap_or(false),
            hydration: self.hydration,
        }
    }
}

/// Configuration with all defaults applied. Fixed for the block's lifetime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub placeholder: String,
    pub preserve_blank: bool,
    pub hydration: HydrationMode,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        BlockConfig::default().resolve()
    }
}
