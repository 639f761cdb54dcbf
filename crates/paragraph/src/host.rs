// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

/// The parts of the editor host a block is allowed to call into.
///
/// The host owns these services; a block only keeps a shared reference.
pub trait HostApi {
    /// CSS class the host uses to style every block's root element.
    fn block_class(&self) -> String;

    /// Localise a user-facing string such as the placeholder.
    fn translate(&self, key: &str) -> String;
}

/// A host with a fixed block class and no localisation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StaticHost {
    block_class: String,
}

impl StaticHost {
    pub fn new(block_class: impl Into<String>) -> Self {
        Self {
            block_class: block_class.into(),
        }
    }
}

impl Default for StaticHost {
    fn default() -> Self {
        Self::new("cdx-block")
    }
}

impl HostApi for StaticHost {
    fn block_class(&self) -> String {
        self.block_class.clone()
    }

    fn translate(&self, key: &str) -> String {
        key.to_owned()
    }
}
