// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! A plain-text paragraph block for block-based rich text editors.
//!
//! The editor host constructs a [`TextBlock`], asks it to [`render`] a view,
//! lets the user edit that view directly, and later calls [`save`],
//! [`merge`], [`validate`] and [`on_paste`] as part of its own document
//! workflows. The block keeps its [`BlockData`] in step with the live view:
//! reads pull from the view, writes are pushed into it on the next frame.
//!
//! The view itself is abstracted behind [`BlockView`] so the same model runs
//! against a browser element (feature `js`) or an in-memory element backed by
//! an HTML5 fragment parser (feature `sys`, the default).
//!
//! [`render`]: TextBlock::render
//! [`save`]: TextBlock::save
//! [`merge`]: TextBlock::merge
//! [`validate`]: TextBlock::validate
//! [`on_paste`]: TextBlock::on_paste

mod block_data;
mod capabilities;
mod host;
mod scheduler;
mod text_block;
pub mod view;

pub use crate::block_data::{
    BlockConfig, BlockData, HydrationMode, ResolvedConfig,
};
pub use crate::capabilities::{
    capabilities, Capabilities, ConversionConfig, PasteConfig,
    SanitizePolicy, Toolbox, DEFAULT_PLACEHOLDER, WRAPPER_CLASS,
};
pub use crate::host::{HostApi, StaticHost};
pub use crate::scheduler::{
    FrameCallback, FrameScheduler, Hydrator, ImmediateScheduler,
    ManualScheduler,
};
pub use crate::text_block::{BlockError, BlockParams, PasteEvent, TextBlock};
pub use crate::view::{clear_if_blank, BlockView, KeyCode, ViewError};

#[cfg(feature = "js")]
pub use crate::scheduler::AnimationFrameScheduler;
#[cfg(feature = "js")]
pub use crate::view::ElementView;
#[cfg(feature = "sys")]
pub use crate::view::DetachedView;
