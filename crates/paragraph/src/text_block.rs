// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! The paragraph block and the lifecycle the editor host drives it through.
//!
//! A block starts out unrendered: data writes only update the stored
//! [`BlockData`]. The first [`TextBlock::render`] creates the view, and from
//! then on the view is the source of truth. Reads re-derive the text from the
//! view's live markup; writes are pushed into the view, on the next frame by
//! default. There is no way back to unrendered.

use std::rc::Rc;

use crate::block_data::{BlockConfig, BlockData, HydrationMode, ResolvedConfig};
use crate::capabilities::WRAPPER_CLASS;
use crate::host::HostApi;
use crate::scheduler::{FrameScheduler, Hydrator};
use crate::view::{clear_if_blank, BlockView, ViewError};

#[derive(Debug, thiserror::Error)]
pub enum BlockError {
    #[error("Failed to build the block view: {0}")]
    View(#[from] ViewError),
}

/// Everything the host hands over when it constructs a block.
pub struct BlockParams {
    /// Previously saved data, if any.
    pub data: Option<BlockData>,
    pub config: BlockConfig,
    pub api: Rc<dyn HostApi>,
    pub read_only: bool,
    pub scheduler: Rc<dyn FrameScheduler>,
}

/// Content the host routes to a block after a paste.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PasteEvent {
    /// A pasted element whose tag matched the block's paste config.
    Tag { tag: String, inner_html: String },
    File { mime_type: String },
    Pattern { key: String, data: String },
}

pub struct TextBlock<V: BlockView> {
    api: Rc<dyn HostApi>,
    config: ResolvedConfig,
    read_only: bool,
    data: BlockData,
    view: Option<V>,
    hydrator: Hydrator<V>,
}

impl<V: BlockView> TextBlock<V> {
    pub fn new(params: BlockParams) -> Self {
        let BlockParams {
            data,
            config,
            api,
            read_only,
            scheduler,
        } = params;

        let mut block = Self {
            api,
            config: config.resolve(),
            read_only,
            data: BlockData::default(),
            view: None,
            hydrator: Hydrator::new(scheduler),
        };
        // No view yet, so this only stores the data.
        block.set_data(data);

        tracing::debug!(
            read_only,
            placeholder = %block.config.placeholder,
            preserve_blank = block.config.preserve_blank,
            hydration = %block.config.hydration,
            "created paragraph block"
        );
        block
    }

    /// Create the block's view and start treating it as the source of truth.
    ///
    /// The host is expected to call this once. Later calls return a handle to
    /// the view created the first time rather than building a second one.
    pub fn render(&mut self) -> Result<V, BlockError> {
        if let Some(view) = &self.view {
            tracing::warn!(
                "render called on an already rendered block, \
                 returning the existing view"
            );
            return Ok(view.clone());
        }

        let view = self.draw_view()?;
        self.view = Some(view.clone());
        self.assert_invariants();
        tracing::debug!(read_only = self.read_only, "rendered paragraph view");
        Ok(view)
    }

    fn draw_view(&self) -> Result<V, BlockError> {
        let view = V::create()?;
        view.add_class(WRAPPER_CLASS)?;
        view.add_class(&self.api.block_class())?;
        view.set_editable(false);
        view.set_placeholder(&self.api.translate(&self.config.placeholder))?;

        if !self.data.text.is_empty() {
            view.set_inner_html(&self.data.text);
        }

        if !self.read_only {
            view.set_editable(true);
            view.on_key_up(Box::new(|view: &V, key| {
                clear_if_blank(view, &key);
            }))?;
        }

        Ok(view)
    }

    /// The block's current data. Once rendered, the text is re-read from the
    /// view first, so edits made directly in the view are always reflected.
    pub fn data(&mut self) -> &BlockData {
        if let Some(view) = &self.view {
            self.data.text = view.inner_html();
        }
        &self.data
    }

    /// Replace the block's data. `None` is the empty paragraph.
    ///
    /// Once rendered, the view is updated too: immediately with
    /// [`HydrationMode::Immediate`], otherwise on the next frame. Until that
    /// frame fires, [`TextBlock::data`] still reports what the view shows.
    pub fn set_data(&mut self, data: Option<BlockData>) {
        self.data = BlockData::from_optional(data);

        if let Some(view) = &self.view {
            match self.config.hydration {
                HydrationMode::Deferred => {
                    self.hydrator.schedule(view, self.data.text.clone())
                }
                HydrationMode::Immediate => {
                    view.set_inner_html(&self.data.text)
                }
            }
        }
    }

    /// Append another block's content to this one, as the host does when
    /// the user deletes the boundary between two paragraphs.
    pub fn merge(&mut self, incoming: BlockData) {
        let merged = self.data().concat(&incoming);
        self.set_data(Some(merged));
    }

    /// Whether `saved` is worth keeping. Blank paragraphs are dropped unless
    /// the host asked to preserve them.
    pub fn validate(&self, saved: &BlockData) -> bool {
        !(saved.is_blank() && !self.config.preserve_blank)
    }

    /// Extract data from a rendered view. Only the view is consulted.
    pub fn save(&self, view: &V) -> BlockData {
        BlockData::new(view.inner_html())
    }

    pub fn on_paste(&mut self, event: &PasteEvent) {
        match event {
            PasteEvent::Tag { tag, inner_html } => {
                tracing::debug!(%tag, "pasting element into paragraph");
                self.set_data(Some(BlockData::new(inner_html.clone())));
            }
            other => {
                tracing::debug!(?other, "ignoring unsupported paste event");
            }
        }
    }

    pub fn is_rendered(&self) -> bool {
        self.view.is_some()
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    pub fn view(&self) -> Option<&V> {
        self.view.as_ref()
    }

    /// Whether a data write is still waiting for its frame.
    pub fn has_pending_hydration(&self) -> bool {
        self.hydrator.is_pending()
    }

    fn assert_invariants(&self) {
        #[cfg(feature = "assert-invariants")]
        if let Some(view) = &self.view {
            assert_eq!(
                view.is_editable(),
                !self.read_only,
                "view editability must follow the read-only flag"
            );
            assert!(
                view.placeholder().is_some(),
                "a rendered view always carries a placeholder"
            );
        }
    }
}

#[cfg(all(test, feature = "sys"))]
mod test {
    use super::*;
    use crate::host::StaticHost;
    use crate::scheduler::{ImmediateScheduler, ManualScheduler};
    use crate::view::DetachedView;

    fn block(
        data: Option<&str>,
        config: BlockConfig,
    ) -> (TextBlock<DetachedView>, Rc<ManualScheduler>) {
        let scheduler = Rc::new(ManualScheduler::new());
        let block = TextBlock::new(BlockParams {
            data: data.map(BlockData::from),
            config,
            api: Rc::new(StaticHost::default()),
            read_only: false,
            scheduler: scheduler.clone(),
        });
        (block, scheduler)
    }

    #[test]
    fn construction_only_stores_data() {
        let (mut block, scheduler) =
            block(Some("Hello"), BlockConfig::default());
        assert!(!block.is_rendered());
        assert_eq!(block.data().text, "Hello");
        assert_eq!(scheduler.pending_frames(), 0);
    }

    #[test]
    fn writes_before_render_do_not_schedule_frames() {
        let (mut block, scheduler) = block(None, BlockConfig::default());
        block.set_data(Some("stored".into()));
        assert_eq!(scheduler.pending_frames(), 0);
        assert_eq!(block.data().text, "stored");
    }

    #[test]
    fn merge_before_render_only_stores_the_result() {
        let (mut block, scheduler) =
            block(Some("Hello "), BlockConfig::default());
        block.merge("World".into());
        assert_eq!(scheduler.pending_frames(), 0);
        assert!(!block.has_pending_hydration());
        assert_eq!(block.data().text, "Hello World");

        let view = block.render().unwrap();
        assert_eq!(view.inner_html(), "Hello World");
    }

    #[test]
    fn render_populates_the_view_synchronously() {
        let (mut block, _) =
            block(Some("Hello <b>there</b>"), BlockConfig::default());
        let view = block.render().unwrap();
        assert_eq!(view.inner_html(), "Hello <b>there</b>");
        assert!(view.has_class(WRAPPER_CLASS));
        assert!(view.has_class("cdx-block"));
    }

    #[test]
    fn second_render_returns_the_same_view() {
        let (mut block, _) = block(Some("once"), BlockConfig::default());
        let first = block.render().unwrap();
        let second = block.render().unwrap();
        assert!(first.same_element(&second));
    }

    #[test]
    fn reads_before_the_frame_report_what_the_view_shows() {
        let (mut block, scheduler) =
            block(Some("old"), BlockConfig::default());
        block.render().unwrap();
        block.set_data(Some("new".into()));
        assert!(block.has_pending_hydration());
        assert_eq!(block.data().text, "old");

        scheduler.run_frame();
        assert_eq!(block.data().text, "new");
    }

    #[test]
    fn a_read_before_the_frame_does_not_lose_the_pending_write() {
        let (mut block, scheduler) =
            block(Some("Hello "), BlockConfig::default());
        block.render().unwrap();
        block.merge("World".into());
        let _ = block.data();
        scheduler.run_frame();
        assert_eq!(block.data().text, "Hello World");
    }

    #[test]
    fn immediate_hydration_bypasses_the_scheduler() {
        let config =
            BlockConfig::default().with_hydration(HydrationMode::Immediate);
        let (mut block, scheduler) = block(Some("old"), config);
        block.render().unwrap();
        block.set_data(Some("new".into()));
        assert_eq!(scheduler.pending_frames(), 0);
        assert_eq!(block.data().text, "new");
    }

    #[test]
    fn unsupported_paste_events_are_ignored() {
        let (mut block, _) = block(Some("kept"), BlockConfig::default());
        block.on_paste(&PasteEvent::File {
            mime_type: "image/png".to_owned(),
        });
        assert_eq!(block.data().text, "kept");
    }

    #[test]
    fn immediate_scheduler_behaves_like_synchronous_hydration() {
        let mut block = TextBlock::<DetachedView>::new(BlockParams {
            data: None,
            config: BlockConfig::default(),
            api: Rc::new(StaticHost::default()),
            read_only: false,
            scheduler: Rc::new(ImmediateScheduler),
        });
        block.render().unwrap();
        block.on_paste(&PasteEvent::Tag {
            tag: "P".to_owned(),
            inner_html: "pasted".to_owned(),
        });
        assert_eq!(block.data().text, "pasted");
    }
}
