// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Deferred hydration: writing model data into a rendered view at the next
//! redraw opportunity instead of in the middle of whatever event handler
//! triggered the write.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use crate::view::BlockView;

pub type FrameCallback = Box<dyn FnOnce()>;

/// Something that can run a callback "on the next frame".
pub trait FrameScheduler {
    fn request_frame(&self, callback: FrameCallback);
}

/// Runs every callback as soon as it is requested.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImmediateScheduler;

impl FrameScheduler for ImmediateScheduler {
    fn request_frame(&self, callback: FrameCallback) {
        callback();
    }
}

/// Queues callbacks until the embedder says a frame has happened.
#[derive(Default)]
pub struct ManualScheduler {
    queue: RefCell<VecDeque<FrameCallback>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending_frames(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Run the callbacks requested before this frame started. Callbacks
    /// requested while it runs wait for the next one. Returns how many ran.
    pub fn run_frame(&self) -> usize {
        let due: Vec<FrameCallback> =
            self.queue.borrow_mut().drain(..).collect();
        let count = due.len();
        for callback in due {
            callback();
        }
        count
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&self, callback: FrameCallback) {
        self.queue.borrow_mut().push_back(callback);
    }
}

impl std::fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManualScheduler")
            .field("pending_frames", &self.pending_frames())
            .finish()
    }
}

/// `window.requestAnimationFrame`.
#[cfg(feature = "js")]
#[derive(Clone, Copy, Debug, Default)]
pub struct AnimationFrameScheduler;

#[cfg(feature = "js")]
impl FrameScheduler for AnimationFrameScheduler {
    fn request_frame(&self, callback: FrameCallback) {
        use wasm_bindgen::closure::Closure;
        use wasm_bindgen::JsCast;

        let Some(window) = web_sys::window() else {
            tracing::warn!("no window to request a frame from, running inline");
            callback();
            return;
        };
        let js_callback = Closure::once_into_js(move || callback());
        if let Err(error) =
            window.request_animation_frame(js_callback.unchecked_ref())
        {
            tracing::warn!(?error, "requestAnimationFrame failed");
        }
    }
}

struct PendingHydration<V> {
    view: V,
    text: String,
}

/// A single-slot pending write into a view.
///
/// Scheduling while a write is already pending replaces its text without
/// requesting another frame, so when the frame fires the latest write wins.
/// If the owner is dropped before the frame fires, nothing is written.
pub struct Hydrator<V: BlockView> {
    scheduler: Rc<dyn FrameScheduler>,
    pending: Rc<RefCell<Option<PendingHydration<V>>>>,
}

impl<V: BlockView> Hydrator<V> {
    pub fn new(scheduler: Rc<dyn FrameScheduler>) -> Self {
        Self {
            scheduler,
            pending: Rc::new(RefCell::new(None)),
        }
    }

    pub fn schedule(&self, view: &V, text: String) {
        let replaced = self
            .pending
            .borrow_mut()
            .replace(PendingHydration {
                view: view.clone(),
                text,
            })
            .is_some();
        if replaced {
            tracing::trace!("replaced pending hydration");
            return;
        }

        let pending: Weak<RefCell<Option<PendingHydration<V>>>> =
            Rc::downgrade(&self.pending);
        self.scheduler.request_frame(Box::new(move || {
            let Some(pending) = pending.upgrade() else {
                return;
            };
            let job = pending.borrow_mut().take();
            if let Some(job) = job {
                job.view.set_inner_html(&job.text);
            }
        }));
    }

    pub fn is_pending(&self) -> bool {
        self.pending.borrow().is_some()
    }
}
