// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rendering target abstraction.
//!
//! The priority navigation never owns rendered nodes. It talks to the host
//! through [`RenderTarget`] using opaque, copyable handles that may go stale
//! at any time (for example mid-teardown). Stale handles measure as `None`
//! and ignore display toggles.

use alloc::vec::Vec;
use core::fmt::Debug;

use crate::error::NavError;
use crate::types::InsertMode;

/// Result of a paired display toggle issued by
/// [`MenuNode::set_visibility`](crate::node::MenuNode::set_visibility).
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Toggle {
    /// Handles that accepted the toggle.
    pub applied: u8,
    /// Handles that were stale and ignored it.
    pub stale: u8,
}

impl Toggle {
    /// True when no handle accepted the toggle.
    pub fn is_noop(&self) -> bool {
        self.applied == 0
    }
}

/// Host rendering surface (a DOM, a retained widget tree, a terminal buffer, ...).
pub trait RenderTarget {
    /// Opaque node handle.
    type Handle: Copy + Eq + Debug;

    /// Current viewport width.
    fn viewport_width(&self) -> f64;

    /// Insert `markup` into `container` with append or replace semantics.
    fn insert_markup(
        &mut self,
        container: Self::Handle,
        markup: &str,
        mode: InsertMode,
    ) -> Result<(), NavError>;

    /// Descendants of `scope` carrying `class`, in document order.
    fn find_by_class(&self, scope: Self::Handle, class: &str) -> Vec<Self::Handle>;

    /// Whether `node` carries `class`. Stale handles carry nothing.
    fn has_class(&self, node: Self::Handle, class: &str) -> bool;

    /// Direct children of `node` in document order. Empty for stale handles.
    fn children(&self, node: Self::Handle) -> Vec<Self::Handle>;

    /// Rendered width of `node`, or `None` if the handle is stale.
    ///
    /// Nodes that are not displayed report `0.0`.
    fn width(&self, node: Self::Handle) -> Option<f64>;

    /// Show or hide `node`. Returns `false` if the handle is stale.
    fn set_displayed(&mut self, node: Self::Handle, displayed: bool) -> bool;

    /// Show one node and hide another as a single step.
    ///
    /// Targets that can batch display changes should override this so no
    /// observer sees both or neither node displayed.
    fn swap_displayed(&mut self, show: Option<Self::Handle>, hide: Option<Self::Handle>) -> Toggle {
        let mut toggle = Toggle::default();
        for (handle, displayed) in [(show, true), (hide, false)] {
            let Some(handle) = handle else {
                continue;
            };
            if self.set_displayed(handle, displayed) {
                toggle.applied += 1;
            } else {
                toggle.stale += 1;
            }
        }
        toggle
    }
}
