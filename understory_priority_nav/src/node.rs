// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Menu nodes: one navigation item and, recursively, its children.
//!
//! ## Dual representation
//!
//! Every item exists twice on screen: its *live* node in the primary row and
//! its *mirror* inside the overflow menu. A node keeps both handles side by
//! side, and children stay index-aligned with the mirrors produced by one
//! render pass, so `children[i]` always pairs with the `i`-th overflow item.
//! [`MenuNode::set_visibility`] shows exactly one of the pair.

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::error::NavError;
use crate::target::{RenderTarget, Toggle};
use crate::types::{NavOptions, SourceItem, Templates};

/// One navigation item.
#[derive(Clone, Debug)]
pub struct MenuNode<H> {
    href: String,
    title: String,
    children: Vec<Self>,
    templates: Arc<Templates>,
    options: Arc<NavOptions<H>>,
    visible: bool,
    live: Option<H>,
    mirror: Option<H>,
    cached_width: Option<f64>,
}

impl<H: Copy + Eq> MenuNode<H> {
    /// Create a detached node.
    pub fn new(
        href: impl Into<String>,
        title: impl Into<String>,
        templates: Arc<Templates>,
        options: Arc<NavOptions<H>>,
    ) -> Self {
        Self {
            href: href.into(),
            title: title.into(),
            children: Vec::new(),
            templates,
            options,
            visible: true,
            live: None,
            mirror: None,
            cached_width: None,
        }
    }

    /// Create a node that shares this node's templates and options.
    pub fn child(&self, href: impl Into<String>, title: impl Into<String>) -> Self {
        Self::new(href, title, self.templates.clone(), self.options.clone())
    }

    /// Build a root node from extracted source items.
    ///
    /// The root carries `#` and the configured menu title; it stands for the
    /// overflow control itself.
    pub fn from_items(items: Vec<SourceItem<H>>, options: NavOptions<H>) -> Self {
        let templates = Arc::new(options.templates.clone());
        let title = options.menu_title.clone();
        let mut root = Self::new("#", title, templates, Arc::new(options));
        root.children = items.into_iter().map(|item| root.adopt(item)).collect();
        root
    }

    fn adopt(&self, item: SourceItem<H>) -> Self {
        let mut node = self.child(item.href, item.title);
        node.live = item.live;
        node.children = item
            .children
            .into_iter()
            .map(|nested| node.adopt(nested))
            .collect();
        node
    }

    /// Destination reference.
    pub fn href(&self) -> &str {
        &self.href
    }

    /// Display label.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Shared templates.
    pub fn templates(&self) -> &Templates {
        &self.templates
    }

    /// Shared options snapshot.
    pub fn options(&self) -> &NavOptions<H> {
        &self.options
    }

    /// Direct children.
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    pub(crate) fn children_mut(&mut self) -> &mut [Self] {
        &mut self.children
    }

    /// Number of direct children.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// True if the node has no children.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Child at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&Self> {
        self.children.get(index)
    }

    /// Mutable child at `index`, if any.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Self> {
        self.children.get_mut(index)
    }

    /// Whether a child exists at `index`.
    pub fn has(&self, index: usize) -> bool {
        index < self.children.len()
    }

    /// Insert or replace a child.
    ///
    /// `None` (or `Some(len)`) appends. An index inside the range replaces the
    /// child there and returns it. The child must share this tree's templates.
    pub fn set(&mut self, child: Self, index: Option<usize>) -> Result<Option<Self>, NavError> {
        let len = self.children.len();
        let index = index.unwrap_or(len);
        if index > len {
            return Err(NavError::IndexOutOfRange { index, len });
        }
        if !Arc::ptr_eq(&self.templates, &child.templates) {
            return Err(NavError::InvalidChild { index });
        }
        if index == len {
            self.children.push(child);
            Ok(None)
        } else {
            Ok(Some(core::mem::replace(&mut self.children[index], child)))
        }
    }

    /// Handle of the inline rendering.
    pub fn live(&self) -> Option<H> {
        self.live
    }

    /// Handle of the overflow rendering.
    pub fn mirror(&self) -> Option<H> {
        self.mirror
    }

    /// Point at a (new) inline rendering.
    pub fn attach_live(&mut self, handle: Option<H>) {
        self.live = handle;
    }

    /// Point at a (new) overflow rendering.
    pub fn attach_mirror(&mut self, handle: Option<H>) {
        self.mirror = handle;
    }

    /// Drop both handles of this node and its descendants.
    pub fn detach(&mut self) {
        self.live = None;
        self.mirror = None;
        for child in &mut self.children {
            child.detach();
        }
    }

    /// Logical visibility: `true` when the inline rendering is the one shown.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Set logical visibility and toggle the rendered pair to match.
    ///
    /// With `flag == true` the live node is shown and the mirror hidden; with
    /// `false` the reverse. Both changes go through one
    /// [`RenderTarget::swap_displayed`] call. A node whose live handle is
    /// missing or stale takes no part in layout: only the flag changes and
    /// neither handle is toggled.
    pub fn set_visibility<T>(&mut self, flag: bool, target: &mut T) -> Toggle
    where
        T: RenderTarget<Handle = H> + ?Sized,
    {
        self.visible = flag;
        let Some(live) = self.live else {
            return Toggle::default();
        };
        if target.width(live).is_none() {
            tracing::trace!(href = %self.href, "live handle is stale; no toggle issued");
            return Toggle {
                applied: 0,
                stale: 1,
            };
        }
        let (show, hide) = if flag {
            (Some(live), self.mirror)
        } else {
            (self.mirror, Some(live))
        };
        let toggle = target.swap_displayed(show, hide);
        if toggle.stale > 0 {
            tracing::trace!(href = %self.href, "ignored stale mirror handle");
        }
        toggle
    }

    /// Re-issue the toggle for the current flag on this node and its descendants.
    pub fn sync_display<T>(&mut self, target: &mut T)
    where
        T: RenderTarget<Handle = H> + ?Sized,
    {
        let visible = self.visible;
        let _ = self.set_visibility(visible, target);
        for child in &mut self.children {
            child.sync_display(target);
        }
    }

    /// Number of direct children whose inline rendering is shown.
    pub fn count_visible_children(&self) -> usize {
        self.children.iter().filter(|c| c.visible).count()
    }

    /// Last positive width measured for the inline rendering.
    pub fn cached_width(&self) -> Option<f64> {
        self.cached_width
    }

    pub(crate) fn remember_width(&mut self, width: f64) {
        self.cached_width = Some(width);
    }

    /// Assign `mirrors[i]` to `children[i]`; children past the end lose their mirror.
    pub(crate) fn cache_mirrors(&mut self, mirrors: &[H]) {
        for (i, child) in self.children.iter_mut().enumerate() {
            child.mirror = mirrors.get(i).copied();
        }
    }
}
