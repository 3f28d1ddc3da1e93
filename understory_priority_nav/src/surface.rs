// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Headless rendering target.
//!
//! [`Surface`] is a small retained element tree that implements
//! [`RenderTarget`]. It is what the tests, demos, and benches render into, and
//! it works as a reference for wiring a real host (a DOM binding, a widget
//! toolkit) to the priority navigation.
//!
//! - Elements live in generational slots; removed ids go stale and stay stale.
//! - Width is the element's bounds width, or `0` when the element or one of its
//!   ancestors is not displayed.
//! - Markup is parsed up front and inserted atomically.
//!
//! ```
//! use kurbo::Size;
//! use understory_priority_nav::surface::{LocalElement, Surface};
//! use understory_priority_nav::target::RenderTarget;
//!
//! let mut surface = Surface::new(Size::new(1024.0, 768.0));
//! let row = surface.insert(None, LocalElement::tag("ul").with_width(600.0));
//! let item = surface.insert(Some(row), LocalElement::tag("li").with_width(120.0));
//! assert_eq!(surface.width(item), Some(120.0));
//!
//! surface.set_displayed(row, false);
//! assert_eq!(surface.width(item), Some(0.0));
//! ```

use alloc::string::String;
use alloc::vec::Vec;
use kurbo::{Rect, Size};

use crate::error::{MarkupError, NavError};
use crate::markup::{self, Fragment};
use crate::target::{RenderTarget, Toggle};
use crate::types::{InsertMode, SourceItem};

/// Identifier for an element of a [`Surface`] (generational).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ElementId(u32, u32);

impl ElementId {
    fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Element data supplied on insertion.
#[derive(Clone, Debug, PartialEq)]
pub struct LocalElement {
    /// Lowercase tag name.
    pub tag: String,
    /// Class list.
    pub classes: Vec<String>,
    /// Link destination, for anchors.
    pub href: Option<String>,
    /// Own text content (not including descendants).
    pub text: String,
    /// Laid-out bounds.
    pub bounds: Rect,
    /// Display flag.
    pub displayed: bool,
}

impl Default for LocalElement {
    fn default() -> Self {
        Self {
            tag: String::from("div"),
            classes: Vec::new(),
            href: None,
            text: String::new(),
            bounds: Rect::ZERO,
            displayed: true,
        }
    }
}

impl LocalElement {
    /// A displayed element with the given tag and empty bounds.
    pub fn tag(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Default::default()
        }
    }

    /// Add a class.
    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.push(String::from(class));
        self
    }

    /// Set the link destination.
    pub fn with_href(mut self, href: &str) -> Self {
        self.href = Some(String::from(href));
        self
    }

    /// Set the own text.
    pub fn with_text(mut self, text: &str) -> Self {
        self.text = String::from(text);
        self
    }

    /// Set bounds to `width` x 0 at the origin.
    pub fn with_width(mut self, width: f64) -> Self {
        self.bounds = Rect::new(0.0, 0.0, width, 0.0);
        self
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Match a comma-separated list of `tag` or `.class` selectors.
    fn matches(&self, filter: &str) -> bool {
        filter.split(',').map(str::trim).any(|sel| match sel.strip_prefix('.') {
            Some(class) => self.has_class(class),
            None => !sel.is_empty() && self.tag.eq_ignore_ascii_case(sel),
        })
    }
}

#[derive(Clone, Debug)]
struct Element {
    generation: u32,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    local: LocalElement,
}

/// Headless element tree implementing [`RenderTarget`].
pub struct Surface {
    nodes: Vec<Option<Element>>, // slots
    generations: Vec<u32>,       // last generation per slot (persists across frees)
    free_list: Vec<usize>,
    viewport: Size,
}

impl core::fmt::Debug for Surface {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Surface")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("viewport", &self.viewport)
            .finish_non_exhaustive()
    }
}

impl Default for Surface {
    fn default() -> Self {
        Self::new(Size::ZERO)
    }
}

impl Surface {
    /// Create an empty surface with the given viewport.
    pub fn new(viewport: Size) -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            viewport,
        }
    }

    /// Viewport size.
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Resize the viewport.
    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// Insert a new element as the last child of `parent` (or as a root if `None`).
    ///
    /// A stale `parent` yields a detached root.
    pub fn insert(&mut self, parent: Option<ElementId>, local: LocalElement) -> ElementId {
        let element = |generation| Element {
            generation,
            parent: None,
            children: Vec::new(),
            local,
        };
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(element(generation));
            (idx, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(element(generation)));
            self.generations.push(generation);
            (self.nodes.len() - 1, generation)
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "ElementId uses 32-bit indices by design."
        )]
        let id = ElementId::new(idx as u32, generation);
        if let Some(p) = parent.filter(|p| self.is_alive(*p)) {
            self.node_mut(p).children.push(id);
            self.node_mut(id).parent = Some(p);
        }
        id
    }

    /// Remove an element and its subtree.
    pub fn remove(&mut self, id: ElementId) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(parent) = self.node(id).parent {
            self.node_mut(parent).children.retain(|c| *c != id);
        }
        self.free_subtree(id);
    }

    fn free_subtree(&mut self, id: ElementId) {
        let children = core::mem::take(&mut self.node_mut(id).children);
        for child in children {
            self.free_subtree(child);
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    /// Returns true if `id` refers to a live element.
    pub fn is_alive(&self, id: ElementId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .is_some_and(|n| n.generation == id.1)
    }

    /// Element data, if `id` is live.
    pub fn element(&self, id: ElementId) -> Option<&LocalElement> {
        self.node_opt(id).map(|n| &n.local)
    }

    /// Parent of a live element.
    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.node_opt(id)?.parent
    }

    /// Update the bounds width of an element.
    pub fn set_width(&mut self, id: ElementId, width: f64) {
        if let Some(n) = self.node_opt_mut(id) {
            let b = n.local.bounds;
            n.local.bounds = Rect::new(b.x0, b.y0, b.x0 + width, b.y1);
        }
    }

    /// Update the bounds of an element.
    pub fn set_bounds(&mut self, id: ElementId, bounds: Rect) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.bounds = bounds;
        }
    }

    /// Own display flag; `false` for stale ids.
    pub fn is_displayed(&self, id: ElementId) -> bool {
        self.node_opt(id).is_some_and(|n| n.local.displayed)
    }

    /// True if the element and all its ancestors are displayed.
    pub fn is_rendered(&self, id: ElementId) -> bool {
        let mut cur = Some(id);
        while let Some(c) = cur {
            let Some(n) = self.node_opt(c) else {
                return false;
            };
            if !n.local.displayed {
                return false;
            }
            cur = n.parent;
        }
        true
    }

    /// Concatenated text of an element and its descendants, in document order.
    pub fn text_content(&self, id: ElementId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: ElementId, out: &mut String) {
        let Some(n) = self.node_opt(id) else {
            return;
        };
        out.push_str(&n.local.text);
        for &c in &n.children {
            self.collect_text(c, out);
        }
    }

    /// Parse `markup` and insert it under `container`.
    ///
    /// Returns the ids of the inserted top-level elements. On error nothing changes.
    pub fn insert_fragment(
        &mut self,
        container: ElementId,
        markup: &str,
        mode: InsertMode,
    ) -> Result<Vec<ElementId>, MarkupError> {
        let fragment = markup::parse(markup)?;
        if !self.is_alive(container) {
            return Ok(Vec::new());
        }
        if mode == InsertMode::Replace {
            let old = self.node(container).children.clone();
            for child in old {
                self.remove(child);
            }
        }
        Ok(fragment
            .roots
            .iter()
            .map(|&r| self.materialize(&fragment, r, container))
            .collect())
    }

    fn materialize(&mut self, fragment: &Fragment, idx: usize, parent: ElementId) -> ElementId {
        let parsed = &fragment.nodes[idx];
        let local = LocalElement {
            tag: parsed.tag.clone(),
            classes: parsed
                .attr("class")
                .map(|c| c.split_whitespace().map(String::from).collect())
                .unwrap_or_default(),
            href: parsed.attr("href").map(String::from),
            text: parsed.text.clone(),
            ..Default::default()
        };
        let id = self.insert(Some(parent), local);
        for &child in &parsed.children {
            self.materialize(fragment, child, id);
        }
        id
    }

    /// Build source items from the direct children of `row` matching `filter`.
    ///
    /// Each item takes the href and text of its first link and keeps the
    /// element as its live handle. Items nested in a list inside a matching
    /// element become nested source items.
    pub fn extract_items(&self, row: ElementId, filter: &str) -> Vec<SourceItem<ElementId>> {
        let Some(row) = self.node_opt(row) else {
            return Vec::new();
        };
        row.children
            .iter()
            .filter(|&&c| self.node(c).local.matches(filter))
            .map(|&c| self.extract_item(c, filter))
            .collect()
    }

    fn extract_item(&self, id: ElementId, filter: &str) -> SourceItem<ElementId> {
        let node = self.node(id);
        let link = self.first_descendant(id, |e| e.tag == "a");
        let href = link
            .and_then(|a| self.node(a).local.href.clone())
            .or_else(|| node.local.href.clone())
            .unwrap_or_else(|| String::from("#"));
        let title = match link {
            Some(a) => self.text_content(a),
            None => node.local.text.clone(),
        };
        let children = node
            .children
            .iter()
            .filter(|&&c| matches!(self.node(c).local.tag.as_str(), "ul" | "ol"))
            .flat_map(|&list| self.extract_items(list, filter))
            .collect();
        SourceItem {
            href,
            title: String::from(title.trim()),
            live: Some(id),
            children,
        }
    }

    fn first_descendant(
        &self,
        scope: ElementId,
        pred: impl Fn(&LocalElement) -> bool + Copy,
    ) -> Option<ElementId> {
        for &c in &self.node_opt(scope)?.children {
            if pred(&self.node(c).local) {
                return Some(c);
            }
            if let Some(found) = self.first_descendant(c, pred) {
                return Some(found);
            }
        }
        None
    }

    fn collect_by_class(&self, scope: ElementId, class: &str, out: &mut Vec<ElementId>) {
        let Some(n) = self.node_opt(scope) else {
            return;
        };
        for &c in &n.children {
            if self.node(c).local.has_class(class) {
                out.push(c);
            }
            self.collect_by_class(c, class, out);
        }
    }

    // --- internals ---

    /// Access a live element; panics if `id` is stale.
    fn node(&self, id: ElementId) -> &Element {
        self.nodes[id.idx()].as_ref().expect("dangling ElementId")
    }

    /// Access a live element mutably; panics if `id` is stale.
    fn node_mut(&mut self, id: ElementId) -> &mut Element {
        self.nodes[id.idx()].as_mut().expect("dangling ElementId")
    }

    fn node_opt(&self, id: ElementId) -> Option<&Element> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    fn node_opt_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }
}

impl RenderTarget for Surface {
    type Handle = ElementId;

    fn viewport_width(&self) -> f64 {
        self.viewport.width
    }

    fn insert_markup(
        &mut self,
        container: ElementId,
        markup: &str,
        mode: InsertMode,
    ) -> Result<(), NavError> {
        self.insert_fragment(container, markup, mode)?;
        Ok(())
    }

    fn find_by_class(&self, scope: ElementId, class: &str) -> Vec<ElementId> {
        let mut out = Vec::new();
        self.collect_by_class(scope, class, &mut out);
        out
    }

    fn has_class(&self, node: ElementId, class: &str) -> bool {
        self.node_opt(node).is_some_and(|n| n.local.has_class(class))
    }

    fn children(&self, node: ElementId) -> Vec<ElementId> {
        self.node_opt(node)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    fn width(&self, node: ElementId) -> Option<f64> {
        let n = self.node_opt(node)?;
        if !self.is_rendered(node) {
            return Some(0.0);
        }
        Some(n.local.bounds.width().max(0.0))
    }

    fn set_displayed(&mut self, node: ElementId, displayed: bool) -> bool {
        match self.node_opt_mut(node) {
            Some(n) => {
                n.local.displayed = displayed;
                true
            }
            None => false,
        }
    }

    fn swap_displayed(&mut self, show: Option<ElementId>, hide: Option<ElementId>) -> Toggle {
        // Resolve liveness first so both flags flip together or not at all.
        let show = show.map(|id| (id, self.is_alive(id)));
        let hide = hide.map(|id| (id, self.is_alive(id)));
        let mut toggle = Toggle::default();
        for (entry, displayed) in [(show, true), (hide, false)] {
            match entry {
                Some((id, true)) => {
                    self.node_mut(id).local.displayed = displayed;
                    toggle.applied += 1;
                }
                Some((_, false)) => toggle.stale += 1,
                None => {}
            }
        }
        toggle
    }
}
