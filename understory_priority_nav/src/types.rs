// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types: source items, templates, options, and fit results.
//!
//! ## Overview
//!
//! These types describe what the host hands to the priority navigation
//! ([`SourceItem`], [`NavOptions`]) and what a fit pass hands back
//! ([`FitReport`], [`MenuState`]).

use alloc::string::String;
use alloc::vec::Vec;
use bitflags::bitflags;
use core::time::Duration;

/// Class carried by the rendered overflow menu container.
pub const MENU_CLASS: &str = "priority-nav__menu";

/// Class carried by the overflow control and by every overflow item.
pub const ITEM_CLASS: &str = "priority-nav__menu__child";

/// A navigation entry extracted from host markup, in source order.
///
/// `live` is the handle of the entry's node in the primary row, if the host
/// already knows it. Nested entries become nested menu nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceItem<H> {
    /// Destination reference.
    pub href: String,
    /// Display label.
    pub title: String,
    /// Handle of the inline rendering of this entry.
    pub live: Option<H>,
    /// Nested entries.
    pub children: Vec<SourceItem<H>>,
}

impl<H> SourceItem<H> {
    /// Create a leaf item without a live handle.
    pub fn new(href: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            title: title.into(),
            live: None,
            children: Vec::new(),
        }
    }

    /// Attach the inline handle.
    pub fn with_live(mut self, live: H) -> Self {
        self.live = Some(live);
        self
    }

    /// Append a nested item.
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }
}

/// Markup templates for the overflow menu.
///
/// Placeholders are positional (`%1$s`, `%2$s`, ...), see [`crate::template`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Templates {
    /// Outer menu: container class, item class, href, title, nested markup.
    pub menu: String,
    /// Wraps the joined child markup: `%s`.
    pub child_wrap: String,
    /// One overflow item: item class, href, title, nested markup.
    pub child: String,
}

impl Default for Templates {
    fn default() -> Self {
        Self {
            menu: String::from(
                "<ul class=\"%1$s\"><li class=\"%2$s\"><a href=\"%3$s\">%4$s</a>%5$s</li></ul>",
            ),
            child_wrap: String::from("<ul>%s</ul>"),
            child: String::from("<li class=\"%1$s\"><a href=\"%2$s\">%3$s</a>%4$s</li>"),
        }
    }
}

/// How generated markup is placed into the container.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum InsertMode {
    /// Append after the container's existing children.
    #[default]
    Append,
    /// Replace the container's children.
    Replace,
}

/// Priority navigation settings.
///
/// Start from [`NavOptions::default`] and override with the `with_*` methods.
/// The same snapshot is shared by every node of a tree.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NavOptions<H> {
    /// Viewport width (px) at or below which every item collapses into the overflow menu.
    pub threshold: f64,
    /// Items that stay inline even when they do not fit.
    pub min_visible_children: usize,
    /// Selector used by the host to pick items out of the primary row (`tag` or `.class`).
    pub children_filter: String,
    /// Title of the overflow control.
    pub menu_title: String,
    /// Markup templates.
    pub templates: Templates,
    /// Where the overflow menu is rendered; its width is the available width.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub container: Option<H>,
    /// Append to the container instead of replacing its contents.
    pub append: bool,
    /// Idle delay after the last resize signal before a fit pass runs.
    pub debounce: Duration,
}

impl<H> Default for NavOptions<H> {
    fn default() -> Self {
        Self {
            threshold: 400.0,
            min_visible_children: 3,
            children_filter: String::from("li"),
            menu_title: String::from("More"),
            templates: Templates::default(),
            container: None,
            append: true,
            debounce: Duration::from_millis(200),
        }
    }
}

impl<H> NavOptions<H> {
    /// Override the collapse breakpoint.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Override the inline floor.
    pub fn with_min_visible_children(mut self, count: usize) -> Self {
        self.min_visible_children = count;
        self
    }

    /// Override the item selector.
    pub fn with_children_filter(mut self, filter: impl Into<String>) -> Self {
        self.children_filter = filter.into();
        self
    }

    /// Override the overflow control title.
    pub fn with_menu_title(mut self, title: impl Into<String>) -> Self {
        self.menu_title = title.into();
        self
    }

    /// Override the templates.
    pub fn with_templates(mut self, templates: Templates) -> Self {
        self.templates = templates;
        self
    }

    /// Set the rendering container.
    pub fn with_container(mut self, container: H) -> Self {
        self.container = Some(container);
        self
    }

    /// Choose append (`true`) or replace (`false`) insertion.
    pub fn with_append(mut self, append: bool) -> Self {
        self.append = append;
        self
    }

    /// Override the debounce window.
    pub fn with_debounce(mut self, window: Duration) -> Self {
        self.debounce = window;
        self
    }

    /// Insertion mode derived from [`NavOptions::append`].
    pub fn insert_mode(&self) -> InsertMode {
        if self.append {
            InsertMode::Append
        } else {
            InsertMode::Replace
        }
    }
}

/// Options for [`crate::watch`].
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct WatchOptions {
    /// Run one fit pass immediately and ignore later resize signals.
    pub once: bool,
}

bitflags! {
    /// Presentation state of the overflow control after a fit pass.
    ///
    /// Hosts typically map these bits onto classes of the primary row.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct MenuState: u8 {
        /// The overflow control is displayed.
        const CONTROL_VISIBLE = 0b0000_0001;
        /// At least one item lives in the overflow menu.
        const OVERFLOWING     = 0b0000_0010;
        /// The viewport is at or below the threshold; the inline row is abandoned.
        const COLLAPSED       = 0b0000_0100;
    }
}

/// Outcome of one fit pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FitReport {
    /// First index that no longer fits inline, if any.
    pub boundary: Option<usize>,
    /// Number of items hidden inline.
    pub hidden: usize,
    /// Control state.
    pub state: MenuState,
}

impl FitReport {
    /// Whether the overflow control ended up visible.
    pub fn control_visible(&self) -> bool {
        self.state.contains(MenuState::CONTROL_VISIBLE)
    }
}
