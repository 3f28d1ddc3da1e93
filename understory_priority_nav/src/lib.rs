// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Priority Nav: keep a horizontal menu on one row by moving what does not fit into a "more" menu.
//!
//! ## Overview
//!
//! A priority navigation shows as many items inline as the container allows and
//! moves the rest, last first, into a collapsed overflow menu. Items come back
//! as space frees up. Below a configured viewport width the inline row is
//! abandoned altogether.
//!
//! Every item is rendered twice: once in the primary row (*live*) and once in
//! the overflow menu (*mirror*). A fit pass decides which of the two is shown.
//!
//! ## Pieces
//!
//! - [`MenuNode`]: the item tree. Holds identity, both handles, and the visibility flag.
//! - [`template`]: pure markup rendering of the overflow menu.
//! - [`fit`]: measure → plan → apply, against one width snapshot.
//! - [`watch`]: debounced resize handling and the run-once mount pass.
//! - [`RenderTarget`]: what the host provides (insert markup, measure, show/hide, enumerate).
//! - [`surface::Surface`]: a headless [`RenderTarget`] for tests and reference wiring.
//!
//! ## Workflow
//!
//! 1) Extract [`SourceItem`]s from the host row and call [`build_tree`].
//! 2) Call [`render`] to insert the overflow menu and cache its items onto the tree.
//! 3) Call [`watch`] with `once: true` for the initial layout, then feed resize
//!    signals to a steady-state [`ResizeWatcher`](watch::ResizeWatcher).
//!
//! ```
//! use kurbo::Size;
//! use understory_priority_nav::surface::{LocalElement, Surface};
//! use understory_priority_nav::{build_tree, render, watch, NavOptions, WatchOptions};
//!
//! let mut surface = Surface::new(Size::new(1024.0, 768.0));
//! let host = surface.insert(None, LocalElement::tag("nav").with_width(250.0));
//! let row = surface.insert(Some(host), LocalElement::tag("ul"));
//! for (href, title) in [("/", "Home"), ("/blog", "Blog"), ("/docs", "Docs"), ("/about", "About")] {
//!     let li = surface.insert(Some(row), LocalElement::tag("li").with_width(100.0));
//!     surface.insert(Some(li), LocalElement::tag("a").with_href(href).with_text(title));
//! }
//!
//! let items = surface.extract_items(row, "li");
//! let options = NavOptions::default()
//!     .with_container(host)
//!     .with_min_visible_children(1);
//! let mut root = build_tree(items, options);
//! render(&mut root, &mut surface).unwrap();
//!
//! let report = watch(&mut root, &mut surface, WatchOptions { once: true })
//!     .last_report()
//!     .unwrap();
//! assert_eq!(report.boundary, Some(2));
//! assert!(report.control_visible());
//! assert_eq!(root.count_visible_children(), 2);
//! ```
//!
//! This crate is `no_std` and uses `alloc`. The `std` feature (on by default)
//! adds [`template`], [`surface`] and [`render`], which read and write markup
//! through `quick_xml`.

#![no_std]

extern crate alloc;

pub mod adapters;
pub mod error;
pub mod fit;
#[cfg(feature = "std")]
mod markup;
pub mod node;
#[cfg(feature = "std")]
pub mod surface;
pub mod target;
#[cfg(feature = "std")]
pub mod template;
pub mod types;
pub mod watch;

#[cfg(feature = "std")]
use alloc::string::String;
use alloc::vec::Vec;

pub use error::{MarkupError, NavError};
pub use node::MenuNode;
pub use target::RenderTarget;
pub use types::{
    FitReport, ITEM_CLASS, InsertMode, MENU_CLASS, MenuState, NavOptions, SourceItem, Templates,
    WatchOptions,
};
pub use watch::ResizeWatcher;

/// Build the item tree from extracted source items.
///
/// The returned root stands for the overflow control; its children are the
/// items in source order.
pub fn build_tree<H: Copy + Eq>(items: Vec<SourceItem<H>>, options: NavOptions<H>) -> MenuNode<H> {
    MenuNode::from_items(items, options)
}

/// Render the overflow menu and, with a configured container, mount it.
///
/// Returns the markup in every case. With a container, the markup is inserted
/// unless the container already holds a rendered menu, then the overflow
/// control and items are cached onto the tree (index-aligned, recursively) and
/// every node's display is synchronized with its flag.
#[cfg(feature = "std")]
pub fn render<T>(root: &mut MenuNode<T::Handle>, target: &mut T) -> Result<String, NavError>
where
    T: RenderTarget + ?Sized,
{
    let markup = template::render_menu(root);
    let Some(container) = root.options().container else {
        return Ok(markup);
    };
    let menu = match target.find_by_class(container, MENU_CLASS).first() {
        Some(&menu) => menu,
        None => {
            target.insert_markup(container, &markup, root.options().insert_mode())?;
            let Some(&menu) = target.find_by_class(container, MENU_CLASS).first() else {
                tracing::warn!(?container, "inserted markup carries no overflow menu");
                return Ok(markup);
            };
            menu
        }
    };
    let control = target.find_by_class(menu, ITEM_CLASS).first().copied();
    root.attach_live(control);
    let items = control
        .map(|c| overflow_items(target, c))
        .unwrap_or_default();
    cache_level(root, target, &items);
    root.sync_display(target);
    Ok(markup)
}

#[cfg(feature = "std")]
fn cache_level<T>(node: &mut MenuNode<T::Handle>, target: &T, mirrors: &[T::Handle])
where
    T: RenderTarget + ?Sized,
{
    if mirrors.len() != node.len() {
        tracing::warn!(
            href = node.href(),
            children = node.len(),
            mirrors = mirrors.len(),
            "overflow items do not align with children"
        );
    }
    node.cache_mirrors(mirrors);
    for child in node.children_mut() {
        let nested = child
            .mirror()
            .map(|m| overflow_items(target, m))
            .unwrap_or_default();
        cache_level(child, target, &nested);
    }
}

#[cfg(feature = "std")]
/// Overflow items directly inside the first child list of `parent` that has any.
fn overflow_items<T>(target: &T, parent: T::Handle) -> Vec<T::Handle>
where
    T: RenderTarget + ?Sized,
{
    for list in target.children(parent) {
        let items: Vec<_> = target
            .children(list)
            .into_iter()
            .filter(|&c| target.has_class(c, ITEM_CLASS))
            .collect();
        if !items.is_empty() {
            return items;
        }
    }
    Vec::new()
}

/// Start watching layout changes for `root`.
///
/// With `once`, a fit pass runs immediately and the returned watcher ignores
/// later signals. Otherwise the watcher debounces signals using the tree's
/// [`NavOptions::debounce`] window.
pub fn watch<T>(
    root: &mut MenuNode<T::Handle>,
    target: &mut T,
    options: WatchOptions,
) -> ResizeWatcher
where
    T: RenderTarget + ?Sized,
{
    if options.once {
        let mut watcher = ResizeWatcher::once();
        let _ = watcher.run_once(root, target);
        watcher
    } else {
        ResizeWatcher::new(root.options().debounce)
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use crate::surface::{ElementId, LocalElement, Surface};
    use alloc::vec;
    use core::time::Duration;
    use kurbo::Size;

    struct Fixture {
        surface: Surface,
        host: ElementId,
        lis: Vec<ElementId>,
    }

    fn fixture(widths: &[f64], host_width: f64) -> Fixture {
        let mut surface = Surface::new(Size::new(1024.0, 768.0));
        let host = surface.insert(None, LocalElement::tag("nav").with_width(host_width));
        let row = surface.insert(Some(host), LocalElement::tag("ul"));
        let lis = widths
            .iter()
            .enumerate()
            .map(|(i, w)| {
                let li = surface.insert(Some(row), LocalElement::tag("li").with_width(*w));
                let href = alloc::format!("/{i}");
                let text = alloc::format!("Item {i}");
                surface.insert(
                    Some(li),
                    LocalElement::tag("a").with_href(&href).with_text(&text),
                );
                li
            })
            .collect();
        Fixture { surface, host, lis }
    }

    fn mounted(f: &mut Fixture, min: usize) -> MenuNode<ElementId> {
        let row = f.surface.children(f.host)[0];
        let items = f.surface.extract_items(row, "li");
        let mut root = build_tree(
            items,
            NavOptions::default()
                .with_container(f.host)
                .with_min_visible_children(min),
        );
        render(&mut root, &mut f.surface).unwrap();
        root
    }

    fn shown(surface: &Surface, h: Option<ElementId>) -> bool {
        h.is_some_and(|h| surface.is_displayed(h))
    }

    #[test]
    fn render_without_container_only_returns_markup() {
        let mut surface = Surface::new(Size::new(800.0, 600.0));
        let mut root: MenuNode<ElementId> =
            build_tree(vec![SourceItem::new("/a", "A")], NavOptions::default());
        let html = render(&mut root, &mut surface).unwrap();
        assert_eq!(html, template::render_menu(&root));
        assert_eq!(root.live(), None);
        assert_eq!(root.get(0).unwrap().mirror(), None);
        assert!(fit::fit_pass(&mut root, &mut surface).is_none());
    }

    #[test]
    fn render_caches_mirrors_index_aligned() {
        let mut f = fixture(&[100.0; 3], 1000.0);
        let root = mounted(&mut f, 1);
        let control = root.live().expect("control cached");
        assert!(f.surface.has_class(control, ITEM_CLASS));
        for (i, child) in root.children().iter().enumerate() {
            let mirror = child.mirror().expect("mirror cached");
            let link = f.surface.children(mirror)[0];
            assert_eq!(
                f.surface.element(link).unwrap().href.as_deref(),
                Some(alloc::format!("/{i}").as_str())
            );
            assert_eq!(child.live(), Some(f.lis[i]));
            // Synchronized: live shown, mirror hidden.
            assert!(f.surface.is_displayed(f.lis[i]));
            assert!(!f.surface.is_displayed(mirror));
        }
    }

    #[test]
    fn rerender_reuses_existing_menu() {
        let mut f = fixture(&[100.0; 3], 1000.0);
        let mut root = mounted(&mut f, 1);
        let first = root.get(1).unwrap().mirror();
        render(&mut root, &mut f.surface).unwrap();
        assert_eq!(f.surface.find_by_class(f.host, MENU_CLASS).len(), 1);
        assert_eq!(root.get(1).unwrap().mirror(), first);
    }

    #[test]
    fn nested_children_get_nested_mirrors() {
        let mut surface = Surface::new(Size::new(1024.0, 768.0));
        let host = surface.insert(None, LocalElement::tag("nav").with_width(500.0));
        let items = vec![
            SourceItem::new("/a", "A").with_child(SourceItem::new("/a/1", "A1")),
            SourceItem::new("/b", "B"),
        ];
        let mut root = build_tree(items, NavOptions::default().with_container(host));
        render(&mut root, &mut surface).unwrap();
        let a = root.get(0).unwrap();
        let a1 = a.get(0).unwrap().mirror().expect("nested mirror");
        assert_eq!(surface.parent(surface.parent(a1).unwrap()), a.mirror());
    }

    #[test]
    fn boundary_example_end_to_end() {
        let mut f = fixture(&[100.0; 4], 250.0);
        let mut root = mounted(&mut f, 1);
        let report = fit::fit_pass(&mut root, &mut f.surface).unwrap();
        assert_eq!(report.boundary, Some(2));
        assert_eq!(report.hidden, 2);
        for (i, child) in root.children().iter().enumerate() {
            let inline = i < 2;
            assert_eq!(child.is_visible(), inline);
            assert_eq!(shown(&f.surface, child.live()), inline);
            assert_eq!(shown(&f.surface, child.mirror()), !inline);
        }
        assert!(shown(&f.surface, root.live()), "control visible");
    }

    #[test]
    fn repeated_passes_are_idempotent() {
        let mut f = fixture(&[120.0, 80.0, 200.0, 60.0], 300.0);
        let mut root = mounted(&mut f, 1);
        let first = fit::fit_pass(&mut root, &mut f.surface).unwrap();
        let flags: Vec<bool> = root.children().iter().map(MenuNode::is_visible).collect();
        let second = fit::fit_pass(&mut root, &mut f.surface).unwrap();
        let again: Vec<bool> = root.children().iter().map(MenuNode::is_visible).collect();
        assert_eq!(first, second);
        assert_eq!(flags, again);
        assert_eq!(flags, vec![true, true, false, false]);
    }

    #[test]
    fn items_come_back_when_space_frees_up() {
        let mut f = fixture(&[100.0; 4], 250.0);
        let mut root = mounted(&mut f, 1);
        let _ = fit::fit_pass(&mut root, &mut f.surface);
        assert_eq!(root.count_visible_children(), 2);

        // Hidden items measure 0; their remembered width keeps them honest.
        f.surface.set_width(f.host, 350.0);
        let r = fit::fit_pass(&mut root, &mut f.surface).unwrap();
        assert_eq!(r.boundary, Some(3));
        assert_eq!(root.count_visible_children(), 3);

        f.surface.set_width(f.host, 1000.0);
        let r = fit::fit_pass(&mut root, &mut f.surface).unwrap();
        assert_eq!(r.hidden, 0);
        assert!(!r.control_visible());
        assert!(!shown(&f.surface, root.live()), "control hidden");
    }

    #[test]
    fn threshold_forces_full_collapse() {
        let mut f = fixture(&[10.0; 3], 1000.0);
        let mut root = mounted(&mut f, 1);
        f.surface.set_viewport(Size::new(320.0, 600.0));
        let r = fit::fit_pass(&mut root, &mut f.surface).unwrap();
        assert!(r.state.contains(MenuState::COLLAPSED));
        assert!(r.control_visible());
        for child in root.children() {
            assert!(!shown(&f.surface, child.live()));
            assert!(shown(&f.surface, child.mirror()));
        }

        f.surface.set_viewport(Size::new(1024.0, 600.0));
        let r = fit::fit_pass(&mut root, &mut f.surface).unwrap();
        assert_eq!(r.hidden, 0, "cached widths restore the row");
    }

    #[test]
    fn stale_live_handle_does_not_participate() {
        let mut f = fixture(&[100.0; 3], 150.0);
        let mut root = mounted(&mut f, 0);
        let mirror = root.get(2).unwrap().mirror();
        let before = shown(&f.surface, mirror);
        f.surface.remove(f.lis[2]);

        let r = fit::fit_pass(&mut root, &mut f.surface).unwrap();
        // 100, 200 > 150 at index 1; item 2 adds nothing and is not counted.
        assert_eq!(r.boundary, Some(1));
        assert_eq!(r.hidden, 1);
        assert!(root.get(2).unwrap().is_visible());
        assert_eq!(shown(&f.surface, mirror), before, "no toggle on a stale item");
    }

    #[test]
    fn item_without_live_handle_is_never_toggled() {
        let mut f = fixture(&[100.0; 3], 150.0);
        let row = f.surface.children(f.host)[0];
        let mut items = f.surface.extract_items(row, "li");
        items[2].live = None;
        let mut root = build_tree(
            items,
            NavOptions::default()
                .with_container(f.host)
                .with_min_visible_children(0),
        );
        render(&mut root, &mut f.surface).unwrap();
        let mirror = root.get(2).unwrap().mirror();
        assert!(mirror.is_some());
        let before = shown(&f.surface, mirror);

        let r = fit::fit_pass(&mut root, &mut f.surface).unwrap();
        assert_eq!(r.boundary, Some(1));
        assert_eq!(r.hidden, 1);
        assert_eq!(shown(&f.surface, mirror), before);

        // Still untouched when every item would collapse.
        f.surface.set_viewport(Size::new(320.0, 600.0));
        let r = fit::fit_pass(&mut root, &mut f.surface).unwrap();
        assert_eq!(r.hidden, 2);
        assert_eq!(shown(&f.surface, mirror), before);
    }

    #[test]
    fn watch_once_runs_immediately_and_ignores_signals() {
        let mut f = fixture(&[100.0; 4], 250.0);
        let mut root = mounted(&mut f, 1);
        let mut w = watch(&mut root, &mut f.surface, WatchOptions { once: true });
        assert_eq!(w.passes(), 1);
        assert_eq!(w.last_report().unwrap().hidden, 2);
        assert!(!w.on_resize(Duration::ZERO));
    }

    #[test]
    fn debounced_watch_runs_one_pass_per_burst() {
        let mut f = fixture(&[100.0; 4], 1000.0);
        let mut root = mounted(&mut f, 1);
        let mut w = watch(&mut root, &mut f.surface, WatchOptions::default());
        let ms = Duration::from_millis;

        for (t, width) in [(0, 900.0), (40, 600.0), (80, 350.0), (120, 250.0)] {
            f.surface.set_width(f.host, width);
            w.on_resize(ms(t));
            assert!(w.poll(ms(t), &mut root, &mut f.surface).is_none());
        }
        assert_eq!(w.next_deadline(), Some(ms(320)));
        let r = w.poll(ms(320), &mut root, &mut f.surface).unwrap();
        assert_eq!(w.passes(), 1);
        assert_eq!(r.boundary, Some(2), "measured with the last width");
        assert!(w.poll(ms(1_000), &mut root, &mut f.surface).is_none());
    }
}
