// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fit engine: decide which items stay inline and which move to the overflow menu.
//!
//! ## Pass structure
//!
//! A fit pass runs in three synchronous steps:
//!
//! 1) [`measure`] reads one [`WidthSnapshot`] from the target before anything changes.
//! 2) [`plan`] turns the snapshot into a [`FitPlan`] without touching the tree.
//! 3) [`apply`] writes the plan into the tree and toggles rendered nodes.
//!
//! Measuring never interleaves with toggling, so a pass cannot observe its own
//! partial output. Every pass recomputes from index 0; running it twice on the
//! same snapshot yields the same assignment.
//!
//! ## Widths of hidden items
//!
//! Hidden nodes measure `0`. Each node remembers its last positive width and
//! that remembered width stands in whenever the live measurement is zero, so
//! an item pushed into the overflow menu keeps occupying its slot in the sum.

use alloc::vec::Vec;

use crate::node::MenuNode;
use crate::target::RenderTarget;
use crate::types::{FitReport, MenuState, NavOptions};

/// Widths read at the start of a pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WidthSnapshot {
    /// Viewport width, compared against the collapse threshold.
    pub viewport_width: f64,
    /// Width of the container the items must fit into.
    pub available_width: f64,
    /// Width per direct child; `None` for items without a (live) inline node.
    pub item_widths: Vec<Option<f64>>,
}

/// Visibility assignment computed from a snapshot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FitPlan {
    /// `inline[i]` is true when child `i` stays in the primary row.
    pub inline: Vec<bool>,
    /// First index that no longer fits.
    pub boundary: Option<usize>,
    /// Control state.
    pub state: MenuState,
}

impl FitPlan {
    /// Number of items moved to the overflow menu.
    pub fn hidden(&self) -> usize {
        self.inline.iter().filter(|inline| !**inline).count()
    }

    /// Summary of this plan.
    pub fn report(&self) -> FitReport {
        FitReport {
            boundary: self.boundary,
            hidden: self.hidden(),
            state: self.state,
        }
    }
}

/// Take a width snapshot of `root`'s direct children.
///
/// Returns `None` when no container is configured or the container handle is stale.
pub fn measure<T>(root: &mut MenuNode<T::Handle>, target: &T) -> Option<WidthSnapshot>
where
    T: RenderTarget + ?Sized,
{
    let container = root.options().container?;
    let Some(available_width) = target.width(container) else {
        tracing::trace!(?container, "container handle is stale; skipping measurement");
        return None;
    };
    let item_widths = root
        .children_mut()
        .iter_mut()
        .map(|child| measure_item(child, target))
        .collect();
    Some(WidthSnapshot {
        viewport_width: target.viewport_width(),
        available_width,
        item_widths,
    })
}

fn measure_item<T>(node: &mut MenuNode<T::Handle>, target: &T) -> Option<f64>
where
    T: RenderTarget + ?Sized,
{
    let live = node.live()?;
    let Some(width) = target.width(live) else {
        tracing::trace!(href = node.href(), "live handle is stale; item does not participate");
        return None;
    };
    if width > 0.0 {
        node.remember_width(width);
        Some(width)
    } else {
        Some(node.cached_width().unwrap_or(0.0))
    }
}

/// Find the overflow boundary.
///
/// Accumulates widths from index 0 and returns the first participating index
/// `i >= min_visible` at which the running total exceeds `available`.
/// Non-participants (`None`) add nothing and are never the boundary. Items
/// before the boundary stay inline.
pub fn attached_nodes_fit(widths: &[Option<f64>], available: f64, min_visible: usize) -> Option<usize> {
    let mut total = 0.0;
    for (i, width) in widths.iter().enumerate() {
        let Some(width) = width else {
            continue;
        };
        total += width;
        if i >= min_visible && total > available {
            return Some(i);
        }
    }
    None
}

/// Decide the overflow control state.
///
/// At or below `threshold` the row collapses entirely and the control shows
/// whenever there is anything to show. Above it, the control shows iff some
/// item is hidden.
pub fn menu_fit(hidden: usize, items: usize, viewport_width: f64, threshold: f64) -> MenuState {
    if viewport_width <= threshold {
        let mut state = MenuState::COLLAPSED;
        if items > 0 {
            state |= MenuState::CONTROL_VISIBLE | MenuState::OVERFLOWING;
        }
        return state;
    }
    if hidden == 0 {
        MenuState::empty()
    } else {
        MenuState::CONTROL_VISIBLE | MenuState::OVERFLOWING
    }
}

/// Compute the visibility assignment for a snapshot.
///
/// Non-participants always plan as inline. They are never hidden or counted,
/// and cannot turn the overflow control on.
pub fn plan<H>(snapshot: &WidthSnapshot, options: &NavOptions<H>) -> FitPlan {
    let widths = &snapshot.item_widths;
    let participants = widths.iter().filter(|w| w.is_some()).count();
    let boundary = attached_nodes_fit(widths, snapshot.available_width, options.min_visible_children);
    let mut inline: Vec<bool> = widths
        .iter()
        .enumerate()
        .map(|(i, w)| w.is_none() || boundary.is_none_or(|b| i < b))
        .collect();
    let hidden = inline.iter().filter(|v| !**v).count();
    let state = menu_fit(hidden, participants, snapshot.viewport_width, options.threshold);
    if state.contains(MenuState::COLLAPSED) {
        for (v, w) in inline.iter_mut().zip(widths) {
            *v = w.is_none();
        }
    }
    FitPlan {
        inline,
        boundary,
        state,
    }
}

/// Write `plan` into the tree and toggle rendered nodes.
///
/// The root's live handle is the overflow control; it is shown when the plan
/// says so.
pub fn apply<T>(plan: &FitPlan, root: &mut MenuNode<T::Handle>, target: &mut T)
where
    T: RenderTarget + ?Sized,
{
    for (child, inline) in root.children_mut().iter_mut().zip(plan.inline.iter()) {
        let _ = child.set_visibility(*inline, target);
    }
    let _ = root.set_visibility(plan.state.contains(MenuState::CONTROL_VISIBLE), target);
}

/// Run one full fit pass: measure, plan, apply.
///
/// Returns `None` (and changes nothing) when there is no usable container.
pub fn fit_pass<T>(root: &mut MenuNode<T::Handle>, target: &mut T) -> Option<FitReport>
where
    T: RenderTarget + ?Sized,
{
    let snapshot = measure(root, target)?;
    let plan = plan(&snapshot, root.options());
    apply(&plan, root, target);
    let report = plan.report();
    tracing::debug!(
        boundary = ?report.boundary,
        hidden = report.hidden,
        state = ?report.state,
        available = snapshot.available_width,
        viewport = snapshot.viewport_width,
        "fit pass"
    );
    Some(report)
}
