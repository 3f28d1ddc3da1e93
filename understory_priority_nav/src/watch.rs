// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Resize watching: debounce layout-change signals into single fit passes.
//!
//! ## Clocking
//!
//! Nothing here reads a clock. Callers pass monotonic timestamps (any origin)
//! as [`Duration`]s, which keeps the behavior deterministic and usable from
//! event loops, tests, and `no_std` hosts alike. See
//! [`adapters::tokio`](crate::adapters) for a task-driven binding.
//!
//! ## Collapsing
//!
//! Every signal restarts the window. Only when a poll lands at or after the
//! deadline does the watcher run a pass, once, with whatever the target
//! measures at that moment. Nothing queues.
//!
//! ```
//! use core::time::Duration;
//! use understory_priority_nav::watch::Debouncer;
//!
//! let mut d = Debouncer::new(Duration::from_millis(100));
//! d.signal(Duration::from_millis(0), 1);
//! d.signal(Duration::from_millis(50), 2);
//! assert_eq!(d.poll(Duration::from_millis(120)), None);
//! assert_eq!(d.poll(Duration::from_millis(150)), Some(2));
//! assert_eq!(d.poll(Duration::from_millis(500)), None);
//! ```

use core::time::Duration;

use crate::fit::fit_pass;
use crate::node::MenuNode;
use crate::target::RenderTarget;
use crate::types::FitReport;

/// Trailing-edge debouncer keeping the latest signal payload.
#[derive(Clone, Debug)]
pub struct Debouncer<T> {
    window: Duration,
    pending: Option<(Duration, T)>,
    collapsed: u64,
}

impl<T> Debouncer<T> {
    /// Create a debouncer with the given idle window.
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
            collapsed: 0,
        }
    }

    /// Idle window.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Record a signal at `now`, replacing any pending payload.
    ///
    /// Returns `true` if a pending invocation was superseded.
    pub fn signal(&mut self, now: Duration, payload: T) -> bool {
        let superseded = self.pending.is_some();
        if superseded {
            self.collapsed += 1;
        }
        self.pending = Some((now.saturating_add(self.window), payload));
        superseded
    }

    /// Deadline of the pending invocation.
    pub fn deadline(&self) -> Option<Duration> {
        self.pending.as_ref().map(|(deadline, _)| *deadline)
    }

    /// Whether an invocation is pending.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Signals absorbed by a later signal so far.
    pub fn collapsed(&self) -> u64 {
        self.collapsed
    }

    /// Take the pending payload if its deadline has passed.
    pub fn poll(&mut self, now: Duration) -> Option<T> {
        let deadline = self.deadline()?;
        if now < deadline {
            return None;
        }
        self.pending.take().map(|(_, payload)| payload)
    }
}

/// How a [`ResizeWatcher`] reacts to signals.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum WatchMode {
    /// A single pass ran at mount; signals are ignored.
    Once,
    /// Signals are debounced into trailing passes.
    Debounced,
}

/// Debounced driver of fit passes for one navigation tree.
#[derive(Clone, Debug)]
pub struct ResizeWatcher {
    mode: WatchMode,
    debouncer: Debouncer<()>,
    passes: u64,
    last_report: Option<FitReport>,
}

impl ResizeWatcher {
    /// Create a steady-state watcher.
    pub fn new(window: Duration) -> Self {
        Self {
            mode: WatchMode::Debounced,
            debouncer: Debouncer::new(window),
            passes: 0,
            last_report: None,
        }
    }

    /// Create a watcher that ignores signals.
    pub fn once() -> Self {
        Self {
            mode: WatchMode::Once,
            ..Self::new(Duration::ZERO)
        }
    }

    /// Current mode.
    pub fn mode(&self) -> WatchMode {
        self.mode
    }

    /// Run a pass right away, bypassing the debounce window.
    ///
    /// Without a usable container nothing runs: the result is `None` and the
    /// pass count and last report stay as they were.
    pub fn run_once<T>(&mut self, root: &mut MenuNode<T::Handle>, target: &mut T) -> Option<FitReport>
    where
        T: RenderTarget + ?Sized,
    {
        let report = fit_pass(root, target)?;
        self.passes += 1;
        self.last_report = Some(report);
        Some(report)
    }

    /// Note a layout change at `now`. Returns `false` in [`WatchMode::Once`].
    pub fn on_resize(&mut self, now: Duration) -> bool {
        if self.mode == WatchMode::Once {
            return false;
        }
        if self.debouncer.signal(now, ()) {
            tracing::trace!(?now, "resize restarted pending fit");
        }
        true
    }

    /// When the pending pass is due, if any.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.debouncer.deadline()
    }

    /// Run the pending pass if its window elapsed by `now`.
    pub fn poll<T>(
        &mut self,
        now: Duration,
        root: &mut MenuNode<T::Handle>,
        target: &mut T,
    ) -> Option<FitReport>
    where
        T: RenderTarget + ?Sized,
    {
        self.debouncer.poll(now)?;
        self.run_once(root, target)
    }

    /// Fit passes run so far.
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Signals collapsed into later ones so far.
    pub fn collapsed(&self) -> u64 {
        self.debouncer.collapsed()
    }

    /// Report of the most recent pass.
    pub fn last_report(&self) -> Option<FitReport> {
        self.last_report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn burst_collapses_into_one_trailing_fire() {
        let mut d = Debouncer::new(ms(200));
        for (i, t) in [0, 30, 60, 90, 120].into_iter().enumerate() {
            d.signal(ms(t), i);
            assert_eq!(d.poll(ms(t)), None);
        }
        assert_eq!(d.deadline(), Some(ms(320)));
        assert_eq!(d.poll(ms(319)), None);
        assert_eq!(d.poll(ms(320)), Some(4), "last payload wins");
        assert!(!d.is_pending());
        assert_eq!(d.collapsed(), 4);
    }

    #[test]
    fn separate_bursts_fire_separately() {
        let mut d = Debouncer::new(ms(10));
        d.signal(ms(0), 'a');
        assert_eq!(d.poll(ms(10)), Some('a'));
        d.signal(ms(100), 'b');
        assert_eq!(d.poll(ms(105)), None);
        assert_eq!(d.poll(ms(111)), Some('b'));
        assert_eq!(d.collapsed(), 0);
    }

    #[test]
    fn poll_without_signal_is_noop() {
        let mut d: Debouncer<()> = Debouncer::new(ms(10));
        assert_eq!(d.poll(ms(1_000)), None);
        assert_eq!(d.deadline(), None);
    }

    #[test]
    fn once_mode_ignores_signals() {
        let mut w = ResizeWatcher::once();
        assert_eq!(w.mode(), WatchMode::Once);
        assert!(!w.on_resize(ms(0)));
        assert_eq!(w.next_deadline(), None);
    }

    #[cfg(feature = "std")]
    #[test]
    fn skipped_passes_are_not_counted() {
        use crate::surface::{LocalElement, Surface};
        use crate::types::{NavOptions, SourceItem};
        use alloc::vec;

        let mut surface = Surface::new(kurbo::Size::new(1024.0, 768.0));
        let host = surface.insert(None, LocalElement::tag("nav").with_width(500.0));
        let mut root = MenuNode::from_items(
            vec![SourceItem::new("/a", "A")],
            NavOptions::default().with_container(host),
        );
        let mut w = ResizeWatcher::new(ms(10));
        assert!(w.run_once(&mut root, &mut surface).is_some());
        assert_eq!(w.passes(), 1);

        surface.remove(host);
        assert!(w.run_once(&mut root, &mut surface).is_none());
        assert_eq!(w.passes(), 1);
        assert!(w.last_report().is_some(), "last completed report is kept");
    }

    #[test]
    fn watcher_tracks_deadline() {
        let mut w = ResizeWatcher::new(ms(50));
        assert!(w.on_resize(ms(10)));
        assert!(w.on_resize(ms(20)));
        assert_eq!(w.next_deadline(), Some(ms(70)));
        assert_eq!(w.collapsed(), 1);
    }
}
