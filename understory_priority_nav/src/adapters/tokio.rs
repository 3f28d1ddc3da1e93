// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tokio task driving a [`Debouncer`] from a channel of resize signals.
//!
//! The task timestamps each signal against its own start instant, sleeps until
//! the pending deadline, and calls `on_fire` with the latest payload once the
//! window elapses without a new signal. Dropping the [`WatchHandle`] aborts the
//! task; dropping every sender ends it without firing a pending signal.
//!
//! Under a paused test clock the timing is exact:
//!
//! ```
//! # #[tokio::main(flavor = "current_thread", start_paused = true)]
//! # async fn main() {
//! use core::time::Duration;
//! use std::sync::{Arc, Mutex};
//! use tokio::sync::mpsc;
//! use understory_priority_nav::adapters::tokio::spawn_resize_watch;
//!
//! let (tx, rx) = mpsc::unbounded_channel();
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&seen);
//! let handle = spawn_resize_watch(Duration::from_millis(100), rx, move |w: f64| {
//!     sink.lock().unwrap().push(w);
//! });
//! tx.send(640.0).unwrap();
//! tx.send(480.0).unwrap();
//! tokio::time::sleep(Duration::from_millis(250)).await;
//! assert_eq!(*seen.lock().unwrap(), [480.0]);
//! assert_eq!(handle.passes(), 1);
//! # }
//! ```

use alloc::sync::Arc;
use core::sync::atomic::{AtomicU64, Ordering};
use core::time::Duration;

use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;
use tokio::time::{Instant, timeout_at};

use crate::watch::Debouncer;

/// Running resize watch. Aborts the task on drop.
#[derive(Debug)]
pub struct WatchHandle {
    task: JoinHandle<()>,
    passes: Arc<AtomicU64>,
}

impl WatchHandle {
    /// Debounced invocations delivered so far.
    pub fn passes(&self) -> u64 {
        self.passes.load(Ordering::Relaxed)
    }

    /// Whether the task has ended (channel closed or aborted).
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop watching. Equivalent to dropping the handle.
    pub fn stop(self) {}
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Spawn a task that debounces `signals` over `window` and calls `on_fire`
/// with the latest payload of each burst.
///
/// Must be called from within a Tokio runtime.
pub fn spawn_resize_watch<T, F>(
    window: Duration,
    signals: UnboundedReceiver<T>,
    on_fire: F,
) -> WatchHandle
where
    T: Send + 'static,
    F: FnMut(T) + Send + 'static,
{
    let passes = Arc::new(AtomicU64::new(0));
    let task = tokio::spawn(run(window, signals, on_fire, Arc::clone(&passes)));
    WatchHandle { task, passes }
}

async fn run<T, F>(
    window: Duration,
    mut signals: UnboundedReceiver<T>,
    mut on_fire: F,
    passes: Arc<AtomicU64>,
) where
    F: FnMut(T),
{
    let start = Instant::now();
    let mut debouncer = Debouncer::new(window);
    loop {
        let signal = match debouncer.deadline() {
            Some(deadline) => match timeout_at(start + deadline, signals.recv()).await {
                Ok(signal) => signal,
                Err(_) => {
                    if let Some(payload) = debouncer.poll(start.elapsed()) {
                        passes.fetch_add(1, Ordering::Relaxed);
                        on_fire(payload);
                    }
                    continue;
                }
            },
            None => signals.recv().await,
        };
        let Some(payload) = signal else {
            break;
        };
        debouncer.signal(start.elapsed(), payload);
    }
    tracing::debug!(
        passes = passes.load(Ordering::Relaxed),
        collapsed = debouncer.collapsed(),
        "resize signals closed"
    );
}
