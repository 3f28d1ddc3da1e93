// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Debounce a burst of resize signals into a single fit pass.
//!
//! Timestamps are supplied by the caller, so this runs without a clock.
//!
//! Run:
//! - `cargo run -p understory_priority_nav_demos --example priority_nav_resize`

use std::time::Duration;

use kurbo::Size;
use understory_priority_nav::surface::{LocalElement, Surface};
use understory_priority_nav::{NavOptions, WatchOptions, build_tree, render, watch};

fn main() {
    let mut surface = Surface::new(Size::new(1280.0, 800.0));
    let host = surface.insert(None, LocalElement::tag("nav").with_width(1000.0));
    let row = surface.insert(Some(host), LocalElement::tag("ul"));
    for i in 0..8 {
        let li = surface.insert(Some(row), LocalElement::tag("li").with_width(100.0));
        surface.insert(
            Some(li),
            LocalElement::tag("a")
                .with_href(&format!("/section/{i}"))
                .with_text(&format!("Section {i}")),
        );
    }

    let options = NavOptions::default()
        .with_container(host)
        .with_debounce(Duration::from_millis(150));
    let mut root = build_tree(surface.extract_items(row, "li"), options);
    render(&mut root, &mut surface).expect("menu markup parses");
    let mut watcher = watch(&mut root, &mut surface, WatchOptions::default());

    // A window drag: one signal every 16ms while the container shrinks.
    let mut now = Duration::ZERO;
    for width in (450..=1000).rev().step_by(50) {
        surface.set_width(host, f64::from(width));
        watcher.on_resize(now);
        if let Some(report) = watcher.poll(now, &mut root, &mut surface) {
            println!("{now:?}: unexpected early pass {report:?}");
        }
        now += Duration::from_millis(16);
    }

    let due = watcher.next_deadline().expect("a pass is pending");
    let report = watcher
        .poll(due, &mut root, &mut surface)
        .expect("deadline reached");
    println!(
        "{} signals collapsed into {} pass; boundary {:?}, {} hidden",
        watcher.collapsed() + 1,
        watcher.passes(),
        report.boundary,
        report.hidden
    );
    assert_eq!(watcher.passes(), 1);
    assert_eq!(report.boundary, Some(4));
}
