// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mount a priority navigation on a headless surface and fit it at a few widths.
//!
//! Run:
//! - `cargo run -p understory_priority_nav_demos --example priority_nav_basics`

use kurbo::Size;
use understory_priority_nav::fit::fit_pass;
use understory_priority_nav::surface::{ElementId, LocalElement, Surface};
use understory_priority_nav::{MenuNode, NavOptions, WatchOptions, build_tree, render, watch};

const LINKS: &[(&str, &str, f64)] = &[
    ("/", "Home", 80.0),
    ("/products", "Products", 120.0),
    ("/pricing", "Pricing", 100.0),
    ("/docs", "Documentation", 160.0),
    ("/blog", "Blog", 70.0),
    ("/about", "About us", 110.0),
];

fn print_row(label: &str, root: &MenuNode<ElementId>) {
    let inline: Vec<&str> = root
        .children()
        .iter()
        .filter(|c| c.is_visible())
        .map(MenuNode::title)
        .collect();
    let overflow: Vec<&str> = root
        .children()
        .iter()
        .filter(|c| !c.is_visible())
        .map(MenuNode::title)
        .collect();
    println!("{label:>10}: inline {inline:?} | more {overflow:?}");
}

fn main() {
    let mut surface = Surface::new(Size::new(1280.0, 800.0));
    let host = surface.insert(None, LocalElement::tag("nav").with_width(600.0));
    let row = surface.insert(Some(host), LocalElement::tag("ul"));
    for (href, title, width) in LINKS {
        let li = surface.insert(Some(row), LocalElement::tag("li").with_width(*width));
        surface.insert(
            Some(li),
            LocalElement::tag("a").with_href(href).with_text(title),
        );
    }

    let items = surface.extract_items(row, "li");
    let mut root = build_tree(items, NavOptions::default().with_container(host));
    let markup = render(&mut root, &mut surface).expect("menu markup parses");
    println!("Rendered overflow menu:\n{markup}\n");

    let report = watch(&mut root, &mut surface, WatchOptions { once: true })
        .last_report()
        .expect("container is mounted");
    assert_eq!(report.hidden, 1);
    print_row("600px", &root);

    for width in [500.0, 300.0, 1000.0] {
        surface.set_width(host, width);
        let report = fit_pass(&mut root, &mut surface).expect("container is mounted");
        print_row(&format!("{width}px"), &root);
        println!("{:>10}  boundary={:?} state={:?}", "", report.boundary, report.state);
    }

    surface.set_viewport(Size::new(360.0, 640.0));
    let report = fit_pass(&mut root, &mut surface).expect("container is mounted");
    assert!(report.control_visible());
    print_row("mobile", &root);
}
