// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::Size;
use understory_priority_nav::fit::{WidthSnapshot, attached_nodes_fit, fit_pass, plan};
use understory_priority_nav::surface::{ElementId, LocalElement, Surface};
use understory_priority_nav::{MenuNode, NavOptions, build_tree, render};

fn gen_widths(n: usize) -> Vec<Option<f64>> {
    (0..n).map(|i| Some(60.0 + (i % 7) as f64 * 15.0)).collect()
}

fn mounted(n: usize, host_width: f64) -> (MenuNode<ElementId>, Surface, ElementId) {
    let mut surface = Surface::new(Size::new(1280.0, 800.0));
    let host = surface.insert(None, LocalElement::tag("nav").with_width(host_width));
    let row = surface.insert(Some(host), LocalElement::tag("ul"));
    for (i, w) in gen_widths(n).into_iter().enumerate() {
        let li = surface.insert(Some(row), LocalElement::tag("li").with_width(w.unwrap_or(0.0)));
        surface.insert(
            Some(li),
            LocalElement::tag("a")
                .with_href(&format!("/{i}"))
                .with_text(&format!("Item {i}")),
        );
    }
    let items = surface.extract_items(row, "li");
    let mut root = build_tree(items, NavOptions::default().with_container(host));
    render(&mut root, &mut surface).unwrap();
    (root, surface, host)
}

fn bench_boundary(c: &mut Criterion) {
    let mut group = c.benchmark_group("boundary");
    for &n in &[8_usize, 64, 512] {
        let widths = gen_widths(n);
        let available = n as f64 * 45.0;
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("attached_nodes_fit_{n}"), |b| {
            b.iter(|| black_box(attached_nodes_fit(black_box(&widths), available, 3)));
        });
        let snapshot = WidthSnapshot {
            viewport_width: 1280.0,
            available_width: available,
            item_widths: widths.clone(),
        };
        let options: NavOptions<ElementId> = NavOptions::default();
        group.bench_function(format!("plan_{n}"), |b| {
            b.iter(|| black_box(plan(black_box(&snapshot), &options)));
        });
    }
    group.finish();
}

fn bench_fit_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("fit_pass");
    for &n in &[8_usize, 64] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("steady_{n}"), |b| {
            let (mut root, mut surface, _) = mounted(n, n as f64 * 45.0);
            b.iter(|| black_box(fit_pass(&mut root, &mut surface)));
        });
        group.bench_function(format!("resize_{n}"), |b| {
            b.iter_batched(
                || mounted(n, n as f64 * 90.0),
                |(mut root, mut surface, host)| {
                    surface.set_width(host, n as f64 * 30.0);
                    black_box(fit_pass(&mut root, &mut surface))
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_boundary, bench_fit_pass);
criterion_main!(benches);
