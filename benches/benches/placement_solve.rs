// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_placement::{
    PlacementRequest, Rect, Side, Size, ViewportRegion, preference_order, solve,
};

const VIEWPORT: Rect = Rect::new(0, 0, 1080, 1920);

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_i32(&mut self, bound: i32) -> i32 {
        (self.next_u64() % bound as u64) as i32
    }
}

/// Anchors scattered over the viewport, including its edges.
fn gen_anchors(count: usize, seed: u64) -> Vec<Rect> {
    let mut rng = Rng::new(seed);
    (0..count)
        .map(|_| {
            let x = rng.next_i32(VIEWPORT.right);
            let y = rng.next_i32(VIEWPORT.bottom);
            let w = 8 + rng.next_i32(200);
            let h = 8 + rng.next_i32(120);
            Rect::new(x, y, x + w, y + h)
        })
        .collect()
}

fn bench_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve");
    let anchors = gen_anchors(1024, 0x9e37_79b9_7f4a_7c15);
    let viewport = ViewportRegion::new(VIEWPORT, 72);
    group.throughput(Throughput::Elements(anchors.len() as u64));

    for (label, content) in [
        ("small", Size::new(120, 48)),
        ("wide", Size::new(900, 80)),
        ("oversized", Size::new(1200, 400)),
    ] {
        for side in [Side::Bottom, Side::Left] {
            let order = preference_order(side);
            group.bench_function(format!("clamped_{label}_{side:?}"), |b| {
                b.iter(|| {
                    for anchor in &anchors {
                        let solution = solve(&PlacementRequest {
                            anchor: *anchor,
                            content,
                            preference: &order,
                            viewport,
                            clamp_to_edges: true,
                            arrow_padding: Some(30),
                        });
                        black_box(solution);
                    }
                });
            });
        }
    }

    let order = [Side::Bottom];
    group.bench_function("unclamped", |b| {
        b.iter(|| {
            for anchor in &anchors {
                let solution = solve(&PlacementRequest {
                    anchor: *anchor,
                    content: Size::new(120, 48),
                    preference: &order,
                    viewport,
                    clamp_to_edges: false,
                    arrow_padding: None,
                });
                black_box(solution);
            }
        });
    });
    group.finish();
}

criterion_group!(benches, bench_solve);
criterion_main!(benches);
