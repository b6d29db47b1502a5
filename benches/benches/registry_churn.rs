// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_event::registry::ListenerRegistry;
use understory_event::types::Phase;

fn bench_add_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry");
    for &n in &[16_u32, 128, 1024] {
        group.throughput(Throughput::Elements(u64::from(n)));
        group.bench_function(format!("add_n{}", n), |b| {
            b.iter(|| {
                let r = ListenerRegistry::new();
                for i in 0..n {
                    r.add(i, i % 3 == 0);
                }
                black_box(r.len(Phase::AtTarget))
            });
        });
        group.bench_function(format!("remove_n{}", n), |b| {
            b.iter_batched(
                || {
                    let r = ListenerRegistry::new();
                    for i in 0..n {
                        r.add(i, false);
                    }
                    r
                },
                |r| {
                    for i in (0..n).rev() {
                        r.remove(&i, false);
                    }
                    black_box(r.is_empty())
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_snapshot(c: &mut Criterion) {
    let r = ListenerRegistry::new();
    for i in 0..64_u32 {
        r.add(i, i % 2 == 0);
    }
    r.set_property_handler(Some(1000));
    c.bench_function("registry/snapshot_bubbling", |b| {
        b.iter(|| black_box(r.listeners_for(Phase::Bubbling).len()));
    });
    c.bench_function("registry/replace_property_handler", |b| {
        let mut h = 1000_u32;
        b.iter(|| {
            h = h.wrapping_add(1);
            r.set_property_handler(Some(black_box(h)));
        });
    });
}

criterion_group!(benches, bench_add_remove, bench_snapshot);
criterion_main!(benches);
