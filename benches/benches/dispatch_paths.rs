// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_event::dispatcher::Dispatcher;
use understory_event::event::Event;
use understory_event::types::{DomLookup, HandlerReturn, Listener};

/// Node `i` is the child of `i - 1`; node 0 is the document.
struct Chain;

impl DomLookup<u32> for Chain {
    fn parent_of(&self, node: &u32) -> Option<u32> {
        node.checked_sub(1)
    }

    fn is_document(&self, node: &u32) -> bool {
        *node == 0
    }
}

fn chain_with_listeners(depth: u32, per_node: u32) -> Dispatcher<u32, u32, Chain> {
    let d = Dispatcher::new(Chain);
    for node in 0..depth {
        let target = d.target(node);
        for i in 0..per_node {
            target.add_event_listener("click", node * 1000 + i, i % 2 == 0);
        }
    }
    d
}

fn count_invoker(
    count: &mut u64,
) -> impl FnMut(&Listener<u32>, &mut Event<u32>) -> Result<HandlerReturn, ()> + '_ {
    move |_: &Listener<u32>, _: &mut Event<u32>| {
        *count += 1;
        Ok(HandlerReturn::Undefined)
    }
}

fn bench_deep_paths(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch_chain");
    for &depth in &[8_u32, 64, 512] {
        let d = chain_with_listeners(depth, 4);
        group.throughput(Throughput::Elements(u64::from(depth) * 4));
        group.bench_function(format!("click_depth{}", depth), |b| {
            b.iter(|| {
                let mut count = 0;
                let mut ev = Event::new("click");
                let _ = d.dispatch(depth - 1, &mut ev, &mut count_invoker(&mut count));
                black_box(count)
            });
        });
    }
    group.finish();
}

fn bench_sparse_listeners(c: &mut Criterion) {
    // Only the target listens; ancestors have no registry for the type.
    let mut group = c.benchmark_group("dispatch_sparse");
    for &depth in &[8_u32, 64, 512] {
        let d: Dispatcher<u32, u32, Chain> = Dispatcher::new(Chain);
        d.target(depth - 1).add_event_listener("keydown", 1, false);
        group.bench_function(format!("keydown_depth{}", depth), |b| {
            b.iter(|| {
                let mut count = 0;
                let mut ev = Event::new("keydown");
                let _ = d.dispatch(depth - 1, &mut ev, &mut count_invoker(&mut count));
                black_box(count)
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_deep_paths, bench_sparse_listeners);
criterion_main!(benches);
