//! Benchmarks for admission and dispatch throughput at scale.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use fitq::core::dispatch::Dispatcher;
use fitq::core::job::Job;
use fitq::core::queue::JobQueue;
use fitq::core::wire::WireResource;
use std::hint::black_box;
use std::sync::Arc;

/// Create a test job with a realistic elastic demand spread.
fn create_test_job(index: u32) -> Job {
    Job::builder()
        .name(format!("job-{index}"))
        .command(format!("python train.py --shard {}", index % 64))
        .cpu(0.5, (index % 4 + 1) as f64)
        .mem_mb(64, 128 * (index % 8 + 1) as u64)
        .build()
        .unwrap()
}

fn filled_queue(size: u32) -> JobQueue {
    let queue = JobQueue::new();
    for index in 0..size {
        let mut job = create_test_job(index);
        job.id = queue.issue_job_id();
        queue.push(job).unwrap();
    }
    queue
}

fn bench_pop_many(c: &mut Criterion) {
    let mut group = c.benchmark_group("pop_many_drain");
    for &size in &[1_000u32, 10_000, 100_000] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter_batched(
                || filled_queue(size),
                |queue| black_box(queue.pop_many(f64::MAX, u64::MAX)),
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_handle_offer(c: &mut Criterion) {
    let offer = vec![
        WireResource::scalar("cpus", 32.0),
        WireResource::scalar("mem", 65_536.0),
        WireResource::ranges("ports", [(31000, 32000)]),
    ];
    c.bench_function("handle_offer_10k_backlog", |b| {
        b.iter_batched(
            || Dispatcher::new(Arc::new(filled_queue(10_000))),
            |dispatcher| black_box(dispatcher.handle_offer(&offer).unwrap()),
            BatchSize::SmallInput,
        );
    });
}

fn bench_push_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("push");
    group.throughput(Throughput::Elements(10_000));
    group.bench_function("10k_jobs", |b| {
        b.iter_batched(
            JobQueue::new,
            |queue| {
                for index in 0..10_000 {
                    let mut job = create_test_job(index);
                    job.id = queue.issue_job_id();
                    queue.push(job).unwrap();
                }
                queue
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_pop_many,
    bench_handle_offer,
    bench_push_throughput
);
criterion_main!(benches);
