use criterion::{black_box, criterion_group, criterion_main, Criterion};

use logpulse::engine::summarize;
use logpulse::source::ReadReport;

fn synthetic_log(lines: usize) -> String {
    const METHODS: [&str; 4] = ["GET", "POST", "PUT", "DELETE"];
    const STATUSES: [u16; 5] = [200, 201, 404, 401, 500];

    (0..lines)
        .map(|i| {
            format!(
                "2025-08-14 10:{:02}:{:02},{:03} - INFO - {} /api/v1/books/{} status={} {}.{:03}s\n",
                (i / 3600) % 60,
                (i / 60) % 60,
                i % 1000,
                METHODS[i % METHODS.len()],
                i % 97,
                STATUSES[i % STATUSES.len()],
                i % 3,
                i % 1000,
            )
        })
        .collect()
}

fn bench_parse_and_summarize(c: &mut Criterion) {
    let text = synthetic_log(50_000);

    c.bench_function("parse 50k lines", |b| {
        b.iter(|| ReadReport::from_text(black_box(&text)))
    });

    let events = ReadReport::from_text(&text).events;
    c.bench_function("summarize 50k events", |b| {
        b.iter(|| summarize(black_box(&events)))
    });
}

criterion_group!(benches, bench_parse_and_summarize);
criterion_main!(benches);
