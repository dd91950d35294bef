use chrono::{TimeZone, Utc};
use chrono_tz::Tz;
use criterion::{criterion_group, criterion_main, Criterion};
use iso_duration::parse_duration;
use std::hint::black_box;

fn bench_parse(c: &mut Criterion) {
    let reference = Utc.with_ymd_and_hms(2023, 1, 1, 12, 0, 0).unwrap();
    let zoned = reference.with_timezone(&"America/New_York".parse::<Tz>().unwrap());

    let mut group = c.benchmark_group("parse_duration");
    for text in ["PT30S", "P2W", "PT1.5H", "P1Y2M3DT4H5M6S", "-P1DT2H"] {
        group.bench_function(text, |b| {
            b.iter(|| parse_duration(black_box(&reference), black_box(text)))
        });
    }
    group.bench_function("P1Y2M3DT4H5M6S/America/New_York", |b| {
        b.iter(|| parse_duration(black_box(&zoned), black_box("P1Y2M3DT4H5M6S")))
    });
    group.bench_function("rejected", |b| {
        b.iter(|| parse_duration(black_box(&reference), black_box("P1X")))
    });
    group.finish();
}

criterion_group!(benches, bench_parse);
criterion_main!(benches);
