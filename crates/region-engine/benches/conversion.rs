use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use region_engine::{
    authority, boundary, difference, CalendarUnit, ComponentDelta, Instant, Region, RegionDateTime,
};

fn conversion_benches(c: &mut Criterion) {
    let region = Region::new("gregorian", "America/New_York", "en_US").unwrap();
    let t: Instant = "2021-03-14T12:34:56.789Z".parse().unwrap();

    let mut group = c.benchmark_group("conversion");
    group.bench_function("to_civil", |b| {
        b.iter(|| authority::to_civil(black_box(&region), black_box(t)))
    });
    let civil = authority::to_civil(&region, t);
    group.bench_function("to_instant", |b| {
        b.iter(|| authority::to_instant(black_box(&region), black_box(&civil)))
    });
    group.finish();
}

fn arithmetic_benches(c: &mut Criterion) {
    let region = Region::new("gregorian", "Europe/Rome", "it_IT").unwrap();
    let t: Instant = "2021-01-31T08:00:00Z".parse().unwrap();
    let delta: ComponentDelta = "+1y2mo3d4h".parse().unwrap();

    let mut group = c.benchmark_group("arithmetic");
    group.bench_function("add_compound", |b| {
        b.iter(|| authority::add(black_box(&region), black_box(t), black_box(&delta)))
    });
    group.bench_function("start_of_week", |b| {
        b.iter(|| boundary::start_of(black_box(&region), black_box(t), CalendarUnit::WeekOfYear))
    });

    let from = RegionDateTime::new(t, Some(&region));
    let to = RegionDateTime::new("2024-07-15T18:30:00Z".parse().unwrap(), Some(&region));
    let units = [CalendarUnit::Year, CalendarUnit::Month, CalendarUnit::Day, CalendarUnit::Hour];
    group.bench_function("breakdown", |b| {
        b.iter(|| difference::breakdown(black_box(&from), black_box(&to), &units))
    });
    group.finish();
}

criterion_group!(benches, conversion_benches, arithmetic_benches);
criterion_main!(benches);
