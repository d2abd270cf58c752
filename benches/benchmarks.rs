use criterion::{black_box, criterion_group, criterion_main, Criterion};

use calpat::{Calculator, Pattern, RangeEdge};
use jiff::civil::Weekday;
use jiff::tz::TimeZone;
use jiff::Zoned;

fn fixed_now() -> Zoned {
    jiff::civil::date(2026, 2, 6)
        .at(12, 0, 0, 0)
        .to_zoned(TimeZone::UTC)
        .unwrap()
}

// ---------------------------------------------------------------------------
// Single-pattern searches
// ---------------------------------------------------------------------------

fn bench_pattern(c: &mut Criterion) {
    let mut group = c.benchmark_group("pattern");
    let now = fixed_now();

    let hour = Pattern::hour(9).unwrap();
    group.bench_function("hour_next", |b| {
        b.iter(|| hour.next(black_box(&now), &TimeZone::UTC).unwrap());
    });

    // Day 31 from early February rolls past the short month.
    let day = Pattern::day(31).unwrap();
    group.bench_function("day_next_short_month_skip", |b| {
        b.iter(|| day.next(black_box(&now), &TimeZone::UTC).unwrap());
    });

    let weekday = Pattern::day_of_week(Weekday::Monday);
    group.bench_function("weekday_previous", |b| {
        b.iter(|| weekday.previous(black_box(&now), &TimeZone::UTC).unwrap());
    });

    let tz = TimeZone::get("Europe/Berlin").unwrap();
    let before_gap = jiff::civil::date(2026, 3, 29)
        .at(1, 0, 0, 0)
        .to_zoned(tz.clone())
        .unwrap();
    let gap_hour = Pattern::hour(2).unwrap();
    group.bench_function("hour_next_across_dst_gap", |b| {
        b.iter(|| gap_hour.next(black_box(&before_gap), &tz).unwrap());
    });

    group.finish();
}

// ---------------------------------------------------------------------------
// Convergence
// ---------------------------------------------------------------------------

fn bench_calculator(c: &mut Criterion) {
    let mut group = c.benchmark_group("calculator");
    let now = fixed_now();

    let payday = [Pattern::day(28).unwrap(), Pattern::hour(9).unwrap()];
    group.bench_function("day_and_hour", |b| {
        b.iter(|| {
            Calculator::next(&payday, black_box(&now), &TimeZone::UTC)
                .unwrap()
                .unwrap()
        });
    });

    // Converges only on leap years, so the day proposals roll for years.
    let leap_day = [Pattern::month(2).unwrap(), Pattern::day(29).unwrap()];
    group.bench_function("leap_day", |b| {
        b.iter(|| {
            Calculator::next(&leap_day, black_box(&now), &TimeZone::UTC)
                .unwrap()
                .unwrap()
        });
    });

    let full_date = [
        Pattern::year(2030).unwrap(),
        Pattern::month(5).unwrap(),
        Pattern::day(12).unwrap(),
        Pattern::hour(9).unwrap(),
        Pattern::minute(30).unwrap(),
    ];
    group.bench_function("full_date_aligned", |b| {
        b.iter(|| {
            Calculator::next_aligned(
                &full_date,
                black_box(&now),
                &TimeZone::UTC,
                RangeEdge::Beginning,
            )
            .unwrap()
            .unwrap()
        });
    });

    group.finish();
}

criterion_group!(benches, bench_pattern, bench_calculator);
criterion_main!(benches);
