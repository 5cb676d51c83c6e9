// Criterion benchmarks for ISO Profiles

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use iso_profiles::core::filters::{ProfileFilter, SortOrder};
use iso_profiles::core::sanitize::sanitize_bio;
use iso_profiles::core::seed::generate_profiles;
use iso_profiles::models::Profile;
use chrono::{Duration, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn create_profiles(count: usize) -> Vec<Profile> {
    let mut rng = StdRng::seed_from_u64(7);
    let now = Utc::now();
    generate_profiles(count, &mut rng)
        .into_iter()
        .enumerate()
        .map(|(i, p)| p.into_profile(i as i64 + 1, now - Duration::minutes(i as i64)))
        .collect()
}

fn create_filter() -> ProfileFilter {
    ProfileFilter {
        location: Some("uk".to_string()),
        user_age: Some(28),
        marital_statuses: vec!["Single".to_string(), "Divorced".to_string()],
        gender: Some("Female".to_string()),
        ..Default::default()
    }
}

fn bench_filter_and_sort(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter_and_sort");
    let filter = create_filter();

    for size in [100, 1_000, 10_000] {
        let profiles = create_profiles(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &profiles, |b, profiles| {
            b.iter(|| {
                let mut matched: Vec<&Profile> = profiles
                    .iter()
                    .filter(|p| filter.matches(p))
                    .collect();
                matched.sort_by(|a, b| SortOrder::AgeAsc.compare(a, b));
                black_box(matched.len())
            });
        });
    }

    group.finish();
}

fn bench_sanitize_bio(c: &mut Criterion) {
    let bio = "<h2 style=\"color:red\">About me</h2><p>Practicing, <em>kind</em> and \
               <a href=\"https://example.com\" onclick=\"x()\">curious</a>.</p>\
               <script>alert(1)</script><ul><li>hiking</li><li>reading</li></ul>"
        .repeat(20);

    c.bench_function("sanitize_bio", |b| {
        b.iter(|| sanitize_bio(black_box(&bio)));
    });
}

criterion_group!(benches, bench_filter_and_sort, bench_sanitize_bio);
criterion_main!(benches);
