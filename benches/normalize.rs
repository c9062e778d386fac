/// Benchmarks for envelope normalization, the step every response goes through.
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use serde_json::{Value, json};
use sportmonks_client::normalize::{Normalized, normalize};

fn fixture(id: u64) -> Value {
    json!({
        "id": id,
        "league_id": 8,
        "season_id": 16036,
        "scores": {"localteam_score": 2, "visitorteam_score": 1, "ft_score": "2-1"},
        "localTeam": {"data": {"id": 18, "name": "Chelsea", "country_id": 462}},
        "visitorTeam": {"data": {"id": 19, "name": "Arsenal", "country_id": 462}},
        "goals": {"data": [
            {"id": 1, "player_id": 1, "minute": 12, "player": {"data": {"id": 1}}},
            {"id": 2, "player_id": 2, "minute": 55, "player": {"data": {"id": 2}}},
            {"id": 3, "player_id": 3, "minute": 80, "player": {"data": {"id": 3}}}
        ]},
        "odds": {"data": [{"id": 1, "name": "3Way Result", "bookmaker": {"data": [
            {"id": 2, "name": "bet365", "odds": {"data": [
                {"label": "1", "value": "2.10"},
                {"label": "X", "value": "3.40"},
                {"label": "2", "value": "3.60"}
            ]}}
        ]}}]}
    })
}

fn body(fixtures: u64) -> Value {
    json!({
        "data": (0..fixtures).map(fixture).collect::<Vec<_>>(),
        "meta": {"pagination": {"current_page": 1, "total_pages": 1}}
    })
}

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize/fixtures");

    for size in [1_u64, 25, 100] {
        let body = body(size);
        group.throughput(Throughput::Elements(size));
        group.bench_with_input(BenchmarkId::new("try_from_body", size), &body, |b, body| {
            b.iter(|| {
                Normalized::try_from_body(std::hint::black_box(body.clone()))
                    .expect("Normalization should succeed")
            });
        });
    }

    let normalized = normalize(body(25)).expect("Normalization should succeed");
    group.bench_function("already_normalized", |b| {
        b.iter(|| {
            normalize(std::hint::black_box(normalized.clone())).expect("Normalization should succeed")
        });
    });

    group.finish();
}

criterion_group!(normalize_benches, bench_normalize);
criterion_main!(normalize_benches);
