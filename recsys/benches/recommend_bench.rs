use criterion::{criterion_group, criterion_main, Criterion};
use recsys::{QueryService, Record, SimilarityIndex};

const GENRES: &[&str] = &[
    "action", "adventure", "comedy", "crime", "drama", "family", "fantasy", "horror",
    "musical", "mystery", "romance", "sport", "thriller", "war", "biography", "history",
];

fn catalogue(n: usize) -> Vec<Record> {
    (0..n)
        .map(|i| {
            let genre = format!("{} {} {}", GENRES[i % GENRES.len()], GENRES[(i / 3) % GENRES.len()], GENRES[(i * 7) % GENRES.len()]);
            Record::new(format!("Movie {i}"), genre)
        })
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let records = catalogue(1000);
    c.bench_function("build_index_1000", |b| b.iter(|| SimilarityIndex::build(&records).unwrap()));
}

fn bench_recommend(c: &mut Criterion) {
    let service = QueryService::new(SimilarityIndex::build(&catalogue(2000)).unwrap());
    c.bench_function("recommend_top5_2000", |b| b.iter(|| service.recommend("Movie 42", 5)));
}

criterion_group!(benches, bench_build, bench_recommend);
criterion_main!(benches);
