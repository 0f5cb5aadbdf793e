use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use facetdex::seed::{catalog_documents, seed_catalog};
use facetdex::{Index, SearchParams};
use tempfile::TempDir;

fn seeded_index(num_docs: usize) -> (TempDir, Index) {
    let temp = TempDir::new().unwrap();
    let index = Index::open(temp.path().join("bench.db")).unwrap();
    seed_catalog(&index, num_docs, 42).unwrap();
    (temp, index)
}

fn bench_search(c: &mut Criterion) {
    let (_temp, index) = seeded_index(5000);

    let mut group = c.benchmark_group("search");
    group.throughput(Throughput::Elements(5000));

    group.bench_function("default_sort", |b| {
        b.iter(|| index.search(&SearchParams::new().size(48)).unwrap())
    });

    group.bench_function("single_filter", |b| {
        b.iter(|| {
            index
                .search(&SearchParams::new().sort_by("price").filter("material:wood"))
                .unwrap()
        })
    });

    group.bench_function("two_filters_desc", |b| {
        b.iter(|| {
            index
                .search(
                    &SearchParams::new()
                        .sort_by("price")
                        .filter("material:wood")
                        .filter("color:red")
                        .descending(),
                )
                .unwrap()
        })
    });

    group.bench_function("deep_cursor", |b| {
        let first = index
            .search(&SearchParams::new().sort_by("price").size(1000))
            .unwrap();
        let cursor = facetdex::Cursor::after_hit(first.last().unwrap());
        b.iter(|| {
            index
                .search(&SearchParams::new().sort_by("price").cursor(cursor))
                .unwrap()
        })
    });

    group.finish();
}

fn bench_aggregations(c: &mut Criterion) {
    let (_temp, index) = seeded_index(5000);

    let mut group = c.benchmark_group("aggregations");

    group.bench_function("root", |b| b.iter(|| index.aggregations(&[]).unwrap()));

    group.bench_function("under_material", |b| {
        let filters = vec!["material:wood".to_string()];
        b.iter(|| index.aggregations(&filters).unwrap())
    });

    group.bench_function("results_combined", |b| {
        let params = SearchParams::new()
            .sort_by("price")
            .filter("material:wood")
            .size(24);
        b.iter(|| index.results(&params).unwrap())
    });

    group.finish();
}

fn bench_indexing(c: &mut Criterion) {
    let mut group = c.benchmark_group("indexing");

    for batch_size in [10, 100, 500] {
        group.bench_with_input(
            BenchmarkId::new("upsert", batch_size),
            &batch_size,
            |b, &size| {
                b.iter_batched(
                    || {
                        let index = Index::open_in_memory().unwrap();
                        (index, catalog_documents(size, 7))
                    },
                    |(index, docs)| {
                        for doc in &docs {
                            index.upsert(doc).unwrap();
                        }
                    },
                    criterion::BatchSize::SmallInput,
                )
            },
        );
    }

    group.finish();
}

fn bench_rebuild(c: &mut Criterion) {
    let (_temp, index) = seeded_index(2000);

    c.bench_function("rebuild_2k_docs", |b| b.iter(|| index.rebuild().unwrap()));
}

criterion_group!(
    benches,
    bench_search,
    bench_aggregations,
    bench_indexing,
    bench_rebuild
);
criterion_main!(benches);
