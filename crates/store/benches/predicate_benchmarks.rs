use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chrono::Utc;
use globaltrade_catalog::{
    FilterCriteria, Predicate, Product, ProductListing, ProductStatus, SellerSummary,
    build_predicates,
};
use globaltrade_core::{ProductId, UserId};

fn listing(i: usize) -> ProductListing {
    ProductListing {
        product: Product {
            id: ProductId::new(),
            seller_id: UserId::new(),
            title: format!("Industrial bearings lot {i}"),
            description: Some("Sealed ball bearings, bulk packed".to_string()),
            price: Some((i % 500) as f64),
            currency: "USD".to_string(),
            minimum_order_quantity: Some(1000),
            unit: Some("piece".to_string()),
            origin_country: Some(if i % 2 == 0 { "Germany" } else { "China" }.to_string()),
            hs_code: Some(format!("8482.{:02}", i % 90)),
            category_id: None,
            status: if i % 7 == 0 {
                ProductStatus::Draft
            } else {
                ProductStatus::Active
            },
            featured: i % 5 == 0,
            created_at: Utc::now(),
        },
        seller: Some(SellerSummary {
            full_name: Some("Alex Chen".to_string()),
            company_name: Some("Chen Trading Co".to_string()),
            country: Some("China".to_string()),
            verified: i % 3 == 0,
        }),
        category_name: None,
    }
}

fn full_criteria() -> FilterCriteria {
    FilterCriteria {
        search: Some("bearing".to_string()),
        category: None,
        country: Some("china".to_string()),
        min_price: Some("10".to_string()),
        max_price: Some("400".to_string()),
        verified_only: true,
        featured_only: false,
    }
}

fn bench_predicate_evaluation(c: &mut Criterion) {
    let mut group = c.benchmark_group("predicate_evaluation");

    for size in [100usize, 1_000, 10_000] {
        let listings: Vec<ProductListing> = (0..size).map(listing).collect();
        let predicates = build_predicates(&full_criteria());

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("full_filter", size), &listings, |b, ls| {
            b.iter(|| {
                let matched = ls
                    .iter()
                    .filter(|l| predicates.iter().all(|p| p.matches(black_box(l))))
                    .count();
                black_box(matched)
            })
        });
    }

    group.finish();
}

fn bench_predicate_construction(c: &mut Criterion) {
    let criteria = full_criteria();
    c.bench_function("build_predicates", |b| {
        b.iter(|| black_box(build_predicates(black_box(&criteria))))
    });

    let empty = FilterCriteria::default();
    c.bench_function("build_predicates_empty", |b| {
        b.iter(|| {
            let predicates = build_predicates(black_box(&empty));
            assert_eq!(predicates, vec![Predicate::Status(ProductStatus::Active)]);
            black_box(predicates)
        })
    });
}

criterion_group!(
    benches,
    bench_predicate_evaluation,
    bench_predicate_construction
);
criterion_main!(benches);
