use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use domainr_rs::decode::decode_body;
use domainr_rs::{DomainInfo, DomainrConfig, Endpoint, SearchResult};

fn create_search_body(candidates: usize) -> Vec<u8> {
    let results: Vec<serde_json::Value> = (0..candidates)
        .map(|i| {
            serde_json::json!({
                "domain": format!("example{}.com", i),
                "host": "",
                "path": "",
                "subdomain": format!("example{}.", i),
                "availability": if i % 2 == 0 { "available" } else { "taken" },
                "register_url": format!("http://domai.nr/example{}.com/register", i),
            })
        })
        .collect();
    serde_json::to_vec(&serde_json::json!({ "query": "example", "results": results })).unwrap()
}

fn create_info_body(registrars: usize) -> Vec<u8> {
    let registrars: Vec<serde_json::Value> = (0..registrars)
        .map(|i| {
            serde_json::json!({
                "registrar": format!("registrar{}.com", i),
                "name": format!("Registrar {}", i),
                "register_url": format!("http://domai.nr/example.com/register/registrar{}.com", i),
            })
        })
        .collect();
    serde_json::to_vec(&serde_json::json!({
        "query": "example.com",
        "domain": "example.com",
        "tld": { "domain": "com", "iana_url": "http://www.iana.org/domains/root/db/com.html" },
        "availability": "taken",
        "registrars": registrars,
    }))
    .unwrap()
}

pub fn decode_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    for size in [1, 10, 100] {
        let body = create_search_body(size);
        group.bench_with_input(BenchmarkId::new("search", size), &body, |b, body| {
            b.iter(|| {
                let _ = decode_body::<SearchResult>(body);
            });
        });

        let body = create_info_body(size);
        group.bench_with_input(BenchmarkId::new("info", size), &body, |b, body| {
            b.iter(|| {
                let _ = decode_body::<DomainInfo>(body);
            });
        });
    }

    group.finish();
}

pub fn request_url_benchmark(c: &mut Criterion) {
    let config = DomainrConfig::default().with_client_id("bench-client");
    c.bench_function("request_url", |b| {
        b.iter(|| config.request_url(Endpoint::Search, "rust programming language"));
    });
}

criterion_group!(
    benches,
    decode_benchmark,
    request_url_benchmark
);
criterion_main!(benches);
