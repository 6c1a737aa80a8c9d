//! Preprocessing and encoding benchmark for a single request

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use example_codec::encode;
use feature_pipeline::{Preprocessor, RawRecord};
use feature_schema::{FeatureSchema, SchemaVersion};
use std::sync::Arc;

fn sample_request() -> RawRecord {
    RawRecord::new()
        .with("asn_number", "3352")
        .with("browser_major_version", "13")
        .with("browser_name", "safari")
        .with("country_code", "es")
        .with("osfamily", "iOS")
        .with("osmajor", "13")
}

fn bench_preprocess(c: &mut Criterion) {
    let schema = Arc::new(FeatureSchema::for_version(SchemaVersion::MwebJan2022V1).unwrap());
    let preprocessor = Preprocessor::new(schema);
    let raw = sample_request();

    c.bench_function("preprocess_jan_2022", |b| {
        b.iter(|| preprocessor.process(black_box(&raw)).unwrap())
    });
}

fn bench_preprocess_and_encode(c: &mut Criterion) {
    let mut g = c.benchmark_group("preprocess_and_encode");
    for version in SchemaVersion::ALL {
        let schema = Arc::new(FeatureSchema::for_version(version).unwrap());
        let preprocessor = Preprocessor::new(schema.clone());
        let raw = sample_request();
        g.bench_function(version.as_str(), |b| {
            b.iter(|| {
                let record = preprocessor.process(black_box(&raw)).unwrap();
                encode(&record, &schema).unwrap()
            })
        });
    }
    g.finish();
}

criterion_group!(benches, bench_preprocess, bench_preprocess_and_encode);
criterion_main!(benches);
