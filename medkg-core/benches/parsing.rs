//! Benchmark for corpus parsing and export preparation.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use medkg_core::exporter::clean_entity_names;
use medkg_core::parser::{parse_str, split_drug_detail};

fn sample_corpus(records: usize) -> String {
    let mut out = String::new();
    for i in 0..records {
        out.push_str(&format!(
            concat!(
                r#"{{"name":"疾病{i}","desc":"描述{i}","symptom":["发热","咳嗽","症状{i}"],"#,
                r#""acompany":["并发症{i}"],"cure_department":["内科","呼吸内科"],"#,
                r#""common_drug":["阿莫西林"],"not_eat":["辣椒"],"do_eat":["鸡蛋"],"#,
                r#""check":["血常规"],"drug_detail":["某药厂阿莫西林(阿莫西林)","板蓝根颗粒"]}}"#,
                "\n"
            ),
            i = i
        ));
    }
    out
}

fn bench_parse_corpus(c: &mut Criterion) {
    let corpus = sample_corpus(1_000);
    c.bench_function("parse_1000_records", |b| {
        b.iter(|| parse_str(black_box(&corpus)))
    });
}

fn bench_split_drug_detail(c: &mut Criterion) {
    c.bench_function("split_drug_detail", |b| {
        b.iter(|| split_drug_detail(black_box("北京同仁堂感冒清热颗粒(感冒清热颗粒)")))
    });
}

fn bench_clean_entity_names(c: &mut Criterion) {
    let names: Vec<String> = (0..10_000).map(|i| format!("...症状{}", i % 500)).collect();
    c.bench_function("clean_10000_names", |b| {
        b.iter(|| clean_entity_names(black_box(&names)).len())
    });
}

criterion_group!(
    benches,
    bench_parse_corpus,
    bench_split_drug_detail,
    bench_clean_entity_names
);
criterion_main!(benches);
