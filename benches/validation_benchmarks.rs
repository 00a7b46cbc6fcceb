//! # Validation Performance Benchmarks
//!
//! Benchmarks for the hot paths of the validation engine:
//! - Checksum validators (CPF/CNPJ) on bare and formatted input
//! - Cached-regex format validators
//! - Full engine passes over growing rule sets

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::collections::HashMap;

use fieldcheck::prelude::*;
use fieldcheck::validators;

/// Build a rule set that alternates over the whole catalogue.
fn generate_rules(size: usize) -> RuleSet {
    let mut rules = RuleSet::new();
    for i in 0..size {
        let rule = match i % 5 {
            0 => FieldRule::new()
                .value("11144477735")
                .kind(ValidatorKind::Cpf),
            1 => FieldRule::new()
                .value(format!("user{}@example.com", i))
                .kind(ValidatorKind::Email),
            2 => FieldRule::new()
                .value(format!("{}", 18 + i % 50))
                .kind(ValidatorKind::Integer)
                .gte(18.0)
                .lt(130.0),
            3 => FieldRule::new()
                .value("$1.234,56")
                .kind(ValidatorKind::Money)
                .gt(0.0),
            _ => FieldRule::new()
                .value("09435-470")
                .kind(ValidatorKind::Zipcode),
        };
        rules.insert(format!("field_{}", i), rule);
    }
    rules
}

pub fn benchmark_document_checksums(c: &mut Criterion) {
    let mut group = c.benchmark_group("document_checksums");

    group.bench_function("cpf_bare", |b| {
        b.iter(|| black_box(validators::cpf("document", black_box("11144477735"))))
    });
    group.bench_function("cpf_formatted", |b| {
        b.iter(|| black_box(validators::cpf("document", black_box("111.444.777-35"))))
    });
    group.bench_function("cnpj", |b| {
        b.iter(|| black_box(validators::cnpj("company", black_box("11.222.333/0001-81"))))
    });
    group.bench_function("cpf_or_cnpj_routing", |b| {
        b.iter(|| black_box(validators::cpf_or_cnpj("document", black_box("11144477735"))))
    });

    group.finish();
}

pub fn benchmark_format_validators(c: &mut Criterion) {
    let mut group = c.benchmark_group("format_validators");
    let rule = FieldRule::new();

    group.bench_function("email", |b| {
        b.iter(|| black_box(validators::email("mail", black_box("user@example.com"))))
    });
    group.bench_function("money_with_bounds", |b| {
        let rule = FieldRule::new().gt(0.0).lte(10_000.0);
        b.iter(|| black_box(validators::money("price", black_box("$1.234,56"), &rule)))
    });
    group.bench_function("person_name", |b| {
        b.iter(|| {
            black_box(validators::person_name(
                "name",
                black_box("José da Silva-Araújo Jr."),
                &rule,
            ))
        })
    });

    group.finish();
}

pub fn benchmark_engine_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine_pass");

    for size in [10, 100, 1000].iter() {
        let rules = generate_rules(*size);

        group.bench_with_input(BenchmarkId::new("inline_values", size), &rules, |b, rules| {
            b.iter(|| {
                let mut engine = ValidationEngine::new(rules.clone());
                black_box(engine.validate())
            })
        });
    }

    // Resolution through a HashMap source instead of inline values.
    let mut source = HashMap::new();
    let mut rules = RuleSet::new();
    for i in 0..100 {
        let id = format!("field_{}", i);
        source.insert(id.clone(), "11144477735".to_string());
        rules.insert(id, FieldRule::new().kind(ValidatorKind::Cpf));
    }
    group.bench_function("source_resolution_100", |b| {
        b.iter(|| {
            let mut engine = ValidationEngine::with_source(rules.clone(), source.clone());
            black_box(engine.validate())
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_document_checksums,
    benchmark_format_validators,
    benchmark_engine_pass
);
criterion_main!(benches);
