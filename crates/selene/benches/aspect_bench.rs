use criterion::{black_box, criterion_group, criterion_main, Criterion};
use selene::aspects::{
    audit_chart, AspectCalculator, AspectDefinition, AspectEvaluator, AspectSettings, BodyState,
    ChartBody, ChartPositions,
};

fn bench_evaluate(c: &mut Criterion) {
    let evaluator = AspectEvaluator::default();
    let moon = BodyState::new(299.5956, 11.9326, true).unwrap();
    let other = BodyState::new(216.6997, 1.1759, false).unwrap();
    let trine = AspectDefinition::trine();

    c.bench_function("authoritative", |b| {
        b.iter(|| evaluator.authoritative(black_box(&moon), black_box(&other), black_box(&trine)))
    });

    c.bench_function("is_applying_enhanced", |b| {
        b.iter(|| {
            evaluator.is_applying_enhanced(black_box(&other), black_box(&moon), black_box(&trine))
        })
    });
}

fn ten_body_chart() -> ChartPositions {
    let mut bodies: Vec<ChartBody> = (0..9)
        .map(|i| {
            ChartBody::new(
                &format!("body_{}", i),
                (i as f64) * 30.0 + 1.5,
                if i % 3 == 0 { -0.2 } else { 1.0 },
            )
        })
        .collect();
    bodies.push(ChartBody::new("moon", 62.0, 13.1));
    ChartPositions {
        label: "bench".to_string(),
        bodies,
    }
}

fn bench_chart_scan(c: &mut Criterion) {
    let calculator = AspectCalculator::default();
    let settings = AspectSettings::default();
    let chart = ten_body_chart();

    c.bench_function("find_aspects", |b| {
        b.iter(|| calculator.find_aspects(black_box(&chart), black_box(&settings)))
    });

    c.bench_function("audit_chart", |b| {
        b.iter(|| audit_chart(black_box(&calculator), black_box(&chart), black_box(&settings)))
    });
}

criterion_group!(benches, bench_evaluate, bench_chart_scan);
criterion_main!(benches);
