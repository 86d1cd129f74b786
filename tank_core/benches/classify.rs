use criterion::{Criterion, black_box, criterion_group, criterion_main};
use tank_core::{BuzzerCfg, Thresholds, evaluate, resolve};

fn bench_classify(c: &mut Criterion) {
    let t = Thresholds::default();
    let cfg = BuzzerCfg::default();

    c.bench_function("classify+resolve", |b| {
        let mut d = 0.0f32;
        b.iter(|| {
            d = (d + 7.3) % 600.0;
            let fill = t.fill(black_box(d));
            let quality = t.quality(black_box(7.2), black_box(480.0));
            black_box(resolve(fill, quality, &cfg))
        })
    });

    c.bench_function("evaluate_frames", |b| {
        b.iter(|| black_box(evaluate(black_box(350.0), 9.0, 200.0, &t, &cfg)))
    });
}

criterion_group!(benches, bench_classify);
criterion_main!(benches);
