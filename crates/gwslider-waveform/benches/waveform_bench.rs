//! Benchmarks for waveform synthesis.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use gwslider_core::IntrinsicParams;
use gwslider_waveform::{RenderSpec, WaveformSpec, WaveformSynthesizer};

fn bench_synthesis(c: &mut Criterion) {
    let synth = WaveformSynthesizer::new(WaveformSpec::default()).unwrap();
    let params = IntrinsicParams::new(34.6, 30.0, 0.1, -0.2);

    c.bench_function("frequency_domain", |b| {
        b.iter(|| synth.frequency_domain(black_box(&params), 0.0).unwrap())
    });

    c.bench_function("time_domain", |b| {
        b.iter(|| synth.time_domain(black_box(&params), 0.0).unwrap())
    });

    let render = RenderSpec::default();
    c.bench_function("render_padded_template_32s", |b| {
        b.iter(|| {
            synth
                .render_padded_template(black_box(&params), &render, 4096.0, 32 * 4096, 16 * 4096)
                .unwrap()
        })
    });
}

criterion_group!(benches, bench_synthesis);
criterion_main!(benches);
