use std::hint::black_box;
use std::time::Duration;

use caption_helper_core::VttConversionOptions;
use criterion::{Criterion, criterion_group, criterion_main};
use webvtt_processor::{convert_webvtt, parse_webvtt};

const SAMPLE_VTT: &str = include_str!("../tests/test_data/real_world.vtt");

fn benchmark_webvtt(c: &mut Criterion) {
    let mut group = c.benchmark_group("WebVTT Processing");

    group.measurement_time(Duration::from_secs(20));
    group.sample_size(200);

    group.bench_function("parse_real_world_vtt", |b| {
        b.iter(|| {
            let vtt = parse_webvtt(black_box(SAMPLE_VTT)).expect("样本解析失败");

            black_box(vtt);
        });
    });

    let default_options = VttConversionOptions::default();

    group.bench_function("convert_real_world_vtt", |b| {
        b.iter(|| {
            let doc = convert_webvtt(black_box(SAMPLE_VTT), black_box(&default_options))
                .expect("样本转换失败");

            black_box(doc);
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_webvtt);

criterion_main!(benches);
