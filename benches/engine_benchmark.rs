use std::f64::consts::PI;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use chord_detection::{
    chord::match_pitch_classes,
    detector::{yin::YINDetector, PitchDetector},
    note::PitchClass,
    pipeline::ChordPipeline,
    transform::Radix2Fft,
};

const SAMPLE_RATE: usize = 44100;
const SIZE: usize = 4096;

fn tones(freqs: &[f64]) -> Vec<f64> {
    let dt = 1.0 / SAMPLE_RATE as f64;
    (0..SIZE)
        .map(|x| {
            freqs
                .iter()
                .map(|f| 0.3 * (2.0 * PI * x as f64 * dt * f).sin())
                .sum()
        })
        .collect()
}

pub fn transform_benchmark(c: &mut Criterion) {
    let fft = Radix2Fft::<f64>::new(SIZE).unwrap();
    let signal = tones(&[300.0]);
    let mut re = vec![0.0; SIZE];
    let mut im = vec![0.0; SIZE];

    c.bench_function("Radix2Fft forward", |b| {
        b.iter(|| {
            re.copy_from_slice(&signal);
            im.iter_mut().for_each(|v| *v = 0.0);
            fft.forward(black_box(&mut re), black_box(&mut im)).unwrap()
        })
    });
}

pub fn pitch_detect_benchmark(c: &mut Criterion) {
    let signal = tones(&[220.0]);
    let mut detector = YINDetector::new(SIZE);

    c.bench_function("YIN get_pitch", |b| {
        b.iter(|| {
            detector
                .get_pitch(black_box(&signal), SAMPLE_RATE, None)
                .unwrap()
        });
    });

    c.bench_function("YIN get_pitch with continuity", |b| {
        b.iter(|| {
            detector
                .get_pitch(black_box(&signal), SAMPLE_RATE, Some(221.0))
                .unwrap()
        });
    });
}

pub fn chord_benchmark(c: &mut Criterion) {
    let signal = tones(&[261.63, 329.63, 392.0]);
    let mut pipeline = ChordPipeline::new(SIZE).unwrap();

    c.bench_function("ChordPipeline analyze", |b| {
        b.iter(|| pipeline.analyze(black_box(&signal), SAMPLE_RATE, None).unwrap())
    });

    let classes: Vec<PitchClass> = [9, 0, 4, 7].into_iter().map(PitchClass::new).collect();
    c.bench_function("match_pitch_classes", |b| {
        b.iter(|| match_pitch_classes(black_box(&classes)))
    });
}

criterion_group!(benches, transform_benchmark, pitch_detect_benchmark, chord_benchmark);
criterion_main!(benches);
