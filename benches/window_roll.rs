//! Benchmarks for the per-frame hot path: window rolls and the silence gate.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use livecap::caption::silence::SilenceGate;
use livecap::caption::window::RollingWindow;

/// 5 s window at 16 kHz, the default configuration.
const WINDOW_SAMPLES: usize = 5 * 16000;
/// 100 ms frame at 16 kHz.
const FRAME_SAMPLES: usize = 1600;

fn bench_window_append(c: &mut Criterion) {
    let frame: Vec<f32> = (0..FRAME_SAMPLES).map(|i| (i as f32 * 0.001).sin()).collect();

    c.bench_function("window_append_100ms_frame", |b| {
        let mut window = RollingWindow::new(WINDOW_SAMPLES);
        b.iter(|| {
            window.append(black_box(&frame));
        });
    });

    c.bench_function("window_append_oversized", |b| {
        let mut window = RollingWindow::new(WINDOW_SAMPLES);
        let oversized = vec![0.25f32; WINDOW_SAMPLES + FRAME_SAMPLES];
        b.iter(|| {
            window.append(black_box(&oversized));
        });
    });

    c.bench_function("window_snapshot", |b| {
        let mut window = RollingWindow::new(WINDOW_SAMPLES);
        window.append(&frame);
        b.iter(|| black_box(window.snapshot()));
    });
}

fn bench_silence_gate(c: &mut Criterion) {
    let gate = SilenceGate::new(0.01);
    let silent = vec![0.001f32; WINDOW_SAMPLES];
    let loud: Vec<f32> = (0..WINDOW_SAMPLES).map(|i| (i as f32 * 0.01).sin() * 0.5).collect();

    c.bench_function("silence_gate_silent_window", |b| {
        b.iter(|| gate.is_silent(black_box(&silent)));
    });

    c.bench_function("silence_gate_loud_window", |b| {
        b.iter(|| gate.is_silent(black_box(&loud)));
    });
}

criterion_group!(benches, bench_window_append, bench_silence_gate);
criterion_main!(benches);
