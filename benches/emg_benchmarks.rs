use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use emg_reflex::processing::{rectify, windowed_average_amplitude, BinGrid};
use emg_reflex::session::{Recording, SessionInfo, SessionRecord};
use emg_reflex::{AnalysisConfig, Dataset, Session};

const SCAN_RATE: f64 = 10_000.0;
const NUM_SAMPLES: usize = 1_000;
const RECORDING_COUNTS: &[usize] = &[50, 200, 800];
const SESSION_COUNTS: &[usize] = &[1, 4, 16];

/// Deterministic trial with an M-wave at ~3 ms and H-reflex at ~5.5 ms
fn synthetic_trace(stimulus_v: f64, num_samples: usize) -> Vec<f64> {
    (0..num_samples)
        .map(|i| {
            let t_ms = i as f64 * 1000.0 / SCAN_RATE;
            let m = stimulus_v * (-((t_ms - 3.0) / 0.4).powi(2)).exp();
            let h = (2.0 - stimulus_v).max(0.0) * 0.5 * (-((t_ms - 5.5) / 0.6).powi(2)).exp();
            let noise = ((i * 7919) % 101) as f64 * 1e-4 - 5e-3;
            (m - h) + noise
        })
        .collect()
}

fn synthetic_record(name: &str, num_recordings: usize, num_channels: usize) -> SessionRecord {
    let recordings = (0..num_recordings)
        .map(|i| {
            // descending order so loading also has to sort
            let stimulus_v = 4.0 * (num_recordings - i) as f64 / num_recordings as f64;
            Recording {
                stimulus_v,
                channel_data: (0..num_channels)
                    .map(|_| synthetic_trace(stimulus_v, NUM_SAMPLES))
                    .collect(),
            }
        })
        .collect();

    SessionRecord {
        session_info: SessionInfo {
            session_name: name.to_string(),
            num_channels,
            scan_rate: SCAN_RATE,
            num_samples: NUM_SAMPLES,
            stim_duration: 0.5,
            stim_interval: 5.0,
            emg_amp_gains: vec![1000.0; num_channels],
        },
        recordings,
    }
}

fn synthetic_session(name: &str, num_recordings: usize, num_channels: usize) -> Session {
    Session::from_record(
        synthetic_record(name, num_recordings, num_channels),
        &AnalysisConfig::default(),
    )
    .expect("synthetic session loads")
}

fn benchmark_amplitude_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("amplitude");
    let trace = synthetic_trace(1.5, NUM_SAMPLES);

    group.throughput(Throughput::Elements(NUM_SAMPLES as u64));
    group.bench_function("rectify", |b| b.iter(|| rectify(black_box(&trace))));

    group.bench_function("windowed_average_m", |b| {
        b.iter(|| windowed_average_amplitude(black_box(&trace), 2.0, 4.0, SCAN_RATE))
    });

    group.bench_function("bin_1000_stimuli", |b| {
        let grid = BinGrid::new(0.05).expect("valid bin size");
        let stimuli: Vec<f64> = (0..1000).map(|i| i as f64 * 0.0037).collect();
        b.iter(|| {
            for &v in &stimuli {
                let _ = black_box(grid.bin(black_box(v)));
            }
        })
    });

    group.finish();
}

fn benchmark_session_loading(c: &mut Criterion) {
    let mut group = c.benchmark_group("session_load");

    for &count in RECORDING_COUNTS {
        let json = synthetic_record("bench", count, 2)
            .to_json_string()
            .expect("serializable session");

        group.throughput(Throughput::Bytes(json.len() as u64));
        group.bench_with_input(BenchmarkId::new("from_json", count), &json, |b, json| {
            b.iter(|| {
                let mut session = Session::new(&AnalysisConfig::default());
                session
                    .load_from_reader(black_box(json.as_bytes()))
                    .expect("valid json");
                session
            })
        });
    }

    group.finish();
}

fn benchmark_reflex_curve(c: &mut Criterion) {
    let mut group = c.benchmark_group("reflex_curve");
    let config = AnalysisConfig::default();

    for &sessions in SESSION_COUNTS {
        for &count in &RECORDING_COUNTS[..2] {
            let dataset = Dataset::new(
                (0..sessions)
                    .map(|i| synthetic_session(&format!("s{i}"), count, 1))
                    .collect(),
                &config,
            )
            .expect("homogeneous dataset");

            group.throughput(Throughput::Elements((sessions * count) as u64));
            group.bench_with_input(
                BenchmarkId::new("channel_0", format!("{}s_{}rec", sessions, count)),
                &dataset,
                |b, dataset| {
                    b.iter(|| {
                        dataset.reflex_curve(
                            0,
                            dataset.m_window(),
                            dataset.h_window(),
                            black_box(config.bin_size),
                        )
                    })
                },
            );
        }
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_amplitude_extraction,
    benchmark_session_loading,
    benchmark_reflex_curve
);
criterion_main!(benches);
