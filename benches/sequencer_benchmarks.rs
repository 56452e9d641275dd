use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use live_clip_sender::connection::transport::encode;
use live_clip_sender::sequencer::RecordedPauses;
use live_clip_sender::{
    ClipSet, ClipTarget, LiveCommand, NoteDefaults, NoteEvent, NoteValidator, Orchestrator,
    RecordingTransport, SettleDelays, ClipBuilder,
};

fn chord_notes(count: usize) -> Vec<NoteEvent> {
    (0..count)
        .map(|i| NoteEvent::new(48 + (i % 24) as i64, (i / 3) as f64, 1.0, 100))
        .collect()
}

/// Benchmark note validation
fn bench_validation(c: &mut Criterion) {
    let validator = NoteValidator::new(NoteDefaults::default());
    let notes = chord_notes(256);

    c.bench_function("validate_256_notes", |b| {
        b.iter(|| {
            for note in &notes {
                let _ = black_box(validator.validate(note));
            }
        });
    });
}

/// Benchmark OSC encoding of an add-note command
fn bench_encoding(c: &mut Criterion) {
    let command = LiveCommand::AddNote {
        track: 0,
        slot: 0,
        pitch: 60,
        start_time: 1.5,
        duration: 0.5,
        velocity: 100,
        mute: false,
    };
    c.bench_function("encode_add_note", |b| {
        b.iter(|| black_box(encode(&command)));
    });
}

/// Benchmark a full quad orchestration without delays
fn bench_quad_orchestration(c: &mut Criterion) {
    let mut group = c.benchmark_group("quad_orchestration");

    for notes_per_clip in [4, 32, 128] {
        let set = ClipSet::Quad {
            clip1: ClipTarget::new(0, 0, 4, chord_notes(notes_per_clip)),
            clip2: ClipTarget::new(0, 1, 4, chord_notes(notes_per_clip)),
            bass1: ClipTarget::new(1, 0, 4, chord_notes(notes_per_clip)),
            bass2: ClipTarget::new(1, 1, 4, chord_notes(notes_per_clip)),
        };

        group.bench_with_input(
            BenchmarkId::from_parameter(notes_per_clip),
            &set,
            |b, set| {
                b.iter(|| {
                    let builder = ClipBuilder::new(
                        RecordingTransport::new(),
                        RecordedPauses::new(),
                        SettleDelays::none(),
                        NoteValidator::new(NoteDefaults::default()),
                    );
                    let mut orchestrator = Orchestrator::new(builder);
                    black_box(orchestrator.orchestrate(set));
                });
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_validation,
    bench_encoding,
    bench_quad_orchestration
);
criterion_main!(benches);
