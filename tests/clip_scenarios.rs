// End-to-end scenarios: request JSON -> orchestrated commands -> response

use live_clip_sender::sequencer::{RecordedPauses, SkipCause};
use live_clip_sender::{
    ClipBuild, ClipBuilder, ClipOutcome, ClipRequest, ClipSet, ClipTarget, LiveCommand,
    NoteDefaults, NoteEvent, NoteValidator, Orchestrator, RecordingTransport, SendResponse,
    SenderConfig, Session, SettleDelays, SkipReason, TargetName,
};
use rand::Rng;
use serde_json::Value;

fn session(transport: RecordingTransport) -> Session<RecordingTransport, RecordedPauses> {
    Session::new(transport, RecordedPauses::new(), &SenderConfig::default())
}

#[test]
fn test_single_clip_three_notes() {
    let request = ClipRequest::from_json(
        r#"{
            "track": 0, "slot": 0, "clipLength": 2,
            "notes": [
                {"pitch": 60, "start_time": 0, "duration": 1, "velocity": 100},
                {"pitch": 64, "start_time": 1, "duration": 1, "velocity": 100},
                {"pitch": 67, "start_time": 2, "duration": 1, "velocity": 100}
            ]
        }"#,
    )
    .unwrap();
    let mut session = session(RecordingTransport::new());
    let result = session.run(&request);

    assert!(result.is_success());
    let outcome = &result.reports[0].outcome;
    assert!(outcome.accepted);
    assert_eq!(outcome.notes_written, 3);
    assert_eq!(outcome.notes_skipped, 0);
    assert_eq!(outcome.resolved_slot_index, Some(0));
    assert!(session.transport().sent().contains(&LiveCommand::SetLoopEnd {
        track: 0,
        slot: 0,
        beats: 8.0
    }));
}

#[test]
fn test_single_clip_with_missing_pitch() {
    let request = ClipRequest::from_json(
        r#"{
            "track": 1, "slot": 0, "clipLength": 1,
            "notes": [
                {"pitch": 60, "startTime": 0, "duration": 1, "velocity": 100},
                {"pitch": null, "startTime": 1, "duration": 1, "velocity": 100}
            ]
        }"#,
    )
    .unwrap();
    let mut session = session(RecordingTransport::new());
    let result = session.run(&request);

    assert!(result.is_success());
    let outcome = &result.reports[0].outcome;
    assert_eq!(outcome.notes_written, 1);
    assert_eq!(outcome.notes_skipped, 1);
    assert_eq!(outcome.skip_reason(1), Some(SkipReason::MissingPitch));
    assert_eq!(outcome.skip_reason(0), None);
}

#[test]
fn test_quad_success_message() {
    let clip = |track: u32, slot: u32| {
        format!(
            r#"{{"trackIndex": {}, "slotIndex": {}, "lengthBars": 4,
                "notes": [{{"pitch": 48, "startTime": 0, "duration": 4, "velocity": 90}}]}}"#,
            track, slot
        )
    };
    let json = format!(
        r#"{{"clip1": {}, "clip2": {}, "bass1": {}, "bass2": {}}}"#,
        clip(0, 0),
        clip(0, 1),
        clip(1, 2),
        clip(1, 3)
    );
    let request = ClipRequest::from_json(&json).unwrap();
    let mut session = session(RecordingTransport::new());
    let result = session.run(&request);
    let response = SendResponse::from(&result);

    assert!(response.success);
    let message = response.message.unwrap();
    assert_eq!(
        message,
        "Created 4 clips: clip1 on track 0, slot 0 with 1 notes; \
         clip2 on track 0, slot 1 with 1 notes; \
         bass1 on track 1, slot 2 with 1 notes; \
         bass2 on track 1, slot 3 with 1 notes"
    );
}

#[test]
fn test_dual_create_failure_stops_at_clip1() {
    let request = ClipRequest::from_json(
        r#"{"clip1": {"track": 0, "slot": 0, "clipLength": 4, "notes": []},
            "clip2": {"track": 3, "slot": 0, "clipLength": 4, "notes": []}}"#,
    )
    .unwrap();
    let transport = RecordingTransport::failing_when(|cmd| {
        matches!(cmd, LiveCommand::CreateClip { track: 0, .. })
    });
    let mut session = session(transport);
    let result = session.run(&request);

    assert!(!result.is_success());
    assert_eq!(result.failed, Some(TargetName::Clip1));
    assert_eq!(result.reports.len(), 1);
    // Nothing was ever addressed to clip2's track
    assert!(
        !session
            .transport()
            .sent()
            .iter()
            .any(|cmd| cmd.address() == "/live/track/3/set/name")
    );

    let response = SendResponse::from(&result);
    assert!(!response.success);
    assert!(response.error.unwrap().contains("clip1"));
}

/// Counts builds while delegating to a real builder
struct CountingBuilder<B> {
    inner: B,
    built: Vec<(u32, u32)>,
}

impl<B: ClipBuild> ClipBuild for CountingBuilder<B> {
    fn build(&mut self, target: &ClipTarget) -> ClipOutcome {
        self.built.push(target.identity());
        self.inner.build(target)
    }
}

#[test]
fn test_quad_clip2_failure_skips_bass_targets() {
    let transport = RecordingTransport::failing_when(|cmd| {
        matches!(cmd, LiveCommand::CreateClip { slot: 1, .. })
    });
    let builder = ClipBuilder::new(
        transport,
        RecordedPauses::new(),
        SettleDelays::none(),
        NoteValidator::new(NoteDefaults::default()),
    );
    let mut orchestrator = Orchestrator::new(CountingBuilder {
        inner: builder,
        built: Vec::new(),
    });
    let set = ClipSet::Quad {
        clip1: ClipTarget::new(0, 0, 1, Vec::new()),
        clip2: ClipTarget::new(0, 1, 1, Vec::new()),
        bass1: ClipTarget::new(1, 0, 1, Vec::new()),
        bass2: ClipTarget::new(1, 1, 1, Vec::new()),
    };
    let result = orchestrator.orchestrate(&set);

    assert_eq!(result.failed, Some(TargetName::Clip2));
    assert_eq!(orchestrator.builder().built, vec![(0, 0), (0, 1)]);
}

#[test]
fn test_dual_clip2_failure_is_attributed_to_clip2() {
    let request = ClipRequest::from_json(
        r#"{
            "clip1": {"track": 0, "slot": 0, "clipLength": 1,
                      "notes": [{"pitch": 60, "startTime": 0, "duration": 1, "velocity": 100}]},
            "clip2": {"track": 0, "slot": 1, "clipLength": 1,
                      "notes": [{"pitch": 64, "startTime": 0, "duration": 1, "velocity": 100}]}
        }"#,
    )
    .unwrap();
    assert!(matches!(request.clip_set, ClipSet::Dual { .. }));

    let transport = RecordingTransport::failing_when(|cmd| {
        matches!(cmd, LiveCommand::CreateClip { slot: 1, .. })
    });
    let mut session = session(transport);
    let result = session.run(&request);

    assert_eq!(result.failed, Some(TargetName::Clip2));
    assert_eq!(result.reports.len(), 2);
    assert!(result.reports[0].outcome.accepted);
    assert_eq!(result.reports[0].outcome.notes_written, 1);
    assert!(!result.reports[1].outcome.accepted);

    let response = SendResponse::from(&result);
    assert!(!response.success);
    assert_eq!(
        response.error.as_deref(),
        Some("Failed to create clip2 on track 0, slot 1 in Ableton")
    );
}

#[test]
fn test_badly_typed_note_does_not_fail_request() {
    let request = ClipRequest::from_json(
        r#"{
            "track": 0, "slot": 0, "clipLength": 1,
            "notes": [
                {"pitch": "62", "start_time": 0, "duration": 1, "velocity": 100},
                {"pitch": "abc", "start_time": 1, "duration": 1, "velocity": 100},
                null,
                {"pitch": 67, "start_time": 2, "duration": 1, "velocity": 100}
            ]
        }"#,
    )
    .unwrap();
    let mut session = session(RecordingTransport::new());
    let result = session.run(&request);

    assert!(result.is_success());
    let outcome = &result.reports[0].outcome;
    assert_eq!(outcome.notes_written, 2);
    assert_eq!(outcome.notes_skipped, 2);
    assert_eq!(outcome.skip_reason(1), Some(SkipReason::InvalidPitch));
    assert_eq!(outcome.skip_reason(2), Some(SkipReason::MissingPitch));

    let pitches: Vec<i64> = session
        .transport()
        .sent()
        .iter()
        .filter_map(|cmd| match cmd {
            LiveCommand::AddNote { pitch, .. } => Some(*pitch),
            _ => None,
        })
        .collect();
    assert_eq!(pitches, vec![62, 67]);
}

#[test]
fn test_written_plus_skipped_equals_notes() {
    let mut rng = rand::thread_rng();
    for _ in 0..50 {
        let notes: Vec<NoteEvent> = (0..rng.gen_range(0..40))
            .map(|_| NoteEvent {
                pitch: match rng.gen_range(0..10) {
                    0 => None,
                    1 => Some(Value::from("not a pitch")),
                    2 => Some(Value::from(rng.gen_range(0..200).to_string())),
                    _ => Some(Value::from(rng.gen_range(0..200))),
                },
                start_time: rng.gen_bool(0.9).then(|| Value::from(rng.gen_range(0.0..16.0))),
                duration: rng.gen_bool(0.9).then(|| Value::from(rng.gen_range(0.1..4.0))),
                velocity: rng.gen_bool(0.9).then(|| Value::from(rng.gen_range(0..128))),
            })
            .collect();
        let fail_every = rng.gen_range(2..7);
        let mut sent = 0;
        let transport = RecordingTransport::failing_when(move |cmd| {
            if matches!(cmd, LiveCommand::AddNote { .. }) {
                sent += 1;
                sent % fail_every == 0
            } else {
                false
            }
        });
        let mut builder = ClipBuilder::new(
            transport,
            RecordedPauses::new(),
            SettleDelays::none(),
            NoteValidator::new(NoteDefaults::default()),
        );
        let target = ClipTarget::new(0, 0, 4, notes.clone());
        let outcome = builder.build(&target);

        assert!(outcome.accepted);
        assert_eq!(outcome.notes_written + outcome.notes_skipped, notes.len());
        assert_eq!(outcome.skipped.len(), outcome.notes_skipped);
        let add_notes = builder
            .transport()
            .sent()
            .iter()
            .filter(|cmd| matches!(cmd, LiveCommand::AddNote { .. }))
            .count();
        assert_eq!(add_notes, outcome.notes_written);
    }
}

#[test]
fn test_rejected_clip_keeps_count_invariant() {
    let transport =
        RecordingTransport::failing_when(|cmd| matches!(cmd, LiveCommand::CreateClip { .. }));
    let mut builder = ClipBuilder::new(
        transport,
        RecordedPauses::new(),
        SettleDelays::none(),
        NoteValidator::new(NoteDefaults::default()),
    );
    let notes = vec![NoteEvent::new(60, 0.0, 1.0, 100), NoteEvent::default()];
    let outcome = builder.build(&ClipTarget::new(0, 0, 1, notes));

    assert!(!outcome.accepted);
    assert_eq!(outcome.notes_written + outcome.notes_skipped, 2);
    assert!(
        outcome
            .skipped
            .iter()
            .all(|s| s.cause == SkipCause::ClipNotCreated)
    );
}

#[test]
fn test_out_of_range_pitch_reaches_host_unchanged() {
    let request = ClipRequest::from_json(
        r#"{"track": 0, "slot": 0, "clipLength": 1,
            "notes": [{"pitch": 300, "startTime": 0, "duration": 1, "velocity": 200}]}"#,
    )
    .unwrap();
    let mut session = session(RecordingTransport::new());
    session.run(&request);

    let note = session
        .transport()
        .sent()
        .iter()
        .find_map(|cmd| match cmd {
            LiveCommand::AddNote {
                pitch, velocity, ..
            } => Some((*pitch, *velocity)),
            _ => None,
        })
        .unwrap();
    assert_eq!(note, (300, 200));
}
