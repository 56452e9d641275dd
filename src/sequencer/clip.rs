// Clip construction - drives one clip target through the host's command order
// name track -> clear -> create -> populate -> loop configure

use crate::connection::transport::Transport;
use crate::messaging::command::{GENERATED_TRACK_NAME, LiveCommand};
use crate::sequencer::note::{NoteEvent, NoteValidator, SkipReason, deserialize_notes};
use crate::sequencer::timing::{Pause, SettleDelays};
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};

/// One destination clip
///
/// Identity is `(track_index, slot_index)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipTarget {
    #[serde(alias = "track")]
    pub track_index: u32,

    #[serde(alias = "slot")]
    pub slot_index: u32,

    /// Clip length in 4-beat bars
    #[serde(alias = "clipLength")]
    pub length_bars: u32,

    /// Insertion order is kept, overlaps are allowed
    #[serde(default, deserialize_with = "deserialize_notes")]
    pub notes: Vec<NoteEvent>,
}

impl ClipTarget {
    pub fn new(track_index: u32, slot_index: u32, length_bars: u32, notes: Vec<NoteEvent>) -> Self {
        Self {
            track_index,
            slot_index,
            length_bars,
            notes,
        }
    }

    pub fn identity(&self) -> (u32, u32) {
        (self.track_index, self.slot_index)
    }

    pub fn loop_end_beats(&self) -> f64 {
        LiveCommand::loop_end_for(self.length_bars)
    }
}

/// Why a note did not end up in the clip
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SkipCause {
    /// Dropped by validation
    Invalid(SkipReason),
    /// The add-note command could not be sent
    SendFailed(String),
    /// The clip itself was never created
    ClipNotCreated,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedNote {
    /// Position of the note in the target's note list
    pub index: usize,
    pub cause: SkipCause,
}

/// Result of building one clip target, never mutated after creation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipOutcome {
    pub accepted: bool,
    pub notes_written: usize,
    pub notes_skipped: usize,
    /// Slot that was targeted, absent when the clip could not be created
    pub resolved_slot_index: Option<u32>,
    pub skipped: Vec<SkippedNote>,
}

impl ClipOutcome {
    /// Outcome for a target whose create command could not be issued
    ///
    /// Every note is accounted as skipped so written + skipped still equals
    /// the number of notes.
    pub fn rejected(target: &ClipTarget) -> Self {
        let skipped: Vec<SkippedNote> = (0..target.notes.len())
            .map(|index| SkippedNote {
                index,
                cause: SkipCause::ClipNotCreated,
            })
            .collect();
        Self {
            accepted: false,
            notes_written: 0,
            notes_skipped: skipped.len(),
            resolved_slot_index: None,
            skipped,
        }
    }

    /// First validation reason recorded for the note at `index`
    pub fn skip_reason(&self, index: usize) -> Option<SkipReason> {
        self.skipped.iter().find_map(|s| match s.cause {
            SkipCause::Invalid(reason) if s.index == index => Some(reason),
            _ => None,
        })
    }
}

/// Anything that can turn a clip target into an outcome
///
/// The orchestrator only depends on this, so tests can count and order calls.
pub trait ClipBuild {
    fn build(&mut self, target: &ClipTarget) -> ClipOutcome;
}

impl<B: ClipBuild + ?Sized> ClipBuild for &mut B {
    fn build(&mut self, target: &ClipTarget) -> ClipOutcome {
        (**self).build(target)
    }
}

/// Builds clips over a transport, pausing between steps
pub struct ClipBuilder<T: Transport, P: Pause> {
    transport: T,
    pause: P,
    delays: SettleDelays,
    validator: NoteValidator,
    track_name: String,
}

impl<T: Transport, P: Pause> ClipBuilder<T, P> {
    pub fn new(transport: T, pause: P, delays: SettleDelays, validator: NoteValidator) -> Self {
        Self {
            transport,
            pause,
            delays,
            validator,
            track_name: GENERATED_TRACK_NAME.to_string(),
        }
    }

    /// Name used for the track existence nudge
    pub fn with_track_name(mut self, name: impl Into<String>) -> Self {
        self.track_name = name.into();
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn into_parts(self) -> (T, P) {
        (self.transport, self.pause)
    }

    /// Set the song tempo; failures are logged only
    pub fn set_tempo(&mut self, bpm: f64) -> bool {
        info!("Setting BPM to {}", bpm);
        let sent = self.send_best_effort("set tempo", &LiveCommand::SetTempo { bpm });
        self.pause.pause(self.delays.tempo());
        sent
    }

    fn send_best_effort(&mut self, step: &str, command: &LiveCommand) -> bool {
        match self.transport.send(command) {
            Ok(()) => true,
            Err(e) => {
                warn!("Could not {} ({}): {}", step, command.address(), e);
                false
            }
        }
    }

    fn name_track(&mut self, track: u32) {
        let command = LiveCommand::SetTrackName {
            track,
            name: self.track_name.clone(),
        };
        self.send_best_effort("set track name", &command);
        self.pause.pause(self.delays.track_name());
    }

    fn clear(&mut self, track: u32, slot: u32) {
        debug!("Deleting existing clip on track {}, slot {}", track, slot);
        if let Err(e) = self.transport.send(&LiveCommand::DeleteClip { track, slot }) {
            // Expected when the slot is empty
            debug!("Could not delete existing clip (may not exist): {}", e);
        }
        self.pause.pause(self.delays.clear());
    }

    fn populate(&mut self, target: &ClipTarget) -> (usize, Vec<SkippedNote>) {
        let (track, slot) = target.identity();
        let min_duration = self.validator.defaults().min_duration;
        let mut written = 0;
        let mut skipped = Vec::new();

        debug!("Adding {} notes to clip", target.notes.len());
        for (index, note) in target.notes.iter().enumerate() {
            let note = match self.validator.validate(note) {
                Ok(note) => note,
                Err(reason) => {
                    warn!("Skipping note {} ({}): {:?}", index, reason, note);
                    skipped.push(SkippedNote {
                        index,
                        cause: SkipCause::Invalid(reason),
                    });
                    continue;
                }
            };
            if note.is_shorter_than(min_duration) {
                debug!(
                    "Note {} is shorter than {} beats ({})",
                    index, min_duration, note.duration
                );
            }

            let command = LiveCommand::AddNote {
                track,
                slot,
                pitch: note.pitch,
                start_time: note.start_time,
                duration: note.duration,
                velocity: note.velocity,
                mute: false,
            };
            match self.transport.send(&command) {
                Ok(()) => {
                    written += 1;
                    if self.delays.pacing_due(written) {
                        self.pause.pause(self.delays.note_pacing());
                    }
                }
                Err(e) => {
                    warn!("Error adding note {}: {} - note data: {:?}", index, e, note);
                    skipped.push(SkippedNote {
                        index,
                        cause: SkipCause::SendFailed(e.to_string()),
                    });
                }
            }
        }
        self.pause.pause(self.delays.populate());
        (written, skipped)
    }

    fn configure_loop(&mut self, target: &ClipTarget) {
        let (track, slot) = target.identity();
        let loop_end = target.loop_end_beats();
        debug!("Setting loop region: 0.0 to {} beats", loop_end);

        let commands = [
            LiveCommand::SetLoopStart {
                track,
                slot,
                beats: 0.0,
            },
            LiveCommand::SetLoopEnd {
                track,
                slot,
                beats: loop_end,
            },
            LiveCommand::SetLooping {
                track,
                slot,
                enabled: true,
            },
        ];
        for command in &commands {
            self.send_best_effort("configure loop", command);
            self.pause.pause(self.delays.loop_step());
        }
    }
}

impl<T: Transport, P: Pause> ClipBuild for ClipBuilder<T, P> {
    fn build(&mut self, target: &ClipTarget) -> ClipOutcome {
        let (track, slot) = target.identity();

        self.name_track(track);
        self.clear(track, slot);

        info!(
            "Creating clip on track {}, slot {}, length {} bars",
            track, slot, target.length_bars
        );
        let create = LiveCommand::CreateClip {
            track,
            slot,
            length_bars: target.length_bars,
        };
        if let Err(e) = self.transport.send(&create) {
            error!(
                "Error creating clip on track {}, slot {}: {}",
                track, slot, e
            );
            return ClipOutcome::rejected(target);
        }
        self.pause.pause(self.delays.create());

        let (written, skipped) = self.populate(target);
        self.configure_loop(target);

        info!(
            "Successfully created clip with {}/{} notes",
            written,
            target.notes.len()
        );
        ClipOutcome {
            accepted: true,
            notes_written: written,
            notes_skipped: skipped.len(),
            resolved_slot_index: Some(slot),
            skipped,
        }
    }
}
