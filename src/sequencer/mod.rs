// Sequencer module
// Note validation, clip construction and fan-out across clip targets

pub mod clip;
pub mod clip_set;
pub mod note;
pub mod orchestrator;
pub mod timing;

pub use clip::{ClipBuild, ClipBuilder, ClipOutcome, ClipTarget, SkipCause, SkippedNote};
pub use clip_set::{ClipMode, ClipSet, TargetName};
pub use note::{MissingVelocity, NoteDefaults, NoteEvent, NoteValidator, SkipReason, ValidatedNote};
pub use orchestrator::{AggregateResult, Orchestrator, TargetReport};
pub use timing::{DelayError, Pause, RecordedPauses, SettleDelays, ThreadPause};
