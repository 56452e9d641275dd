// Live Clip Sender - Library exports for the binary, tests and benchmarks

pub mod config;
pub mod connection;
pub mod messaging;
pub mod request;
pub mod sequencer;
pub mod session;

// Re-export commonly used types for convenience
pub use config::{ConfigError, SenderConfig};
pub use connection::{RecordingTransport, Transport, TransportError, UdpTransport};
pub use messaging::{LiveCommand, OscArg};
pub use request::{ClipRequest, PayloadError, SendResponse};
pub use sequencer::{
    AggregateResult, ClipBuild, ClipBuilder, ClipMode, ClipOutcome, ClipSet, ClipTarget,
    NoteDefaults, NoteEvent, NoteValidator, Orchestrator, SettleDelays, SkipReason, TargetName,
};
pub use session::Session;
