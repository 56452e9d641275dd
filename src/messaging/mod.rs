// Messages exchanged with the destination host

pub mod command;

pub use command::{BEATS_PER_BAR, GENERATED_TRACK_NAME, LiveCommand, OscArg};
