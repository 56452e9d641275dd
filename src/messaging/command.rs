// Command vocabulary understood by the AbletonOSC remote script
// Each command knows its OSC address and the exact argument order the host expects

use std::fmt;

/// Name given to a track when nudging it into existence
pub const GENERATED_TRACK_NAME: &str = "Generated Chords";

/// Number of beats in one bar
pub const BEATS_PER_BAR: f64 = 4.0;

/// A single typed OSC argument
#[derive(Debug, Clone, PartialEq)]
pub enum OscArg {
    Int(i64),
    Float(f64),
    Str(String),
}

impl fmt::Display for OscArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OscArg::Int(v) => write!(f, "{}", v),
            OscArg::Float(v) => write!(f, "{:?}", v),
            OscArg::Str(v) => write!(f, "{:?}", v),
        }
    }
}

/// Commands sent to the destination host
///
/// Track and slot indices are kept as plain `u32`. Integer arguments are
/// widened to `i64` here and narrowed to OSC int32 by the transport, which
/// reports anything that does not fit.
#[derive(Debug, Clone, PartialEq)]
pub enum LiveCommand {
    SetTrackName {
        track: u32,
        name: String,
    },
    DeleteClip {
        track: u32,
        slot: u32,
    },
    CreateClip {
        track: u32,
        slot: u32,
        length_bars: u32,
    },
    SetTempo {
        bpm: f64,
    },
    AddNote {
        track: u32,
        slot: u32,
        pitch: i64,
        start_time: f64,
        duration: f64,
        velocity: i64,
        mute: bool,
    },
    SetLoopStart {
        track: u32,
        slot: u32,
        beats: f64,
    },
    SetLoopEnd {
        track: u32,
        slot: u32,
        beats: f64,
    },
    SetLooping {
        track: u32,
        slot: u32,
        enabled: bool,
    },
}

impl LiveCommand {
    /// OSC address pattern of this command
    pub fn address(&self) -> String {
        match self {
            LiveCommand::SetTrackName { track, .. } => format!("/live/track/{}/set/name", track),
            LiveCommand::DeleteClip { .. } => "/live/clip_slot/delete_clip".to_string(),
            LiveCommand::CreateClip { .. } => "/live/clip_slot/create_clip".to_string(),
            LiveCommand::SetTempo { .. } => "/live/song/set/tempo".to_string(),
            LiveCommand::AddNote { .. } => "/live/clip/add/notes".to_string(),
            LiveCommand::SetLoopStart { .. } => "/live/clip/set/loop_start".to_string(),
            LiveCommand::SetLoopEnd { .. } => "/live/clip/set/loop_end".to_string(),
            LiveCommand::SetLooping { .. } => "/live/clip/set/looping".to_string(),
        }
    }

    /// Arguments in the order the host expects them
    pub fn args(&self) -> Vec<OscArg> {
        match self {
            LiveCommand::SetTrackName { name, .. } => vec![OscArg::Str(name.clone())],
            LiveCommand::DeleteClip { track, slot } => {
                vec![OscArg::Int(*track as i64), OscArg::Int(*slot as i64)]
            }
            LiveCommand::CreateClip {
                track,
                slot,
                length_bars,
            } => vec![
                OscArg::Int(*track as i64),
                OscArg::Int(*slot as i64),
                OscArg::Int(*length_bars as i64),
            ],
            LiveCommand::SetTempo { bpm } => vec![OscArg::Float(*bpm)],
            LiveCommand::AddNote {
                track,
                slot,
                pitch,
                start_time,
                duration,
                velocity,
                mute,
            } => vec![
                OscArg::Int(*track as i64),
                OscArg::Int(*slot as i64),
                OscArg::Int(*pitch),
                OscArg::Float(*start_time),
                OscArg::Float(*duration),
                OscArg::Int(*velocity),
                OscArg::Int(*mute as i64),
            ],
            LiveCommand::SetLoopStart { track, slot, beats }
            | LiveCommand::SetLoopEnd { track, slot, beats } => vec![
                OscArg::Int(*track as i64),
                OscArg::Int(*slot as i64),
                OscArg::Float(*beats),
            ],
            LiveCommand::SetLooping {
                track,
                slot,
                enabled,
            } => vec![
                OscArg::Int(*track as i64),
                OscArg::Int(*slot as i64),
                OscArg::Int(*enabled as i64),
            ],
        }
    }

    /// Loop end in beats for a clip of the given length
    pub fn loop_end_for(length_bars: u32) -> f64 {
        length_bars as f64 * BEATS_PER_BAR
    }
}

impl fmt::Display for LiveCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address())?;
        for arg in self.args() {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}
