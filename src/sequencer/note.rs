// Note events and their validation
// A note is accepted only when pitch, start, duration and velocity are all present

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// A raw note event as it arrives in a request
///
/// Fields are kept as raw JSON values so that a badly typed field only
/// affects its own note. `null` and a missing key are treated the same.
/// Numbers and numeric strings are coerced during validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteEvent {
    /// MIDI note number (60 = C4)
    #[serde(default)]
    pub pitch: Option<Value>,

    /// Start in beats from the clip start
    #[serde(default, alias = "start_time")]
    pub start_time: Option<Value>,

    /// Length in beats
    #[serde(default)]
    pub duration: Option<Value>,

    /// MIDI velocity
    #[serde(default)]
    pub velocity: Option<Value>,
}

impl NoteEvent {
    /// A fully specified note
    pub fn new(pitch: i64, start_time: f64, duration: f64, velocity: i64) -> Self {
        Self {
            pitch: Some(Value::from(pitch)),
            start_time: Some(Value::from(start_time)),
            duration: Some(Value::from(duration)),
            velocity: Some(Value::from(velocity)),
        }
    }
}

/// Deserialize a note list where any entry that is not an object
/// (`null`, a number, a string) becomes a note with every field missing
pub fn deserialize_notes<'de, D>(deserializer: D) -> Result<Vec<NoteEvent>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries: Option<Vec<Value>> = Option::deserialize(deserializer)?;
    Ok(entries
        .unwrap_or_default()
        .into_iter()
        .map(|entry| match entry {
            Value::Object(_) => serde_json::from_value(entry).unwrap_or_default(),
            _ => NoteEvent::default(),
        })
        .collect())
}

/// A note whose fields are all present, coerced to the types the host expects
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatedNote {
    pub pitch: i64,
    pub start_time: f64,
    pub duration: f64,
    pub velocity: i64,
}

impl ValidatedNote {
    pub fn is_shorter_than(&self, min_duration: f64) -> bool {
        self.duration < min_duration
    }
}

/// Why a note was dropped by validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    MissingPitch,
    MissingStartTime,
    MissingDuration,
    MissingVelocity,
    /// Present but not a finite number or numeric string
    InvalidPitch,
    InvalidStartTime,
    InvalidDuration,
    InvalidVelocity,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::MissingPitch => "missing_pitch",
            SkipReason::MissingStartTime => "missing_start_time",
            SkipReason::MissingDuration => "missing_duration",
            SkipReason::MissingVelocity => "missing_velocity",
            SkipReason::InvalidPitch => "invalid_pitch",
            SkipReason::InvalidStartTime => "invalid_start_time",
            SkipReason::InvalidDuration => "invalid_duration",
            SkipReason::InvalidVelocity => "invalid_velocity",
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(
            self,
            SkipReason::MissingPitch
                | SkipReason::MissingStartTime
                | SkipReason::MissingDuration
                | SkipReason::MissingVelocity
        )
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to do with a note that has no velocity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingVelocity {
    /// Drop the note with `missing_velocity`
    #[default]
    Skip,
    /// Substitute `NoteDefaults::default_velocity`
    UseDefault,
}

/// Note-level defaults
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoteDefaults {
    pub default_velocity: u8,
    /// Notes shorter than this (in beats) are reported, not altered
    pub min_duration: f64,
    pub missing_velocity: MissingVelocity,
}

impl Default for NoteDefaults {
    fn default() -> Self {
        Self {
            default_velocity: 80,
            min_duration: 0.25,
            missing_velocity: MissingVelocity::Skip,
        }
    }
}

/// A present field: a JSON number, or a string holding one
fn coerce(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}

fn present(field: &Option<Value>) -> Option<&Value> {
    field.as_ref().filter(|v| !v.is_null())
}

/// Checks required fields and coerces values
///
/// Values are never clamped: a pitch of 200 is passed through as 200 and the
/// host decides what to do with it.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoteValidator {
    defaults: NoteDefaults,
}

impl NoteValidator {
    pub fn new(defaults: NoteDefaults) -> Self {
        Self { defaults }
    }

    pub fn defaults(&self) -> &NoteDefaults {
        &self.defaults
    }

    /// Validate one note
    ///
    /// Presence is checked first for all fields, in the order pitch, start
    /// time, duration, velocity; the first missing one decides the reason.
    /// Only then are values coerced, in the same order.
    pub fn validate(&self, note: &NoteEvent) -> Result<ValidatedNote, SkipReason> {
        let pitch = present(&note.pitch).ok_or(SkipReason::MissingPitch)?;
        let start_time = present(&note.start_time).ok_or(SkipReason::MissingStartTime)?;
        let duration = present(&note.duration).ok_or(SkipReason::MissingDuration)?;
        let velocity = present(&note.velocity);
        if velocity.is_none() && self.defaults.missing_velocity == MissingVelocity::Skip {
            return Err(SkipReason::MissingVelocity);
        }

        let pitch = coerce(pitch).ok_or(SkipReason::InvalidPitch)?;
        let start_time = coerce(start_time).ok_or(SkipReason::InvalidStartTime)?;
        let duration = coerce(duration).ok_or(SkipReason::InvalidDuration)?;
        let velocity = match velocity {
            Some(v) => coerce(v).ok_or(SkipReason::InvalidVelocity)?,
            None => self.defaults.default_velocity as f64,
        };

        Ok(ValidatedNote {
            pitch: pitch.trunc() as i64,
            start_time,
            duration,
            velocity: velocity.trunc() as i64,
        })
    }
}
