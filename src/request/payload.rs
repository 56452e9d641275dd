// Request payload - turns the incoming JSON object into a clip set
// The shape is decided once here: bass clips -> quad, clip1/clip2 -> dual, flat fields -> single

use crate::sequencer::clip::ClipTarget;
use crate::sequencer::clip_set::ClipSet;
use serde_json::{Map, Value};

/// Payload errors, reported before anything is sent
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Request must be a JSON object")]
    NotAnObject,

    #[error("Missing {target} for {mode} request")]
    MissingTarget {
        target: &'static str,
        mode: &'static str,
    },

    #[error("Invalid {target}: {source}")]
    InvalidTarget {
        target: &'static str,
        source: serde_json::Error,
    },

    #[error("Clip length of {0} must be at least 1 bar")]
    ZeroLength(&'static str),

    #[error("Invalid tempo: {0}")]
    InvalidTempo(String),
}

const QUAD_KEYS: [&str; 4] = ["clip1", "clip2", "bass1", "bass2"];
const DUAL_KEYS: [&str; 2] = ["clip1", "clip2"];

/// A parsed request: the clips to build plus an optional song tempo
#[derive(Debug, Clone, PartialEq)]
pub struct ClipRequest {
    pub clip_set: ClipSet,
    pub bpm: Option<f64>,
}

impl ClipRequest {
    pub fn from_json(text: &str) -> Result<Self, PayloadError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, PayloadError> {
        let Value::Object(mut object) = value else {
            return Err(PayloadError::NotAnObject);
        };
        let bpm = parse_bpm(&object)?;

        let has = |object: &Map<String, Value>, key: &str| {
            object.get(key).is_some_and(|v| !v.is_null())
        };

        let clip_set = if has(&object, "bass1") || has(&object, "bass2") {
            let [clip1, clip2, bass1, bass2] =
                QUAD_KEYS.map(|key| take_target(&mut object, key, "quad"));
            ClipSet::Quad {
                clip1: clip1?,
                clip2: clip2?,
                bass1: bass1?,
                bass2: bass2?,
            }
        } else if has(&object, "clip1") || has(&object, "clip2") {
            let [clip1, clip2] = DUAL_KEYS.map(|key| take_target(&mut object, key, "dual"));
            ClipSet::Dual {
                clip1: clip1?,
                clip2: clip2?,
            }
        } else {
            let target: ClipTarget = serde_json::from_value(Value::Object(object))
                .map_err(|source| PayloadError::InvalidTarget {
                    target: "clip",
                    source,
                })?;
            ClipSet::Single(check_length("clip", target)?)
        };

        Ok(Self { clip_set, bpm })
    }
}

fn parse_bpm(object: &Map<String, Value>) -> Result<Option<f64>, PayloadError> {
    match object.get("bpm") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => match n.as_f64() {
            Some(bpm) if bpm.is_finite() && bpm > 0.0 => Ok(Some(bpm)),
            _ => Err(PayloadError::InvalidTempo(n.to_string())),
        },
        Some(other) => Err(PayloadError::InvalidTempo(other.to_string())),
    }
}

fn take_target(
    object: &mut Map<String, Value>,
    key: &'static str,
    mode: &'static str,
) -> Result<ClipTarget, PayloadError> {
    let value = match object.remove(key) {
        None | Some(Value::Null) => {
            return Err(PayloadError::MissingTarget { target: key, mode });
        }
        Some(value) => value,
    };
    let target: ClipTarget = serde_json::from_value(value)
        .map_err(|source| PayloadError::InvalidTarget {
            target: key,
            source,
        })?;
    check_length(key, target)
}

fn check_length(name: &'static str, target: ClipTarget) -> Result<ClipTarget, PayloadError> {
    if target.length_bars == 0 {
        return Err(PayloadError::ZeroLength(name));
    }
    Ok(target)
}
