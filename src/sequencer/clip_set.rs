// Clip sets - the fixed fan-out shapes a request can take

use crate::sequencer::clip::ClipTarget;
use crate::sequencer::timing::SettleDelays;
use std::fmt;
use std::time::Duration;

/// Fan-out shape of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipMode {
    Single,
    Dual,
    Quad,
}

impl ClipMode {
    pub fn target_count(&self) -> usize {
        match self {
            ClipMode::Single => 1,
            ClipMode::Dual => 2,
            ClipMode::Quad => 4,
        }
    }
}

/// Name of a target inside a clip set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetName {
    Single,
    Clip1,
    Clip2,
    Bass1,
    Bass2,
}

impl TargetName {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetName::Single => "clip",
            TargetName::Clip1 => "clip1",
            TargetName::Clip2 => "clip2",
            TargetName::Bass1 => "bass1",
            TargetName::Bass2 => "bass2",
        }
    }
}

impl fmt::Display for TargetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The targets of one request, immutable once built
#[derive(Debug, Clone, PartialEq)]
pub enum ClipSet {
    Single(ClipTarget),
    Dual {
        clip1: ClipTarget,
        clip2: ClipTarget,
    },
    /// Chord clips followed by their bass doubles
    Quad {
        clip1: ClipTarget,
        clip2: ClipTarget,
        bass1: ClipTarget,
        bass2: ClipTarget,
    },
}

impl ClipSet {
    pub fn mode(&self) -> ClipMode {
        match self {
            ClipSet::Single(_) => ClipMode::Single,
            ClipSet::Dual { .. } => ClipMode::Dual,
            ClipSet::Quad { .. } => ClipMode::Quad,
        }
    }

    /// Targets in dispatch order
    pub fn targets(&self) -> Vec<(TargetName, &ClipTarget)> {
        match self {
            ClipSet::Single(target) => vec![(TargetName::Single, target)],
            ClipSet::Dual { clip1, clip2 } => {
                vec![(TargetName::Clip1, clip1), (TargetName::Clip2, clip2)]
            }
            ClipSet::Quad {
                clip1,
                clip2,
                bass1,
                bass2,
            } => vec![
                (TargetName::Clip1, clip1),
                (TargetName::Clip2, clip2),
                (TargetName::Bass1, bass1),
                (TargetName::Bass2, bass2),
            ],
        }
    }

    pub fn note_count(&self) -> usize {
        self.targets().iter().map(|(_, t)| t.notes.len()).sum()
    }

    /// Pairs of targets that address the same track and slot
    pub fn shared_identities(&self) -> Vec<(TargetName, TargetName)> {
        let targets = self.targets();
        let mut shared = Vec::new();
        for (i, (a_name, a)) in targets.iter().enumerate() {
            for (b_name, b) in &targets[i + 1..] {
                if a.identity() == b.identity() {
                    shared.push((*a_name, *b_name));
                }
            }
        }
        shared
    }

    /// Upper bound on the wall-clock time of orchestrating this set
    ///
    /// Assumes every note validates, which maximizes pacing pauses.
    pub fn estimated_duration(&self, delays: &SettleDelays) -> Duration {
        self.targets()
            .iter()
            .map(|(_, target)| delays.clip_cost(target.notes.len()))
            .sum()
    }
}
