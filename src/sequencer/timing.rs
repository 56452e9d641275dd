// Settle delays and pacing
// The host never acknowledges a command, so ordering is enforced by waiting

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settle delay configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DelayError {
    #[error("clear delay ({clear_ms} ms) must not be shorter than track name delay ({track_name_ms} ms)")]
    ClearShorterThanTrackName { clear_ms: u64, track_name_ms: u64 },
}

/// Named settle delays applied between protocol steps (milliseconds)
///
/// Each value is how long the host is given to finish processing the
/// preceding command before the next step depends on its effect. The clear
/// delay must stay longer than the track-name delay because clip deletion is
/// asynchronous on the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettleDelays {
    /// After nudging the track into existence
    pub track_name_ms: u64,
    /// After deleting the existing clip
    pub clear_ms: u64,
    /// After creating the clip
    pub create_ms: u64,
    /// Pause inserted after every `note_pacing_every` written notes
    pub note_pacing_ms: u64,
    pub note_pacing_every: usize,
    /// After the last note so the host registers all of them
    pub populate_ms: u64,
    /// After each of the three loop commands
    pub loop_ms: u64,
    /// After the tempo command
    pub tempo_ms: u64,
}

impl SettleDelays {
    pub const LOOP_COMMANDS: u64 = 3;

    /// All delays set to zero (tests, benchmarks)
    pub fn none() -> Self {
        Self {
            track_name_ms: 0,
            clear_ms: 0,
            create_ms: 0,
            note_pacing_ms: 0,
            note_pacing_every: 10,
            populate_ms: 0,
            loop_ms: 0,
            tempo_ms: 0,
        }
    }

    pub fn track_name(&self) -> Duration {
        Duration::from_millis(self.track_name_ms)
    }

    pub fn clear(&self) -> Duration {
        Duration::from_millis(self.clear_ms)
    }

    pub fn create(&self) -> Duration {
        Duration::from_millis(self.create_ms)
    }

    pub fn note_pacing(&self) -> Duration {
        Duration::from_millis(self.note_pacing_ms)
    }

    pub fn populate(&self) -> Duration {
        Duration::from_millis(self.populate_ms)
    }

    pub fn loop_step(&self) -> Duration {
        Duration::from_millis(self.loop_ms)
    }

    pub fn tempo(&self) -> Duration {
        Duration::from_millis(self.tempo_ms)
    }

    /// Whether a pacing pause is due after `written` notes have been sent
    pub fn pacing_due(&self, written: usize) -> bool {
        self.note_pacing_every > 0 && written > 0 && written % self.note_pacing_every == 0
    }

    /// Wall-clock cost of building one clip that writes `written_notes` notes
    ///
    /// A build that aborts at creation costs less; this is the cost of a
    /// complete build.
    pub fn clip_cost(&self, written_notes: usize) -> Duration {
        let pacing_pauses = if self.note_pacing_every == 0 {
            0
        } else {
            (written_notes / self.note_pacing_every) as u64
        };
        // Saturates instead of wrapping for absurd configured values
        let ms = [
            self.track_name_ms,
            self.clear_ms,
            self.create_ms,
            pacing_pauses.saturating_mul(self.note_pacing_ms),
            self.populate_ms,
            Self::LOOP_COMMANDS.saturating_mul(self.loop_ms),
        ]
        .into_iter()
        .fold(0u64, u64::saturating_add);
        Duration::from_millis(ms)
    }

    /// Check the ordering constraint between delays
    pub fn validate(&self) -> Result<(), DelayError> {
        if self.clear_ms < self.track_name_ms {
            return Err(DelayError::ClearShorterThanTrackName {
                clear_ms: self.clear_ms,
                track_name_ms: self.track_name_ms,
            });
        }
        Ok(())
    }
}

impl Default for SettleDelays {
    fn default() -> Self {
        Self {
            track_name_ms: 100,
            clear_ms: 200,
            create_ms: 300,
            note_pacing_ms: 10,
            note_pacing_every: 10,
            populate_ms: 100,
            loop_ms: 50,
            tempo_ms: 0,
        }
    }
}

/// Seam for waiting between commands
pub trait Pause {
    fn pause(&mut self, duration: Duration);
}

impl<P: Pause + ?Sized> Pause for &mut P {
    fn pause(&mut self, duration: Duration) {
        (**self).pause(duration)
    }
}

/// Blocks the current thread
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadPause;

impl Pause for ThreadPause {
    fn pause(&mut self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

/// Records requested pauses without waiting
#[derive(Debug, Default, Clone)]
pub struct RecordedPauses {
    pauses: Vec<Duration>,
}

impl RecordedPauses {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pauses(&self) -> &[Duration] {
        &self.pauses
    }

    pub fn total(&self) -> Duration {
        self.pauses.iter().sum()
    }
}

impl Pause for RecordedPauses {
    fn pause(&mut self, duration: Duration) {
        self.pauses.push(duration);
    }
}
