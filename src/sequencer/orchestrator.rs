// Fan-out orchestration - builds every target of a clip set in declared order
// Stops at the first target whose clip could not be created

use crate::sequencer::clip::{ClipBuild, ClipOutcome};
use crate::sequencer::clip_set::{ClipMode, ClipSet, TargetName};
use log::{error, info, warn};

/// Outcome of one target together with where it was sent
#[derive(Debug, Clone, PartialEq)]
pub struct TargetReport {
    pub name: TargetName,
    pub track_index: u32,
    pub slot_index: u32,
    pub outcome: ClipOutcome,
}

impl TargetReport {
    fn describe(&self) -> String {
        let slot = self.outcome.resolved_slot_index.unwrap_or(self.slot_index);
        let mut text = format!(
            "track {}, slot {} with {} notes",
            self.track_index, slot, self.outcome.notes_written
        );
        if self.outcome.notes_skipped > 0 {
            text.push_str(&format!(" ({} skipped)", self.outcome.notes_skipped));
        }
        text
    }
}

/// Everything one orchestration run produced
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateResult {
    pub mode: ClipMode,
    /// Reports in dispatch order; ends with the failing target if any
    pub reports: Vec<TargetReport>,
    pub failed: Option<TargetName>,
}

impl AggregateResult {
    pub fn is_success(&self) -> bool {
        self.failed.is_none()
    }

    pub fn report(&self, name: TargetName) -> Option<&TargetReport> {
        self.reports.iter().find(|r| r.name == name)
    }

    /// Human readable summary of a successful run
    pub fn summary(&self) -> String {
        match self.reports.as_slice() {
            [single] if self.mode == ClipMode::Single => {
                format!("Created clip on {}", single.describe())
            }
            reports => {
                let parts: Vec<String> = reports
                    .iter()
                    .map(|r| format!("{} on {}", r.name, r.describe()))
                    .collect();
                format!("Created {} clips: {}", reports.len(), parts.join("; "))
            }
        }
    }

    /// Error text attributing the failure to its target
    pub fn failure_message(&self) -> Option<String> {
        let name = self.failed?;
        let report = self.report(name)?;
        Some(format!(
            "Failed to create {} on track {}, slot {} in Ableton",
            name, report.track_index, report.slot_index
        ))
    }
}

/// Drives a clip builder across all targets of a set, one at a time
pub struct Orchestrator<B: ClipBuild> {
    builder: B,
}

impl<B: ClipBuild> Orchestrator<B> {
    pub fn new(builder: B) -> Self {
        Self { builder }
    }

    pub fn builder(&self) -> &B {
        &self.builder
    }

    pub fn builder_mut(&mut self) -> &mut B {
        &mut self.builder
    }

    pub fn into_builder(self) -> B {
        self.builder
    }

    pub fn orchestrate(&mut self, set: &ClipSet) -> AggregateResult {
        let mode = set.mode();
        info!(
            "Orchestrating {:?} clip set ({} targets, {} notes)",
            mode,
            mode.target_count(),
            set.note_count()
        );
        for (a, b) in set.shared_identities() {
            warn!(
                "{} and {} target the same track and slot; the later one replaces the earlier",
                a, b
            );
        }

        let mut reports = Vec::with_capacity(mode.target_count());
        for (name, target) in set.targets() {
            info!("Building {}", name);
            let outcome = self.builder.build(target);
            let accepted = outcome.accepted;
            reports.push(TargetReport {
                name,
                track_index: target.track_index,
                slot_index: target.slot_index,
                outcome,
            });
            if !accepted {
                error!("{} could not be created, skipping remaining targets", name);
                return AggregateResult {
                    mode,
                    reports,
                    failed: Some(name),
                };
            }
        }

        AggregateResult {
            mode,
            reports,
            failed: None,
        }
    }
}
