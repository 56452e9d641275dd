// Session - one request over one connection

use crate::config::SenderConfig;
use crate::connection::transport::Transport;
use crate::request::payload::ClipRequest;
use crate::sequencer::clip::ClipBuilder;
use crate::sequencer::note::NoteValidator;
use crate::sequencer::orchestrator::{AggregateResult, Orchestrator};
use crate::sequencer::timing::{Pause, SettleDelays};
use log::info;
use std::time::Duration;

/// Owns the transport for the duration of a run
pub struct Session<T: Transport, P: Pause> {
    orchestrator: Orchestrator<ClipBuilder<T, P>>,
    delays: SettleDelays,
}

impl<T: Transport, P: Pause> Session<T, P> {
    pub fn new(transport: T, pause: P, config: &SenderConfig) -> Self {
        let builder = ClipBuilder::new(
            transport,
            pause,
            config.delays,
            NoteValidator::new(config.notes),
        )
        .with_track_name(config.track_name.clone());
        Self {
            orchestrator: Orchestrator::new(builder),
            delays: config.delays,
        }
    }

    /// Wall-clock time a run of `request` will take at most
    pub fn estimated_duration(&self, request: &ClipRequest) -> Duration {
        let tempo = if request.bpm.is_some() {
            self.delays.tempo()
        } else {
            Duration::ZERO
        };
        tempo + request.clip_set.estimated_duration(&self.delays)
    }

    /// Set the tempo if requested, then build every clip
    pub fn run(&mut self, request: &ClipRequest) -> AggregateResult {
        info!(
            "Expected duration: {:?}",
            self.estimated_duration(request)
        );
        if let Some(bpm) = request.bpm {
            self.orchestrator.builder_mut().set_tempo(bpm);
        }
        self.orchestrator.orchestrate(&request.clip_set)
    }

    pub fn transport(&self) -> &T {
        self.orchestrator.builder().transport()
    }

    pub fn into_parts(self) -> (T, P) {
        self.orchestrator.into_builder().into_parts()
    }
}
