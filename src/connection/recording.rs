// Recording transport - keeps every command instead of sending it
// Used for dry runs and for asserting command order in tests

use crate::connection::transport::{Transport, TransportError, to_osc_message};
use crate::messaging::command::LiveCommand;
use log::info;

type FailRule = Box<dyn FnMut(&LiveCommand) -> bool + Send>;

/// Transport that records commands and can be told to fail selected sends
#[derive(Default)]
pub struct RecordingTransport {
    sent: Vec<LiveCommand>,
    fail_rule: Option<FailRule>,
    log_commands: bool,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recording transport that also logs each command at info level
    pub fn dry_run() -> Self {
        Self {
            log_commands: true,
            ..Self::default()
        }
    }

    /// Make every send matching `rule` fail with a rejection
    pub fn failing_when(rule: impl FnMut(&LiveCommand) -> bool + Send + 'static) -> Self {
        Self {
            fail_rule: Some(Box::new(rule)),
            ..Self::default()
        }
    }

    /// Commands accepted so far, in send order
    pub fn sent(&self) -> &[LiveCommand] {
        &self.sent
    }

    pub fn addresses(&self) -> Vec<String> {
        self.sent.iter().map(LiveCommand::address).collect()
    }
}

impl Transport for RecordingTransport {
    fn send(&mut self, command: &LiveCommand) -> Result<(), TransportError> {
        if let Some(rule) = self.fail_rule.as_mut()
            && rule(command)
        {
            return Err(TransportError::Rejected(command.address()));
        }
        // Same argument checks as the real transport
        to_osc_message(command)?;
        if self.log_commands {
            info!("[dry-run] {}", command);
        }
        self.sent.push(command.clone());
        Ok(())
    }
}
