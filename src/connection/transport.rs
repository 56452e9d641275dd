// Transport abstraction - fire-and-forget delivery of a single command

use crate::messaging::command::{LiveCommand, OscArg};
use rosc::{OscMessage, OscPacket, OscType};

/// Errors raised locally while trying to send a command
///
/// The destination never acknowledges anything, so these only cover what can
/// go wrong before the datagram leaves this process.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Argument {value} for {address} does not fit into an OSC int32")]
    IntOutOfRange { address: String, value: i64 },

    #[error("OSC encoding failed: {0}")]
    Encode(#[from] rosc::OscError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Send rejected: {0}")]
    Rejected(String),
}

/// Something that can deliver commands to the destination host
///
/// There is no return value beyond local errors: a successful `send` only
/// means the command was handed to the network.
pub trait Transport {
    fn send(&mut self, command: &LiveCommand) -> Result<(), TransportError>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn send(&mut self, command: &LiveCommand) -> Result<(), TransportError> {
        (**self).send(command)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&mut self, command: &LiveCommand) -> Result<(), TransportError> {
        (**self).send(command)
    }
}

/// Build the OSC message for a command, narrowing integers to int32 and reals to float32
pub fn to_osc_message(command: &LiveCommand) -> Result<OscMessage, TransportError> {
    let addr = command.address();
    let args = command
        .args()
        .into_iter()
        .map(|arg| match arg {
            OscArg::Int(value) => i32::try_from(value)
                .map(OscType::Int)
                .map_err(|_| TransportError::IntOutOfRange {
                    address: addr.clone(),
                    value,
                }),
            OscArg::Float(value) => Ok(OscType::Float(value as f32)),
            OscArg::Str(value) => Ok(OscType::String(value)),
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(OscMessage { addr, args })
}

/// Encode a command into a ready-to-send datagram
pub fn encode(command: &LiveCommand) -> Result<Vec<u8>, TransportError> {
    let packet = OscPacket::Message(to_osc_message(command)?);
    Ok(rosc::encoder::encode(&packet)?)
}
