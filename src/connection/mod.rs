// Outbound connection to the destination host

pub mod recording;
pub mod transport;
pub mod udp;

pub use recording::RecordingTransport;
pub use transport::{Transport, TransportError};
pub use udp::UdpTransport;
