// Process boundary - request parsing and response formatting

pub mod payload;
pub mod response;

pub use payload::{ClipRequest, PayloadError};
pub use response::SendResponse;
