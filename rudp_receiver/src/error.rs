//! Hand-written error enums in the teacher's style (`chat_server`'s
//! `UserConnectionError`, `chat_shared`'s `MessageError`): matched
//! explicitly by callers rather than boxed.

use std::fmt;
use std::io;

#[derive(Debug)]
pub enum ReceiverError {
    Bind(io::Error),
    Socket(io::Error),
    Sink(io::Error),
}

impl fmt::Display for ReceiverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReceiverError::Bind(e) => write!(f, "failed to bind receiver socket: {e}"),
            ReceiverError::Socket(e) => write!(f, "socket I/O error: {e}"),
            ReceiverError::Sink(e) => write!(f, "sink I/O error: {e}"),
        }
    }
}

impl std::error::Error for ReceiverError {}
