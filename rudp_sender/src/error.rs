//! Hand-written error enum matching `rudp_receiver`'s `ReceiverError` and
//! the teacher's `UserConnectionError` style.

use std::fmt;
use std::io;

#[derive(Debug)]
pub enum SendError {
    Connect(io::Error),
    Socket(io::Error),
    Read(io::Error),
}

impl fmt::Display for SendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SendError::Connect(e) => write!(f, "failed to connect sender socket: {e}"),
            SendError::Socket(e) => write!(f, "socket I/O error: {e}"),
            SendError::Read(e) => write!(f, "failed to read input file: {e}"),
        }
    }
}

impl std::error::Error for SendError {}
