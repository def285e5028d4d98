pub mod checksum;
pub mod constants;
pub mod logger;
pub mod packet;

pub use packet::{Kind, Packet, ParseError};
