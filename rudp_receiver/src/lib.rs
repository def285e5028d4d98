pub mod connection;
pub mod error;
pub mod receiver;

pub use connection::Connection;
pub use error::ReceiverError;
pub use receiver::{Config, Receiver};
