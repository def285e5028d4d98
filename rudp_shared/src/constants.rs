//! Protocol constants fixed by the spec (§3, §9 note 4). Not adaptive —
//! an implementer may expose them as CLI flags but must not change these
//! defaults without noting the compatibility impact.

use std::time::Duration;

/// Fixed chunk size the sender packetises the input file into.
pub const CHUNK_SIZE: usize = 500;

/// Sender sliding window size: at most this many outstanding packets.
pub const WINDOW: usize = 5;

/// Fixed retransmission timeout.
pub const RTO: Duration = Duration::from_millis(500);

/// Receiver out-of-order reassembly buffer cap, per connection.
pub const MAX_BUF: u32 = 5;

/// Default receiver UDP port.
pub const DEFAULT_PORT: u16 = 33122;

/// Default idle-connection timeout, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Receive buffer size; well above the largest frame this protocol emits.
pub const RECV_BUF_SIZE: usize = 4096;
