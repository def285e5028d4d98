//! One reassembly buffer per remote peer (§3, §4.2).

use rudp_shared::Packet;
use rudp_shared::constants::MAX_BUF;
use std::collections::BTreeMap;
use std::io::Write;
use std::time::{Duration, Instant};

/// Per-peer reassembly state. Generic over the sink so tests can use an
/// in-memory buffer instead of a real file.
pub struct Connection<W: Write> {
    /// Highest sequence number already delivered in order. Signed so it can
    /// represent "one before the start seqno" without underflowing when the
    /// transfer begins at seqno 0.
    current_seqno: i64,
    buffer: BTreeMap<u32, Vec<u8>>,
    sink: W,
    updated: Instant,
}

impl<W: Write> Connection<W> {
    pub fn new(start_seq: u32, sink: W) -> Self {
        Connection {
            current_seqno: start_seq as i64 - 1,
            buffer: BTreeMap::new(),
            sink,
            updated: Instant::now(),
        }
    }

    /// Accepts an inbound `start`/`data`/`end` packet: buffers it if it's in
    /// window, drains whatever is now deliverable in order, writes each
    /// drained chunk to the sink (flushing after every write), and returns
    /// the ack (or sack) packet to send back.
    ///
    /// Returns `Err` if writing a deliverable chunk to the sink fails; state
    /// (including `current_seqno`) still reflects every chunk delivered
    /// before the failing write.
    pub fn accept(&mut self, seqno: u32, payload: Vec<u8>, sack_mode: bool) -> std::io::Result<Packet> {
        let seqno_i = i64::from(seqno);
        if self.current_seqno < seqno_i && seqno_i <= self.current_seqno + i64::from(MAX_BUF) {
            self.buffer.entry(seqno).or_insert(payload);
        }

        while let Some(next) = u32::try_from(self.current_seqno + 1).ok() {
            let Some(chunk) = self.buffer.remove(&next) else {
                break;
            };
            self.sink.write_all(&chunk)?;
            self.sink.flush()?;
            self.current_seqno += 1;
        }

        self.updated = Instant::now();
        let next_expected = (self.current_seqno + 1) as u32;

        Ok(if sack_mode {
            Packet::Sack {
                next_expected,
                held: self.buffer.keys().copied().collect(),
            }
        } else {
            Packet::Ack { next_expected }
        })
    }

    pub fn is_idle(&self, now: Instant, timeout: Duration) -> bool {
        now.duration_since(self.updated) > timeout
    }

    pub fn buffer_len(&self) -> usize {
        self.buffer.len()
    }

    pub fn current_seqno(&self) -> i64 {
        self.current_seqno
    }

    /// Consumes the connection, closing its sink (a plain drop — every
    /// write was already flushed, per §5's resource discipline).
    pub fn close(self) {
        drop(self);
    }
}
