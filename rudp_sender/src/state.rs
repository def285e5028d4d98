//! The sender's sliding-window bookkeeping, kept separate from socket I/O
//! so it can be exercised without a network (§4.4, REDESIGN FLAGS).
//!
//! Per-packet status is a tagged variant rather than the parallel
//! `acked: Vec<bool>` / "last send time" arrays the original tracks —
//! the four states below are exactly the ones the state machine names.

use rudp_shared::Packet;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketState {
    /// Never sent, or timed out waiting for an ack and eligible again.
    Pending,
    /// Sent at the given time, awaiting a reply.
    InFlight,
    /// Named by a selective ack; held out of retransmission but not yet
    /// past the cumulative point, so `base` has not moved past it.
    SackAcked,
    /// Covered by a cumulative ack; terminal.
    Delivered,
}

pub struct WindowState {
    packets: Vec<Packet>,
    wire: Vec<String>,
    states: Vec<PacketState>,
    sent_at: Vec<Option<Instant>>,
    base: usize,
}

impl WindowState {
    pub fn new(packets: Vec<Packet>) -> Self {
        let wire = packets.iter().map(Packet::encode).collect();
        let states = vec![PacketState::Pending; packets.len()];
        let sent_at = vec![None; packets.len()];
        WindowState {
            packets,
            wire,
            states,
            sent_at,
            base: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.packets.len()
    }

    pub fn base(&self) -> usize {
        self.base
    }

    pub fn is_complete(&self) -> bool {
        self.base == self.packets.len()
    }

    pub fn wire(&self, i: usize) -> &str {
        &self.wire[i]
    }

    /// Scans `[base, base+window)` and marks as `InFlight` (refreshing the
    /// send clock) every index that is `Pending`, or `InFlight` past `rto`.
    /// Returns the indices due for transmission this tick, in order.
    pub fn due_for_transmit(&mut self, now: Instant, window: usize, rto: Duration) -> Vec<usize> {
        let end = (self.base + window).min(self.packets.len());
        let mut due = Vec::new();
        for i in self.base..end {
            let send_now = match self.states[i] {
                PacketState::Pending => true,
                PacketState::InFlight => {
                    self.sent_at[i].is_none_or(|t| now.duration_since(t) >= rto)
                }
                PacketState::SackAcked | PacketState::Delivered => false,
            };
            if send_now {
                self.states[i] = PacketState::InFlight;
                self.sent_at[i] = Some(now);
                due.push(i);
            }
        }
        due
    }

    /// Cumulative ack: every index below `next_expected` is delivered.
    /// Never moves `base` backwards (§4.4 ack monotonicity).
    pub fn handle_ack(&mut self, next_expected: u32) {
        self.advance_base(next_expected);
    }

    /// Selective ack: advances `base` cumulatively exactly like a plain
    /// ack, then marks each held seqno (ahead of the new base) as seen so
    /// the next window scan skips it — without moving `base` itself.
    pub fn handle_sack(&mut self, next_expected: u32, held: &[u32]) {
        self.advance_base(next_expected);
        for &s in held {
            let i = s as usize;
            if i >= self.base && i < self.packets.len() && self.states[i] != PacketState::Delivered
            {
                self.states[i] = PacketState::SackAcked;
            }
        }
    }

    fn advance_base(&mut self, next_expected: u32) {
        let target = (next_expected as usize).min(self.packets.len());
        if target > self.base {
            for s in &mut self.states[self.base..target] {
                *s = PacketState::Delivered;
            }
            self.base = target;
        }
    }
}
