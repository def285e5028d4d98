//! Drives a `WindowState` over a connected UDP socket: the I/O half of
//! §4.4's send loop (`state.rs` holds the pure bookkeeping half).
//!
//! Grounded on `chat_shared::udp_wrapper::UdpWrapper::send_message_reliable`'s
//! send/await-ack/retry shape, generalised from "one message" to "a
//! sliding window of packets."

use crate::error::SendError;
use crate::state::WindowState;
use rudp_shared::constants::{RECV_BUF_SIZE, RTO, WINDOW};
use rudp_shared::{Packet, logger};
use std::time::Instant;
use tokio::net::UdpSocket;

/// Packetises `data` and drives it to completion over `socket`, which must
/// already be connected to the receiver's address. Returns once the
/// receiver has cumulatively acked every packet.
pub async fn send_file(
    socket: &UdpSocket,
    data: &[u8],
    sack_mode: bool,
    debug: bool,
) -> Result<(), SendError> {
    let packets = crate::chunker::packetize(data);
    let total = packets.len();
    let mut window = WindowState::new(packets);
    let mut buf = vec![0u8; RECV_BUF_SIZE];

    while !window.is_complete() {
        let due = window.due_for_transmit(Instant::now(), WINDOW, RTO);
        for i in due {
            logger::log_debug(debug, &format!("-> seqno {i} ({}/{total})", window.base()));
            socket
                .send(window.wire(i).as_bytes())
                .await
                .map_err(SendError::Socket)?;
        }

        match tokio::time::timeout(RTO, socket.recv(&mut buf)).await {
            Ok(Ok(len)) => handle_reply(&mut window, &buf[..len], debug),
            Ok(Err(e)) => return Err(SendError::Socket(e)),
            Err(_elapsed) => {
                // Next loop iteration's `due_for_transmit` resends whatever
                // is still in flight past its RTO.
            }
        }
    }

    logger::log_success(&format!("transfer complete, {total} packets delivered"));
    Ok(())
}

fn handle_reply(window: &mut WindowState, bytes: &[u8], debug: bool) {
    let Ok(text) = std::str::from_utf8(bytes) else {
        logger::log_debug(debug, "dropped non-UTF8 reply");
        return;
    };

    match Packet::parse(text) {
        Ok(Packet::Ack { next_expected }) => {
            logger::log_debug(debug, &format!("<- ack {next_expected}"));
            window.handle_ack(next_expected);
        }
        Ok(Packet::Sack {
            next_expected,
            held,
        }) => {
            logger::log_debug(debug, &format!("<- sack {next_expected} held={held:?}"));
            window.handle_sack(next_expected, &held);
        }
        Ok(other) => {
            logger::log_debug(debug, &format!("dropped unexpected reply kind {:?}", other.kind()));
        }
        Err(e) => {
            logger::log_debug(debug, &format!("dropped malformed reply: {e}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::UdpSocket;

    async fn loopback_pair() -> (UdpSocket, UdpSocket) {
        let a = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let b = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        a.connect(b.local_addr().unwrap()).await.unwrap();
        b.connect(a.local_addr().unwrap()).await.unwrap();
        (a, b)
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_send_file_completes_against_an_acking_echo_peer() {
        let (sender_sock, receiver_sock) = loopback_pair().await;
        let data = vec![42u8; 1300];

        let echo = tokio::spawn(async move {
            let mut expected: u32 = 0;
            let mut buf = vec![0u8; RECV_BUF_SIZE];
            loop {
                let len = receiver_sock.recv(&mut buf).await.unwrap();
                let text = std::str::from_utf8(&buf[..len]).unwrap();
                let packet = Packet::parse(text).unwrap();
                if let Some(seqno) = packet.seqno() {
                    if seqno == expected {
                        expected += 1;
                    }
                    let is_end = matches!(packet, Packet::End { .. });
                    let ack = Packet::Ack {
                        next_expected: expected,
                    };
                    receiver_sock.send(ack.encode().as_bytes()).await.unwrap();
                    if is_end && expected == seqno + 1 {
                        break;
                    }
                }
            }
        });

        send_file(&sender_sock, &data, false, false).await.unwrap();
        echo.await.unwrap();
    }
}
