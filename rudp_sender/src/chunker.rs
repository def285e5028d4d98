//! Splits a byte stream into the fixed-size `start`/`data`/`end` sequence
//! the wire format expects (§4.4). Seqno 0 is always `start`, even when it
//! is also the only chunk — the receiver only opens a connection on a
//! `start` packet, so seqno 0 can never be demoted to `end`. Any later
//! chunk shorter than `CHUNK_SIZE` is `end`; everything else is `data`. A
//! file whose size is an exact multiple of `CHUNK_SIZE` therefore ends on a
//! full-size `data` packet with no trailing `end` at all (§4.4 boundary
//! case, §9 note 2).

use rudp_shared::Packet;
use rudp_shared::constants::CHUNK_SIZE;

/// Packetises `data` into a seqno-ordered `Vec<Packet>`. An empty input
/// still yields a single `start` packet carrying zero bytes, so every
/// transfer has at least one frame to open the connection.
pub fn packetize(data: &[u8]) -> Vec<Packet> {
    let chunks: Vec<&[u8]> = if data.is_empty() {
        vec![&[]]
    } else {
        data.chunks(CHUNK_SIZE).collect()
    };

    chunks
        .into_iter()
        .enumerate()
        .map(|(seqno, chunk)| {
            let seqno = seqno as u32;
            let payload = chunk.to_vec();
            if seqno == 0 {
                Packet::Start { seqno, payload }
            } else if chunk.len() < CHUNK_SIZE {
                Packet::End { seqno, payload }
            } else {
                Packet::Data { seqno, payload }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_yields_one_start_packet() {
        let packets = packetize(&[]);
        assert_eq!(packets, vec![Packet::Start { seqno: 0, payload: vec![] }]);
    }

    #[test]
    fn test_single_short_chunk_is_start_only_so_the_connection_can_open() {
        let packets = packetize(b"hello");
        assert_eq!(
            packets,
            vec![Packet::Start {
                seqno: 0,
                payload: b"hello".to_vec()
            }]
        );
    }

    #[test]
    fn test_exact_multiple_of_chunk_size_ends_on_full_data_packet() {
        let data = vec![7u8; CHUNK_SIZE * 2];
        let packets = packetize(&data);
        assert_eq!(packets.len(), 2);
        assert!(matches!(packets[0], Packet::Start { seqno: 0, .. }));
        assert!(matches!(packets[1], Packet::Data { seqno: 1, .. }));
        assert_eq!(packets[1].payload().unwrap().len(), CHUNK_SIZE);
    }

    #[test]
    fn test_trailing_short_chunk_becomes_end() {
        let mut data = vec![1u8; CHUNK_SIZE * 2];
        data.extend_from_slice(&[2u8; 13]);
        let packets = packetize(&data);
        assert_eq!(packets.len(), 3);
        assert!(matches!(packets[0], Packet::Start { seqno: 0, .. }));
        assert!(matches!(packets[1], Packet::Data { seqno: 1, .. }));
        assert!(matches!(packets[2], Packet::End { seqno: 2, .. }));
        assert_eq!(packets[2].payload().unwrap().len(), 13);
    }

    #[test]
    fn test_seqnos_are_contiguous_from_zero() {
        let data = vec![9u8; CHUNK_SIZE * 4 + 1];
        let packets = packetize(&data);
        for (i, p) in packets.iter().enumerate() {
            assert_eq!(p.seqno().unwrap(), i as u32);
        }
    }

    #[test]
    fn test_reassembled_payloads_equal_input() {
        let data: Vec<u8> = (0..CHUNK_SIZE * 3 + 250).map(|i| (i % 251) as u8).collect();
        let packets = packetize(&data);
        let mut out = Vec::new();
        for p in &packets {
            out.extend_from_slice(p.payload().unwrap());
        }
        assert_eq!(out, data);
    }
}
