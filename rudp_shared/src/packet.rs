//! Wire framing: `kind|seqno|payload|checksum`, one packet per datagram.
//!
//! The payload itself may contain `|`; the parser takes the first two
//! fields as `kind`/`seqno`, the last field as the checksum, and rejoins
//! everything in between as the payload (§4.1, §6 of the spec).

use crate::checksum;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Start,
    Data,
    End,
    Ack,
    Sack,
}

impl Kind {
    fn as_str(self) -> &'static str {
        match self {
            Kind::Start => "start",
            Kind::Data => "data",
            Kind::End => "end",
            Kind::Ack => "ack",
            Kind::Sack => "sack",
        }
    }
}

/// A decoded frame, a sum type over the five wire kinds rather than a
/// 4-tuple of strings (per the spec's REDESIGN FLAGS).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Packet {
    Start { seqno: u32, payload: Vec<u8> },
    Data { seqno: u32, payload: Vec<u8> },
    End { seqno: u32, payload: Vec<u8> },
    Ack { next_expected: u32 },
    Sack { next_expected: u32, held: Vec<u32> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Wrong field count, non-integer seqno, or non-hex payload.
    Malformed(String),
    ChecksumMismatch,
    UnknownKind(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Malformed(reason) => write!(f, "malformed frame: {reason}"),
            ParseError::ChecksumMismatch => write!(f, "checksum mismatch"),
            ParseError::UnknownKind(kind) => write!(f, "unknown packet kind: {kind}"),
        }
    }
}

impl std::error::Error for ParseError {}

impl Packet {
    pub fn kind(&self) -> Kind {
        match self {
            Packet::Start { .. } => Kind::Start,
            Packet::Data { .. } => Kind::Data,
            Packet::End { .. } => Kind::End,
            Packet::Ack { .. } => Kind::Ack,
            Packet::Sack { .. } => Kind::Sack,
        }
    }

    /// The data-carrying sequence number, for the three chunk-bearing kinds.
    pub fn seqno(&self) -> Option<u32> {
        match self {
            Packet::Start { seqno, .. } | Packet::Data { seqno, .. } | Packet::End { seqno, .. } => {
                Some(*seqno)
            }
            Packet::Ack { .. } | Packet::Sack { .. } => None,
        }
    }

    pub fn payload(&self) -> Option<&[u8]> {
        match self {
            Packet::Start { payload, .. } | Packet::Data { payload, .. } | Packet::End { payload, .. } => {
                Some(payload)
            }
            Packet::Ack { .. } | Packet::Sack { .. } => None,
        }
    }

    /// Encodes this packet into its wire form, appending the checksum field.
    pub fn encode(&self) -> String {
        let prefix = match self {
            Packet::Start { seqno, payload } => {
                format!("{}|{}|{}|", Kind::Start.as_str(), seqno, hex::encode(payload))
            }
            Packet::Data { seqno, payload } => {
                format!("{}|{}|{}|", Kind::Data.as_str(), seqno, hex::encode(payload))
            }
            Packet::End { seqno, payload } => {
                format!("{}|{}|{}|", Kind::End.as_str(), seqno, hex::encode(payload))
            }
            Packet::Ack { next_expected } => {
                format!("{}|{}|", Kind::Ack.as_str(), next_expected)
            }
            Packet::Sack { next_expected, held } => {
                let held_csv = held
                    .iter()
                    .map(u32::to_string)
                    .collect::<Vec<_>>()
                    .join(",");
                format!("{}|{};{}|", Kind::Sack.as_str(), next_expected, held_csv)
            }
        };
        let sum = checksum::generate(&prefix);
        format!("{prefix}{sum}")
    }

    /// Parses a wire line: splits fields, verifies the checksum, then
    /// decodes kind-specific fields. Any failure is a silent-drop condition
    /// at the caller (§4.1, §7) — this just reports why.
    pub fn parse(line: &str) -> Result<Packet, ParseError> {
        let pieces: Vec<&str> = line.split('|').collect();
        if pieces.len() < 3 {
            return Err(ParseError::Malformed(format!(
                "expected at least 3 fields, got {}",
                pieces.len()
            )));
        }

        if !checksum::validate(line) {
            return Err(ParseError::ChecksumMismatch);
        }

        let kind_str = pieces[0];
        let seqno_field = pieces[1];
        let payload_field = pieces[2..pieces.len() - 1].join("|");

        match kind_str {
            "start" | "data" | "end" => {
                let seqno: u32 = seqno_field
                    .parse()
                    .map_err(|_| ParseError::Malformed(format!("bad seqno {seqno_field:?}")))?;
                let payload = hex::decode(&payload_field)
                    .map_err(|_| ParseError::Malformed("payload is not valid hex".into()))?;
                Ok(match kind_str {
                    "start" => Packet::Start { seqno, payload },
                    "data" => Packet::Data { seqno, payload },
                    _ => Packet::End { seqno, payload },
                })
            }
            "ack" => {
                let next_expected: u32 = seqno_field
                    .parse()
                    .map_err(|_| ParseError::Malformed(format!("bad seqno {seqno_field:?}")))?;
                Ok(Packet::Ack { next_expected })
            }
            "sack" => {
                let (next_str, held_str) = seqno_field
                    .split_once(';')
                    .ok_or_else(|| ParseError::Malformed("sack field missing ';'".into()))?;
                let next_expected: u32 = next_str
                    .parse()
                    .map_err(|_| ParseError::Malformed(format!("bad seqno {next_str:?}")))?;
                let held = if held_str.is_empty() {
                    Vec::new()
                } else {
                    held_str
                        .split(',')
                        .map(|s| {
                            s.parse()
                                .map_err(|_| ParseError::Malformed(format!("bad held seqno {s:?}")))
                        })
                        .collect::<Result<Vec<u32>, ParseError>>()?
                };
                Ok(Packet::Sack {
                    next_expected,
                    held,
                })
            }
            other => Err(ParseError::UnknownKind(other.to_string())),
        }
    }
}
