//! Integrity check over the wire prefix `kind|seqno|payload|`.
//!
//! The spec permits "a 16/32-bit rolling sum, CRC-16, or equivalent" — this
//! uses `crc32fast`, encoded as 8 lowercase hex digits, appended as the final
//! `|`-delimited field.

/// Computes the checksum for a prefix (everything up to and including the
/// final `|`, i.e. the bytes a validator would recompute over).
pub fn generate(prefix: &str) -> String {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(prefix.as_bytes());
    format!("{:08x}", hasher.finalize())
}

/// Splits `message` on its last `|` and checks that the trailing field
/// matches the checksum of everything before it. Returns `false` for a
/// message with no `|` at all (it cannot carry a checksum field).
pub fn validate(message: &str) -> bool {
    match message.rfind('|') {
        Some(idx) => {
            let prefix = &message[..=idx];
            let claimed = &message[idx + 1..];
            generate(prefix) == claimed
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_deterministic() {
        assert_eq!(generate("data|1|deadbeef|"), generate("data|1|deadbeef|"));
    }

    #[test]
    fn test_generate_differs_on_single_byte_change() {
        assert_ne!(generate("data|1|deadbeef|"), generate("data|1|deadbeeg|"));
    }

    #[test]
    fn test_validate_roundtrip() {
        let prefix = "start|0|48656c6c6f|";
        let checksum = generate(prefix);
        let message = format!("{prefix}{checksum}");
        assert!(validate(&message));
    }

    #[test]
    fn test_validate_rejects_corrupted_prefix() {
        let prefix = "start|0|48656c6c6f|";
        let checksum = generate(prefix);
        let corrupted = format!("start|0|48656c6c6e|{checksum}");
        assert!(!validate(&corrupted));
    }

    #[test]
    fn test_validate_rejects_tampered_checksum() {
        let prefix = "ack|3|";
        let checksum = generate(prefix);
        let mut tampered = checksum.clone();
        tampered.replace_range(0..1, if &tampered[0..1] == "0" { "1" } else { "0" });
        let message = format!("{prefix}{tampered}");
        assert!(!validate(&message));
    }

    #[test]
    fn test_validate_rejects_message_without_separator() {
        assert!(!validate("nopipeshere"));
    }

    #[test]
    fn test_single_byte_flip_anywhere_in_prefix_is_detected() {
        let prefix = "data|42|0123456789abcdef|";
        let checksum = generate(prefix);
        let good = format!("{prefix}{checksum}");
        for i in 0..prefix.len() {
            let mut bytes = prefix.as_bytes().to_vec();
            bytes[i] ^= 0x01;
            let Ok(flipped_prefix) = String::from_utf8(bytes) else {
                continue;
            };
            let flipped = format!("{flipped_prefix}{checksum}");
            assert_ne!(flipped, good);
            assert!(!validate(&flipped), "byte {i} flip went undetected");
        }
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// §8 property 6: a single-byte corruption anywhere in an
        /// arbitrary valid frame's prefix is always caught.
        #[test]
        fn corrupted_prefix_never_validates(
            kind in "[a-z]{3,4}",
            seqno in 0u32..10_000,
            payload in "[0-9a-f]{0,64}",
            flip_index in 0usize..64,
            flip_mask in 1u8..=255u8,
        ) {
            let prefix = format!("{kind}|{seqno}|{payload}|");
            let checksum = generate(&prefix);
            let good = format!("{prefix}{checksum}");
            prop_assume!(validate(&good));

            let index = flip_index % prefix.len();
            let mut bytes = prefix.as_bytes().to_vec();
            bytes[index] ^= flip_mask;
            let Ok(flipped_prefix) = String::from_utf8(bytes) else {
                return Ok(());
            };
            if flipped_prefix == prefix {
                return Ok(());
            }
            let flipped = format!("{flipped_prefix}{checksum}");
            prop_assert!(!validate(&flipped));
        }

        /// Any two-argument `generate` call is a pure function of its input.
        #[test]
        fn generate_is_deterministic_for_arbitrary_input(prefix in ".*") {
            prop_assert_eq!(generate(&prefix), generate(&prefix));
        }
    }
}
