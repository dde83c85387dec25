//! Base58 with the Bitcoin alphabet, the encoding wallet signatures and
//! public keys travel in.

use crate::error::Result;

/// Encode `input` as Base58. Each leading zero byte maps to a leading `'1'`.
pub fn encode(input: &[u8]) -> String {
    bs58::encode(input).into_string()
}

/// Decode a Base58 string back to bytes.
///
/// # Errors
///
/// Returns `EdgeError::InvalidBase58` on any character outside the alphabet.
pub fn decode(input: &str) -> Result<Vec<u8>> {
    Ok(bs58::decode(input).into_vec()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EdgeError;

    #[test]
    fn known_vectors() {
        let cases: &[(&[u8], &str)] = &[
            (b"", ""),
            (&[0x61], "2g"),
            (&[0x62, 0x62, 0x62], "a3gV"),
            (&[0x63, 0x63, 0x63], "aPEr"),
            (b"hello world", "StV1DL6CwTryKyV"),
            (&[0u8; 10], "1111111111"),
        ];
        for (input, expected) in cases {
            assert_eq!(encode(input), *expected, "encoding {input:02x?}");
            assert_eq!(decode(expected).unwrap(), *input, "decoding {expected}");
        }
    }

    #[test]
    fn leading_zeros_become_ones() {
        let input = [0, 0, 0, 1, 2, 3];
        let encoded = encode(&input);
        assert!(encoded.starts_with("111"));
        assert!(!encoded[3..].starts_with('1'));
        assert_eq!(decode(&encoded).unwrap(), input);
    }

    #[test]
    fn leading_ones_become_zeros() {
        let decoded = decode("11112g").unwrap();
        assert_eq!(decoded, vec![0, 0, 0, 0, 0x61]);
    }

    #[test]
    fn signature_sized_output_fits_bound() {
        let sig = [0xffu8; 64];
        let encoded = encode(&sig);
        assert!(encoded.len() <= 64 * 1365 / 1000 + 1);
        assert_eq!(decode(&encoded).unwrap(), sig);
    }

    #[test]
    fn rejects_characters_outside_alphabet() {
        for bad in ["0", "O", "I", "l", "abc+"] {
            assert!(
                matches!(decode(bad), Err(EdgeError::InvalidBase58(_))),
                "{bad} should be rejected"
            );
        }
        match decode("2gl") {
            Err(EdgeError::InvalidBase58(bs58::decode::Error::InvalidCharacter {
                character,
                index,
            })) => {
                assert_eq!(character, 'l');
                assert_eq!(index, 2);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
