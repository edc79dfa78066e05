//! Random lowercase identifiers drawn from the OS cryptographic source.

use rand::RngCore;
use rand::rngs::OsRng;

use crate::error::{Error, Result};

const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz";

/// Largest multiple of the charset length that fits in a byte. Bytes at or
/// above it are rejected so every letter is equally likely.
const ACCEPT_BELOW: u8 = (256 / CHARSET.len() * CHARSET.len()) as u8;

/// Returns a string of exactly `length` lowercase ASCII letters.
pub fn string(length: usize) -> Result<String> {
    let mut out = String::with_capacity(length);
    let mut buf = vec![0u8; length.max(1)];

    while out.len() < length {
        OsRng.try_fill_bytes(&mut buf).map_err(Error::RandomSource)?;
        for &b in &buf {
            if out.len() == length {
                break;
            }
            if b < ACCEPT_BELOW {
                out.push(CHARSET[usize::from(b) % CHARSET.len()] as char);
            }
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_has_requested_length() {
        for len in [0, 1, 8, 64, 1000] {
            assert_eq!(string(len).unwrap().len(), len);
        }
    }

    #[test]
    fn string_uses_lowercase_alphabet() {
        let s = string(2048).unwrap();
        assert!(s.bytes().all(|b| b.is_ascii_lowercase()), "got: {s}");
    }

    #[test]
    fn consecutive_strings_differ() {
        assert_ne!(string(16).unwrap(), string(16).unwrap());
    }

    #[test]
    fn accept_bound_is_multiple_of_charset() {
        assert_eq!(usize::from(ACCEPT_BELOW) % CHARSET.len(), 0);
        assert_eq!(ACCEPT_BELOW, 234);
    }
}
