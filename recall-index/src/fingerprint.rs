//! Content fingerprinting for change detection.

/// Hex-encoded blake3 digest of the given bytes.
///
/// The fingerprint is stored alongside every chunk record for a file; a file
/// is re-indexed only when its current fingerprint differs from the stored
/// one (or when forced).
pub fn fingerprint(bytes: &[u8]) -> String {
    hex::encode(blake3::hash(bytes).as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_is_stable() {
        assert_eq!(fingerprint(b"hello"), fingerprint(b"hello"));
    }

    #[test]
    fn fingerprint_detects_changes() {
        assert_ne!(fingerprint(b"hello"), fingerprint(b"hello!"));
    }

    #[test]
    fn fingerprint_is_hex_of_32_bytes() {
        let fp = fingerprint(b"");
        assert_eq!(fp.len(), 64);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
