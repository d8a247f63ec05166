//! Utilities for working with `skyform`.

/// Returns the sha256 digest of the given bytes, hex encoded.
///
/// Used to fingerprint embedded function sources so the deployment
/// engine can detect source changes without diffing the source itself.
pub fn sha256_hex(bytes: impl AsRef<[u8]>) -> String {
    let digest = ring::digest::digest(&ring::digest::SHA256, bytes.as_ref());
    data_encoding::HEXUPPER.encode(digest.as_ref())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn sha256_hex_known_digests() {
        assert_eq!(
            "E3B0C44298FC1C149AFBF4C8996FB92427AE41E4649B934CA495991B7852B855",
            &sha256_hex(b"")
        );
        assert_eq!(
            "2CF24DBA5FB0A30E26E83B2AC5B9E29E1B161E5C1FA7425E73043362938B9824",
            &sha256_hex(b"hello")
        );
    }
}
