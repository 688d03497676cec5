use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

/// Hashes bytes using Blake3 (16 bytes) and encodes them with base64url (no padding).
/// Returns a stable, compact identifier (~22 characters).
pub fn content_id(input: &[u8]) -> String {
    let hash = blake3::hash(input);
    URL_SAFE_NO_PAD.encode(&hash.as_bytes()[..16])
}

/// Streams a reader through Blake3 and returns its content id.
pub fn content_id_reader<R: std::io::Read>(reader: &mut R) -> std::io::Result<String> {
    let mut hasher = blake3::Hasher::new();
    std::io::copy(reader, &mut hasher)?;
    Ok(URL_SAFE_NO_PAD.encode(&hasher.finalize().as_bytes()[..16]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reader_and_slice_agree() {
        let data = b"some mod payload";
        let from_reader = content_id_reader(&mut &data[..]).unwrap();
        assert_eq!(content_id(data), from_reader);
        assert_eq!(from_reader.len(), 22);
    }
}
