//! Codec Pipeline Module
//!
//! Turns values into the text that gets persisted and back again.
//!
//! Compression is best-effort: any failure is logged and the data passes
//! through untouched. Decryption is not: a tag that fails to verify is always
//! an error, since handing back unverified bytes would be unsafe.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::RngCore;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::warn;

use crate::error::{CacheError, Result};

// == Constants ==
/// Marker in front of every compressed payload.
pub const COMPRESSED_MARKER: &str = "lz4:";

/// Refuse to inflate payloads claiming more than this many bytes.
const MAX_DECOMPRESSED_LEN: usize = 64 * 1024 * 1024;

/// AES-GCM nonce length in bytes.
pub const NONCE_LEN: usize = 12;

/// AES-GCM authentication tag length in bytes.
pub const TAG_LEN: usize = 16;

/// AES-256 key length in bytes.
pub const KEY_LEN: usize = 32;

// == Compression ==
/// Serializes `value` to canonical JSON, then compresses it.
///
/// Only serialization can fail; a compression failure yields the plain JSON.
pub fn compress<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let json = serde_json::to_string(value)?;
    Ok(compress_text(&json))
}

/// Compresses already-serialized text, falling back to the input on failure.
pub fn compress_text(text: &str) -> String {
    match try_compress(text) {
        Ok(compressed) => compressed,
        Err(reason) => {
            warn!("Compression failed, storing uncompressed: {}", reason);
            text.to_string()
        }
    }
}

fn try_compress(text: &str) -> std::result::Result<String, String> {
    if u32::try_from(text.len()).is_err() {
        return Err(format!("{} bytes is too large for an lz4 block", text.len()));
    }
    let block = lz4_flex::block::compress_prepend_size(text.as_bytes());
    Ok(format!("{}{}", COMPRESSED_MARKER, STANDARD.encode(block)))
}

/// Reverses [`compress`] and parses the result.
pub fn decompress<T: DeserializeOwned>(encoded: &str) -> Result<T> {
    Ok(serde_json::from_str(&decompress_text(encoded))?)
}

/// Reverses [`compress_text`], returning `encoded` unchanged if it is not a
/// valid compressed payload.
pub fn decompress_text(encoded: &str) -> String {
    match try_decompress(encoded) {
        Ok(text) => text,
        Err(reason) => {
            warn!("Decompression failed, passing data through: {}", reason);
            encoded.to_string()
        }
    }
}

fn try_decompress(encoded: &str) -> std::result::Result<String, String> {
    let payload = encoded
        .strip_prefix(COMPRESSED_MARKER)
        .ok_or("payload is not compressed")?;
    let bytes = STANDARD.decode(payload).map_err(|e| e.to_string())?;
    if bytes.len() < 4 {
        return Err("compressed block is truncated".to_string());
    }

    let declared = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize;
    if declared > MAX_DECOMPRESSED_LEN {
        return Err(format!("declared length {} exceeds limit", declared));
    }

    let raw = lz4_flex::block::decompress(&bytes[4..], declared).map_err(|e| e.to_string())?;
    String::from_utf8(raw).map_err(|e| e.to_string())
}

/// Whether `text` carries the compressed marker.
pub fn is_compressed(text: &str) -> bool {
    text.starts_with(COMPRESSED_MARKER)
}

// == Encrypted Envelope ==
/// AEAD output, each part hex-encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedEnvelope {
    pub nonce: String,
    pub ciphertext: String,
    #[serde(rename = "authTag")]
    pub auth_tag: String,
}

// == Cipher ==
/// AES-256-GCM bound to one secret.
#[derive(Clone)]
pub struct Cipher {
    aead: Aes256Gcm,
}

impl std::fmt::Debug for Cipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cipher").finish_non_exhaustive()
    }
}

impl Cipher {
    /// Builds a cipher from exactly 32 bytes of key material.
    pub fn new(secret: &[u8]) -> Result<Self> {
        if secret.len() != KEY_LEN {
            return Err(CacheError::InvalidKey(format!(
                "expected {} bytes of key material, got {}",
                KEY_LEN,
                secret.len()
            )));
        }
        let aead =
            Aes256Gcm::new_from_slice(secret).map_err(|e| CacheError::InvalidKey(e.to_string()))?;
        Ok(Self { aead })
    }

    /// Encrypts under a freshly generated random nonce.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<EncryptedEnvelope> {
        let mut nonce = [0u8; NONCE_LEN];
        rand::thread_rng().fill_bytes(&mut nonce);

        let mut sealed = self
            .aead
            .encrypt(Nonce::from_slice(&nonce), plaintext)
            .map_err(|e| CacheError::Encryption(e.to_string()))?;

        // aes-gcm appends the tag to the ciphertext
        let tag = sealed.split_off(sealed.len() - TAG_LEN);

        Ok(EncryptedEnvelope {
            nonce: hex::encode(nonce),
            ciphertext: hex::encode(sealed),
            auth_tag: hex::encode(tag),
        })
    }

    /// Verifies and decrypts. Any malformed part or bad tag is
    /// [`CacheError::Authentication`].
    pub fn decrypt(&self, envelope: &EncryptedEnvelope) -> Result<Vec<u8>> {
        let nonce = hex::decode(&envelope.nonce).map_err(|_| CacheError::Authentication)?;
        let mut sealed =
            hex::decode(&envelope.ciphertext).map_err(|_| CacheError::Authentication)?;
        let tag = hex::decode(&envelope.auth_tag).map_err(|_| CacheError::Authentication)?;

        if nonce.len() != NONCE_LEN || tag.len() != TAG_LEN {
            return Err(CacheError::Authentication);
        }
        sealed.extend_from_slice(&tag);

        self.aead
            .decrypt(Nonce::from_slice(&nonce), sealed.as_slice())
            .map_err(|_| CacheError::Authentication)
    }

    /// [`decrypt`](Self::decrypt) for text payloads.
    pub fn decrypt_text(&self, envelope: &EncryptedEnvelope) -> Result<String> {
        let bytes = self.decrypt(envelope)?;
        String::from_utf8(bytes).map_err(|_| CacheError::Authentication)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    const SECRET: &[u8; 32] = b"0123456789abcdef0123456789abcdef";

    fn flip_first_hex_digit(hex_text: &str) -> String {
        let mut chars: Vec<char> = hex_text.chars().collect();
        chars[0] = if chars[0] == '0' { '1' } else { '0' };
        chars.into_iter().collect()
    }

    #[test]
    fn test_compress_roundtrip() {
        let value = json!({"name": "alice", "tags": ["a", "b"], "n": 3});
        let encoded = compress(&value).unwrap();

        assert!(is_compressed(&encoded));
        let decoded: Value = decompress(&encoded).unwrap();
        assert_eq!(decoded, value);
    }

    #[test]
    fn test_compress_shrinks_repetitive_text() {
        let value = "z".repeat(1000);
        let encoded = compress(&value).unwrap();
        assert!(encoded.len() < value.len());
    }

    #[test]
    fn test_decompress_plain_json_passes_through() {
        let decoded: Vec<i32> = decompress("[1,2,3]").unwrap();
        assert_eq!(decoded, vec![1, 2, 3]);
    }

    #[test]
    fn test_decompress_text_corrupt_payload_returns_input() {
        let corrupt = format!("{}not-base64!!", COMPRESSED_MARKER);
        assert_eq!(decompress_text(&corrupt), corrupt);
    }

    #[test]
    fn test_decompress_rejects_huge_declared_length() {
        let mut block = u32::MAX.to_le_bytes().to_vec();
        block.extend_from_slice(&[0, 1, 2]);
        let encoded = format!("{}{}", COMPRESSED_MARKER, STANDARD.encode(block));

        assert_eq!(decompress_text(&encoded), encoded);
    }

    #[test]
    fn test_encrypt_roundtrip() {
        let cipher = Cipher::new(SECRET).unwrap();
        let envelope = cipher.encrypt(b"hello world").unwrap();

        assert_eq!(hex::decode(&envelope.nonce).unwrap().len(), NONCE_LEN);
        assert_eq!(hex::decode(&envelope.auth_tag).unwrap().len(), TAG_LEN);
        assert_eq!(cipher.decrypt_text(&envelope).unwrap(), "hello world");
    }

    #[test]
    fn test_nonce_is_fresh_per_call() {
        let cipher = Cipher::new(SECRET).unwrap();
        let first = cipher.encrypt(b"same").unwrap();
        let second = cipher.encrypt(b"same").unwrap();

        assert_ne!(first.nonce, second.nonce);
        assert_ne!(first.ciphertext, second.ciphertext);
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let cipher = Cipher::new(SECRET).unwrap();
        let mut envelope = cipher.encrypt(b"payload").unwrap();
        envelope.ciphertext = flip_first_hex_digit(&envelope.ciphertext);

        assert!(matches!(
            cipher.decrypt(&envelope),
            Err(CacheError::Authentication)
        ));
    }

    #[test]
    fn test_tampered_tag_fails() {
        let cipher = Cipher::new(SECRET).unwrap();
        let mut envelope = cipher.encrypt(b"payload").unwrap();
        envelope.auth_tag = flip_first_hex_digit(&envelope.auth_tag);

        assert!(matches!(
            cipher.decrypt(&envelope),
            Err(CacheError::Authentication)
        ));
    }

    #[test]
    fn test_wrong_key_fails() {
        let envelope = Cipher::new(SECRET).unwrap().encrypt(b"payload").unwrap();
        let other = Cipher::new(b"fedcba9876543210fedcba9876543210").unwrap();

        assert!(matches!(
            other.decrypt(&envelope),
            Err(CacheError::Authentication)
        ));
    }

    #[test]
    fn test_malformed_nonce_fails() {
        let cipher = Cipher::new(SECRET).unwrap();
        let mut envelope = cipher.encrypt(b"payload").unwrap();
        envelope.nonce = "abcd".to_string();

        assert!(matches!(
            cipher.decrypt(&envelope),
            Err(CacheError::Authentication)
        ));
    }

    #[test]
    fn test_short_key_rejected() {
        assert!(matches!(
            Cipher::new(b"too short"),
            Err(CacheError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_envelope_wire_names() {
        let envelope = EncryptedEnvelope {
            nonce: "00".into(),
            ciphertext: "11".into(),
            auth_tag: "22".into(),
        };
        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(json["authTag"], "22");
        assert!(json.get("auth_tag").is_none());
    }
}
