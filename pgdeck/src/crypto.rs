//! Envelope encryption for stored database credentials.
//!
//! Connection passwords are never written to the database in clear text.
//! They are sealed with AES-256-GCM under the key from
//! [`Config::encryption_key`](crate::config::Config::encryption_key) and
//! stored as `base64(nonce || ciphertext)`.

use aes_gcm::{
    Aes256Gcm, Nonce,
    aead::{Aead, KeyInit},
};
use base64::{Engine as _, engine::general_purpose};
use rand::{Rng, rng};

/// AES-GCM nonce size in bytes (96 bits).
const NONCE_LEN: usize = 12;

/// Encrypt data under the given 256-bit key.
///
/// A fresh random nonce is generated per call, so encrypting the same
/// plaintext twice yields different ciphertexts.
pub fn encrypt(plaintext: &[u8], key: &[u8; 32]) -> Result<String, anyhow::Error> {
    let cipher = Aes256Gcm::new_from_slice(key).map_err(|e| anyhow::anyhow!("Failed to create cipher: {e}"))?;

    let mut nonce_bytes = [0u8; NONCE_LEN];
    rng().fill(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|e| anyhow::anyhow!("Encryption failed: {e}"))?;

    let mut result = nonce_bytes.to_vec();
    result.extend_from_slice(&ciphertext);

    Ok(general_purpose::STANDARD.encode(result))
}

/// Decrypt data produced by [`encrypt`].
pub fn decrypt(encrypted_b64: &str, key: &[u8; 32]) -> Result<Vec<u8>, anyhow::Error> {
    let cipher = Aes256Gcm::new_from_slice(key).map_err(|e| anyhow::anyhow!("Failed to create cipher: {e}"))?;

    let encrypted_data = general_purpose::STANDARD
        .decode(encrypted_b64)
        .map_err(|e| anyhow::anyhow!("Failed to decode encrypted data: {e}"))?;

    if encrypted_data.len() < NONCE_LEN {
        return Err(anyhow::anyhow!("Encrypted data too short"));
    }

    let (nonce_bytes, ciphertext) = encrypted_data.split_at(NONCE_LEN);
    let nonce = Nonce::from_slice(nonce_bytes);

    let plaintext = cipher
        .decrypt(nonce, ciphertext)
        .map_err(|e| anyhow::anyhow!("Decryption failed: {e}"))?;

    Ok(plaintext)
}
