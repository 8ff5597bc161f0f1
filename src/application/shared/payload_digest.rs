use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of a raw webhook body.
pub fn payload_digest(body: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(body);
    hex::encode(hasher.finalize())
}
