use sha2::{Digest, Sha256};

/// Integrity signature for a charge: the lowercase hex SHA-256 digest of
/// `reference + amount + currency + secret`, binding those fields together
/// so they cannot be tampered with in transit.
pub fn integrity_signature(
    reference: &str,
    amount_in_cents: i64,
    currency: &str,
    secret: &str,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(reference.as_bytes());
    hasher.update(amount_in_cents.to_string().as_bytes());
    hasher.update(currency.as_bytes());
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}
