use serde_json::Value;
use sha2::{Digest, Sha256};

/// Compute the content-hash identifier of a raw Takeout record.
///
/// SHA-256 over the compact JSON serialization of `raw`, hex-encoded. Keys
/// are serialized in the order they appeared in the source file, so the value
/// must be hashed in its final shape: any enrichment (such as a backfilled
/// address) has to be applied before calling this.
#[must_use]
pub fn record_identifier(raw: &Value) -> String {
    format!("{:x}", Sha256::digest(raw.to_string().as_bytes()))
}
