use crate::error::Result;
use serde::Serialize;
use xxhash_rust::xxh3::Xxh3;

const XXH3_SEED: u64 = 0x6375_7467_7269_6431;

/// Stable hex digest of `value`'s JSON encoding.
///
/// Two values that serialize identically hash identically across runs, so the
/// digest can be stored next to a cached artifact and compared later.
pub fn content_hash<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let bytes = serde_json::to_vec(value)?;
    Ok(hash_bytes(&bytes))
}

pub fn hash_bytes(bytes: &[u8]) -> String {
    let mut hasher = Xxh3::with_seed(XXH3_SEED);
    hasher.update(bytes);
    format!("{:032x}", hasher.digest128())
}
