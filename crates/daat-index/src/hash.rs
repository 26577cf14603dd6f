//! Deterministic point identifiers.
//!
//! A chunk's id is derived from `"{project_id}-{file_path}-{index}"`, so
//! re-indexing the same file overwrites its previous points. Collisions are
//! possible under the legacy scheme and are not detected.

use serde::{Deserialize, Serialize};

/// Hash function used to turn a chunk key into a point id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdScheme {
    /// 31-multiplier string hash over UTF-16 code units, absolute value.
    /// Matches ids written by existing deployments.
    #[default]
    Legacy,
    /// First 8 bytes of the BLAKE3 digest.
    Blake3,
}

impl std::str::FromStr for IdScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "legacy" => Ok(Self::Legacy),
            "blake3" => Ok(Self::Blake3),
            other => Err(format!("unknown id scheme: {other}")),
        }
    }
}

/// Legacy 32-bit string hash.
///
/// `h = h * 31 + unit` with 32-bit signed wraparound over the UTF-16 code
/// units of `s`, then the absolute value. `i32::MIN` maps to `2^31`.
#[must_use]
pub fn hash_id(s: &str) -> u32 {
    s.encode_utf16()
        .fold(0i32, |h, unit| {
            (h << 5).wrapping_sub(h).wrapping_add(i32::from(unit))
        })
        .unsigned_abs()
}

fn blake3_id(s: &str) -> u64 {
    let digest = blake3::hash(s.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest.as_bytes()[..8]);
    u64::from_le_bytes(bytes)
}

/// Key hashed into a chunk's point id.
#[must_use]
pub fn chunk_key(project_id: &str, file_path: &str, index: usize) -> String {
    format!("{project_id}-{file_path}-{index}")
}

/// Point id for chunk `index` of `file_path` in `project_id`.
#[must_use]
pub fn point_id(scheme: IdScheme, project_id: &str, file_path: &str, index: usize) -> u64 {
    let key = chunk_key(project_id, file_path, index);
    match scheme {
        IdScheme::Legacy => u64::from(hash_id(&key)),
        IdScheme::Blake3 => blake3_id(&key),
    }
}
