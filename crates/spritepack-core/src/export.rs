use crate::document::{AtlasDocument, FrameRecord};
use crate::error::{AtlasError, Result};
use std::collections::BTreeMap;

/// Length of a compressed frame key in hex characters (8 bytes of hash).
const KEY_LEN: usize = 16;

/// Content hash of a frame: the key plus its serialized record, so the same
/// pixels placed differently (or under a different name) hash differently.
fn frame_key_hash(key: &str, record: &FrameRecord) -> Result<String> {
    let mut hasher = blake3::Hasher::new();
    hasher.update(key.as_bytes());
    hasher.update(&serde_json::to_vec(record)?);
    Ok(hasher.finalize().to_hex()[..KEY_LEN].to_string())
}

/// Replaces every frame key with a fixed-length content hash and rewrites
/// animation references to match, preserving their order. Returns the
/// hash -> original-key mapping needed to reverse the substitution.
pub fn compress_keys(doc: &mut AtlasDocument) -> Result<BTreeMap<String, String>> {
    let mut mapping: BTreeMap<String, String> = BTreeMap::new();
    let mut forward: BTreeMap<String, String> = BTreeMap::new();
    let mut frames: BTreeMap<String, FrameRecord> = BTreeMap::new();

    for (key, record) in std::mem::take(&mut doc.frames) {
        let hash = frame_key_hash(&key, &record)?;
        forward.insert(key.clone(), hash.clone());
        mapping.insert(hash.clone(), key);
        frames.insert(hash, record);
    }
    doc.frames = frames;

    for keys in doc.animations.values_mut() {
        for key in keys.iter_mut() {
            if let Some(hash) = forward.get(key) {
                *key = hash.clone();
            }
        }
    }

    Ok(mapping)
}

/// Reverses `compress_keys` using its returned mapping, reconstructing the
/// original path-keyed document exactly.
pub fn decompress_keys(doc: &mut AtlasDocument, mapping: &BTreeMap<String, String>) -> Result<()> {
    let mut frames: BTreeMap<String, FrameRecord> = BTreeMap::new();
    for (hash, record) in std::mem::take(&mut doc.frames) {
        let key = mapping
            .get(&hash)
            .ok_or_else(|| AtlasError::UnknownKey(hash.clone()))?;
        frames.insert(key.clone(), record);
    }
    doc.frames = frames;

    for keys in doc.animations.values_mut() {
        for key in keys.iter_mut() {
            let original = mapping
                .get(key.as_str())
                .ok_or_else(|| AtlasError::UnknownKey(key.clone()))?;
            *key = original.clone();
        }
    }

    Ok(())
}
