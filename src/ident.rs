//! Content-addressed identifier allocation.
//!
//! Identifiers are derived from an entity's own scalar fields (children are
//! excluded from the signature) so re-running allocation over an unchanged
//! document proposes the same candidates. The registry spans both story and
//! task identifier spaces; the prefix character keeps them readable while
//! collisions are checked across the combined space.

use std::collections::HashMap;

use anyhow::bail;
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine as _;

/// Collision retries before giving up. The truncated-hash space makes real
/// exhaustion astronomically unlikely; the cap exists to fail loudly instead
/// of spinning on a logic bug.
pub const MAX_ID_ATTEMPTS: u32 = 4096;

/// Characters of base64-encoded digest kept after the prefix.
const ID_HASH_LEN: usize = 22;

/// Maps each allocated identifier to the load-order handle of the entity
/// holding it. One registry covers stories and tasks alike.
pub type IdRegistry = HashMap<String, u64>;

/// An entity that can carry a content-addressed identifier.
pub trait Identifiable {
    fn object_id(&self) -> Option<&str>;
    fn set_object_id(&mut self, id: String);

    /// Stable textual fingerprint of the entity's own fields, `None` when the
    /// defining text field is absent (such entities are never assigned an id).
    fn signature(&self) -> Option<String>;

    /// Load-order handle registered against the winning identifier.
    fn handle(&self) -> u64;
}

/// Allocate an identifier for `obj`, retrying deterministically on collision.
///
/// Idempotent: an entity that already has an identifier gets it back
/// unchanged and the registry is untouched. An entity without a signature
/// yields `None` and never enters the registry.
pub fn allocate_object_id<T>(
    obj: &mut T,
    prefix: char,
    registry: &mut IdRegistry,
) -> anyhow::Result<Option<String>>
where
    T: Identifiable + ?Sized,
{
    if let Some(id) = obj.object_id() {
        return Ok(Some(id.to_string()));
    }
    let Some(signature) = obj.signature() else {
        return Ok(None);
    };

    for attempt in 0..MAX_ID_ATTEMPTS {
        let digest = md5::compute(format!("{signature}{attempt}"));
        let encoded = URL_SAFE.encode(digest.0);
        let mut candidate = String::with_capacity(ID_HASH_LEN + 1);
        candidate.push(prefix);
        candidate.push_str(&encoded[..ID_HASH_LEN]);

        if registry.contains_key(&candidate) {
            continue;
        }
        registry.insert(candidate.clone(), obj.handle());
        obj.set_object_id(candidate.clone());
        return Ok(Some(candidate));
    }
    bail!("no free identifier after {MAX_ID_ATTEMPTS} attempts (prefix {prefix:?})");
}
