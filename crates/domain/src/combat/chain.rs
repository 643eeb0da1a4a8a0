//! Chain targeting: hop from target to nearest target.

use crate::EntityId;

/// Maximum number of targets in a chain, including the first.
pub const CHAIN_LENGTH: usize = 5;

/// Build a chain starting at `first`.
///
/// `next` receives the current hop and the targets selected so far and
/// returns the nearest qualifying entity, if any. The chain stops at the
/// first hop with no candidate or at `max_len` targets. A candidate that is
/// already in the chain also ends it, so no target is visited twice even if
/// the lookup misbehaves.
pub fn select_chain<F>(first: EntityId, max_len: usize, mut next: F) -> Vec<EntityId>
where
    F: FnMut(EntityId, &[EntityId]) -> Option<EntityId>,
{
    if max_len == 0 {
        return Vec::new();
    }

    let mut chain = Vec::with_capacity(max_len);
    chain.push(first);
    let mut current = first;

    while chain.len() < max_len {
        match next(current, &chain) {
            Some(candidate) if !chain.contains(&candidate) => {
                chain.push(candidate);
                current = candidate;
            }
            _ => break,
        }
    }
    chain
}
