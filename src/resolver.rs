//! Name-to-id resolution over service listings.
//!
//! Only the first page of a listing is inspected; a `next` link is logged and
//! otherwise ignored.

use crate::error::{MsgramError, Result};
use crate::models::{Entity, Listing};

/// Returns the id of the first entity whose name matches `name` exactly.
pub fn find_entity_id<E: Entity>(entities: &[E], name: &str) -> Result<u64> {
    entities
        .iter()
        .find(|entity| entity.name() == name)
        .map(Entity::id)
        .ok_or_else(|| MsgramError::EntityNotFound(name.to_string()))
}

/// Resolves `name` against the first page of `listing`.
pub fn resolve_in_listing<E: Entity>(listing: &Listing<E>, what: &str, name: &str) -> Result<u64> {
    if let Some(next) = &listing.next {
        tracing::warn!(
            what,
            count = listing.count,
            next = %next,
            "Listing has more pages; only the first page is searched"
        );
    }

    let id = find_entity_id(&listing.results, name)?;
    tracing::debug!(what, name, id, "Resolved entity");
    Ok(id)
}
