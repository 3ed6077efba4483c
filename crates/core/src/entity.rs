//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Anything that carries a persisted identifier (a full record, a partial
/// update) implements this so identity-based helpers work on all of them.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;
}

impl<E: Entity + ?Sized> Entity for &E {
    type Id = E::Id;

    fn id(&self) -> Self::Id {
        (**self).id()
    }
}
