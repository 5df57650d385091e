//! Entity trait: identity assigned by storage, stable across reads.

/// Entity marker + minimal interface.
///
/// Implemented only by persisted records; the unpersisted `New*` forms have no
/// identity yet and deliberately do not implement it.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;
}
