//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug + core::fmt::Display;

    /// Short lowercase name used in error messages ("book", "author").
    const KIND: &'static str;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;

    /// Unique columns of this entity as `(constraint, normalized value)` pairs.
    ///
    /// Storage adapters reject inserts/updates that would duplicate one of
    /// these for a different id.
    fn unique_keys(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}
