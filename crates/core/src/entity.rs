//! Identity for persisted domain objects.

/// Something with a stable identity that survives state changes.
///
/// Repositories key their storage on `Entity::id`, so two values with the same
/// id are the same entity even when their other fields differ.
pub trait Entity {
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug + Send + Sync + 'static;

    fn id(&self) -> &Self::Id;
}
