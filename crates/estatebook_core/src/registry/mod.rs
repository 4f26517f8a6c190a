//! Uniqueness-checked, insertion-ordered entity collections.
//!
//! # Responsibility
//! - Hold one entity kind per registry.
//! - Reject identity collisions on every write path.
//!
//! # Invariants
//! - No two stored entities satisfy `Entity::same_identity`.
//! - Lookups for edit/remove use `Entity::structurally_equal`, never identity.
//! - Insertion order is preserved and is the display order.

mod entity_registry;

pub use entity_registry::{EntityRegistry, RegistryError, RegistryResult};
