//! Domain model for contacts, properties and their identifiers.
//!
//! # Responsibility
//! - Define the immutable entity values stored in books.
//! - Keep identity and structural equality as two separate comparisons.
//!
//! # Invariants
//! - Entities are validated at construction; malformed values never exist.
//! - Editing an entity produces a new value (`with_*`), never mutates in place.

pub mod contact;
pub mod id;
pub mod property;
pub mod validation;

use id::{IdKind, Identifier};
use validation::ValidationResult;
use std::fmt::Debug;

/// Behaviour shared by every entity kind a registry can hold.
pub trait Entity: Clone + PartialEq + Debug {
    /// Identifier kind handed out for this entity type.
    const KIND: IdKind;

    /// Duplicate-detection comparison over the identity fields only.
    fn same_identity(&self, other: &Self) -> bool;

    /// Exact comparison over every field, used to locate an existing entry.
    fn structurally_equal(&self, other: &Self) -> bool {
        self == other
    }

    /// Identifier assigned on admission to a book, if any.
    fn identifier(&self) -> Option<Identifier>;

    /// Copy of this entity carrying `id`.
    ///
    /// Fails with `WrongIdentifierKind` unless `id` is of kind [`Entity::KIND`].
    fn with_identifier(&self, id: Identifier) -> ValidationResult<Self>;
}
