//! Generic registry backing both books.
//!
//! # Responsibility
//! - Store entities in insertion order behind identity-checked write paths.
//! - Locate edit/remove targets by structural equality.
//!
//! # See also
//! - `crate::book` for identifier assignment on admission.

use crate::model::id::IdKind;
use crate::model::Entity;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RegistryResult<T> = Result<T, RegistryError>;

/// Write rejection raised by [`EntityRegistry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Another entry already has the same identity.
    Duplicate(IdKind),
    /// No entry is structurally equal to the requested target.
    NotFound(IdKind),
}

impl Display for RegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Duplicate(kind) => write!(f, "this {kind} already exists"),
            Self::NotFound(kind) => write!(f, "{kind} not found"),
        }
    }
}

impl Error for RegistryError {}

/// Ordered collection of one entity kind.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityRegistry<T: Entity> {
    items: Vec<T>,
}

impl<T: Entity> Default for EntityRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> EntityRegistry<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Identity-based membership.
    pub fn contains(&self, item: &T) -> bool {
        self.items.iter().any(|existing| existing.same_identity(item))
    }

    /// Appends `item` unless its identity is already taken.
    pub fn add(&mut self, item: T) -> RegistryResult<()> {
        if self.contains(&item) {
            return Err(RegistryError::Duplicate(T::KIND));
        }
        self.items.push(item);
        Ok(())
    }

    /// Replaces `target` with `replacement` at the same position.
    ///
    /// `replacement` may keep the target's own identity; it may not take the
    /// identity of any other entry.
    pub fn set_item(&mut self, target: &T, replacement: T) -> RegistryResult<()> {
        let index = self
            .position(target)
            .ok_or(RegistryError::NotFound(T::KIND))?;

        let collides = self
            .items
            .iter()
            .enumerate()
            .any(|(other, existing)| other != index && existing.same_identity(&replacement));
        if collides {
            return Err(RegistryError::Duplicate(T::KIND));
        }

        self.items[index] = replacement;
        Ok(())
    }

    /// Removes the entry structurally equal to `item`.
    pub fn remove(&mut self, item: &T) -> RegistryResult<()> {
        let index = self
            .position(item)
            .ok_or(RegistryError::NotFound(T::KIND))?;
        self.items.remove(index);
        Ok(())
    }

    /// Swaps in a whole new sequence after checking it for internal duplicates.
    ///
    /// On failure the current contents are left untouched.
    pub fn replace_all(&mut self, items: Vec<T>) -> RegistryResult<()> {
        if !items_are_unique(&items) {
            return Err(RegistryError::Duplicate(T::KIND));
        }
        self.items = items;
        Ok(())
    }

    /// Read-only, insertion-ordered view.
    pub fn view(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Index of the entry structurally equal to `item`.
    pub fn position(&self, item: &T) -> Option<usize> {
        self.items
            .iter()
            .position(|existing| existing.structurally_equal(item))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a, T: Entity> IntoIterator for &'a EntityRegistry<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn items_are_unique<T: Entity>(items: &[T]) -> bool {
    items.iter().enumerate().all(|(index, item)| {
        items[index + 1..]
            .iter()
            .all(|later| !item.same_identity(later))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::contact::Contact;

    fn contact(name: &str, phone: &str) -> Contact {
        Contact::builder(name, phone).build().unwrap()
    }

    #[test]
    fn set_item_may_keep_own_identity() {
        let mut registry = EntityRegistry::new();
        let alex = contact("Alex Yeoh", "87438807");
        registry.add(alex.clone()).unwrap();

        let edited = alex.with_notes("prefers east side");
        registry.set_item(&alex, edited.clone()).unwrap();
        assert_eq!(registry.view(), &[edited]);
    }

    #[test]
    fn set_item_rejects_identity_of_another_entry() {
        let mut registry = EntityRegistry::new();
        let alex = contact("Alex Yeoh", "87438807");
        let bernice = contact("Bernice Yu", "99272758");
        registry.add(alex.clone()).unwrap();
        registry.add(bernice.clone()).unwrap();

        let err = registry
            .set_item(&bernice, contact("ALEX YEOH", "87438807"))
            .unwrap_err();
        assert_eq!(err, RegistryError::Duplicate(IdKind::Contact));
        assert_eq!(registry.view(), &[alex, bernice]);
    }

    #[test]
    fn set_item_and_remove_locate_by_all_fields() {
        let mut registry = EntityRegistry::new();
        let alex = contact("Alex Yeoh", "87438807");
        registry.add(alex.clone()).unwrap();

        // Same identity, different notes: not the stored entry.
        let lookalike = alex.with_notes("stale copy");
        assert_eq!(
            registry.remove(&lookalike).unwrap_err(),
            RegistryError::NotFound(IdKind::Contact)
        );
        assert_eq!(
            registry.set_item(&lookalike, alex.clone()).unwrap_err(),
            RegistryError::NotFound(IdKind::Contact)
        );
        assert!(registry.contains(&lookalike));
    }

    #[test]
    fn replace_all_keeps_old_contents_on_duplicate() {
        let mut registry = EntityRegistry::new();
        let alex = contact("Alex Yeoh", "87438807");
        registry.add(alex.clone()).unwrap();

        let err = registry
            .replace_all(vec![
                contact("Bernice Yu", "99272758"),
                contact("bernice yu", "99272758"),
            ])
            .unwrap_err();
        assert_eq!(err, RegistryError::Duplicate(IdKind::Contact));
        assert_eq!(registry.view(), &[alex]);
    }
}
