//! Book aggregate: one entity registry plus its identifier allocator.
//!
//! # Responsibility
//! - Admit, edit, delete and query one entity kind.
//! - Assign identifiers on admission and carry the allocator through reloads.
//!
//! # Invariants
//! - Every stored entity carries an identifier of the book's kind.
//! - Identifiers are never reused, including across save/load.
//! - A rejected `add` does not consume an identifier.
//!
//! # See also
//! - `crate::storage` for the persisted snapshot layout.

use crate::filter::EntityFilter;
use crate::model::contact::Contact;
use crate::model::id::{Identifier, IdentifierAllocator};
use crate::model::property::Property;
use crate::model::validation::ValidationError;
use crate::model::Entity;
use crate::registry::{EntityRegistry, RegistryError};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type BookResult<T> = Result<T, BookError>;

/// Book-level failure for commands and reloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookError {
    Registry(RegistryError),
    Validation(ValidationError),
    /// Persisted state violates a book invariant.
    InvalidSnapshot(String),
}

impl Display for BookError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Registry(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::InvalidSnapshot(message) => write!(f, "invalid stored book: {message}"),
        }
    }
}

impl Error for BookError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Registry(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::InvalidSnapshot(_) => None,
        }
    }
}

impl From<RegistryError> for BookError {
    fn from(value: RegistryError) -> Self {
        Self::Registry(value)
    }
}

impl From<ValidationError> for BookError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Persisted form of a book: the next identifier value and every entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSnapshot<T> {
    pub next_id: u64,
    pub entities: Vec<T>,
}

/// Registry of one entity kind with its own identifier allocator.
#[derive(Debug, Clone, PartialEq)]
pub struct Book<T: Entity> {
    registry: EntityRegistry<T>,
    allocator: IdentifierAllocator,
}

/// Book of contacts.
pub type AddressBook = Book<Contact>;
/// Book of properties.
pub type PropertyBook = Book<Property>;

impl<T: Entity> Default for Book<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> Book<T> {
    pub fn new() -> Self {
        Self {
            registry: EntityRegistry::new(),
            allocator: IdentifierAllocator::new(),
        }
    }

    /// Admits `entity` under a freshly allocated identifier.
    ///
    /// Any identifier already on `entity` is replaced.
    pub fn add(&mut self, entity: T) -> BookResult<Identifier> {
        if self.registry.contains(&entity) {
            debug!(
                "event=book_add module=book status=rejected kind={} reason=duplicate",
                T::KIND
            );
            return Err(RegistryError::Duplicate(T::KIND).into());
        }

        let id = self.allocator.next(T::KIND)?;
        self.registry.add(entity.with_identifier(id)?)?;
        info!(
            "event=book_add module=book status=ok kind={} id={}",
            T::KIND,
            id.value()
        );
        Ok(id)
    }

    /// Replaces `target` wholesale; the replacement inherits the target's
    /// identifier.
    pub fn edit(&mut self, target: &T, replacement: T) -> BookResult<()> {
        let replacement = match target.identifier() {
            Some(id) => replacement.with_identifier(id)?,
            None => replacement,
        };

        match self.registry.set_item(target, replacement) {
            Ok(()) => {
                info!(
                    "event=book_edit module=book status=ok kind={} id={}",
                    T::KIND,
                    display_id(target.identifier())
                );
                Ok(())
            }
            Err(err) => {
                debug!(
                    "event=book_edit module=book status=rejected kind={} error={}",
                    T::KIND,
                    err
                );
                Err(err.into())
            }
        }
    }

    /// Removes `entity`. Links other entities hold to it are left in place.
    pub fn delete(&mut self, entity: &T) -> BookResult<()> {
        self.registry.remove(entity)?;
        info!(
            "event=book_delete module=book status=ok kind={} id={}",
            T::KIND,
            display_id(entity.identifier())
        );
        Ok(())
    }

    /// Identity-based membership.
    pub fn contains(&self, entity: &T) -> bool {
        self.registry.contains(entity)
    }

    /// Entity carrying `id`; identifiers of another kind never match.
    pub fn lookup(&self, id: Identifier) -> Option<&T> {
        if id.kind() != T::KIND {
            return None;
        }
        self.registry
            .iter()
            .find(|entity| entity.identifier() == Some(id))
    }

    /// Matching entities in book order, paged by the filter's page.
    pub fn query<F: EntityFilter<T>>(&self, filter: &F) -> Vec<T> {
        filter
            .page()
            .apply(self.registry.iter().filter(|entity| filter.matches(entity)))
            .cloned()
            .collect()
    }

    /// Read-only, insertion-ordered entities.
    pub fn entities(&self) -> &[T] {
        self.registry.view()
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Value the next admitted entity receives.
    pub fn next_identifier_value(&self) -> u64 {
        self.allocator.current_value(T::KIND)
    }

    pub fn set_next_identifier_value(&mut self, value: u64) -> BookResult<()> {
        self.allocator.set_current_value(T::KIND, value)?;
        Ok(())
    }

    pub fn snapshot(&self) -> BookSnapshot<T> {
        BookSnapshot {
            next_id: self.next_identifier_value(),
            entities: self.registry.view().to_vec(),
        }
    }

    /// Rebuilds a book from persisted state.
    ///
    /// # Errors
    /// - `InvalidSnapshot` when an entity lacks an identifier, carries one of
    ///   the wrong kind, or shares one with another entity.
    /// - `Registry(Duplicate)` when two entities share an identity.
    /// - `Validation` when `next_id` is zero.
    ///
    /// A `next_id` at or below the largest stored identifier is raised past it.
    pub fn from_snapshot(snapshot: BookSnapshot<T>) -> BookResult<Self> {
        let mut seen = BTreeSet::new();
        for (index, entity) in snapshot.entities.iter().enumerate() {
            let id = entity.identifier().ok_or_else(|| {
                BookError::InvalidSnapshot(format!("{} at index {index} has no id", T::KIND))
            })?;
            if id.kind() != T::KIND {
                return Err(BookError::InvalidSnapshot(format!(
                    "{} at index {index} has a {} id",
                    T::KIND,
                    id.kind()
                )));
            }
            if !seen.insert(id) {
                return Err(BookError::InvalidSnapshot(format!(
                    "{} id {} is used more than once",
                    T::KIND,
                    id.value()
                )));
            }
        }

        let mut next_id = snapshot.next_id;
        if let Some(highest) = seen.last() {
            if next_id <= highest.value() {
                let raised = highest
                    .value()
                    .checked_add(1)
                    .ok_or(ValidationError::IdentifierExhausted(T::KIND))?;
                warn!(
                    "event=book_load module=book status=repaired kind={} stored_next_id={} next_id={}",
                    T::KIND,
                    next_id,
                    raised
                );
                next_id = raised;
            }
        }

        let mut book = Self::new();
        book.registry.replace_all(snapshot.entities)?;
        book.set_next_identifier_value(next_id)?;
        debug!(
            "event=book_load module=book status=ok kind={} count={} next_id={}",
            T::KIND,
            book.len(),
            next_id
        );
        Ok(book)
    }
}

fn display_id(id: Option<Identifier>) -> String {
    id.map(|id| id.value().to_string())
        .unwrap_or_else(|| "none".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::id::IdKind;

    fn contact(name: &str, phone: &str) -> Contact {
        Contact::builder(name, phone).build().unwrap()
    }

    #[test]
    fn rejected_add_does_not_consume_identifier() {
        let mut book = AddressBook::new();
        book.add(contact("Alex Yeoh", "87438807")).unwrap();
        assert!(book.add(contact("alex yeoh", "87438807")).is_err());
        let id = book.add(contact("Bernice Yu", "99272758")).unwrap();
        assert_eq!(id.value(), 2);
    }

    #[test]
    fn edit_keeps_the_target_identifier() {
        let mut book = AddressBook::new();
        let id = book.add(contact("Alex Yeoh", "87438807")).unwrap();
        let stored = book.lookup(id).unwrap().clone();

        book.edit(&stored, contact("Alex Yeoh", "87438899")).unwrap();
        let edited = book.lookup(id).unwrap();
        assert_eq!(edited.phone(), "87438899");
        assert_eq!(edited.id(), Some(id));
    }

    #[test]
    fn lookup_ignores_other_kinds() {
        let mut book = AddressBook::new();
        let id = book.add(contact("Alex Yeoh", "87438807")).unwrap();
        assert!(book.lookup(id).is_some());
        assert!(book
            .lookup(Identifier::new(id.value(), IdKind::Property).unwrap())
            .is_none());
    }

    #[test]
    fn snapshot_without_ids_is_rejected() {
        let snapshot = BookSnapshot {
            next_id: 1,
            entities: vec![contact("Alex Yeoh", "87438807")],
        };
        assert!(matches!(
            AddressBook::from_snapshot(snapshot),
            Err(BookError::InvalidSnapshot(_))
        ));
    }

    #[test]
    fn stale_next_id_is_raised_past_stored_ids() {
        let stored = contact("Alex Yeoh", "87438807")
            .with_identifier(Identifier::contact(9).unwrap())
            .unwrap();
        let book = AddressBook::from_snapshot(BookSnapshot {
            next_id: 4,
            entities: vec![stored],
        })
        .unwrap();
        assert_eq!(book.next_identifier_value(), 10);
    }
}
