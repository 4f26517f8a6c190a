//! Per-kind sequential identifiers.
//!
//! # Responsibility
//! - Define the `Identifier` value shared by contacts and properties.
//! - Hand out monotonically increasing identifiers per entity kind.
//!
//! # Invariants
//! - `Identifier::value() > 0`.
//! - Identifiers of different kinds never compare equal.
//! - The allocator never returns the same identifier twice.

use crate::model::validation::{ValidationError, ValidationResult};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Entity kind an identifier belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdKind {
    Contact,
    Property,
}

impl IdKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Contact => "contact",
            Self::Property => "property",
        }
    }
}

impl Display for IdKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable, kind-tagged positive identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identifier {
    kind: IdKind,
    value: u64,
}

impl Identifier {
    /// Builds an identifier, rejecting `value == 0`.
    pub fn new(value: u64, kind: IdKind) -> ValidationResult<Self> {
        if value == 0 {
            return Err(ValidationError::ZeroIdentifier);
        }
        Ok(Self { kind, value })
    }

    pub fn contact(value: u64) -> ValidationResult<Self> {
        Self::new(value, IdKind::Contact)
    }

    pub fn property(value: u64) -> ValidationResult<Self> {
        Self::new(value, IdKind::Property)
    }

    pub fn value(self) -> u64 {
        self.value
    }

    pub fn kind(self) -> IdKind {
        self.kind
    }

    /// Fails unless this identifier is of `expected` kind.
    pub fn expect_kind(self, field: &'static str, expected: IdKind) -> ValidationResult<Self> {
        if self.kind != expected {
            return Err(ValidationError::WrongIdentifierKind {
                field,
                expected,
                found: self.kind,
            });
        }
        Ok(self)
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.value)
    }
}

/// Sequential identifier source, one counter per kind.
///
/// Owned by a book instance; there is no process-wide counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierAllocator {
    next_contact: u64,
    next_property: u64,
}

impl Default for IdentifierAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentifierAllocator {
    pub fn new() -> Self {
        Self {
            next_contact: 1,
            next_property: 1,
        }
    }

    /// Returns the current counter for `kind` and advances it.
    ///
    /// Callers must serialize access; the allocator holds no lock.
    pub fn next(&mut self, kind: IdKind) -> ValidationResult<Identifier> {
        let counter = self.counter_mut(kind);
        let value = *counter;
        let advanced = value
            .checked_add(1)
            .ok_or(ValidationError::IdentifierExhausted(kind))?;
        let id = Identifier::new(value, kind)?;
        *counter = advanced;
        Ok(id)
    }

    /// Value the next call to [`IdentifierAllocator::next`] returns.
    pub fn current_value(&self, kind: IdKind) -> u64 {
        match kind {
            IdKind::Contact => self.next_contact,
            IdKind::Property => self.next_property,
        }
    }

    /// Restores a persisted counter.
    pub fn set_current_value(&mut self, kind: IdKind, value: u64) -> ValidationResult<()> {
        if value == 0 {
            return Err(ValidationError::ZeroIdentifier);
        }
        *self.counter_mut(kind) = value;
        Ok(())
    }

    fn counter_mut(&mut self, kind: IdKind) -> &mut u64 {
        match kind {
            IdKind::Contact => &mut self.next_contact,
            IdKind::Property => &mut self.next_property,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_differ_across_kinds() {
        let contact = Identifier::contact(7).unwrap();
        let property = Identifier::property(7).unwrap();
        assert_ne!(contact, property);
        assert_eq!(contact, Identifier::contact(7).unwrap());
    }

    #[test]
    fn zero_is_rejected() {
        assert_eq!(
            Identifier::new(0, IdKind::Contact).unwrap_err(),
            ValidationError::ZeroIdentifier
        );
    }

    #[test]
    fn allocator_counts_per_kind_from_one() {
        let mut allocator = IdentifierAllocator::new();
        assert_eq!(allocator.next(IdKind::Contact).unwrap().value(), 1);
        assert_eq!(allocator.next(IdKind::Contact).unwrap().value(), 2);
        assert_eq!(allocator.next(IdKind::Property).unwrap().value(), 1);
        assert_eq!(allocator.current_value(IdKind::Contact), 3);
        assert_eq!(allocator.current_value(IdKind::Property), 2);
    }

    #[test]
    fn allocator_restores_persisted_value() {
        let mut allocator = IdentifierAllocator::new();
        allocator.set_current_value(IdKind::Property, 42).unwrap();
        let id = allocator.next(IdKind::Property).unwrap();
        assert_eq!(id, Identifier::property(42).unwrap());
        assert!(allocator.set_current_value(IdKind::Property, 0).is_err());
    }

    #[test]
    fn allocator_refuses_to_wrap() {
        let mut allocator = IdentifierAllocator::new();
        allocator.set_current_value(IdKind::Contact, u64::MAX).unwrap();
        assert_eq!(
            allocator.next(IdKind::Contact).unwrap_err(),
            ValidationError::IdentifierExhausted(IdKind::Contact)
        );
        assert_eq!(allocator.current_value(IdKind::Contact), u64::MAX);
    }
}
