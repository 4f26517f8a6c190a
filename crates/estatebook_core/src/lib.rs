//! Core domain logic for EstateBook.
//! This crate owns the contact/property registries, their links and queries.

pub mod association;
pub mod book;
pub mod config;
pub mod filter;
pub mod logging;
pub mod model;
pub mod registry;
pub mod storage;
pub mod workspace;

pub use association::{
    associations_between, is_associated, is_associated_with_contact, AssociatedContacts,
    AssociatedProperties, Association,
};
pub use book::{AddressBook, Book, BookError, BookResult, BookSnapshot, PropertyBook};
pub use config::{ConfigError, CoreConfig};
pub use filter::{
    ContactCriterion, ContactFilter, EntityFilter, Keywords, Page, PropertyCriterion,
    PropertyFilter,
};
pub use logging::{init_logging, logging_status, LogLevel, LogSettings, LoggingError};
pub use model::contact::{Contact, ContactBuilder, ContactStatus};
pub use model::id::{IdKind, Identifier, IdentifierAllocator};
pub use model::property::{ListingMode, Property, PropertyBuilder, PropertyStatus, PropertyType};
pub use model::validation::{ValidationError, ValidationResult};
pub use model::Entity;
pub use registry::{EntityRegistry, RegistryError, RegistryResult};
pub use storage::{BookStore, JsonBookStore, StoreError, StoreResult};
pub use workspace::{DanglingReference, EntityRef, Workspace};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
