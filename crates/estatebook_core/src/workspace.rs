//! Both books side by side: the unit commands and the UI work against.
//!
//! # Responsibility
//! - Expose per-kind add/edit/delete/query entry points.
//! - Resolve identifiers across kinds.
//! - Compose association predicates with field filters.
//! - Load and save both books through a [`BookStore`].
//!
//! # Invariants
//! - Deleting an entity never touches links held by the other book. Callers
//!   that need consistent links edit both sides; `dangling_references` only
//!   reports what is left over.

use crate::association::{AssociatedContacts, AssociatedProperties, Association};
use crate::book::{AddressBook, BookResult, PropertyBook};
use crate::filter::{ContactFilter, PropertyFilter};
use crate::model::contact::Contact;
use crate::model::id::{IdKind, Identifier};
use crate::model::property::Property;
use crate::storage::{BookStore, StoreResult};
use log::info;

/// Borrowed entity of either kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EntityRef<'a> {
    Contact(&'a Contact),
    Property(&'a Property),
}

/// A link whose target no longer exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingReference {
    /// Entity holding the link.
    pub holder: Identifier,
    /// Identifier the link points to.
    pub missing: Identifier,
    /// Role the missing entity had, seen from the property side.
    pub role: Association,
}

/// Address book and property book loaded together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workspace {
    contacts: AddressBook,
    properties: PropertyBook,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_books(contacts: AddressBook, properties: PropertyBook) -> Self {
        Self {
            contacts,
            properties,
        }
    }

    /// Loads both books; kinds with no saved file start empty.
    pub fn load<S: BookStore>(store: &S) -> StoreResult<Self> {
        let contacts = match store.load_book::<Contact>()? {
            Some(snapshot) => AddressBook::from_snapshot(snapshot)?,
            None => AddressBook::new(),
        };
        let properties = match store.load_book::<Property>()? {
            Some(snapshot) => PropertyBook::from_snapshot(snapshot)?,
            None => PropertyBook::new(),
        };
        info!(
            "event=workspace_load module=workspace status=ok contacts={} properties={}",
            contacts.len(),
            properties.len()
        );
        Ok(Self::from_books(contacts, properties))
    }

    pub fn save<S: BookStore>(&self, store: &S) -> StoreResult<()> {
        store.save_book(&self.contacts.snapshot())?;
        store.save_book(&self.properties.snapshot())?;
        Ok(())
    }

    pub fn contacts(&self) -> &AddressBook {
        &self.contacts
    }

    pub fn properties(&self) -> &PropertyBook {
        &self.properties
    }

    pub fn add_contact(&mut self, contact: Contact) -> BookResult<Identifier> {
        self.contacts.add(contact)
    }

    pub fn add_property(&mut self, property: Property) -> BookResult<Identifier> {
        self.properties.add(property)
    }

    pub fn edit_contact(&mut self, target: &Contact, replacement: Contact) -> BookResult<()> {
        self.contacts.edit(target, replacement)
    }

    pub fn edit_property(&mut self, target: &Property, replacement: Property) -> BookResult<()> {
        self.properties.edit(target, replacement)
    }

    pub fn delete_contact(&mut self, contact: &Contact) -> BookResult<()> {
        self.contacts.delete(contact)
    }

    pub fn delete_property(&mut self, property: &Property) -> BookResult<()> {
        self.properties.delete(property)
    }

    pub fn query_contacts(&self, filter: &ContactFilter) -> Vec<Contact> {
        self.contacts.query(filter)
    }

    pub fn query_properties(&self, filter: &PropertyFilter) -> Vec<Property> {
        self.properties.query(filter)
    }

    pub fn lookup_by_identifier(&self, id: Identifier) -> Option<EntityRef<'_>> {
        match id.kind() {
            IdKind::Contact => self.contacts.lookup(id).map(EntityRef::Contact),
            IdKind::Property => self.properties.lookup(id).map(EntityRef::Property),
        }
    }

    /// Contacts owning, buying or selling `property_id` that also match
    /// `filter`, paged by the filter.
    pub fn contacts_linked_to_property(
        &self,
        property_id: Identifier,
        filter: &ContactFilter,
    ) -> Vec<Contact> {
        let linked = AssociatedContacts::new(property_id, self.properties.entities());
        filter
            .page()
            .apply(
                self.contacts
                    .entities()
                    .iter()
                    .filter(|contact| linked.test(contact) && filter.matches(contact)),
            )
            .cloned()
            .collect()
    }

    /// Properties `contact_id` owns, buys or sells that also match `filter`.
    pub fn properties_linked_to_contact(
        &self,
        contact_id: Identifier,
        filter: &PropertyFilter,
    ) -> Vec<Property> {
        let linked = AssociatedProperties::new(contact_id);
        filter
            .page()
            .apply(
                self.properties
                    .entities()
                    .iter()
                    .filter(|property| linked.test(property) && filter.matches(property)),
            )
            .cloned()
            .collect()
    }

    /// Links left pointing at deleted entities, in book order.
    ///
    /// Owner text counts only when it is a number with no matching contact;
    /// other owner text may name someone outside the address book.
    pub fn dangling_references(&self) -> Vec<DanglingReference> {
        let mut dangling = Vec::new();

        for contact in self.contacts.entities() {
            let Some(holder) = contact.id() else {
                continue;
            };
            for (ids, role) in [
                (contact.buying_properties(), Association::Buyer),
                (contact.selling_properties(), Association::Seller),
            ] {
                for missing in ids {
                    if self.properties.lookup(*missing).is_none() {
                        dangling.push(DanglingReference {
                            holder,
                            missing: *missing,
                            role,
                        });
                    }
                }
            }
        }

        for property in self.properties.entities() {
            let Some(holder) = property.id() else {
                continue;
            };
            if let Some(owner) = numeric_owner(property) {
                if self.contacts.lookup(owner).is_none() {
                    dangling.push(DanglingReference {
                        holder,
                        missing: owner,
                        role: Association::Owner,
                    });
                }
            }
            for (ids, role) in [
                (property.buying_contacts(), Association::Buyer),
                (property.selling_contacts(), Association::Seller),
            ] {
                for missing in ids {
                    if self.contacts.lookup(*missing).is_none() {
                        dangling.push(DanglingReference {
                            holder,
                            missing: *missing,
                            role,
                        });
                    }
                }
            }
        }

        dangling
    }
}

/// Owner text that would match a contact identifier, e.g. `"12"` but not `"012"`.
fn numeric_owner(property: &Property) -> Option<Identifier> {
    let owner = property.owner().trim();
    let value = owner.parse::<u64>().ok()?;
    if value.to_string() != owner {
        return None;
    }
    Identifier::contact(value).ok()
}
