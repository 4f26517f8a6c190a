//! Owner/buyer/seller links between properties and contacts.
//!
//! # Responsibility
//! - Answer "is this contact linked to this property" in both directions.
//! - Offer reusable predicate values for filtering one side by the other.
//!
//! # Invariants
//! - Pure functions over the collections passed in; no stored state.
//! - Owner matching compares the owner text against the contact identifier's
//!   numeric value rendered as text. Buyer/seller matching uses typed sets.
//! - A property identifier with no matching property yields "not associated".

use crate::model::contact::Contact;
use crate::model::id::Identifier;
use crate::model::property::Property;
use std::fmt::{Display, Formatter};

/// Role a contact plays for a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Association {
    Owner,
    Buyer,
    Seller,
}

impl Display for Association {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Owner => "owner",
            Self::Buyer => "buyer",
            Self::Seller => "seller",
        })
    }
}

/// True when `property_id` resolves in `properties` and `contact_id` owns,
/// buys or sells it.
pub fn is_associated(
    property_id: Identifier,
    contact_id: Identifier,
    properties: &[Property],
) -> bool {
    find_property(property_id, properties)
        .is_some_and(|property| is_associated_with_contact(property, contact_id))
}

/// Property-centric check; no lookup needed.
pub fn is_associated_with_contact(property: &Property, contact_id: Identifier) -> bool {
    owner_matches(property, contact_id)
        || property.buying_contacts().contains(&contact_id)
        || property.selling_contacts().contains(&contact_id)
}

/// Every role `contact_id` has on `property`, in owner/buyer/seller order.
pub fn associations_between(property: &Property, contact_id: Identifier) -> Vec<Association> {
    let mut roles = Vec::new();
    if owner_matches(property, contact_id) {
        roles.push(Association::Owner);
    }
    if property.buying_contacts().contains(&contact_id) {
        roles.push(Association::Buyer);
    }
    if property.selling_contacts().contains(&contact_id) {
        roles.push(Association::Seller);
    }
    roles
}

/// Contact predicate: "linked to this one property".
///
/// Resolves the property once; every later `test` is a set lookup.
#[derive(Debug, Clone, Copy)]
pub struct AssociatedContacts<'a> {
    property: Option<&'a Property>,
}

impl<'a> AssociatedContacts<'a> {
    pub fn new(property_id: Identifier, properties: &'a [Property]) -> Self {
        Self {
            property: find_property(property_id, properties),
        }
    }

    /// Contacts without an identifier are never linked.
    pub fn test(&self, contact: &Contact) -> bool {
        match (self.property, contact.id()) {
            (Some(property), Some(contact_id)) => is_associated_with_contact(property, contact_id),
            _ => false,
        }
    }
}

/// Property predicate: "linked to this one contact".
#[derive(Debug, Clone, Copy)]
pub struct AssociatedProperties {
    contact_id: Identifier,
}

impl AssociatedProperties {
    pub fn new(contact_id: Identifier) -> Self {
        Self { contact_id }
    }

    pub fn test(&self, property: &Property) -> bool {
        is_associated_with_contact(property, self.contact_id)
    }
}

fn find_property(property_id: Identifier, properties: &[Property]) -> Option<&Property> {
    properties
        .iter()
        .find(|property| property.id() == Some(property_id))
}

fn owner_matches(property: &Property, contact_id: Identifier) -> bool {
    property.owner().trim() == contact_id.value().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn property(id: u64, owner: &str) -> Property {
        Property::builder(format!("{id} Orchard Road"), "238801")
            .identifier(Identifier::property(id).unwrap())
            .floor_area(800)
            .price(900_000)
            .owner(owner)
            .build()
            .unwrap()
    }

    #[test]
    fn owner_text_must_equal_identifier_value() {
        let contact_id = Identifier::contact(3).unwrap();
        assert!(is_associated_with_contact(&property(1, "3"), contact_id));
        assert!(!is_associated_with_contact(&property(1, "03"), contact_id));
        assert!(!is_associated_with_contact(&property(1, "#3"), contact_id));
        assert!(!is_associated_with_contact(&property(1, ""), contact_id));
    }

    #[test]
    fn roles_are_listed_in_fixed_order() {
        let contact_id = Identifier::contact(2).unwrap();
        let linked = property(1, "2")
            .with_selling_contacts([contact_id])
            .unwrap();
        assert_eq!(
            associations_between(&linked, contact_id),
            vec![Association::Owner, Association::Seller]
        );
    }

    #[test]
    fn contact_predicate_is_false_for_unknown_property() {
        let properties = vec![property(1, "5")];
        let contact = Contact::builder("Alex Yeoh", "87438807")
            .identifier(Identifier::contact(5).unwrap())
            .build()
            .unwrap();

        assert!(
            AssociatedContacts::new(Identifier::property(1).unwrap(), &properties).test(&contact)
        );
        assert!(
            !AssociatedContacts::new(Identifier::property(9).unwrap(), &properties).test(&contact)
        );
    }
}
