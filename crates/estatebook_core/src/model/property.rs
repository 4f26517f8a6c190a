//! Property domain model.
//!
//! # Responsibility
//! - Define the listing record tracked by the property book.
//! - Carry the owner/buyer/seller links back to contacts.
//!
//! # Invariants
//! - Identity is `(address, postal)`. Address comparison ignores case, which is
//!   wider than exact field equality: two listings at one postal code whose
//!   addresses differ only in case are duplicates.
//! - Buying/selling sets only hold `IdKind::Contact` identifiers.
//! - `owner` is free text. It usually holds a contact identifier value, but is
//!   not checked against the address book.

use crate::model::id::{IdKind, Identifier};
use crate::model::validation::{
    require_text, validate_positive, validate_postal, validate_room_count, ValidationError,
    ValidationResult,
};
use crate::model::Entity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

macro_rules! text_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal, $expected:literal {
            $($variant:ident => $text:literal $(| $alias:literal)*),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Canonical display text.
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }

            /// Case-insensitive parse of the canonical text or an alias.
            pub fn parse(value: &str) -> ValidationResult<Self> {
                $(
                    if Self::$variant.matches_text(value) {
                        return Ok(Self::$variant);
                    }
                )+
                Err(ValidationError::InvalidFormat {
                    field: $field,
                    value: value.to_string(),
                    expected: $expected,
                })
            }

            /// True when `text` names this variant by its canonical text or an
            /// alias, ignoring case and surrounding whitespace.
            pub fn matches_text(self, text: &str) -> bool {
                let trimmed = text.trim();
                match self {
                    $(Self::$variant => {
                        trimmed.eq_ignore_ascii_case($text)
                            $(|| trimmed.eq_ignore_ascii_case($alias))*
                    }),+
                }
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

text_enum! {
    /// Building category.
    PropertyType, "type", "HDB, Condo, Landed, Apartment, Office or Other" {
        Hdb => "HDB",
        Condo => "Condo",
        Landed => "Landed",
        Apartment => "Apartment",
        Office => "Office",
        Other => "Other",
    }
}

text_enum! {
    /// Market state of a listing.
    PropertyStatus, "status", "listed, sold, rented or off-market" {
        Listed => "listed",
        Sold => "sold",
        Rented => "rented",
        OffMarket => "off-market" | "off_market" | "offmarket",
    }
}

text_enum! {
    /// Whether the property is offered for sale or rent.
    ListingMode, "listing", "sale or rent" {
        Sale => "sale",
        Rent => "rent",
    }
}

/// Listing record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PropertyRecord", into = "PropertyRecord")]
pub struct Property {
    id: Option<Identifier>,
    address: String,
    postal: String,
    property_type: PropertyType,
    bedrooms: u32,
    bathrooms: u32,
    floor_area: u64,
    price: u64,
    status: PropertyStatus,
    listing: ListingMode,
    owner: String,
    buying_contacts: BTreeSet<Identifier>,
    selling_contacts: BTreeSet<Identifier>,
}

impl Property {
    pub fn builder(address: impl Into<String>, postal: impl Into<String>) -> PropertyBuilder {
        PropertyBuilder::new(address, postal)
    }

    pub fn id(&self) -> Option<Identifier> {
        self.id
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn postal(&self) -> &str {
        &self.postal
    }

    pub fn property_type(&self) -> PropertyType {
        self.property_type
    }

    pub fn bedrooms(&self) -> u32 {
        self.bedrooms
    }

    pub fn bathrooms(&self) -> u32 {
        self.bathrooms
    }

    /// Floor area in square feet.
    pub fn floor_area(&self) -> u64 {
        self.floor_area
    }

    pub fn price(&self) -> u64 {
        self.price
    }

    pub fn status(&self) -> PropertyStatus {
        self.status
    }

    pub fn listing(&self) -> ListingMode {
        self.listing
    }

    /// Raw owner reference; empty when the property has no recorded owner.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn buying_contacts(&self) -> &BTreeSet<Identifier> {
        &self.buying_contacts
    }

    pub fn selling_contacts(&self) -> &BTreeSet<Identifier> {
        &self.selling_contacts
    }

    pub fn with_owner(&self, owner: &str) -> Self {
        Self {
            owner: owner.trim().to_string(),
            ..self.clone()
        }
    }

    pub fn with_status(&self, status: PropertyStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }

    pub fn with_price(&self, price: u64) -> ValidationResult<Self> {
        Ok(Self {
            price: validate_positive("price", price)?,
            ..self.clone()
        })
    }

    pub fn with_buying_contacts(
        &self,
        contacts: impl IntoIterator<Item = Identifier>,
    ) -> ValidationResult<Self> {
        Ok(Self {
            buying_contacts: contact_set("buying_contacts", contacts)?,
            ..self.clone()
        })
    }

    pub fn with_selling_contacts(
        &self,
        contacts: impl IntoIterator<Item = Identifier>,
    ) -> ValidationResult<Self> {
        Ok(Self {
            selling_contacts: contact_set("selling_contacts", contacts)?,
            ..self.clone()
        })
    }
}

impl Entity for Property {
    const KIND: IdKind = IdKind::Property;

    fn same_identity(&self, other: &Self) -> bool {
        self.postal == other.postal && self.address.to_lowercase() == other.address.to_lowercase()
    }

    fn identifier(&self) -> Option<Identifier> {
        self.id
    }

    fn with_identifier(&self, id: Identifier) -> ValidationResult<Self> {
        Ok(Self {
            id: Some(id.expect_kind("id", IdKind::Property)?),
            ..self.clone()
        })
    }
}

/// Validating builder for [`Property`].
///
/// Defaults: `Other` type, no rooms, `listed` for `sale`, no owner. Floor area
/// and price have no default and must be set.
#[derive(Debug, Clone)]
pub struct PropertyBuilder {
    id: Option<Identifier>,
    address: String,
    postal: String,
    property_type: PropertyType,
    bedrooms: u32,
    bathrooms: u32,
    floor_area: u64,
    price: u64,
    status: PropertyStatus,
    listing: ListingMode,
    owner: String,
    buying: Vec<Identifier>,
    selling: Vec<Identifier>,
}

impl PropertyBuilder {
    pub fn new(address: impl Into<String>, postal: impl Into<String>) -> Self {
        Self {
            id: None,
            address: address.into(),
            postal: postal.into(),
            property_type: PropertyType::Other,
            bedrooms: 0,
            bathrooms: 0,
            floor_area: 0,
            price: 0,
            status: PropertyStatus::Listed,
            listing: ListingMode::Sale,
            owner: String::new(),
            buying: Vec::new(),
            selling: Vec::new(),
        }
    }

    pub fn identifier(mut self, id: Identifier) -> Self {
        self.id = Some(id);
        self
    }

    pub fn property_type(mut self, property_type: PropertyType) -> Self {
        self.property_type = property_type;
        self
    }

    pub fn bedrooms(mut self, count: u32) -> Self {
        self.bedrooms = count;
        self
    }

    pub fn bathrooms(mut self, count: u32) -> Self {
        self.bathrooms = count;
        self
    }

    pub fn floor_area(mut self, square_feet: u64) -> Self {
        self.floor_area = square_feet;
        self
    }

    pub fn price(mut self, amount: u64) -> Self {
        self.price = amount;
        self
    }

    pub fn status(mut self, status: PropertyStatus) -> Self {
        self.status = status;
        self
    }

    pub fn listing(mut self, listing: ListingMode) -> Self {
        self.listing = listing;
        self
    }

    pub fn owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = owner.into();
        self
    }

    pub fn buying(mut self, contact: Identifier) -> Self {
        self.buying.push(contact);
        self
    }

    pub fn selling(mut self, contact: Identifier) -> Self {
        self.selling.push(contact);
        self
    }

    pub fn build(self) -> ValidationResult<Property> {
        if let Some(id) = self.id {
            id.expect_kind("id", IdKind::Property)?;
        }

        Ok(Property {
            id: self.id,
            address: require_text("address", &self.address)?,
            postal: validate_postal(&self.postal)?,
            property_type: self.property_type,
            bedrooms: validate_room_count("bedrooms", self.bedrooms)?,
            bathrooms: validate_room_count("bathrooms", self.bathrooms)?,
            floor_area: validate_positive("floor_area", self.floor_area)?,
            price: validate_positive("price", self.price)?,
            status: self.status,
            listing: self.listing,
            owner: self.owner.trim().to_string(),
            buying_contacts: contact_set("buying_contacts", self.buying)?,
            selling_contacts: contact_set("selling_contacts", self.selling)?,
        })
    }
}

/// Flat persisted shape of a property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyRecord {
    #[serde(default)]
    pub id: Option<u64>,
    pub address: String,
    pub postal: String,
    #[serde(rename = "type")]
    pub property_type: String,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub floor_area: u64,
    pub price: u64,
    pub status: String,
    pub listing: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub buying_contact_ids: Vec<u64>,
    #[serde(default)]
    pub selling_contact_ids: Vec<u64>,
}

impl TryFrom<PropertyRecord> for Property {
    type Error = ValidationError;

    fn try_from(record: PropertyRecord) -> Result<Self, Self::Error> {
        let mut builder = Property::builder(record.address, record.postal)
            .property_type(PropertyType::parse(&record.property_type)?)
            .bedrooms(record.bedrooms)
            .bathrooms(record.bathrooms)
            .floor_area(record.floor_area)
            .price(record.price)
            .status(PropertyStatus::parse(&record.status)?)
            .listing(ListingMode::parse(&record.listing)?)
            .owner(record.owner);
        if let Some(id) = record.id {
            builder = builder.identifier(Identifier::property(id)?);
        }
        for value in record.buying_contact_ids {
            builder = builder.buying(Identifier::contact(value)?);
        }
        for value in record.selling_contact_ids {
            builder = builder.selling(Identifier::contact(value)?);
        }
        builder.build()
    }
}

impl From<Property> for PropertyRecord {
    fn from(property: Property) -> Self {
        Self {
            id: property.id.map(Identifier::value),
            address: property.address,
            postal: property.postal,
            property_type: property.property_type.as_str().to_string(),
            bedrooms: property.bedrooms,
            bathrooms: property.bathrooms,
            floor_area: property.floor_area,
            price: property.price,
            status: property.status.as_str().to_string(),
            listing: property.listing.as_str().to_string(),
            owner: property.owner,
            buying_contact_ids: property
                .buying_contacts
                .into_iter()
                .map(Identifier::value)
                .collect(),
            selling_contact_ids: property
                .selling_contacts
                .into_iter()
                .map(Identifier::value)
                .collect(),
        }
    }
}

fn contact_set(
    field: &'static str,
    ids: impl IntoIterator<Item = Identifier>,
) -> ValidationResult<BTreeSet<Identifier>> {
    ids.into_iter()
        .map(|id| id.expect_kind(field, IdKind::Contact))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn condo() -> Property {
        Property::builder("10 Marina Boulevard #12-01", "018983")
            .property_type(PropertyType::Condo)
            .bedrooms(3)
            .bathrooms(2)
            .floor_area(1_200)
            .price(1_850_000)
            .build()
            .unwrap()
    }

    #[test]
    fn identity_is_address_and_postal_only() {
        let repriced = condo().with_price(1_700_000).unwrap();
        assert!(condo().same_identity(&repriced));
        assert!(!condo().structurally_equal(&repriced));

        let shouted = Property::builder("10 MARINA BOULEVARD #12-01", "018983")
            .floor_area(900)
            .price(1)
            .build()
            .unwrap();
        assert!(condo().same_identity(&shouted));
    }

    #[test]
    fn enum_parsing_accepts_any_case_and_aliases() {
        assert_eq!(PropertyType::parse("hdb").unwrap(), PropertyType::Hdb);
        assert_eq!(
            PropertyStatus::parse("Off_Market").unwrap(),
            PropertyStatus::OffMarket
        );
        assert_eq!(ListingMode::parse(" RENT ").unwrap(), ListingMode::Rent);
        assert!(PropertyType::parse("castle").is_err());
    }

    #[test]
    fn build_rejects_out_of_range_values() {
        let err = Property::builder("1 Jurong West", "640001")
            .bedrooms(60)
            .floor_area(500)
            .price(500_000)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ValidationError::OutOfRange {
                field: "bedrooms",
                ..
            }
        ));

        let err = Property::builder("1 Jurong West", "640001")
            .floor_area(500)
            .build()
            .unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { field: "price", .. }));
    }

    #[test]
    fn owner_is_kept_as_trimmed_text() {
        let owned = condo().with_owner(" 12 ");
        assert_eq!(owned.owner(), "12");
        assert_eq!(condo().owner(), "");
    }

    #[test]
    fn contact_sets_reject_property_identifiers() {
        assert!(condo()
            .with_buying_contacts([Identifier::property(2).unwrap()])
            .is_err());
    }

    #[test]
    fn with_identifier_accepts_only_property_ids() {
        assert!(condo()
            .with_identifier(Identifier::property(2).unwrap())
            .is_ok());
        assert!(matches!(
            condo().with_identifier(Identifier::contact(2).unwrap()),
            Err(ValidationError::WrongIdentifierKind { field: "id", .. })
        ));
    }
}
