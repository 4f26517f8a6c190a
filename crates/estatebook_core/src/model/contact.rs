//! Contact domain model.
//!
//! # Responsibility
//! - Define the client record tracked by the address book.
//! - Provide copy-on-write helpers for every editable association set.
//!
//! # Invariants
//! - Identity is `(name, phone)`; name compares case-insensitively.
//! - Buying/selling sets only hold `IdKind::Property` identifiers.
//! - `budget_min <= budget_max` when both are present.

use crate::model::id::{IdKind, Identifier};
use crate::model::validation::{
    validate_email, validate_name, validate_phone, validate_tag, ValidationError,
    ValidationResult,
};
use crate::model::Entity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

/// Engagement state of a contact. Absent status is modelled as `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactStatus {
    Active,
    Inactive,
}

impl ContactStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
        }
    }

    /// Parses user or stored text; blank text means "no status".
    pub fn parse(value: &str) -> ValidationResult<Option<Self>> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        if trimmed.eq_ignore_ascii_case("active") {
            Ok(Some(Self::Active))
        } else if trimmed.eq_ignore_ascii_case("inactive") {
            Ok(Some(Self::Inactive))
        } else {
            Err(ValidationError::InvalidFormat {
                field: "status",
                value: value.to_string(),
                expected: "Active, Inactive or empty",
            })
        }
    }
}

impl Display for ContactStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Client record: a buyer, seller or owner the agent works with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ContactRecord", into = "ContactRecord")]
pub struct Contact {
    id: Option<Identifier>,
    name: String,
    phone: String,
    email: String,
    address: String,
    notes: String,
    status: Option<ContactStatus>,
    tags: BTreeSet<String>,
    budget_min: Option<u64>,
    budget_max: Option<u64>,
    buying_properties: BTreeSet<Identifier>,
    selling_properties: BTreeSet<Identifier>,
}

impl Contact {
    /// Starts building a contact from its identity fields.
    pub fn builder(name: impl Into<String>, phone: impl Into<String>) -> ContactBuilder {
        ContactBuilder::new(name, phone)
    }

    pub fn id(&self) -> Option<Identifier> {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// Empty when no email was given.
    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn status(&self) -> Option<ContactStatus> {
        self.status
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    pub fn budget_min(&self) -> Option<u64> {
        self.budget_min
    }

    pub fn budget_max(&self) -> Option<u64> {
        self.budget_max
    }

    pub fn buying_properties(&self) -> &BTreeSet<Identifier> {
        &self.buying_properties
    }

    pub fn selling_properties(&self) -> &BTreeSet<Identifier> {
        &self.selling_properties
    }

    /// Copy with the buying-property set replaced.
    pub fn with_buying_properties(
        &self,
        properties: impl IntoIterator<Item = Identifier>,
    ) -> ValidationResult<Self> {
        Ok(Self {
            buying_properties: property_set("buying_properties", properties)?,
            ..self.clone()
        })
    }

    /// Copy with the selling-property set replaced.
    pub fn with_selling_properties(
        &self,
        properties: impl IntoIterator<Item = Identifier>,
    ) -> ValidationResult<Self> {
        Ok(Self {
            selling_properties: property_set("selling_properties", properties)?,
            ..self.clone()
        })
    }

    pub fn with_tags<I, S>(&self, tags: I) -> ValidationResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self {
            tags: tag_set(tags)?,
            ..self.clone()
        })
    }

    pub fn with_status(&self, status: Option<ContactStatus>) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }

    pub fn with_notes(&self, notes: &str) -> Self {
        Self {
            notes: notes.trim().to_string(),
            ..self.clone()
        }
    }
}

impl Entity for Contact {
    const KIND: IdKind = IdKind::Contact;

    fn same_identity(&self, other: &Self) -> bool {
        self.phone == other.phone && self.name.to_lowercase() == other.name.to_lowercase()
    }

    fn identifier(&self) -> Option<Identifier> {
        self.id
    }

    fn with_identifier(&self, id: Identifier) -> ValidationResult<Self> {
        Ok(Self {
            id: Some(id.expect_kind("id", IdKind::Contact)?),
            ..self.clone()
        })
    }
}

/// Validating builder for [`Contact`].
#[derive(Debug, Clone, Default)]
pub struct ContactBuilder {
    id: Option<Identifier>,
    name: String,
    phone: String,
    email: String,
    address: String,
    notes: String,
    status: Option<ContactStatus>,
    tags: Vec<String>,
    budget_min: Option<u64>,
    budget_max: Option<u64>,
    buying: Vec<Identifier>,
    selling: Vec<Identifier>,
}

impl ContactBuilder {
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            ..Self::default()
        }
    }

    /// Only used when restoring stored contacts; new contacts get their
    /// identifier from the book.
    pub fn identifier(mut self, id: Identifier) -> Self {
        self.id = Some(id);
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn status(mut self, status: Option<ContactStatus>) -> Self {
        self.status = status;
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn budget_min(mut self, amount: u64) -> Self {
        self.budget_min = Some(amount);
        self
    }

    pub fn budget_max(mut self, amount: u64) -> Self {
        self.budget_max = Some(amount);
        self
    }

    pub fn buying(mut self, property: Identifier) -> Self {
        self.buying.push(property);
        self
    }

    pub fn selling(mut self, property: Identifier) -> Self {
        self.selling.push(property);
        self
    }

    pub fn build(self) -> ValidationResult<Contact> {
        if let Some(id) = self.id {
            id.expect_kind("id", IdKind::Contact)?;
        }
        if let (Some(min), Some(max)) = (self.budget_min, self.budget_max) {
            if min > max {
                return Err(ValidationError::InvalidBudgetRange { min, max });
            }
        }

        Ok(Contact {
            id: self.id,
            name: validate_name(&self.name)?,
            phone: validate_phone(&self.phone)?,
            email: validate_email(&self.email)?,
            address: self.address.trim().to_string(),
            notes: self.notes.trim().to_string(),
            status: self.status,
            tags: tag_set(&self.tags)?,
            budget_min: self.budget_min,
            budget_max: self.budget_max,
            buying_properties: property_set("buying_properties", self.buying)?,
            selling_properties: property_set("selling_properties", self.selling)?,
        })
    }
}

/// Flat persisted shape of a contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
    #[serde(default)]
    pub id: Option<u64>,
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub budget_min: Option<u64>,
    #[serde(default)]
    pub budget_max: Option<u64>,
    #[serde(default)]
    pub buying_property_ids: Vec<u64>,
    #[serde(default)]
    pub selling_property_ids: Vec<u64>,
}

impl TryFrom<ContactRecord> for Contact {
    type Error = ValidationError;

    fn try_from(record: ContactRecord) -> Result<Self, Self::Error> {
        let mut builder = Contact::builder(record.name, record.phone)
            .email(record.email)
            .address(record.address)
            .notes(record.notes)
            .status(ContactStatus::parse(&record.status)?);
        if let Some(id) = record.id {
            builder = builder.identifier(Identifier::contact(id)?);
        }
        for tag in record.tags {
            builder = builder.tag(tag);
        }
        if let Some(min) = record.budget_min {
            builder = builder.budget_min(min);
        }
        if let Some(max) = record.budget_max {
            builder = builder.budget_max(max);
        }
        for value in record.buying_property_ids {
            builder = builder.buying(Identifier::property(value)?);
        }
        for value in record.selling_property_ids {
            builder = builder.selling(Identifier::property(value)?);
        }
        builder.build()
    }
}

impl From<Contact> for ContactRecord {
    fn from(contact: Contact) -> Self {
        Self {
            id: contact.id.map(Identifier::value),
            name: contact.name,
            phone: contact.phone,
            email: contact.email,
            address: contact.address,
            notes: contact.notes,
            status: contact
                .status
                .map(|status| status.as_str().to_string())
                .unwrap_or_default(),
            tags: contact.tags.into_iter().collect(),
            budget_min: contact.budget_min,
            budget_max: contact.budget_max,
            buying_property_ids: contact
                .buying_properties
                .into_iter()
                .map(Identifier::value)
                .collect(),
            selling_property_ids: contact
                .selling_properties
                .into_iter()
                .map(Identifier::value)
                .collect(),
        }
    }
}

fn tag_set<I, S>(tags: I) -> ValidationResult<BTreeSet<String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter()
        .map(|tag| validate_tag(tag.as_ref()))
        .collect()
}

fn property_set(
    field: &'static str,
    ids: impl IntoIterator<Item = Identifier>,
) -> ValidationResult<BTreeSet<Identifier>> {
    ids.into_iter()
        .map(|id| id.expect_kind(field, IdKind::Property))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alex() -> Contact {
        Contact::builder("Alex Yeoh", "87438807")
            .email("alexyeoh@example.com")
            .build()
            .unwrap()
    }

    #[test]
    fn identity_ignores_name_case_and_other_fields() {
        let other = Contact::builder("alex yeoh", "87438807")
            .notes("met at open house")
            .build()
            .unwrap();
        assert!(alex().same_identity(&other));
        assert!(!alex().structurally_equal(&other));
    }

    #[test]
    fn identity_requires_exact_phone() {
        let other = Contact::builder("Alex Yeoh", "87438808").build().unwrap();
        assert!(!alex().same_identity(&other));
    }

    #[test]
    fn budget_range_is_checked() {
        let err = Contact::builder("Bernice Yu", "99272758")
            .budget_min(2_000)
            .budget_max(1_000)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidBudgetRange {
                min: 2_000,
                max: 1_000
            }
        );
    }

    #[test]
    fn association_sets_reject_contact_identifiers() {
        let err = alex()
            .with_buying_properties([Identifier::contact(1).unwrap()])
            .unwrap_err();
        assert!(matches!(
            err,
            ValidationError::WrongIdentifierKind {
                expected: IdKind::Property,
                found: IdKind::Contact,
                ..
            }
        ));
    }

    #[test]
    fn with_helpers_leave_original_untouched() {
        let original = alex();
        let property = Identifier::property(4).unwrap();
        let edited = original.with_selling_properties([property]).unwrap();
        assert!(original.selling_properties().is_empty());
        assert!(edited.selling_properties().contains(&property));
        assert_eq!(edited.name(), original.name());
    }

    #[test]
    fn status_parse_is_case_insensitive() {
        assert_eq!(
            ContactStatus::parse("ACTIVE").unwrap(),
            Some(ContactStatus::Active)
        );
        assert_eq!(ContactStatus::parse("  ").unwrap(), None);
        assert!(ContactStatus::parse("pending").is_err());
    }

    #[test]
    fn with_identifier_accepts_only_contact_ids() {
        let numbered = alex()
            .with_identifier(Identifier::contact(4).unwrap())
            .unwrap();
        assert_eq!(numbered.id(), Some(Identifier::contact(4).unwrap()));

        let err = alex()
            .with_identifier(Identifier::property(4).unwrap())
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::WrongIdentifierKind {
                field: "id",
                expected: IdKind::Contact,
                found: IdKind::Property,
            }
        );
    }
}
