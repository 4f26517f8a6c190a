//! Property criteria and the property filter.
//!
//! # Responsibility
//! - Match address and owner by substring, numeric fields after
//!   normalization, enum fields by canonical text or alias.

use super::{EntityFilter, Page};
use crate::model::property::Property;
use crate::model::validation::{
    normalize_numeric_text, require_text, ValidationError, ValidationResult,
};
use std::mem::discriminant;

/// One optional condition on a property field.
///
/// Text values are stored already normalized for their matching mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyCriterion {
    /// Case-insensitive substring.
    Address(String),
    /// Case-insensitive substring of the raw owner text.
    Owner(String),
    /// Exact after stripping whitespace and commas.
    Postal(String),
    Bedroom(String),
    Bathroom(String),
    FloorArea(String),
    /// Case-insensitive equality with the canonical name or an alias.
    Type(String),
    Status(String),
    Listing(String),
    /// Property price must not exceed this amount.
    PriceAtMost(u64),
}

impl PropertyCriterion {
    pub fn address(value: &str) -> ValidationResult<Self> {
        Ok(Self::Address(lowercase_text("address", value)?))
    }

    pub fn owner(value: &str) -> ValidationResult<Self> {
        Ok(Self::Owner(lowercase_text("owner", value)?))
    }

    pub fn postal(value: &str) -> ValidationResult<Self> {
        Ok(Self::Postal(numeric_text("postal", value)?))
    }

    pub fn bedroom(value: &str) -> ValidationResult<Self> {
        Ok(Self::Bedroom(numeric_text("bedroom", value)?))
    }

    pub fn bathroom(value: &str) -> ValidationResult<Self> {
        Ok(Self::Bathroom(numeric_text("bathroom", value)?))
    }

    pub fn floor_area(value: &str) -> ValidationResult<Self> {
        Ok(Self::FloorArea(numeric_text("floor_area", value)?))
    }

    pub fn property_type(value: &str) -> ValidationResult<Self> {
        Ok(Self::Type(require_text("type", value)?))
    }

    pub fn status(value: &str) -> ValidationResult<Self> {
        Ok(Self::Status(require_text("status", value)?))
    }

    pub fn listing(value: &str) -> ValidationResult<Self> {
        Ok(Self::Listing(require_text("listing", value)?))
    }

    pub fn test(&self, property: &Property) -> bool {
        match self {
            Self::Address(needle) => property.address().to_lowercase().contains(needle.as_str()),
            Self::Owner(needle) => property.owner().to_lowercase().contains(needle.as_str()),
            Self::Postal(value) => normalize_numeric_text(property.postal()) == *value,
            Self::Bedroom(value) => property.bedrooms().to_string() == *value,
            Self::Bathroom(value) => property.bathrooms().to_string() == *value,
            Self::FloorArea(value) => property.floor_area().to_string() == *value,
            Self::Type(value) => property.property_type().matches_text(value),
            Self::Status(value) => property.status().matches_text(value),
            Self::Listing(value) => property.listing().matches_text(value),
            Self::PriceAtMost(bound) => property.price() <= *bound,
        }
    }
}

/// Compound property query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyFilter {
    criteria: Vec<PropertyCriterion>,
    page: Page,
}

impl PropertyFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `criterion`, replacing any earlier one for the same field.
    pub fn with(mut self, criterion: PropertyCriterion) -> Self {
        let field = discriminant(&criterion);
        match self
            .criteria
            .iter_mut()
            .find(|existing| discriminant(*existing) == field)
        {
            Some(existing) => *existing = criterion,
            None => self.criteria.push(criterion),
        }
        self
    }

    pub fn address(self, value: &str) -> ValidationResult<Self> {
        Ok(self.with(PropertyCriterion::address(value)?))
    }

    pub fn owner(self, value: &str) -> ValidationResult<Self> {
        Ok(self.with(PropertyCriterion::owner(value)?))
    }

    pub fn postal(self, value: &str) -> ValidationResult<Self> {
        Ok(self.with(PropertyCriterion::postal(value)?))
    }

    pub fn bedroom(self, value: &str) -> ValidationResult<Self> {
        Ok(self.with(PropertyCriterion::bedroom(value)?))
    }

    pub fn bathroom(self, value: &str) -> ValidationResult<Self> {
        Ok(self.with(PropertyCriterion::bathroom(value)?))
    }

    pub fn floor_area(self, value: &str) -> ValidationResult<Self> {
        Ok(self.with(PropertyCriterion::floor_area(value)?))
    }

    pub fn property_type(self, value: &str) -> ValidationResult<Self> {
        Ok(self.with(PropertyCriterion::property_type(value)?))
    }

    pub fn status(self, value: &str) -> ValidationResult<Self> {
        Ok(self.with(PropertyCriterion::status(value)?))
    }

    pub fn listing(self, value: &str) -> ValidationResult<Self> {
        Ok(self.with(PropertyCriterion::listing(value)?))
    }

    pub fn price_at_most(self, amount: u64) -> Self {
        self.with(PropertyCriterion::PriceAtMost(amount))
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.page.offset = offset;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.page.limit = Some(limit);
        self
    }

    pub fn criteria(&self) -> &[PropertyCriterion] {
        &self.criteria
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn matches(&self, property: &Property) -> bool {
        self.criteria.iter().all(|criterion| criterion.test(property))
    }

    pub fn apply<'a>(&self, properties: &'a [Property]) -> Vec<&'a Property> {
        self.page
            .apply(properties.iter().filter(|property| self.matches(property)))
            .collect()
    }
}

impl EntityFilter<Property> for PropertyFilter {
    fn matches(&self, property: &Property) -> bool {
        PropertyFilter::matches(self, property)
    }

    fn page(&self) -> Page {
        self.page
    }
}

fn lowercase_text(field: &'static str, value: &str) -> ValidationResult<String> {
    Ok(require_text(field, value)?.to_lowercase())
}

fn numeric_text(field: &'static str, value: &str) -> ValidationResult<String> {
    let normalized = normalize_numeric_text(value);
    if normalized.is_empty() {
        return Err(ValidationError::Blank { field });
    }
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::property::{ListingMode, PropertyStatus, PropertyType};

    fn sample() -> Property {
        Property::builder("Blk 123 Ang Mo Kio Ave 3", "560123")
            .property_type(PropertyType::Hdb)
            .bedrooms(3)
            .bathrooms(2)
            .floor_area(1_100)
            .price(550_000)
            .status(PropertyStatus::OffMarket)
            .listing(ListingMode::Rent)
            .owner("7")
            .build()
            .unwrap()
    }

    #[test]
    fn numeric_text_fields_ignore_commas_and_spaces() {
        let property = sample();
        assert!(PropertyFilter::new()
            .floor_area(" 1,100 ")
            .unwrap()
            .matches(&property));
        assert!(PropertyFilter::new()
            .bedroom("3")
            .unwrap()
            .bathroom("2")
            .unwrap()
            .postal("560,123")
            .unwrap()
            .matches(&property));
        assert!(!PropertyFilter::new()
            .bedroom("4")
            .unwrap()
            .matches(&property));
    }

    #[test]
    fn enum_fields_match_canonical_names_case_insensitively() {
        let property = sample();
        assert!(PropertyFilter::new()
            .property_type("hdb")
            .unwrap()
            .status("OFF-MARKET")
            .unwrap()
            .listing("Rent")
            .unwrap()
            .matches(&property));
        assert!(!PropertyFilter::new()
            .property_type("hd")
            .unwrap()
            .matches(&property));
    }

    #[test]
    fn status_alias_matches_the_status_it_parses_to() {
        let listing = Property::builder("8 Tampines Street 81", "520008")
            .floor_area(900)
            .price(420_000)
            .status(PropertyStatus::parse("off_market").unwrap())
            .build()
            .unwrap();

        for spelling in ["off_market", "OffMarket", "off-market"] {
            let filter = PropertyFilter::new().status(spelling).unwrap();
            assert_eq!(filter.apply(std::slice::from_ref(&listing)).len(), 1, "{spelling}");
        }
        assert!(!PropertyFilter::new()
            .status("listed")
            .unwrap()
            .matches(&listing));
    }

    #[test]
    fn price_is_an_inclusive_upper_bound() {
        let property = sample();
        assert!(PropertyFilter::new().price_at_most(550_000).matches(&property));
        assert!(!PropertyFilter::new().price_at_most(549_999).matches(&property));
    }

    #[test]
    fn owner_and_address_are_substrings() {
        let property = sample();
        assert!(PropertyFilter::new()
            .address("ang mo")
            .unwrap()
            .owner("7")
            .unwrap()
            .matches(&property));
        assert!(!PropertyFilter::new()
            .owner("8")
            .unwrap()
            .matches(&property));
    }

    #[test]
    fn blank_values_are_rejected() {
        assert_eq!(
            PropertyCriterion::floor_area(" , ").unwrap_err(),
            ValidationError::Blank { field: "floor_area" }
        );
        assert!(PropertyCriterion::address("  ").is_err());
    }
}
