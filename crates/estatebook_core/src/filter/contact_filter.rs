//! Contact criteria and the contact filter.
//!
//! # Responsibility
//! - Match contact text fields by keyword, status by equality and budgets by
//!   inclusive bounds.
//!
//! # Invariants
//! - A contact lacking a budget bound or status fails criteria on that field.

use super::{EntityFilter, Keywords, Page};
use crate::model::contact::Contact;
use crate::model::validation::ValidationResult;
use std::mem::discriminant;

/// One optional condition on a contact field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactCriterion {
    Name(Keywords),
    Phone(Keywords),
    Email(Keywords),
    Address(Keywords),
    Notes(Keywords),
    /// Any tag contains any keyword.
    Tag(Keywords),
    /// Any keyword equals the status text.
    Status(Keywords),
    /// Contact's minimum budget must be at least this amount.
    BudgetMin(u64),
    /// Contact's maximum budget must be at most this amount.
    BudgetMax(u64),
}

impl ContactCriterion {
    pub fn test(&self, contact: &Contact) -> bool {
        match self {
            Self::Name(keywords) => keywords.any_within(contact.name()),
            Self::Phone(keywords) => keywords.any_within(contact.phone()),
            Self::Email(keywords) => keywords.any_within(contact.email()),
            Self::Address(keywords) => keywords.any_within(contact.address()),
            Self::Notes(keywords) => keywords.any_within(contact.notes()),
            Self::Tag(keywords) => contact.tags().iter().any(|tag| keywords.any_within(tag)),
            Self::Status(keywords) => contact
                .status()
                .is_some_and(|status| keywords.any_equal(status.as_str())),
            Self::BudgetMin(bound) => contact.budget_min().is_some_and(|min| min >= *bound),
            Self::BudgetMax(bound) => contact.budget_max().is_some_and(|max| max <= *bound),
        }
    }
}

/// Compound contact query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFilter {
    criteria: Vec<ContactCriterion>,
    page: Page,
}

impl ContactFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `criterion`, replacing any earlier one for the same field.
    pub fn with(mut self, criterion: ContactCriterion) -> Self {
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

    pub fn name<I, S>(self, keywords: I) -> ValidationResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(self.with(ContactCriterion::Name(Keywords::new("name", keywords)?)))
    }

    pub fn phone<I, S>(self, keywords: I) -> ValidationResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(self.with(ContactCriterion::Phone(Keywords::new("phone", keywords)?)))
    }

    pub fn email<I, S>(self, keywords: I) -> ValidationResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(self.with(ContactCriterion::Email(Keywords::new("email", keywords)?)))
    }

    pub fn address<I, S>(self, keywords: I) -> ValidationResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(self.with(ContactCriterion::Address(Keywords::new(
            "address", keywords,
        )?)))
    }

    pub fn notes<I, S>(self, keywords: I) -> ValidationResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(self.with(ContactCriterion::Notes(Keywords::new("notes", keywords)?)))
    }

    pub fn tag<I, S>(self, keywords: I) -> ValidationResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(self.with(ContactCriterion::Tag(Keywords::new("tag", keywords)?)))
    }

    pub fn status<I, S>(self, keywords: I) -> ValidationResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(self.with(ContactCriterion::Status(Keywords::new("status", keywords)?)))
    }

    pub fn budget_min(self, amount: u64) -> Self {
        self.with(ContactCriterion::BudgetMin(amount))
    }

    pub fn budget_max(self, amount: u64) -> Self {
        self.with(ContactCriterion::BudgetMax(amount))
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.page.offset = offset;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.page.limit = Some(limit);
        self
    }

    pub fn criteria(&self) -> &[ContactCriterion] {
        &self.criteria
    }

    pub fn page(&self) -> Page {
        self.page
    }

    /// Field criteria only; pagination is not considered.
    pub fn matches(&self, contact: &Contact) -> bool {
        self.criteria.iter().all(|criterion| criterion.test(contact))
    }

    /// Matching contacts in source order, paged.
    pub fn apply<'a>(&self, contacts: &'a [Contact]) -> Vec<&'a Contact> {
        self.page
            .apply(contacts.iter().filter(|contact| self.matches(contact)))
            .collect()
    }
}

impl EntityFilter<Contact> for ContactFilter {
    fn matches(&self, contact: &Contact) -> bool {
        ContactFilter::matches(self, contact)
    }

    fn page(&self) -> Page {
        self.page
    }
}
