use estatebook_core::{
    Contact, ContactStatus, Identifier, ListingMode, Property, PropertyStatus, PropertyType,
    ValidationError,
};

fn full_contact() -> Contact {
    Contact::builder("Alex Yeoh", "87438807")
        .identifier(Identifier::contact(1).unwrap())
        .email("alexyeoh@example.com")
        .address("Blk 30 Geylang Street 29, #06-40")
        .notes("wants a corner unit")
        .status(Some(ContactStatus::Active))
        .tag("friends")
        .tag("buyer")
        .budget_min(500_000)
        .budget_max(900_000)
        .buying(Identifier::property(2).unwrap())
        .selling(Identifier::property(3).unwrap())
        .build()
        .unwrap()
}

fn full_property() -> Property {
    Property::builder("Blk 123 Ang Mo Kio Ave 3 #08-12", "560123")
        .identifier(Identifier::property(2).unwrap())
        .property_type(PropertyType::Hdb)
        .bedrooms(4)
        .bathrooms(2)
        .floor_area(1_200)
        .price(680_000)
        .status(PropertyStatus::Listed)
        .listing(ListingMode::Sale)
        .owner("5")
        .buying(Identifier::contact(1).unwrap())
        .selling(Identifier::contact(5).unwrap())
        .build()
        .unwrap()
}

#[test]
fn contact_serialization_uses_expected_wire_fields() {
    let json = serde_json::to_value(full_contact()).unwrap();
    assert_eq!(json["id"], 1);
    assert_eq!(json["name"], "Alex Yeoh");
    assert_eq!(json["status"], "Active");
    assert_eq!(json["tags"], serde_json::json!(["buyer", "friends"]));
    assert_eq!(json["budget_min"], 500_000);
    assert_eq!(json["buying_property_ids"], serde_json::json!([2]));
    assert_eq!(json["selling_property_ids"], serde_json::json!([3]));

    let decoded: Contact = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, full_contact());
}

#[test]
fn property_serialization_uses_expected_wire_fields() {
    let json = serde_json::to_value(full_property()).unwrap();
    assert_eq!(json["type"], "HDB");
    assert_eq!(json["status"], "listed");
    assert_eq!(json["listing"], "sale");
    assert_eq!(json["owner"], "5");
    assert_eq!(json["floor_area"], 1_200);

    let decoded: Property = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, full_property());
}

#[test]
fn contact_record_defaults_optional_fields() {
    let contact: Contact = serde_json::from_value(serde_json::json!({
        "name": "Bernice Yu",
        "phone": "99272758"
    }))
    .unwrap();
    assert_eq!(contact.id(), None);
    assert_eq!(contact.email(), "");
    assert_eq!(contact.status(), None);
    assert!(contact.tags().is_empty());
    assert_eq!(contact.budget_min(), None);
}

#[test]
fn deserialize_rejects_malformed_values() {
    let bad_email = serde_json::json!({
        "name": "Bernice Yu",
        "phone": "99272758",
        "email": "not-an-email"
    });
    let err = serde_json::from_value::<Contact>(bad_email).unwrap_err();
    assert!(err.to_string().contains("invalid email"), "unexpected error: {err}");

    let zero_id = serde_json::json!({
        "name": "Bernice Yu",
        "phone": "99272758",
        "buying_property_ids": [0]
    });
    let err = serde_json::from_value::<Contact>(zero_id).unwrap_err();
    assert!(err.to_string().contains("positive"), "unexpected error: {err}");

    let bad_type = serde_json::json!({
        "address": "1 Jurong West",
        "postal": "640001",
        "type": "castle",
        "bedrooms": 1,
        "bathrooms": 1,
        "floor_area": 500,
        "price": 100,
        "status": "listed",
        "listing": "rent"
    });
    let err = serde_json::from_value::<Property>(bad_type).unwrap_err();
    assert!(err.to_string().contains("invalid type"), "unexpected error: {err}");
}

#[test]
fn builder_reports_first_invalid_field() {
    assert_eq!(
        Contact::builder("", "87438807").build().unwrap_err(),
        ValidationError::Blank { field: "name" }
    );
    assert!(matches!(
        Contact::builder("Alex", "12").build().unwrap_err(),
        ValidationError::InvalidFormat { field: "phone", .. }
    ));
    assert!(matches!(
        Contact::builder("Alex", "87438807")
            .tag("two words")
            .build()
            .unwrap_err(),
        ValidationError::InvalidFormat { field: "tag", .. }
    ));
    assert!(matches!(
        Property::builder("1 Jurong West", "64001")
            .floor_area(10)
            .price(10)
            .build()
            .unwrap_err(),
        ValidationError::InvalidFormat { field: "postal", .. }
    ));
}

#[test]
fn copy_on_write_produces_independent_values() {
    let original = full_property();
    let sold = original.with_status(PropertyStatus::Sold);
    let rebought = original
        .with_buying_contacts([Identifier::contact(9).unwrap()])
        .unwrap();

    assert_eq!(original.status(), PropertyStatus::Listed);
    assert_eq!(sold.status(), PropertyStatus::Sold);
    assert_eq!(
        rebought.buying_contacts().iter().map(|id| id.value()).collect::<Vec<_>>(),
        vec![9]
    );
    assert_eq!(original.buying_contacts().len(), 1);
}
