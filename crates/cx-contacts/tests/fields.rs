//! Field handling through save and find

use std::sync::Arc;

use chrono::{DateTime, NaiveDate};
use cx_contacts::prelude::*;
use serde_json::json;

fn client() -> ContactsClient {
    let store = SqliteContactStore::in_memory().expect("in-memory store");
    ContactsClient::new(Arc::new(store))
}

async fn reload(client: &ContactsClient, saved: &Contact) -> Contact {
    let id = saved.id.clone().expect("saved contact has an id");
    let options = ContactFindOptions::new().with_filter(id.as_str());
    client
        .find(&[FieldType::ID], &options)
        .await
        .unwrap()
        .into_iter()
        .next()
        .expect("contact found by id")
}

#[tokio::test]
async fn find_by_id() {
    let client = client();
    let saved = client.save(&Contact::new().with_display_name("By Id")).await.unwrap();
    let found = reload(&client, &saved).await;
    assert_eq!(found.id, saved.id);
    assert_eq!(found.display_name.as_deref(), Some("By Id"));
}

#[tokio::test]
async fn custom_labels_survive() {
    let client = client();
    let saved = client
        .save(
            &Contact::new()
                .with_display_name("Labels")
                .with_phone_number(ContactField::new("my-phone", "555-0100", false))
                .with_email(ContactField::new("my-email", "me@example.com", false))
                .with_url(ContactField::new("my-site", "https://example.com", false))
                .with_im(ContactField::new("my-im", "me@im.example", false))
                .with_address(
                    ContactAddress::new("my-address").with_street_address("1 Main St"),
                ),
        )
        .await
        .unwrap();

    let found = reload(&client, &saved).await;
    let label = |fields: &Option<Vec<ContactField>>| {
        fields.as_ref().unwrap()[0].field_type.clone().unwrap()
    };
    assert_eq!(label(&found.phone_numbers), "my-phone");
    assert_eq!(label(&found.emails), "my-email");
    assert_eq!(label(&found.urls), "my-site");
    assert_eq!(label(&found.ims), "my-im");
    assert_eq!(
        found.addresses.unwrap()[0].field_type.as_deref(),
        Some("my-address")
    );
}

#[tokio::test]
async fn unicode_family_name_is_findable() {
    let client = client();
    client
        .save(
            &Contact::new()
                .with_name(ContactName::new().with_given_name("Н€йромонах").with_family_name("ФеофаЊ")),
        )
        .await
        .unwrap();

    let options = ContactFindOptions::new().with_filter("ФеофаЊ").multiple(true);
    let found = client.find(&[FieldType::NAME], &options).await.unwrap();
    assert_eq!(found.len(), 1);
}

#[tokio::test]
async fn nameless_contact_is_findable_by_phone() {
    let client = client();
    client
        .save(&Contact::new().with_phone_number(ContactField::new("mobile", "1234567890", true)))
        .await
        .unwrap();

    let options = ContactFindOptions::new().with_filter("1234567890").multiple(true);
    let found = client.find(&[FieldType::PHONE_NUMBERS], &options).await.unwrap();
    assert_eq!(found.len(), 1);
    assert!(found[0].name.is_none());
}

#[tokio::test]
async fn birthday_survives() {
    let client = client();
    let birthday = NaiveDate::from_ymd_opt(1985, 1, 23).unwrap();
    let saved = client
        .save(&Contact::new().with_display_name("Birthday").with_birthday(birthday))
        .await
        .unwrap();

    assert_eq!(reload(&client, &saved).await.birthday, Some(Birthday::Date(birthday)));
}

#[tokio::test]
async fn birthday_timestamp_keeps_time_and_offset() {
    let client = client();
    let saved = client
        .save(&client.create(json!({"birthday": "1976-08-04T10:30:00.000-07:00"})).unwrap())
        .await
        .unwrap();

    let found = reload(&client, &saved).await.birthday.expect("birthday stored");
    let expected = DateTime::parse_from_rfc3339("1976-08-04T10:30:00-07:00").unwrap();
    let Birthday::Timestamp(ts) = found else {
        panic!("expected a timestamp, got {:?}", found);
    };
    assert_eq!(ts, expected);
    assert_eq!(ts.offset(), expected.offset());
    assert_eq!(found.to_string(), "1976-08-04T10:30:00-07:00");
}

#[tokio::test]
async fn blanking_one_email_leaves_the_other() {
    let client = client();
    let saved = client
        .save(
            &client
                .create(json!({
                    "displayName": "Two Emails",
                    "emails": [
                        {"type": "home", "value": "here@there.com"},
                        {"type": "work", "value": "there@here.com"}
                    ]
                }))
                .unwrap(),
        )
        .await
        .unwrap();

    let mut edited = saved.clone();
    edited.emails.as_mut().unwrap()[1].value = Some(String::new());
    client.save(&edited).await.unwrap();

    let emails = reload(&client, &saved).await.emails.unwrap();
    assert_eq!(emails.len(), 1);
    assert_eq!(emails[0].value.as_deref(), Some("here@there.com"));
}

#[tokio::test]
async fn numeric_values_are_coerced_to_strings() {
    let client = client();
    let contact = client
        .create(json!({"phoneNumbers": [{"type": 1, "value": 5551234, "pref": true}]}))
        .unwrap();
    let phone = &contact.phone_numbers.as_ref().unwrap()[0];
    assert_eq!(phone.field_type.as_deref(), Some("1"));
    assert_eq!(phone.value.as_deref(), Some("5551234"));
    assert!(phone.pref);
}

#[tokio::test]
async fn desired_fields_projection() {
    let client = client();
    client
        .save(
            &Contact::new()
                .with_display_name("Projected")
                .with_note("hidden")
                .with_phone_number(ContactField::new("work", "555", false)),
        )
        .await
        .unwrap();

    let options = ContactFindOptions::new()
        .with_filter("Projected")
        .with_desired_fields([FieldType::DISPLAY_NAME]);
    let found = client.find(&[FieldType::DISPLAY_NAME], &options).await.unwrap();
    assert_eq!(found.len(), 1);
    assert!(found[0].id.is_some());
    assert_eq!(found[0].display_name.as_deref(), Some("Projected"));
    assert_eq!(found[0].note, None);
    assert_eq!(found[0].phone_numbers, None);
}

#[tokio::test]
async fn has_phone_number_filters() {
    let client = client();
    client.save(&Contact::new().with_display_name("Cordova Contact")).await.unwrap();
    client
        .save(
            &Contact::new()
                .with_display_name("Cordova Contact")
                .with_phone_number(ContactField::new("work", "8840926059", false)),
        )
        .await
        .unwrap();

    let options = ContactFindOptions::new()
        .with_filter("Cordova Contact")
        .multiple(true)
        .with_desired_fields([FieldType::ID])
        .has_phone_number(true);
    let found = client
        .find(&[FieldType::DISPLAY_NAME, FieldType::NAME], &options)
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert!(found[0].display_name.is_none());
}
