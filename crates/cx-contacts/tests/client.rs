//! Client behaviour against a SQLite store

use std::sync::Arc;

use cx_contacts::prelude::*;
use serde_json::json;

fn client() -> ContactsClient {
    let store = SqliteContactStore::in_memory().expect("in-memory store");
    ContactsClient::new(Arc::new(store))
}

fn everything(filter: &str) -> ContactFindOptions {
    ContactFindOptions::new().with_filter(filter).multiple(true)
}

#[test]
fn create_never_assigns_an_id() {
    let client = client();
    let bags = [
        json!({}),
        json!({"displayName": "X"}),
        json!({"id": "42", "displayName": "Y"}),
        json!({"id": 42, "phoneNumbers": [{"type": "work", "value": 5551234}]}),
    ];
    for bag in bags {
        assert_eq!(client.create(bag).unwrap().id, None);
    }
}

#[test]
fn create_rejects_non_object_bags() {
    let client = client();
    assert_eq!(client.create(json!("Bob")), Err(ContactError::InvalidArgument));
    assert_eq!(
        client.create(json!({"phoneNumbers": "555"})),
        Err(ContactError::InvalidArgument)
    );
}

#[tokio::test]
async fn duplicate_is_detached() {
    let client = client();
    let original = client
        .save(
            &Contact::new()
                .with_display_name("Original")
                .with_email(ContactField::new("home", "a@example.com", false)),
        )
        .await
        .unwrap();

    let mut copy = original.duplicate();
    assert_eq!(copy.id, None);
    assert_eq!(copy.display_name, original.display_name);

    copy.emails
        .as_mut()
        .unwrap()
        .push(ContactField::new("work", "b@example.com", false));
    assert_eq!(original.emails.as_ref().unwrap().len(), 1);

    let saved_copy = client.save(&copy).await.unwrap();
    assert_ne!(saved_copy.id, original.id);
    assert_eq!(client.find(&["displayName"], &everything("Original")).await.unwrap().len(), 2);
}

#[tokio::test]
async fn save_assigns_then_preserves_id() {
    let client = client();
    let saved = client.save(&client.create(json!({"displayName": "X"})).unwrap()).await.unwrap();
    let id = saved.id.clone().expect("saved contact has an id");

    let again = client.save(&saved).await.unwrap();
    assert_eq!(again.id.as_deref(), Some(id.as_str()));
}

#[tokio::test]
async fn remove_unsaved_contact_fails_with_unknown() {
    let client = client();
    assert_eq!(client.remove(&Contact::new()).await, Err(ContactError::Unknown));
}

#[tokio::test]
async fn double_remove_fails_the_second_time() {
    let client = client();
    let saved = client.save(&Contact::new().with_display_name("Gone")).await.unwrap();

    assert_eq!(client.remove(&saved).await, Ok(()));
    assert_eq!(client.remove(&saved).await, Err(ContactError::Unknown));
}

#[tokio::test]
async fn find_requires_fields() {
    let client = client();
    let fields: [String; 0] = [];
    assert_eq!(
        client.find(&fields, &everything("")).await,
        Err(ContactError::InvalidArgument)
    );
}

#[tokio::test]
async fn empty_filter_returns_every_record() {
    let client = client();
    for name in ["A", "B", "C"] {
        client.save(&Contact::new().with_display_name(name)).await.unwrap();
    }
    let all = client.find(&["displayName"], &everything("")).await.unwrap();
    let names: Vec<_> = all.iter().filter_map(|c| c.display_name.as_deref()).collect();
    assert_eq!(names, vec!["A", "B", "C"]);
}

#[tokio::test]
async fn round_trip_by_display_name() {
    let client = client();
    client.save(&client.create(json!({"displayName": "X"})).unwrap()).await.unwrap();
    client.save(&client.create(json!({"displayName": "Y"})).unwrap()).await.unwrap();

    let found = client.find(&["displayName"], &everything("X")).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].display_name.as_deref(), Some("X"));
}

#[tokio::test]
async fn single_result_unless_multiple() {
    let client = client();
    for name in ["Ann One", "Ann Two"] {
        client.save(&Contact::new().with_display_name(name)).await.unwrap();
    }
    let options = ContactFindOptions::new().with_filter("ann");
    let found = client.find(&["displayName"], &options).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].display_name.as_deref(), Some("Ann One"));
}

#[tokio::test]
async fn update_replaces_the_whole_record() {
    let client = client();
    let saved = client
        .save(
            &Contact::new()
                .with_display_name("Replace Me")
                .with_note("keep?")
                .with_email(ContactField::new("home", "one@example.com", false))
                .with_email(ContactField::new("work", "two@example.com", false)),
        )
        .await
        .unwrap();

    let mut edited = saved.clone();
    edited.note = None;
    edited.emails.as_mut().unwrap().pop();
    client.save(&edited).await.unwrap();

    let reloaded = client
        .find(&["displayName"], &everything("Replace Me"))
        .await
        .unwrap()
        .remove(0);
    assert_eq!(reloaded.note, None);
    let emails = reloaded.emails.unwrap();
    assert_eq!(emails.len(), 1);
    assert_eq!(emails[0].value.as_deref(), Some("one@example.com"));
}

#[tokio::test]
async fn update_of_removed_contact_fails() {
    let client = client();
    let saved = client.save(&Contact::new().with_display_name("Stale")).await.unwrap();
    client.remove(&saved).await.unwrap();
    assert_eq!(client.save(&saved).await, Err(ContactError::Unknown));
}

#[tokio::test]
async fn remove_matching_removes_every_match() {
    let client = client();
    for i in 0..4 {
        client
            .save(&Contact::new().with_display_name(format!("Sample {}", i)).with_note("DeleteMe"))
            .await
            .unwrap();
    }
    client.save(&Contact::new().with_note("Keep")).await.unwrap();

    let report = client.remove_matching(&["note"], "DeleteMe").await.unwrap();
    assert_eq!(report.removed.len(), 4);
    assert!(report.failed.is_empty());

    let left = client.find(&["*"], &everything("")).await.unwrap();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].note.as_deref(), Some("Keep"));
}
