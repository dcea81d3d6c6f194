//! Demo scenarios
//!
//! Each [`Command`] runs one scenario against a [`ContactsClient`] and
//! returns the text to show the user. Failures are reported as text too;
//! nothing here aborts the program.

use cx_contacts::prelude::*;
use serde_json::json;
use tracing::debug;

/// Display name used by the save / find / delete scenarios
pub const DEMO_CONTACT: &str = "Cordova Contact";

/// Note attached to every sample contact so `cleanup` can find them
pub const SAMPLE_TAG: &str = "DeleteMe";

const SAMPLE_NAME: &str = "Dooney Evans";

/// A demo scenario
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Save the demo contact with two phone numbers
    Save,
    /// Count contacts matching a filter
    Find(String),
    /// Remove the first contact matching a filter
    Delete(String),
    /// Table of contacts, optionally filtered
    List(Option<String>),
    /// Matching contacts as JSON
    Show(Option<String>),
    /// Choose a contact interactively
    Pick,
    /// Add the "Dooney Evans" sample
    Add,
    /// Add a contact with no name at all
    AddNameless,
    /// Add a contact with a Cyrillic name
    AddUnicode,
    /// Rename "Dooney Evans" to "Urist McContact"
    Rename,
    /// Remove every sample contact
    Cleanup,
}

impl Command {
    /// Parse a command name and its (possibly empty) argument text
    pub fn parse(name: &str, arg: &str) -> Option<Self> {
        let arg = arg.trim();
        let filter = || (!arg.is_empty()).then(|| arg.to_string());

        let command = match name.to_lowercase().as_str() {
            "save" => Command::Save,
            "find" => Command::Find(filter().unwrap_or_else(|| DEMO_CONTACT.to_string())),
            "delete" | "remove" => {
                Command::Delete(filter().unwrap_or_else(|| DEMO_CONTACT.to_string()))
            }
            "list" => Command::List(filter()),
            "show" => Command::Show(filter()),
            "pick" => Command::Pick,
            "add" => Command::Add,
            "add-nameless" => Command::AddNameless,
            "add-unicode" => Command::AddUnicode,
            "rename" => Command::Rename,
            "cleanup" => Command::Cleanup,
            _ => return None,
        };
        Some(command)
    }
}

/// Run one scenario and return the message to display
pub async fn run(client: &ContactsClient, command: Command) -> String {
    debug!("Running demo command {:?}", command);
    match command {
        Command::Save => save_demo_contact(client).await,
        Command::Find(filter) => find_demo_contacts(client, &filter).await,
        Command::Delete(filter) => delete_contact(client, &filter).await,
        Command::List(filter) => list_contacts(client, filter.as_deref()).await,
        Command::Show(filter) => show_contacts(client, filter.as_deref()).await,
        Command::Pick => pick_contact(client).await,
        Command::Add => {
            let name = json!({
                "formatted": SAMPLE_NAME,
                "familyName": "Evans",
                "givenName": "Dooney",
                "middleName": ""
            });
            add_sample(
                client,
                json!({"displayName": SAMPLE_NAME, "name": name, "birthday": "1985-01-23"}),
                Some("512-555-1234"),
            )
            .await
        }
        Command::AddNameless => add_sample(client, json!({}), None).await,
        Command::AddUnicode => {
            let display_name = "Н€йромонах \nФеофаЊ";
            let name = json!({
                "formatted": display_name,
                "familyName": "\nФеофаЊ",
                "givenName": "Н€йромонах",
                "middleName": ""
            });
            add_sample(
                client,
                json!({"displayName": display_name, "name": name}),
                None,
            )
            .await
        }
        Command::Rename => rename_sample(client).await,
        Command::Cleanup => remove_samples(client).await,
    }
}

fn search_failed(e: ContactError) -> String {
    match e {
        ContactError::NotSupported => "Searching for contacts is not supported.".to_string(),
        ContactError::PermissionDenied => e.describe("Search"),
        other => format!("Search failed: error {}", other.code()),
    }
}

async fn save_demo_contact(client: &ContactsClient) -> String {
    let contact = Contact::new()
        .with_display_name(DEMO_CONTACT)
        .with_phone_number(ContactField::new("work", "8840926059", false))
        .with_phone_number(ContactField::new("mobile", "7304121104", true));

    match client.save(&contact).await {
        Ok(_) => "Save Success".to_string(),
        Err(e) => format!("Error = {}", e.code()),
    }
}

async fn find_demo_contacts(client: &ContactsClient, filter: &str) -> String {
    let options = ContactFindOptions::new()
        .with_filter(filter)
        .multiple(true)
        .with_desired_fields([FieldType::ID])
        .has_phone_number(true);

    match client
        .find(&[FieldType::DISPLAY_NAME, FieldType::NAME], &options)
        .await
    {
        Ok(contacts) => format!("Found {} contacts.", contacts.len()),
        Err(e) => format!("Error = {}", e.code()),
    }
}

async fn delete_contact(client: &ContactsClient, filter: &str) -> String {
    let options = ContactFindOptions::new().with_filter(filter);
    let contacts = match client.find(&[FieldType::DISPLAY_NAME], &options).await {
        Ok(contacts) => contacts,
        Err(e) => return format!("Failed because: {}", e),
    };

    let Some(contact) = contacts.first() else {
        return format!("Failed because: no contact matches {:?}", filter);
    };
    match client.remove(contact).await {
        Ok(()) => "Contact Deleted".to_string(),
        Err(e) => format!("Failed because: {}", e),
    }
}

/// Short human label for a contact
pub fn label(contact: &Contact) -> String {
    contact
        .name
        .as_ref()
        .and_then(|n| n.formatted.clone())
        .or_else(|| contact.display_name.clone())
        .map(|name| name.replace('\n', " "))
        .unwrap_or_else(|| "(No Name)".to_string())
}

fn first_value(fields: &Option<Vec<ContactField>>) -> &str {
    fields
        .as_ref()
        .and_then(|f| f.first())
        .and_then(|f| f.value.as_deref())
        .unwrap_or("")
}

const LIST_FIELDS: [&str; 6] = [
    FieldType::DISPLAY_NAME,
    FieldType::NAME,
    FieldType::PHONE_NUMBERS,
    FieldType::EMAILS,
    FieldType::URLS,
    FieldType::NOTE,
];

async fn list_contacts(client: &ContactsClient, filter: Option<&str>) -> String {
    let options = ContactFindOptions::new()
        .with_filter(filter.unwrap_or_default())
        .multiple(true);

    let contacts = match client.find(&LIST_FIELDS, &options).await {
        Ok(contacts) => contacts,
        Err(e) => return search_failed(e),
    };
    if contacts.is_empty() {
        return "No contacts found".to_string();
    }

    let mut out = format!("Number of contacts: {}\n", contacts.len());
    out.push_str(&format!("{:<28} {:<18} {}\n", "Name", "Phone", "Email"));
    for contact in &contacts {
        out.push_str(&format!(
            "{:<28} {:<18} {}\n",
            label(contact),
            first_value(&contact.phone_numbers),
            first_value(&contact.emails)
        ));
    }
    out.trim_end().to_string()
}

async fn show_contacts(client: &ContactsClient, filter: Option<&str>) -> String {
    let options = ContactFindOptions::new()
        .with_filter(filter.unwrap_or_default())
        .multiple(true);

    match client.find(&[FieldType::ALL], &options).await {
        Ok(contacts) => serde_json::to_string_pretty(&contacts)
            .unwrap_or_else(|e| format!("Failed to render contacts: {}", e)),
        Err(e) => search_failed(e),
    }
}

async fn pick_contact(client: &ContactsClient) -> String {
    match client.pick_contact().await {
        Ok(Some(contact)) => match serde_json::to_string_pretty(&contact) {
            Ok(json) => format!("Picked contact: {}", json),
            Err(e) => format!("Failed to render contact: {}", e),
        },
        Ok(None) => "No contacts found".to_string(),
        Err(ContactError::NotSupported) => "Searching for contacts is not supported.".to_string(),
        Err(ContactError::OperationCancelled) => "Pick cancelled".to_string(),
        Err(e) => format!("Pick failed: error {}", e.code()),
    }
}

async fn add_sample(
    client: &ContactsClient,
    mut properties: serde_json::Value,
    phone_number: Option<&str>,
) -> String {
    properties["note"] = json!(SAMPLE_TAG);
    let display_name = properties["displayName"]
        .as_str()
        .map(|s| s.replace('\n', " "))
        .unwrap_or_else(|| "Nameless contact".to_string());

    let mut contact = match client.create(properties) {
        Ok(contact) => contact,
        Err(e) => return format!("Contact save failed: error {}", e.code()),
    };
    if let Some(number) = phone_number {
        contact = contact.with_phone_number(ContactField::new("work", number, true));
    }

    match client.save(&contact).await {
        Ok(_) => format!("{} saved.", display_name),
        Err(ContactError::NotSupported) => "Saving contacts not supported.".to_string(),
        Err(e) => format!("Contact save failed: error {}", e.code()),
    }
}

async fn rename_sample(client: &ContactsClient) -> String {
    let options = ContactFindOptions::new().with_filter(SAMPLE_NAME);
    let contacts = match client
        .find(&[FieldType::DISPLAY_NAME, FieldType::NAME], &options)
        .await
    {
        Ok(contacts) => contacts,
        Err(e) => return search_failed(e),
    };

    let Some(mut contact) = contacts.into_iter().next() else {
        return "No contacts to update.".to_string();
    };
    contact.display_name = Some("Urist McContact".to_string());
    contact.name = Some(
        ContactName::new()
            .with_given_name("Urist")
            .with_family_name("McContact"),
    );

    match client.save(&contact).await {
        Ok(_) => "Contact updated.".to_string(),
        Err(e) => format!("Update failed: error {}", e.code()),
    }
}

async fn remove_samples(client: &ContactsClient) -> String {
    let report = match client.remove_matching(&[FieldType::NOTE], SAMPLE_TAG).await {
        Ok(report) => report,
        Err(e) => return search_failed(e),
    };
    if report.attempted() == 0 {
        return "No contacts to remove".to_string();
    }

    let removed = report
        .removed
        .iter()
        .map(|id| format!("Removed a contact with ID {}", id));
    let failed = report
        .failed
        .iter()
        .map(|(id, _)| format!("Failed to remove a contact with ID {}", id));
    removed.chain(failed).collect::<Vec<_>>().join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use cx_contacts::{FixedPicker, UnsupportedStore};
    use std::sync::Arc;

    fn client() -> ContactsClient {
        ContactsClient::new(Arc::new(MemoryContactStore::new()))
    }

    #[test]
    fn test_parse() {
        assert_eq!(Command::parse("save", ""), Some(Command::Save));
        assert_eq!(
            Command::parse("find", ""),
            Some(Command::Find(DEMO_CONTACT.to_string()))
        );
        assert_eq!(
            Command::parse("DELETE", " Bob "),
            Some(Command::Delete("Bob".to_string()))
        );
        assert_eq!(Command::parse("list", ""), Some(Command::List(None)));
        assert_eq!(Command::parse("add-unicode", ""), Some(Command::AddUnicode));
        assert_eq!(Command::parse("frobnicate", ""), None);
    }

    #[test]
    fn test_label() {
        assert_eq!(label(&Contact::new()), "(No Name)");
        assert_eq!(label(&Contact::new().with_display_name("A\nB")), "A B");
        let named = Contact::new()
            .with_display_name("Display")
            .with_name(ContactName::new().with_formatted("Formatted"));
        assert_eq!(label(&named), "Formatted");
    }

    #[tokio::test]
    async fn test_save_find_delete() {
        let client = client();
        assert_eq!(run(&client, Command::Save).await, "Save Success");
        assert_eq!(
            run(&client, Command::Find(DEMO_CONTACT.to_string())).await,
            "Found 1 contacts."
        );
        assert_eq!(
            run(&client, Command::Delete(DEMO_CONTACT.to_string())).await,
            "Contact Deleted"
        );
        assert_eq!(
            run(&client, Command::Find(DEMO_CONTACT.to_string())).await,
            "Found 0 contacts."
        );
        assert!(
            run(&client, Command::Delete(DEMO_CONTACT.to_string()))
                .await
                .starts_with("Failed because:")
        );
    }

    #[tokio::test]
    async fn test_samples_rename_and_cleanup() {
        let client = client();
        assert_eq!(run(&client, Command::Add).await, "Dooney Evans saved.");
        assert_eq!(run(&client, Command::AddNameless).await, "Nameless contact saved.");
        assert_eq!(
            run(&client, Command::AddUnicode).await,
            "Н€йромонах  ФеофаЊ saved."
        );

        let listing = run(&client, Command::List(None)).await;
        assert!(listing.starts_with("Number of contacts: 3"));
        assert!(listing.contains("512-555-1234"));
        assert!(listing.contains("(No Name)"));

        assert_eq!(run(&client, Command::Rename).await, "Contact updated.");
        assert_eq!(run(&client, Command::Rename).await, "No contacts to update.");
        let renamed = run(&client, Command::Show(Some("Urist".to_string()))).await;
        assert!(renamed.contains("McContact"));
        assert!(renamed.contains(SAMPLE_TAG));

        let cleanup = run(&client, Command::Cleanup).await;
        assert_eq!(cleanup.lines().count(), 3);
        assert!(cleanup.lines().all(|l| l.starts_with("Removed a contact with ID")));
        assert_eq!(run(&client, Command::Cleanup).await, "No contacts to remove");
    }

    #[tokio::test]
    async fn test_unsupported_messages() {
        let client = ContactsClient::new(Arc::new(UnsupportedStore))
            .with_picker(Arc::new(FixedPicker::cancelling()));
        assert_eq!(run(&client, Command::Save).await, "Error = 5");
        assert_eq!(
            run(&client, Command::List(None)).await,
            "Searching for contacts is not supported."
        );
        assert_eq!(
            run(&client, Command::Pick).await,
            "Searching for contacts is not supported."
        );
        assert_eq!(run(&client, Command::Add).await, "Saving contacts not supported.");
    }

    #[tokio::test]
    async fn test_pick() {
        let client = client().with_picker(Arc::new(FixedPicker::cancelling()));
        assert_eq!(run(&client, Command::Pick).await, "No contacts found");
        run(&client, Command::Save).await;
        assert_eq!(run(&client, Command::Pick).await, "Pick cancelled");
    }
}
