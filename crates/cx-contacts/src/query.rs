//! Query evaluation shared by every store backend
//!
//! A store hands its records, in insertion order, to [`run`]; the result is
//! filtered, truncated and projected according to the find options.

use crate::models::Contact;
use crate::options::{ContactFindOptions, FieldType};

/// Apply `fields` / `options` to a sequence of records
pub fn run<I>(records: I, fields: &[String], options: &ContactFindOptions) -> Vec<Contact>
where
    I: IntoIterator<Item = Contact>,
{
    let needle = options.filter.to_lowercase();
    let limit = if options.multiple { usize::MAX } else { 1 };

    records
        .into_iter()
        .filter(|c| !options.has_phone_number || c.has_phone_number())
        .filter(|c| matches(c, fields, &needle))
        .take(limit)
        .map(|c| project(c, options.desired_fields.as_deref()))
        .collect()
}

/// Whether any of the named fields contains `needle` (already lowercased)
pub fn matches(contact: &Contact, fields: &[String], needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    let wildcard = fields.iter().any(|f| f == FieldType::ALL);
    let names: Vec<&str> = if wildcard {
        FieldType::KNOWN.to_vec()
    } else {
        fields.iter().map(String::as_str).collect()
    };

    names
        .into_iter()
        .flat_map(|name| field_values(contact, name))
        .any(|value| value.to_lowercase().contains(needle))
}

/// Searchable text of one field; unknown names yield nothing
fn field_values(contact: &Contact, name: &str) -> Vec<String> {
    fn list(fields: &Option<Vec<crate::models::ContactField>>) -> Vec<String> {
        fields
            .iter()
            .flatten()
            .filter_map(|f| f.value.clone())
            .collect()
    }

    match name {
        FieldType::ID => contact.id.iter().cloned().collect(),
        FieldType::DISPLAY_NAME => contact.display_name.iter().cloned().collect(),
        FieldType::NAME => contact
            .name
            .iter()
            .flat_map(|n| n.parts().map(str::to_string).collect::<Vec<_>>())
            .collect(),
        FieldType::NICKNAME => contact.nickname.iter().cloned().collect(),
        FieldType::NOTE => contact.note.iter().cloned().collect(),
        FieldType::GENDER => contact.gender.iter().cloned().collect(),
        FieldType::BIRTHDAY => contact.birthday.iter().map(|d| d.to_string()).collect(),
        FieldType::PHONE_NUMBERS => list(&contact.phone_numbers),
        FieldType::EMAILS => list(&contact.emails),
        FieldType::IMS => list(&contact.ims),
        FieldType::URLS => list(&contact.urls),
        FieldType::PHOTOS => list(&contact.photos),
        FieldType::CATEGORIES => list(&contact.categories),
        FieldType::ADDRESSES => contact
            .addresses
            .iter()
            .flatten()
            .flat_map(|a| a.parts().map(str::to_string).collect::<Vec<_>>())
            .collect(),
        FieldType::ORGANIZATIONS => contact
            .organizations
            .iter()
            .flatten()
            .flat_map(|o| o.parts().map(str::to_string).collect::<Vec<_>>())
            .collect(),
        _ => Vec::new(),
    }
}

/// Keep `id` and the desired fields; `None` or empty keeps everything
pub fn project(contact: Contact, desired: Option<&[String]>) -> Contact {
    let Some(desired) = desired.filter(|d| !d.is_empty()) else {
        return contact;
    };
    if desired.iter().any(|f| f == FieldType::ALL) {
        return contact;
    }
    let wants = |name: &str| desired.iter().any(|f| f == name);

    let mut projected = Contact {
        id: contact.id.clone(),
        ..Contact::default()
    };
    if wants(FieldType::DISPLAY_NAME) {
        projected.display_name = contact.display_name;
    }
    if wants(FieldType::NAME) {
        projected.name = contact.name;
    }
    if wants(FieldType::NICKNAME) {
        projected.nickname = contact.nickname;
    }
    if wants(FieldType::PHONE_NUMBERS) {
        projected.phone_numbers = contact.phone_numbers;
    }
    if wants(FieldType::EMAILS) {
        projected.emails = contact.emails;
    }
    if wants(FieldType::ADDRESSES) {
        projected.addresses = contact.addresses;
    }
    if wants(FieldType::IMS) {
        projected.ims = contact.ims;
    }
    if wants(FieldType::ORGANIZATIONS) {
        projected.organizations = contact.organizations;
    }
    if wants(FieldType::BIRTHDAY) {
        projected.birthday = contact.birthday;
    }
    if wants(FieldType::NOTE) {
        projected.note = contact.note;
    }
    if wants(FieldType::PHOTOS) {
        projected.photos = contact.photos;
    }
    if wants(FieldType::CATEGORIES) {
        projected.categories = contact.categories;
    }
    if wants(FieldType::URLS) {
        projected.urls = contact.urls;
    }
    if wants(FieldType::GENDER) {
        projected.gender = contact.gender;
    }
    projected
}
