//! Data models for contacts

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, SecondsFormat};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value as JsonValue;

use crate::error::{ContactError, Result};

/// A contact record as seen by the client.
///
/// Collections are `None` when the contact has no entries of that kind,
/// which is also how the store reports them back.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Contact {
    /// Store-assigned identity, `None` until the contact has been saved
    #[serde(deserialize_with = "coerce_scalar")]
    pub id: Option<String>,
    pub display_name: Option<String>,
    pub name: Option<ContactName>,
    pub nickname: Option<String>,
    pub phone_numbers: Option<Vec<ContactField>>,
    pub emails: Option<Vec<ContactField>>,
    pub addresses: Option<Vec<ContactAddress>>,
    pub ims: Option<Vec<ContactField>>,
    pub organizations: Option<Vec<ContactOrganization>>,
    /// Date or timestamp, passed through the store untouched
    pub birthday: Option<Birthday>,
    pub note: Option<String>,
    pub photos: Option<Vec<ContactField>>,
    pub categories: Option<Vec<ContactField>>,
    pub urls: Option<Vec<ContactField>>,
    pub gender: Option<String>,
}

impl Contact {
    /// Create an empty, unsaved contact
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an unsaved contact from a JSON property bag.
    ///
    /// Keys use the camelCase names of the contact API (`displayName`,
    /// `phoneNumbers`, ...). Unknown keys are ignored. Any `id` in the bag is
    /// discarded: only the store hands out identities.
    pub fn from_properties(properties: JsonValue) -> Result<Self> {
        if !properties.is_object() {
            return Err(ContactError::InvalidArgument);
        }
        let mut contact: Contact =
            serde_json::from_value(properties).map_err(|_| ContactError::InvalidArgument)?;
        contact.id = None;
        Ok(contact)
    }

    /// Attach an identity, for contacts known to exist in a store
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn with_name(mut self, name: ContactName) -> Self {
        self.name = Some(name);
        self
    }

    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = Some(nickname.into());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn with_gender(mut self, gender: impl Into<String>) -> Self {
        self.gender = Some(gender.into());
        self
    }

    pub fn with_birthday(mut self, birthday: impl Into<Birthday>) -> Self {
        self.birthday = Some(birthday.into());
        self
    }

    /// Append a phone number
    pub fn with_phone_number(mut self, field: ContactField) -> Self {
        self.phone_numbers.get_or_insert_with(Vec::new).push(field);
        self
    }

    /// Append an email address
    pub fn with_email(mut self, field: ContactField) -> Self {
        self.emails.get_or_insert_with(Vec::new).push(field);
        self
    }

    pub fn with_im(mut self, field: ContactField) -> Self {
        self.ims.get_or_insert_with(Vec::new).push(field);
        self
    }

    pub fn with_url(mut self, field: ContactField) -> Self {
        self.urls.get_or_insert_with(Vec::new).push(field);
        self
    }

    pub fn with_address(mut self, address: ContactAddress) -> Self {
        self.addresses.get_or_insert_with(Vec::new).push(address);
        self
    }

    pub fn with_organization(mut self, organization: ContactOrganization) -> Self {
        self.organizations
            .get_or_insert_with(Vec::new)
            .push(organization);
        self
    }

    /// Whether the contact carries a store identity
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Whether at least one phone number is present
    pub fn has_phone_number(&self) -> bool {
        self.phone_numbers.as_ref().is_some_and(|p| !p.is_empty())
    }

    /// Deep copy that is detached from the store.
    ///
    /// The copy has no identity, and neither do any of its nested field
    /// records, so saving it inserts a new contact.
    pub fn duplicate(&self) -> Contact {
        let mut copy = self.clone();
        copy.id = None;
        for list in [
            &mut copy.phone_numbers,
            &mut copy.emails,
            &mut copy.ims,
            &mut copy.photos,
            &mut copy.categories,
            &mut copy.urls,
        ]
        .into_iter()
        .flatten()
        {
            list.iter_mut().for_each(|f| f.id = None);
        }
        if let Some(addresses) = copy.addresses.as_mut() {
            addresses.iter_mut().for_each(|a| a.id = None);
        }
        if let Some(organizations) = copy.organizations.as_mut() {
            organizations.iter_mut().for_each(|o| o.id = None);
        }
        copy
    }

    /// Drop list entries with no content; lists left empty become `None`.
    pub(crate) fn normalize(&mut self) {
        for list in [
            &mut self.phone_numbers,
            &mut self.emails,
            &mut self.ims,
            &mut self.photos,
            &mut self.categories,
            &mut self.urls,
        ] {
            prune(list, |f| !f.is_blank());
        }
        prune(&mut self.addresses, |a| !a.is_blank());
        prune(&mut self.organizations, |o| !o.is_blank());
    }
}

fn prune<T>(list: &mut Option<Vec<T>>, keep: impl Fn(&T) -> bool) {
    if let Some(items) = list.as_mut() {
        items.retain(|item| keep(item));
        if items.is_empty() {
            *list = None;
        }
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}

/// Structured name of a contact
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactName {
    pub formatted: Option<String>,
    pub family_name: Option<String>,
    pub given_name: Option<String>,
    pub middle_name: Option<String>,
    pub honorific_prefix: Option<String>,
    pub honorific_suffix: Option<String>,
}

impl ContactName {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_formatted(mut self, formatted: impl Into<String>) -> Self {
        self.formatted = Some(formatted.into());
        self
    }

    pub fn with_family_name(mut self, family_name: impl Into<String>) -> Self {
        self.family_name = Some(family_name.into());
        self
    }

    pub fn with_given_name(mut self, given_name: impl Into<String>) -> Self {
        self.given_name = Some(given_name.into());
        self
    }

    pub fn with_middle_name(mut self, middle_name: impl Into<String>) -> Self {
        self.middle_name = Some(middle_name.into());
        self
    }

    pub fn with_honorific_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.honorific_prefix = Some(prefix.into());
        self
    }

    pub fn with_honorific_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.honorific_suffix = Some(suffix.into());
        self
    }

    pub(crate) fn parts(&self) -> impl Iterator<Item = &str> {
        [
            &self.formatted,
            &self.family_name,
            &self.given_name,
            &self.middle_name,
            &self.honorific_prefix,
            &self.honorific_suffix,
        ]
        .into_iter()
        .filter_map(|p| p.as_deref())
    }
}

/// Generic labelled value: phone number, email, IM handle, URL, photo or category.
///
/// The label is free text and is stored as given.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactField {
    #[serde(deserialize_with = "coerce_scalar")]
    pub id: Option<String>,
    #[serde(rename = "type", deserialize_with = "coerce_scalar")]
    pub field_type: Option<String>,
    #[serde(deserialize_with = "coerce_scalar")]
    pub value: Option<String>,
    pub pref: bool,
}

impl ContactField {
    /// Create a field; label and value are converted to strings
    pub fn new(field_type: impl ToString, value: impl ToString, pref: bool) -> Self {
        Self {
            id: None,
            field_type: Some(field_type.to_string()),
            value: Some(value.to_string()),
            pref,
        }
    }

    fn is_blank(&self) -> bool {
        is_blank(&self.value)
    }
}

/// Postal address
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactAddress {
    #[serde(deserialize_with = "coerce_scalar")]
    pub id: Option<String>,
    pub pref: bool,
    #[serde(rename = "type", deserialize_with = "coerce_scalar")]
    pub field_type: Option<String>,
    pub formatted: Option<String>,
    pub street_address: Option<String>,
    pub locality: Option<String>,
    pub region: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

impl ContactAddress {
    /// Create an empty address with the given label
    pub fn new(field_type: impl ToString) -> Self {
        Self {
            field_type: Some(field_type.to_string()),
            ..Default::default()
        }
    }

    pub fn preferred(mut self, pref: bool) -> Self {
        self.pref = pref;
        self
    }

    pub fn with_formatted(mut self, formatted: impl Into<String>) -> Self {
        self.formatted = Some(formatted.into());
        self
    }

    pub fn with_street_address(mut self, street: impl Into<String>) -> Self {
        self.street_address = Some(street.into());
        self
    }

    pub fn with_locality(mut self, locality: impl Into<String>) -> Self {
        self.locality = Some(locality.into());
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_postal_code(mut self, postal_code: impl Into<String>) -> Self {
        self.postal_code = Some(postal_code.into());
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub(crate) fn parts(&self) -> impl Iterator<Item = &str> {
        [
            &self.formatted,
            &self.street_address,
            &self.locality,
            &self.region,
            &self.postal_code,
            &self.country,
        ]
        .into_iter()
        .filter_map(|p| p.as_deref())
    }

    fn is_blank(&self) -> bool {
        self.parts().all(str::is_empty)
    }
}

/// Organization membership
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactOrganization {
    #[serde(deserialize_with = "coerce_scalar")]
    pub id: Option<String>,
    pub pref: bool,
    #[serde(rename = "type", deserialize_with = "coerce_scalar")]
    pub field_type: Option<String>,
    pub name: Option<String>,
    pub department: Option<String>,
    pub title: Option<String>,
}

impl ContactOrganization {
    pub fn new(field_type: impl ToString) -> Self {
        Self {
            field_type: Some(field_type.to_string()),
            ..Default::default()
        }
    }

    pub fn preferred(mut self, pref: bool) -> Self {
        self.pref = pref;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub(crate) fn parts(&self) -> impl Iterator<Item = &str> {
        [&self.name, &self.department, &self.title]
            .into_iter()
            .filter_map(|p| p.as_deref())
    }

    fn is_blank(&self) -> bool {
        self.parts().all(str::is_empty)
    }
}

/// A birthday as it was supplied.
///
/// JSON carries either a calendar date (`1976-08-04`) or an RFC 3339
/// timestamp (`1976-08-04T10:30:00+05:30`). Timestamps keep their offset
/// and sub-second part; nothing is converted to UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Birthday {
    Date(NaiveDate),
    Timestamp(DateTime<FixedOffset>),
}

impl Birthday {
    /// Calendar date in the birthday's own offset
    pub fn date(&self) -> NaiveDate {
        match self {
            Birthday::Date(date) => *date,
            Birthday::Timestamp(ts) => ts.date_naive(),
        }
    }
}

impl From<NaiveDate> for Birthday {
    fn from(date: NaiveDate) -> Self {
        Birthday::Date(date)
    }
}

impl From<DateTime<FixedOffset>> for Birthday {
    fn from(ts: DateTime<FixedOffset>) -> Self {
        Birthday::Timestamp(ts)
    }
}

impl FromStr for Birthday {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            Ok(date) => Ok(Birthday::Date(date)),
            Err(_) => DateTime::parse_from_rfc3339(s).map(Birthday::Timestamp),
        }
    }
}

impl fmt::Display for Birthday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Birthday::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            Birthday::Timestamp(ts) => f.write_str(&ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
        }
    }
}

impl Serialize for Birthday {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Birthday {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse()
            .map_err(|e| D::Error::custom(format!("invalid birthday {:?}: {}", raw, e)))
    }
}

/// Accept any JSON scalar where a string is expected
fn coerce_scalar<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<JsonValue>::deserialize(deserializer)? {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::String(s)) => Ok(Some(s)),
        Some(JsonValue::Number(n)) => Ok(Some(n.to_string())),
        Some(JsonValue::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(D::Error::custom(format!("expected a scalar, found {}", other))),
    }
}
