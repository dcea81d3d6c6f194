//! Search options and field names

use serde::{Deserialize, Serialize};

/// Field names understood by `find`.
///
/// The vocabulary is open: names not listed here are accepted and ignored.
pub struct FieldType;

impl FieldType {
    pub const ID: &'static str = "id";
    pub const DISPLAY_NAME: &'static str = "displayName";
    pub const NAME: &'static str = "name";
    pub const NICKNAME: &'static str = "nickname";
    pub const PHONE_NUMBERS: &'static str = "phoneNumbers";
    pub const EMAILS: &'static str = "emails";
    pub const ADDRESSES: &'static str = "addresses";
    pub const IMS: &'static str = "ims";
    pub const ORGANIZATIONS: &'static str = "organizations";
    pub const BIRTHDAY: &'static str = "birthday";
    pub const NOTE: &'static str = "note";
    pub const PHOTOS: &'static str = "photos";
    pub const CATEGORIES: &'static str = "categories";
    pub const URLS: &'static str = "urls";
    pub const GENDER: &'static str = "gender";
    /// Matches every field
    pub const ALL: &'static str = "*";

    /// Every concrete field name
    pub const KNOWN: [&'static str; 15] = [
        Self::ID,
        Self::DISPLAY_NAME,
        Self::NAME,
        Self::NICKNAME,
        Self::PHONE_NUMBERS,
        Self::EMAILS,
        Self::ADDRESSES,
        Self::IMS,
        Self::ORGANIZATIONS,
        Self::BIRTHDAY,
        Self::NOTE,
        Self::PHOTOS,
        Self::CATEGORIES,
        Self::URLS,
        Self::GENDER,
    ];
}

/// Options controlling a `find` call
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactFindOptions {
    /// Case-insensitive substring searched for in the requested fields.
    /// Empty matches every contact.
    pub filter: String,
    /// Return every match instead of at most one
    pub multiple: bool,
    /// Fields to keep in the returned contacts; `id` is always kept
    pub desired_fields: Option<Vec<String>>,
    /// Only return contacts that have at least one phone number
    pub has_phone_number: bool,
}

impl ContactFindOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    pub fn multiple(mut self, multiple: bool) -> Self {
        self.multiple = multiple;
        self
    }

    pub fn with_desired_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.desired_fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn has_phone_number(mut self, required: bool) -> Self {
        self.has_phone_number = required;
        self
    }
}
