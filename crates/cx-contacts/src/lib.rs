//! cx-contacts: asynchronous access to a device address book
//!
//! This crate lets an application create, find, update and remove contact
//! records held in a contact store.
//!
//! ## Features
//!
//! - Find contacts by case-insensitive substring over chosen fields
//! - Insert and full-replace updates with server-assigned ids
//! - Interactive selection through a pluggable [`ContactPicker`]
//! - SQLite, in-memory and "unsupported platform" store backends
//! - Callback entry points alongside the `async` API
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use cx_contacts::prelude::*;
//!
//! let store = Arc::new(SqliteContactStore::new("data/contacts.db")?);
//! let client = ContactsClient::new(store);
//!
//! // Save a new contact
//! let contact = Contact::new()
//!     .with_display_name("Cordova Contact")
//!     .with_phone_number(ContactField::new("work", "8840926059", false));
//! let saved = client.save(&contact).await?;
//!
//! // Find it again
//! let options = ContactFindOptions::new()
//!     .with_filter("Cordova Contact")
//!     .multiple(true);
//! let found = client
//!     .find(&[FieldType::DISPLAY_NAME, FieldType::NAME], &options)
//!     .await?;
//!
//! // Remove it
//! client.remove(&saved).await?;
//! ```

pub mod callback;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod options;
pub mod picker;
pub mod query;
pub mod store;

pub use client::{ContactsClient, RemovalReport};
pub use config::{AccessPolicy, ContactsConfig, StoreKind};
pub use error::{ConfigError, ContactError, ContractViolation, Result, StoreError};
pub use models::{
    Birthday, Contact, ContactAddress, ContactField, ContactName, ContactOrganization,
};
pub use options::{ContactFindOptions, FieldType};
pub use picker::{ContactPicker, FixedPicker, PickOutcome};
pub use store::{ContactStore, MemoryContactStore, SqliteContactStore, UnsupportedStore};

/// Commonly used types
pub mod prelude {
    pub use crate::client::{ContactsClient, RemovalReport};
    pub use crate::config::ContactsConfig;
    pub use crate::error::{ContactError, Result};
    pub use crate::models::{
        Birthday, Contact, ContactAddress, ContactField, ContactName, ContactOrganization,
    };
    pub use crate::options::{ContactFindOptions, FieldType};
    pub use crate::picker::{ContactPicker, PickOutcome};
    pub use crate::store::{ContactStore, MemoryContactStore, SqliteContactStore};
}
