//! Contact store trait
//!
//! A store is the persistence service behind the client. It owns identity
//! assignment and record storage; query semantics live in [`crate::query`].

use async_trait::async_trait;

use crate::models::Contact;
use crate::options::ContactFindOptions;
use crate::Result;

/// Backend that persists contacts.
///
/// Every method resolves exactly once with either a value or a
/// [`crate::ContactError`]. Implementations serialise access to their own
/// state; callers get no ordering guarantee between concurrent calls.
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// Short backend name used in logs
    fn name(&self) -> &str;

    /// Fail with `PermissionDenied` or `NotSupported` when the store cannot be used
    async fn check_access(&self) -> Result<()> {
        Ok(())
    }

    /// Evaluate a query against every record, in insertion order
    async fn search(&self, fields: &[String], options: &ContactFindOptions) -> Result<Vec<Contact>>;

    /// All records, in insertion order
    async fn list(&self) -> Result<Vec<Contact>>;

    /// Store a new record and return it with its freshly assigned id
    async fn insert(&self, contact: Contact) -> Result<Contact>;

    /// Replace the record carrying `contact.id`.
    ///
    /// Fails with `Unknown` if the contact has no id or no such record exists.
    async fn update(&self, contact: Contact) -> Result<Contact>;

    /// Delete a record; fails with `Unknown` if it does not exist
    async fn delete(&self, id: &str) -> Result<()>;
}
