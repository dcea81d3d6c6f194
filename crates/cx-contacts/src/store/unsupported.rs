//! Store for platforms without a contacts capability

use async_trait::async_trait;

use crate::error::ContactError;
use crate::models::Contact;
use crate::options::ContactFindOptions;
use crate::store::ContactStore;
use crate::Result;

/// Every operation fails with `NotSupported`
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedStore;

#[async_trait]
impl ContactStore for UnsupportedStore {
    fn name(&self) -> &str {
        "unsupported"
    }

    async fn check_access(&self) -> Result<()> {
        Err(ContactError::NotSupported)
    }

    async fn search(&self, _fields: &[String], _options: &ContactFindOptions) -> Result<Vec<Contact>> {
        Err(ContactError::NotSupported)
    }

    async fn list(&self) -> Result<Vec<Contact>> {
        Err(ContactError::NotSupported)
    }

    async fn insert(&self, _contact: Contact) -> Result<Contact> {
        Err(ContactError::NotSupported)
    }

    async fn update(&self, _contact: Contact) -> Result<Contact> {
        Err(ContactError::NotSupported)
    }

    async fn delete(&self, _id: &str) -> Result<()> {
        Err(ContactError::NotSupported)
    }
}
