//! In-process contact store

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::config::AccessPolicy;
use crate::error::ContactError;
use crate::models::Contact;
use crate::options::ContactFindOptions;
use crate::query;
use crate::store::ContactStore;
use crate::Result;

/// Contact store kept in memory, in insertion order
pub struct MemoryContactStore {
    records: RwLock<Vec<Contact>>,
    access: AccessPolicy,
}

impl MemoryContactStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            access: AccessPolicy::Granted,
        }
    }

    pub fn with_access(mut self, access: AccessPolicy) -> Self {
        self.access = access;
        self
    }

    /// Number of stored contacts
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

impl Default for MemoryContactStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContactStore for MemoryContactStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn check_access(&self) -> Result<()> {
        match self.access {
            AccessPolicy::Granted => Ok(()),
            AccessPolicy::Denied => Err(ContactError::PermissionDenied),
        }
    }

    async fn search(&self, fields: &[String], options: &ContactFindOptions) -> Result<Vec<Contact>> {
        let records = self.records.read().await;
        Ok(query::run(records.iter().cloned(), fields, options))
    }

    async fn list(&self) -> Result<Vec<Contact>> {
        Ok(self.records.read().await.clone())
    }

    async fn insert(&self, mut contact: Contact) -> Result<Contact> {
        contact.id = Some(uuid::Uuid::new_v4().to_string());
        self.records.write().await.push(contact.clone());
        debug!("Inserted contact {:?}", contact.id);
        Ok(contact)
    }

    async fn update(&self, contact: Contact) -> Result<Contact> {
        let mut records = self.records.write().await;
        let slot = records
            .iter_mut()
            .find(|c| c.id.is_some() && c.id == contact.id)
            .ok_or(ContactError::Unknown)?;
        *slot = contact.clone();
        Ok(contact)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|c| c.id.as_deref() != Some(id));
        if records.len() == before {
            return Err(ContactError::Unknown);
        }
        debug!("Deleted contact {}", id);
        Ok(())
    }
}
