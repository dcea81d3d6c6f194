//! Contact repository client

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value as JsonValue;
use tracing::{debug, info, warn};

use crate::config::ContactsConfig;
use crate::error::{ContactError, Result};
use crate::models::Contact;
use crate::options::ContactFindOptions;
use crate::picker::{ContactPicker, PickOutcome};
use crate::store::ContactStore;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for find / save / remove operations against a contact store.
///
/// The client keeps no state of its own besides its collaborators: every
/// call goes straight to the store and resolves exactly once. Calls on the
/// same contact issued concurrently complete in no particular order, so
/// await one before issuing the next when order matters.
#[derive(Clone)]
pub struct ContactsClient {
    store: Arc<dyn ContactStore>,
    picker: Option<Arc<dyn ContactPicker>>,
    timeout: Option<Duration>,
}

/// Outcome of [`ContactsClient::remove_matching`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovalReport {
    /// Ids removed, in removal order
    pub removed: Vec<String>,
    /// Ids that could not be removed and why
    pub failed: Vec<(String, ContactError)>,
}

impl RemovalReport {
    /// Number of contacts looked at
    pub fn attempted(&self) -> usize {
        self.removed.len() + self.failed.len()
    }
}

impl ContactsClient {
    /// Create a client over the given store
    pub fn new(store: Arc<dyn ContactStore>) -> Self {
        Self {
            store,
            picker: None,
            timeout: Some(DEFAULT_TIMEOUT),
        }
    }

    /// Open the configured store and build a client for it
    pub fn from_config(config: &ContactsConfig) -> Result<Self> {
        let store = config.open_store()?;
        Ok(Self::new(store).with_timeout(config.operation_timeout()))
    }

    /// Attach the picker used by [`pick_contact`](Self::pick_contact)
    pub fn with_picker(mut self, picker: Arc<dyn ContactPicker>) -> Self {
        self.picker = Some(picker);
        self
    }

    /// Bound every store call; `None` waits indefinitely
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn store(&self) -> &Arc<dyn ContactStore> {
        &self.store
    }

    async fn bounded<T, F>(&self, operation: &str, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, fut).await.map_err(|_| {
                warn!("{} timed out after {:?}", operation, limit);
                ContactError::Timeout
            })?,
            None => fut.await,
        }
    }

    /// Find contacts whose `fields` contain `options.filter`.
    ///
    /// An empty `fields` slice is rejected with `InvalidArgument` before the
    /// store is consulted. The result is a snapshot; an empty list is a
    /// successful answer.
    pub async fn find<S: AsRef<str>>(
        &self,
        fields: &[S],
        options: &ContactFindOptions,
    ) -> Result<Vec<Contact>> {
        if fields.is_empty() {
            warn!("find called without any fields");
            return Err(ContactError::InvalidArgument);
        }
        let fields: Vec<String> = fields.iter().map(|f| f.as_ref().to_string()).collect();

        debug!("Finding contacts in {:?} matching {:?}", fields, options.filter);
        let found = self
            .bounded("find", async {
                self.store.check_access().await?;
                self.store.search(&fields, options).await
            })
            .await?;

        info!("Found {} contacts", found.len());
        Ok(found)
    }

    /// Build an unsaved contact from a JSON property bag; never touches the store
    pub fn create(&self, properties: JsonValue) -> Result<Contact> {
        Contact::from_properties(properties)
    }

    /// Insert or update a contact.
    ///
    /// Without an id the contact is inserted and the returned copy carries the
    /// new id. With an id the stored record is replaced by this one: anything
    /// missing here is cleared in the store. List entries with an empty value
    /// are dropped before writing.
    pub async fn save(&self, contact: &Contact) -> Result<Contact> {
        let mut record = contact.clone();
        record.normalize();

        let saved = self
            .bounded("save", async {
                self.store.check_access().await?;
                if record.id.is_some() {
                    self.store.update(record).await
                } else {
                    self.store.insert(record).await
                }
            })
            .await?;

        info!("Saved contact: {:?}", saved.id);
        Ok(saved)
    }

    /// Remove a stored contact.
    ///
    /// Fails with `Unknown` when the contact has no id or the store has no
    /// record for it. The caller's value keeps its id; it must not be reused.
    pub async fn remove(&self, contact: &Contact) -> Result<()> {
        let Some(id) = contact.id.as_deref() else {
            debug!("remove called on an unsaved contact");
            return Err(ContactError::Unknown);
        };

        self.bounded("remove", async {
            self.store.check_access().await?;
            self.store.delete(id).await
        })
        .await?;

        info!("Removed contact: {}", id);
        Ok(())
    }

    /// Let the user choose one contact.
    ///
    /// Returns `Ok(None)` when the store is empty, `OperationCancelled` when
    /// the picker is dismissed and `NotSupported` when no picker is attached.
    pub async fn pick_contact(&self) -> Result<Option<Contact>> {
        let picker = self.picker.as_ref().ok_or(ContactError::NotSupported)?;

        let candidates = self
            .bounded("pick_contact", async {
                self.store.check_access().await?;
                self.store.list().await
            })
            .await?;
        if candidates.is_empty() {
            return Ok(None);
        }

        match picker.pick(&candidates).await? {
            PickOutcome::Cancelled => {
                debug!("Contact picker cancelled");
                Err(ContactError::OperationCancelled)
            }
            PickOutcome::Selected(id) => candidates
                .into_iter()
                .find(|c| c.id.as_deref() == Some(id.as_str()))
                .map(Some)
                .ok_or_else(|| {
                    warn!("Picker returned unknown contact id {}", id);
                    ContactError::Unknown
                }),
        }
    }

    /// Remove every contact whose `fields` contain `filter`.
    ///
    /// Matches are removed one after another; a failed removal is recorded
    /// and the next one still runs.
    pub async fn remove_matching<S: AsRef<str>>(
        &self,
        fields: &[S],
        filter: &str,
    ) -> Result<RemovalReport> {
        let options = ContactFindOptions::new().with_filter(filter).multiple(true);
        let pending = self.find(fields, &options).await?;

        let mut report = RemovalReport::default();
        for contact in pending {
            let id = contact.id.clone().unwrap_or_default();
            match self.remove(&contact).await {
                Ok(()) => report.removed.push(id),
                Err(e) => {
                    warn!("Failed to remove contact {}: {}", id, e);
                    report.failed.push((id, e));
                }
            }
        }

        info!(
            "Removed {} of {} contacts matching {:?}",
            report.removed.len(),
            report.attempted(),
            filter
        );
        Ok(report)
    }
}
