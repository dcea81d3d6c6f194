//! Callback-style entry points.
//!
//! Each `*_with` method checks its handlers synchronously, then runs the
//! operation on the tokio runtime and calls exactly one handler with the
//! outcome. A missing success handler is a programming error and is
//! reported before anything is scheduled. A missing error handler means
//! failures are logged and dropped.
//!
//! `find_with` rejects an empty field set before scheduling anything: the
//! error handler runs inline and no task is returned.
//!
//! These methods call `tokio::spawn` and must run inside a runtime.

use std::future::Future;

use serde_json::Value as JsonValue;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::client::ContactsClient;
use crate::error::{ContactError, ContractViolation, Result};
use crate::models::Contact;
use crate::options::ContactFindOptions;

fn dispatch<T, F, S, E>(
    operation: &'static str,
    on_success: Option<S>,
    on_error: Option<E>,
    fut: F,
) -> std::result::Result<JoinHandle<()>, ContractViolation>
where
    T: Send + 'static,
    F: Future<Output = Result<T>> + Send + 'static,
    S: FnOnce(T) + Send + 'static,
    E: FnOnce(ContactError) + Send + 'static,
{
    let Some(on_success) = on_success else {
        return Err(ContractViolation::MissingSuccessCallback { operation });
    };

    Ok(tokio::spawn(async move {
        match fut.await {
            Ok(value) => on_success(value),
            Err(e) => match on_error {
                Some(on_error) => on_error(e),
                None => warn!("{} failed without an error handler: {}", operation, e),
            },
        }
        debug!("{} callback delivered", operation);
    }))
}

impl ContactsClient {
    /// Callback form of [`find`](Self::find).
    ///
    /// Returns `Ok(None)` when `fields` is empty: `on_error` has already
    /// received `InvalidArgument` and nothing was spawned.
    pub fn find_with<S, E>(
        &self,
        fields: Vec<String>,
        on_success: Option<S>,
        on_error: Option<E>,
        options: ContactFindOptions,
    ) -> std::result::Result<Option<JoinHandle<()>>, ContractViolation>
    where
        S: FnOnce(Vec<Contact>) + Send + 'static,
        E: FnOnce(ContactError) + Send + 'static,
    {
        if on_success.is_none() {
            return Err(ContractViolation::MissingSuccessCallback { operation: "find" });
        }
        if fields.is_empty() {
            debug!("find called with no fields");
            match on_error {
                Some(on_error) => on_error(ContactError::InvalidArgument),
                None => warn!("find failed without an error handler: {}", ContactError::InvalidArgument),
            }
            return Ok(None);
        }

        let client = self.clone();
        dispatch("find", on_success, on_error, async move {
            client.find(fields.as_slice(), &options).await
        })
        .map(Some)
    }

    /// Callback form of [`save`](Self::save)
    pub fn save_with<S, E>(
        &self,
        contact: Contact,
        on_success: Option<S>,
        on_error: Option<E>,
    ) -> std::result::Result<JoinHandle<()>, ContractViolation>
    where
        S: FnOnce(Contact) + Send + 'static,
        E: FnOnce(ContactError) + Send + 'static,
    {
        let client = self.clone();
        dispatch("save", on_success, on_error, async move {
            client.save(&contact).await
        })
    }

    /// Callback form of [`remove`](Self::remove)
    pub fn remove_with<S, E>(
        &self,
        contact: Contact,
        on_success: Option<S>,
        on_error: Option<E>,
    ) -> std::result::Result<JoinHandle<()>, ContractViolation>
    where
        S: FnOnce(()) + Send + 'static,
        E: FnOnce(ContactError) + Send + 'static,
    {
        let client = self.clone();
        dispatch("remove", on_success, on_error, async move {
            client.remove(&contact).await
        })
    }

    /// Callback form of [`pick_contact`](Self::pick_contact)
    pub fn pick_with<S, E>(
        &self,
        on_success: Option<S>,
        on_error: Option<E>,
    ) -> std::result::Result<JoinHandle<()>, ContractViolation>
    where
        S: FnOnce(Option<Contact>) + Send + 'static,
        E: FnOnce(ContactError) + Send + 'static,
    {
        let client = self.clone();
        dispatch("pick_contact", on_success, on_error, async move {
            client.pick_contact().await
        })
    }

    /// Build a contact from a property bag and hand it to `on_success`.
    ///
    /// Runs synchronously; `create` never touches the store.
    pub fn create_with<S, E>(
        &self,
        properties: JsonValue,
        on_success: Option<S>,
        on_error: Option<E>,
    ) -> std::result::Result<(), ContractViolation>
    where
        S: FnOnce(Contact),
        E: FnOnce(ContactError),
    {
        let Some(on_success) = on_success else {
            return Err(ContractViolation::MissingSuccessCallback { operation: "create" });
        };
        match self.create(properties) {
            Ok(contact) => on_success(contact),
            Err(e) => match on_error {
                Some(on_error) => on_error(e),
                None => warn!("create failed without an error handler: {}", e),
            },
        }
        Ok(())
    }
}
