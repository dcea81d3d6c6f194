//! Contact storage implementation using SQLite

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection};
use tracing::{debug, info};

use crate::config::AccessPolicy;
use crate::error::{ContactError, StoreError};
use crate::models::Contact;
use crate::options::ContactFindOptions;
use crate::query;
use crate::store::ContactStore;
use crate::Result;

/// SQLite-based address book.
///
/// Each contact is one row; the record body is the JSON form of [`Contact`]
/// and the `id` column is authoritative for identity.
pub struct SqliteContactStore {
    conn: Arc<Mutex<Connection>>,
    access: AccessPolicy,
}

impl SqliteContactStore {
    /// Open (or create) a store at the given database path
    pub fn new(db_path: &str) -> std::result::Result<Self, StoreError> {
        debug!("Opening contacts database at: {}", db_path);
        if let Some(parent) = Path::new(db_path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(db_path)?;
        let store = Self::from_connection(conn)?;
        info!("SqliteContactStore initialized at {}", db_path);
        Ok(store)
    }

    /// Create an in-memory store (useful for testing)
    pub fn in_memory() -> std::result::Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> std::result::Result<Self, StoreError> {
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
            access: AccessPolicy::Granted,
        };
        store.init_tables()?;
        Ok(store)
    }

    /// Set whether access to the address book has been granted
    pub fn with_access(mut self, access: AccessPolicy) -> Self {
        self.access = access;
        self
    }

    /// Set how long SQLite waits on a lock held by another connection
    /// before reporting the database as busy
    pub fn with_busy_timeout(self, timeout: Duration) -> std::result::Result<Self, StoreError> {
        self.lock()?.busy_timeout(timeout)?;
        debug!("SQLite busy timeout set to {:?}", timeout);
        Ok(self)
    }

    fn lock(&self) -> std::result::Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }

    /// Run `f` against the connection on the blocking pool. The returned
    /// future can be dropped while SQLite is still waiting on a lock.
    async fn with_conn<T, F>(&self, f: F) -> std::result::Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> std::result::Result<T, StoreError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|e| StoreError::Poisoned(e.to_string()))?;
            f(&guard)
        })
        .await?
    }

    /// Initialize database tables
    fn init_tables(&self) -> std::result::Result<(), StoreError> {
        let conn = self.lock()?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS contacts (
                id TEXT PRIMARY KEY,
                display_name TEXT,
                data TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_contacts_display_name ON contacts(display_name)",
            [],
        )?;
        Ok(())
    }

    /// Count stored contacts
    pub fn count(&self) -> std::result::Result<usize, StoreError> {
        let count: i64 = self
            .lock()?
            .query_row("SELECT COUNT(*) FROM contacts", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

fn load_all(conn: &Connection) -> std::result::Result<Vec<Contact>, StoreError> {
    let mut stmt = conn.prepare("SELECT id, data FROM contacts ORDER BY rowid")?;
    let rows = stmt
        .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(|(id, data)| {
            let mut contact: Contact =
                serde_json::from_str(&data).map_err(|e| StoreError::Corrupt {
                    id: id.clone(),
                    reason: e.to_string(),
                })?;
            contact.id = Some(id);
            Ok(contact)
        })
        .collect()
}

fn insert_row(conn: &Connection, contact: &Contact) -> std::result::Result<(), StoreError> {
    let data = serde_json::to_string(contact)?;
    let now = Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO contacts (id, display_name, data, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?4)",
        params![contact.id, contact.display_name, data, now],
    )?;
    Ok(())
}

fn update_row(conn: &Connection, id: &str, contact: &Contact) -> std::result::Result<usize, StoreError> {
    let data = serde_json::to_string(contact)?;
    let rows = conn.execute(
        "UPDATE contacts SET display_name = ?2, data = ?3, updated_at = ?4 WHERE id = ?1",
        params![id, contact.display_name, data, Utc::now().to_rfc3339()],
    )?;
    Ok(rows)
}

fn delete_row(conn: &Connection, id: &str) -> std::result::Result<usize, StoreError> {
    Ok(conn.execute("DELETE FROM contacts WHERE id = ?1", params![id])?)
}

#[async_trait]
impl ContactStore for SqliteContactStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn check_access(&self) -> Result<()> {
        match self.access {
            AccessPolicy::Granted => Ok(()),
            AccessPolicy::Denied => Err(ContactError::PermissionDenied),
        }
    }

    async fn search(&self, fields: &[String], options: &ContactFindOptions) -> Result<Vec<Contact>> {
        let records = self.with_conn(load_all).await?;
        let found = query::run(records, fields, options);
        debug!("Found {} contacts matching {:?}", found.len(), options.filter);
        Ok(found)
    }

    async fn list(&self) -> Result<Vec<Contact>> {
        Ok(self.with_conn(load_all).await?)
    }

    async fn insert(&self, mut contact: Contact) -> Result<Contact> {
        contact.id = Some(uuid::Uuid::new_v4().to_string());
        let row = contact.clone();
        self.with_conn(move |conn| insert_row(conn, &row)).await?;
        debug!("Inserted contact {:?}", contact.id);
        Ok(contact)
    }

    async fn update(&self, contact: Contact) -> Result<Contact> {
        let id = contact.id.clone().ok_or(ContactError::Unknown)?;
        let row = contact.clone();
        let key = id.clone();
        if self.with_conn(move |conn| update_row(conn, &key, &row)).await? == 0 {
            debug!("Update of missing contact {}", id);
            return Err(ContactError::Unknown);
        }
        debug!("Updated contact {}", id);
        Ok(contact)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let key = id.to_string();
        if self.with_conn(move |conn| delete_row(conn, &key)).await? == 0 {
            debug!("Delete of missing contact {}", id);
            return Err(ContactError::Unknown);
        }
        debug!("Deleted contact {}", id);
        Ok(())
    }
}
