//! Contact store backends
//!
//! - [`SqliteContactStore`]: persistent address book on SQLite
//! - [`MemoryContactStore`]: process-local store, handy for tests
//! - [`UnsupportedStore`]: a platform without contacts support

mod memory;
mod sqlite;
mod traits;
mod unsupported;

pub use memory::MemoryContactStore;
pub use sqlite::SqliteContactStore;
pub use traits::ContactStore;
pub use unsupported::UnsupportedStore;
