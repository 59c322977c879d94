//! Persistence layer — durable per-user experience flags.

pub mod flags;
pub mod libsql_backend;
pub mod memory;
pub mod traits;

pub use flags::{CompletionFlags, FlagRepository};
pub use libsql_backend::LibSqlFlagStore;
pub use memory::MemoryFlagStore;
pub use traits::FlagStore;
