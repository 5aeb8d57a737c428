//! triage-storage
//!
//! Key-value storage collaborator used to persist survey sessions and
//! escalation state. The engine only depends on [`store::KeyValueStore`];
//! [`memory::MemoryStore`] is enough for a single process and
//! [`s3::S3Store`] gives durability across restarts.

pub mod error;
pub mod memory;
pub mod objects;
pub mod s3;
pub mod state;
pub mod store;
