//! [`ObjectStore`](crate::services::object_store::ObjectStore) implementations.
//!
//! [`S3ObjectStore`] talks to AWS S3. [`InMemoryStore`] keeps objects in a
//! map and backs the tests and local dry runs.

mod memory;
mod s3;

pub use memory::{InMemoryStore, StoredObject};
pub use s3::S3ObjectStore;
