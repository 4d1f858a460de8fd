//! Object-store abstraction and backends.

pub mod object_store;
pub mod s3;

#[cfg(test)]
pub mod memory;

pub use object_store::{ObjectInfo, ObjectStore};
pub use s3::S3ObjectStore;
