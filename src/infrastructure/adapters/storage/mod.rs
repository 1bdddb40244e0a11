//! Object Storage Adapters

mod http_object_storage;

pub use http_object_storage::{HttpObjectStorage, HttpObjectStorageConfig};
