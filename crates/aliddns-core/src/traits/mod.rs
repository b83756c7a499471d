//! Core traits for the aliddns updater
//!
//! This module defines the capability seams the reconciler works against:
//!
//! - [`AddressResolver`]: Discover the current public IPv4 address
//! - [`RecordStore`]: Read and mutate the record published at the provider

pub mod address_resolver;
pub mod record_store;

pub use address_resolver::AddressResolver;
pub use record_store::{RecordStore, RecordStoreFactory, StoredRecord};
