//! bkt-core: Core library for the bkt bucket sync tool
//!
//! This crate provides the core functionality for bkt, including:
//! - Configuration resolution
//! - Ignore rules
//! - Mapping between local paths and object keys
//! - ObjectStore and CdnInvalidator traits
//! - The upload, delete, restore and invalidate operations
//!
//! This crate is designed to be independent of any specific cloud SDK,
//! so the operations can be tested against mocks and in-memory stores.

pub mod cdn;
pub mod config;
pub mod error;
pub mod ignore;
pub mod path;
pub mod sync;
pub mod traits;

pub use cdn::{InvalidationOutcome, connect_and_invalidate, invalidate};
pub use config::{ConfigLayer, ConfigManager, StaticCredentials, SyncConfig};
pub use error::{Error, Result};
pub use ignore::IgnoreRules;
pub use path::{Target, invalidation_path, to_local_path, to_remote_key};
pub use sync::{ItemOutcome, ItemStatus, SkipReason, Summary, SyncReport, Syncer};
pub use traits::{
    CdnInvalidator, InvalidationReceipt, ListPage, ObjectInfo, ObjectStore, list_all,
};
