//! cos-core: Core library for the cos object storage CLI
//!
//! This crate provides the core functionality for the cos CLI, including:
//! - Request binding from flags, shorthand and JSON
//! - Region resolution
//! - Configuration management
//! - Request and response models
//! - ObjectStorage trait for S3 operations
//!
//! This crate is designed to be independent of any specific S3 SDK,
//! allowing for easy testing and potential future support for other backends.

pub mod binding;
pub mod config;
pub mod error;
pub mod region;
pub mod traits;
pub mod types;

pub use binding::{Bindable, FieldSpecs, Invocation, bind_request};
pub use config::{Config, ConfigManager, ConfigSource};
pub use error::{BindingError, Error, Result};
pub use region::{ResolvedRegion, resolve_region};
pub use traits::{ConnectionSettings, Connector, ObjectStorage};
