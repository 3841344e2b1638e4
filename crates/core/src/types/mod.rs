//! Request and response models
//!
//! Requests implement [`Bindable`](crate::binding::Bindable) and are built
//! from flags. Responses serialize with the same PascalCase field names.

pub mod bucket;
pub mod multipart;
pub mod object;

pub use bucket::*;
pub use multipart::*;
pub use object::*;
