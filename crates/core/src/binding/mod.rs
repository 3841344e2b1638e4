//! Request binding
//!
//! Turns the flags of one command invocation into a typed request:
//! - `shorthand` parses `Key=[{...}]` notation (and JSON) into a `ParsedValue`
//! - `coerce` converts scalars to integers, booleans, timestamps and enums
//! - `field` sets named fields through each request type's field table
//! - `orchestrator` enforces mandatory/optional declarations

pub mod coerce;
pub mod field;
pub mod invocation;
pub mod orchestrator;
pub mod shorthand;

pub use field::{Bindable, Field, Shape, bind_field, bind_record};
pub use invocation::{FlagValue, Invocation};
pub use orchestrator::{FieldSpec, FieldSpecs, bind_request};
pub use shorthand::ParsedValue;
