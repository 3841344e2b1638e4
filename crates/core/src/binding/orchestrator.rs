//! Validation and binding orchestrator
//!
//! Each command declares which request fields are mandatory and which are
//! optional, and which flag feeds each one. `bind_request` checks the
//! mandatory flags, then binds every supplied field into a fresh request.

use std::collections::HashSet;

use super::field::{Bindable, Shape, bind_field};
use super::invocation::Invocation;
use super::shorthand::{self, ParsedValue};
use crate::error::BindingError;

/// A request field fed by a CLI flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// Semantic field name, e.g. `Bucket` or `MultipartUpload`
    pub field: &'static str,
    /// Flag name without the leading `--`
    pub flag: &'static str,
    pub help: &'static str,
}

/// The mandatory and optional fields of one command, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSpecs {
    mandatory: Vec<FieldSpec>,
    optional: Vec<FieldSpec>,
}

impl FieldSpecs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mandatory(mut self, field: &'static str, flag: &'static str, help: &'static str) -> Self {
        self.mandatory.push(FieldSpec { field, flag, help });
        self
    }

    pub fn optional(mut self, field: &'static str, flag: &'static str, help: &'static str) -> Self {
        self.optional.push(FieldSpec { field, flag, help });
        self
    }

    pub fn mandatory_fields(&self) -> &[FieldSpec] {
        &self.mandatory
    }

    pub fn optional_fields(&self) -> &[FieldSpec] {
        &self.optional
    }

    /// All declared fields, mandatory first
    pub fn iter(&self) -> impl Iterator<Item = &FieldSpec> {
        self.mandatory.iter().chain(self.optional.iter())
    }

    pub fn is_mandatory(&self, field: &str) -> bool {
        self.mandatory.iter().any(|s| s.field == field)
    }

    /// Check the declarations against the request type
    ///
    /// A field may not be both mandatory and optional, flags must be unique,
    /// and every field must exist in `T`'s field table.
    pub fn check<T: Bindable>(&self) -> Result<(), BindingError> {
        let mut fields = HashSet::new();
        let mut flags = HashSet::new();

        for spec in self.iter() {
            if !fields.insert(spec.field) {
                return Err(BindingError::InvalidDeclaration {
                    field: spec.field.to_string(),
                    reason: "field is declared more than once".into(),
                });
            }
            if !flags.insert(spec.flag) {
                return Err(BindingError::InvalidDeclaration {
                    field: spec.field.to_string(),
                    reason: format!("flag --{} is declared more than once", spec.flag),
                });
            }
            if T::field(spec.field).is_none() {
                return Err(BindingError::UnknownField {
                    field: spec.field.to_string(),
                    target: T::NAME.to_string(),
                });
            }
        }

        Ok(())
    }
}

/// Build a request of type `T` from the invocation's flags
///
/// Fails on the first missing mandatory flag before binding anything.
/// Optional fields the user did not supply keep their default value.
pub fn bind_request<T: Bindable>(
    specs: &FieldSpecs,
    invocation: &Invocation,
) -> Result<T, BindingError> {
    specs.check::<T>()?;

    for spec in specs.mandatory_fields() {
        let present = invocation
            .value(spec.flag)
            .is_some_and(|raw| !raw.is_empty());
        if !present {
            return Err(BindingError::MissingMandatoryField {
                field: spec.field.to_string(),
                flag: spec.flag.to_string(),
            });
        }
    }

    let mut request = T::default();

    for spec in specs.mandatory_fields() {
        if let Some(raw) = invocation.value(spec.flag) {
            bind_flag(&mut request, spec, raw)?;
        }
    }

    for spec in specs.optional_fields() {
        if !invocation.is_set(spec.flag) {
            continue;
        }
        if let Some(raw) = invocation.value(spec.flag) {
            bind_flag(&mut request, spec, raw)?;
        }
    }

    Ok(request)
}

fn bind_flag<T: Bindable>(target: &mut T, spec: &FieldSpec, raw: &str) -> Result<(), BindingError> {
    // Presence was checked in `FieldSpecs::check`
    let shape = T::field(spec.field).map(|f| f.shape).unwrap_or(Shape::Scalar);

    let value = match shape {
        Shape::Scalar => ParsedValue::Scalar(raw.to_string()),
        Shape::Structure => shorthand::parse(raw).map_err(|e| e.within(spec.field))?,
    };

    tracing::debug!(field = spec.field, flag = spec.flag, "binding field");
    bind_field(target, spec.field, &value)
}
