//! Field binder
//!
//! Request types describe themselves with an explicit table of named
//! setters. Binding looks fields up by their semantic name (`Bucket`,
//! `Objects`, `PartNumber`) and recurses into nested structures and lists.

use jiff::Timestamp;

use super::coerce;
use super::shorthand::ParsedValue;
use crate::error::BindingError;

/// Setter stored in a field table
pub type Setter<T> = fn(&mut T, &ParsedValue) -> Result<(), BindingError>;

/// How a top-level flag value is turned into a `ParsedValue`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// The raw flag value is used verbatim as a scalar
    Scalar,
    /// The raw flag value is shorthand or JSON
    Structure,
}

/// One entry of a request type's field table
pub struct Field<T> {
    pub name: &'static str,
    pub shape: Shape,
    pub set: Setter<T>,
}

impl<T> Field<T> {
    pub fn scalar(name: &'static str, set: Setter<T>) -> Self {
        Self {
            name,
            shape: Shape::Scalar,
            set,
        }
    }

    pub fn structure(name: &'static str, set: Setter<T>) -> Self {
        Self {
            name,
            shape: Shape::Structure,
            set,
        }
    }
}

impl<T> std::fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("shape", &self.shape)
            .finish()
    }
}

/// A type that can be populated field by field from parsed flag values
pub trait Bindable: Default + Sized {
    /// Type name used in error messages
    const NAME: &'static str;

    /// The field table
    fn fields() -> Vec<Field<Self>>;

    /// Find a field by its case-sensitive name
    fn field(name: &str) -> Option<Field<Self>> {
        Self::fields().into_iter().find(|f| f.name == name)
    }
}

/// Set one named field on `target`
///
/// The returned error carries the full path below `name`.
pub fn bind_field<T: Bindable>(
    target: &mut T,
    name: &str,
    value: &ParsedValue,
) -> Result<(), BindingError> {
    let field = T::field(name).ok_or_else(|| BindingError::UnknownField {
        field: name.to_string(),
        target: T::NAME.to_string(),
    })?;
    (field.set)(target, value).map_err(|e| e.within(name))
}

/// Bind a record into a freshly allocated `T`, entry by entry in input order
pub fn bind_record<T: Bindable>(value: &ParsedValue) -> Result<T, BindingError> {
    let ParsedValue::Record(entries) = value else {
        return Err(mismatch("a structure", value));
    };

    let mut target = T::default();
    for (name, item) in entries {
        bind_field(&mut target, name, item)?;
    }
    Ok(target)
}

/// Bind each list element into a `T`, preserving order
pub fn list_of<T: Bindable>(value: &ParsedValue) -> Result<Vec<T>, BindingError> {
    let ParsedValue::List(items) = value else {
        return Err(mismatch("a list", value));
    };

    let mut bound = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        bound.push(bind_record::<T>(item).map_err(|e| e.within(&format!("[{index}]")))?);
    }
    Ok(bound)
}

/// A list of plain strings, e.g. `AllowedMethods=[GET,PUT]`
pub fn string_list(value: &ParsedValue) -> Result<Vec<String>, BindingError> {
    let ParsedValue::List(items) = value else {
        return Err(mismatch("a list", value));
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| string(item).map_err(|e| e.within(&format!("[{index}]"))))
        .collect()
}

/// The raw text of a scalar
pub fn scalar(value: &ParsedValue) -> Result<&str, BindingError> {
    match value {
        ParsedValue::Scalar(raw) => Ok(raw.as_str()),
        other => Err(mismatch("a scalar", other)),
    }
}

pub fn string(value: &ParsedValue) -> Result<String, BindingError> {
    coerce::string(scalar(value)?)
}

pub fn int64(value: &ParsedValue) -> Result<i64, BindingError> {
    coerce::int64(scalar(value)?)
}

pub fn boolean(value: &ParsedValue) -> Result<bool, BindingError> {
    coerce::boolean(scalar(value)?)
}

pub fn timestamp(value: &ParsedValue) -> Result<Timestamp, BindingError> {
    coerce::timestamp(scalar(value)?)
}

pub fn one_of(value: &ParsedValue, allowed: &[&str]) -> Result<String, BindingError> {
    coerce::one_of(scalar(value)?, allowed)
}

fn mismatch(expected: &str, found: &ParsedValue) -> BindingError {
    BindingError::invalid(format!("expected {expected}, found {}", found.kind()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::shorthand;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Item {
        key: Option<String>,
        size: Option<i64>,
    }

    impl Bindable for Item {
        const NAME: &'static str = "Item";

        fn fields() -> Vec<Field<Self>> {
            vec![
                Field::scalar("Key", |r: &mut Self, v| {
                    r.key = Some(string(v)?);
                    Ok(())
                }),
                Field::scalar("Size", |r: &mut Self, v| {
                    r.size = Some(int64(v)?);
                    Ok(())
                }),
            ]
        }
    }

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Batch {
        items: Option<Vec<Item>>,
        tags: Option<Vec<String>>,
        dry_run: Option<bool>,
    }

    impl Bindable for Batch {
        const NAME: &'static str = "Batch";

        fn fields() -> Vec<Field<Self>> {
            vec![
                Field::structure("Items", |r: &mut Self, v| {
                    r.items = Some(list_of(v)?);
                    Ok(())
                }),
                Field::structure("Tags", |r: &mut Self, v| {
                    r.tags = Some(string_list(v)?);
                    Ok(())
                }),
                Field::scalar("DryRun", |r: &mut Self, v| {
                    r.dry_run = Some(boolean(v)?);
                    Ok(())
                }),
            ]
        }
    }

    #[test]
    fn test_bind_record_with_list() {
        let parsed = shorthand::parse("Items=[{Key=a,Size=1},{Key=b}],DryRun=TRUE").unwrap();
        let batch: Batch = bind_record(&parsed).unwrap();

        let items = batch.items.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].key.as_deref(), Some("a"));
        assert_eq!(items[0].size, Some(1));
        assert_eq!(items[1].key.as_deref(), Some("b"));
        assert_eq!(items[1].size, None);
        assert_eq!(batch.dry_run, Some(true));
        assert_eq!(batch.tags, None);
    }

    #[test]
    fn test_bind_string_list() {
        let parsed = shorthand::parse("Tags=[x,y,z]").unwrap();
        let batch: Batch = bind_record(&parsed).unwrap();
        assert_eq!(
            batch.tags,
            Some(vec!["x".to_string(), "y".to_string(), "z".to_string()])
        );
    }

    #[test]
    fn test_unknown_nested_field_is_error() {
        let parsed = shorthand::parse("Items=[{Key=a},{Kye=b}]").unwrap();
        let err = bind_record::<Batch>(&parsed).unwrap_err();
        assert_eq!(
            err,
            BindingError::UnknownField {
                field: "Items[1].Kye".into(),
                target: "Item".into(),
            }
        );
    }

    #[test]
    fn test_coercion_error_carries_path() {
        let parsed = shorthand::parse("Items=[{Key=a,Size=1a}]").unwrap();
        let err = bind_record::<Batch>(&parsed).unwrap_err();
        assert!(matches!(err, BindingError::TypeCoercionFailure { .. }));
        assert_eq!(err.field(), Some("Items[0].Size"));
    }

    #[test]
    fn test_shape_mismatch() {
        let parsed = shorthand::parse("Items={Key=a}").unwrap();
        let err = bind_record::<Batch>(&parsed).unwrap_err();
        assert!(err.to_string().contains("expected a list, found a structure"));

        let parsed = shorthand::parse("DryRun=[true]").unwrap();
        let err = bind_record::<Batch>(&parsed).unwrap_err();
        assert!(err.to_string().contains("expected a scalar, found a list"));
    }

    #[test]
    fn test_binding_is_idempotent() {
        let parsed = shorthand::parse("Items=[{Key=a,Size=3},{Key=b,Size=4}],DryRun=false").unwrap();
        let first: Batch = bind_record(&parsed).unwrap();
        let second: Batch = bind_record(&parsed).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_bind_field_unknown_top_level() {
        let mut batch = Batch::default();
        let err = bind_field(&mut batch, "Nope", &ParsedValue::Scalar("x".into())).unwrap_err();
        assert!(matches!(err, BindingError::UnknownField { .. }));
    }

    #[test]
    fn test_field_lookup_is_case_sensitive() {
        assert!(Item::field("Key").is_some());
        assert!(Item::field("key").is_none());
    }
}
