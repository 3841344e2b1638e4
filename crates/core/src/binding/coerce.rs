//! Scalar type coercion
//!
//! Converts raw flag or shorthand scalars into typed values. Every function
//! rejects partial matches: `"1a"` is not an integer and `"fale"` is not a
//! boolean.

use jiff::Timestamp;

use crate::error::BindingError;

/// Pass-through for UTF-8 strings
pub fn string(raw: &str) -> Result<String, BindingError> {
    Ok(raw.to_string())
}

/// Strict decimal parse of a signed 64-bit integer
///
/// Accepts an optional leading `-` followed by ASCII digits only.
pub fn int64(raw: &str) -> Result<i64, BindingError> {
    let digits = raw.strip_prefix('-').unwrap_or(raw);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(BindingError::invalid(format!(
            "expected a 64-bit integer, got '{raw}'"
        )));
    }

    raw.parse::<i64>().map_err(|_| {
        BindingError::invalid(format!("'{raw}' is out of range for a 64-bit integer"))
    })
}

/// `true` or `false`, ignoring ASCII case
pub fn boolean(raw: &str) -> Result<bool, BindingError> {
    if raw.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(BindingError::invalid(format!(
            "expected 'true' or 'false', got '{raw}'"
        )))
    }
}

/// RFC 3339 timestamp, e.g. `2024-05-01T12:00:00Z`
pub fn timestamp(raw: &str) -> Result<Timestamp, BindingError> {
    raw.parse::<Timestamp>().map_err(|e| {
        BindingError::invalid(format!("expected an RFC 3339 timestamp, got '{raw}': {e}"))
    })
}

/// Exact, case-sensitive match against a closed set of values
pub fn one_of(raw: &str, allowed: &[&str]) -> Result<String, BindingError> {
    if allowed.contains(&raw) {
        Ok(raw.to_string())
    } else {
        Err(BindingError::invalid(format!(
            "'{raw}' is not one of: {}",
            allowed.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_passthrough() {
        assert_eq!(string("a b,c").unwrap(), "a b,c");
        assert_eq!(string("").unwrap(), "");
    }

    #[test]
    fn test_int64_valid() {
        assert_eq!(int64("0").unwrap(), 0);
        assert_eq!(int64("42").unwrap(), 42);
        assert_eq!(int64("-7").unwrap(), -7);
        assert_eq!(int64("9223372036854775807").unwrap(), i64::MAX);
    }

    #[test]
    fn test_int64_rejects_partial_matches() {
        for raw in ["1a", "a1", "", "-", "+1", " 1", "1 ", "1.0", "1e3"] {
            assert!(
                matches!(int64(raw), Err(BindingError::TypeCoercionFailure { .. })),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_int64_overflow() {
        let err = int64("9223372036854775808").unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn test_boolean() {
        assert!(boolean("true").unwrap());
        assert!(boolean("TRUE").unwrap());
        assert!(!boolean("False").unwrap());
        assert!(boolean("fale").is_err());
        assert!(boolean("1").is_err());
        assert!(boolean("truex").is_err());
        assert!(boolean("").is_err());
    }

    #[test]
    fn test_timestamp() {
        let ts = timestamp("2024-05-01T12:00:00Z").unwrap();
        assert_eq!(ts.as_second(), 1_714_564_800);

        let ts = timestamp("2024-05-01T14:00:00+02:00").unwrap();
        assert_eq!(ts.as_second(), 1_714_564_800);

        assert!(timestamp("2024-05-01").is_err());
        assert!(timestamp("yesterday").is_err());
    }

    #[test]
    fn test_one_of_is_case_sensitive() {
        let allowed = ["Enabled", "Suspended"];
        assert_eq!(one_of("Enabled", &allowed).unwrap(), "Enabled");
        assert!(one_of("enabled", &allowed).is_err());

        let err = one_of("On", &allowed).unwrap_err();
        assert!(err.to_string().contains("Enabled, Suspended"));
    }
}
