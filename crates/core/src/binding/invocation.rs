//! Invocation context
//!
//! An immutable snapshot of the flags given to one command. The CLI layer
//! builds it from its argument parser; nothing in the binding layer reads
//! process-wide argument state.

use std::collections::BTreeMap;

/// Raw value of one flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagValue {
    pub raw: String,
    /// True when the user supplied the flag (command line or environment),
    /// false when the value came from a default
    pub explicit: bool,
}

/// Flags of the current command, keyed by flag name (without `--`)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    flags: BTreeMap<String, FlagValue>,
}

impl Invocation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an explicitly provided flag
    pub fn with_flag(mut self, name: impl Into<String>, raw: impl Into<String>) -> Self {
        self.flags.insert(
            name.into(),
            FlagValue {
                raw: raw.into(),
                explicit: true,
            },
        );
        self
    }

    /// Add a flag whose value came from a default
    pub fn with_default(mut self, name: impl Into<String>, raw: impl Into<String>) -> Self {
        self.flags.insert(
            name.into(),
            FlagValue {
                raw: raw.into(),
                explicit: false,
            },
        );
        self
    }

    pub fn get(&self, name: &str) -> Option<&FlagValue> {
        self.flags.get(name)
    }

    /// Raw value of a flag, explicit or defaulted
    pub fn value(&self, name: &str) -> Option<&str> {
        self.flags.get(name).map(|f| f.raw.as_str())
    }

    /// Whether the user supplied the flag
    pub fn is_set(&self, name: &str) -> bool {
        self.flags.get(name).is_some_and(|f| f.explicit)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.flags.keys().map(String::as_str)
    }
}

impl FromIterator<(String, FlagValue)> for Invocation {
    fn from_iter<I: IntoIterator<Item = (String, FlagValue)>>(iter: I) -> Self {
        Self {
            flags: iter.into_iter().collect(),
        }
    }
}
