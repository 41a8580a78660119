use std::ops::Deref;

/// A resolved option with its metadata, as produced by `define_options!`
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptionField<T> {
    /// Option name looked up in every source
    pub name: &'static str,
    /// Human-readable description of what this option does
    pub description: &'static str,
    /// Value used when no source supplies one
    pub default: T,
    /// Whether a source supplied the value
    pub resolved: bool,
    /// The effective value
    pub value: T,
}

impl<T> OptionField<T> {
    pub fn new(
        name: &'static str,
        description: &'static str,
        default: T,
        resolved: bool,
        value: T,
    ) -> Self {
        Self {
            name,
            description,
            default,
            resolved,
            value,
        }
    }

    /// Consume the field, keeping only the effective value
    pub fn into_value(self) -> T {
        self.value
    }
}

// Allow using OptionField<T> as &T without writing .value
impl<T> Deref for OptionField<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl<T> AsRef<T> for OptionField<T> {
    fn as_ref(&self) -> &T {
        &self.value
    }
}
