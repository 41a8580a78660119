// Helpers called by code that the define_options! macro generates.
// The macro itself lives in the layered-options-macros crate.

use crate::field::OptionField;
use crate::options::Options;
use crate::value::{Scalar, Value};

/// Build the struct field for an option after its registry has loaded
#[doc(hidden)]
pub fn resolved_field<T: Scalar>(
    options: &Options<'_>,
    name: &'static str,
    description: &'static str,
    default: T,
    cell: &Value<T>,
) -> OptionField<T> {
    OptionField::new(
        name,
        description,
        default,
        options.is_resolved(name),
        cell.get(),
    )
}

/// Build the struct field for an option from its default alone
#[doc(hidden)]
pub fn default_field<T: Scalar>(
    name: &'static str,
    description: &'static str,
    default: T,
) -> OptionField<T> {
    OptionField::new(name, description, default.clone(), false, default)
}
