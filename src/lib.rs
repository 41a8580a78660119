pub mod error;
pub mod field;
pub mod global;
pub mod macros;
pub mod option;
pub mod options;
pub mod source;
pub mod value;

// Re-export main types
pub use error::{BoxError, Error, ErrorList, format_errors};
pub use field::OptionField;
pub use option::{OptionRecord, Target};
pub use options::Options;
pub use source::{DotenvSource, EnvSource, FlagSource, JsonSource, MapSource, Source};
pub use value::{Kind, Scalar, Value};

// Re-export macro
pub use layered_options_macros::define_options;

/// A struct whose fields are options, generated by [`define_options!`]
pub trait FromOptions: Sized {
    /// Declare every field on `options`, load it, and collect the values,
    /// returning all resolution errors together
    fn load_or_error(options: Options<'_>) -> Result<Self, ErrorList>;

    /// Like [`load_or_error`](Self::load_or_error), panicking with a formatted
    /// report on failure
    fn load(options: Options<'_>) -> Self {
        match Self::load_or_error(options) {
            Ok(value) => value,
            Err(errors) => panic!("{}", format_errors(&errors)),
        }
    }

    /// Every field set to its default, without reading any source
    fn defaults() -> Self;

    /// A registry with every field declared and no sources, for documentation
    fn describe() -> Options<'static>;
}
