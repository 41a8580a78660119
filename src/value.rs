use crate::error::Error;
use crate::option::{Slot, Target};
use crate::source::Source;
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};
use std::time::Duration;

/// The six scalar kinds an option can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Kind {
    String,
    Int,
    Float,
    Bool,
    Time,
    Duration,
}

impl Kind {
    pub const ALL: [Kind; 6] = [
        Kind::String,
        Kind::Int,
        Kind::Float,
        Kind::Bool,
        Kind::Time,
        Kind::Duration,
    ];
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Int => write!(f, "int"),
            Self::Float => write!(f, "float32"),
            Self::Bool => write!(f, "bool"),
            Self::Time => write!(f, "time"),
            Self::Duration => write!(f, "duration"),
        }
    }
}

mod sealed {
    pub trait Sealed {}

    impl Sealed for String {}
    impl Sealed for i32 {}
    impl Sealed for f32 {}
    impl Sealed for bool {}
    impl Sealed for chrono::DateTime<chrono::Utc> {}
    impl Sealed for std::time::Duration {}
}

/// A value type that can back an option
///
/// Implemented for exactly the six supported kinds and sealed against
/// further implementations.
pub trait Scalar: sealed::Sealed + Clone + Default + fmt::Debug + Send + Sync + 'static {
    const KIND: Kind;

    /// Read this kind from a source through the matching typed getter
    fn read(source: &dyn Source, name: &str) -> Result<Self, Error>;

    /// Text form used in generated documentation
    fn render(&self) -> String;

    #[doc(hidden)]
    fn into_target(default: Self, cell: Value<Self>) -> Target;
}

impl Scalar for String {
    const KIND: Kind = Kind::String;

    fn read(source: &dyn Source, name: &str) -> Result<Self, Error> {
        source.string(name)
    }

    fn render(&self) -> String {
        self.clone()
    }

    fn into_target(default: Self, cell: Value<Self>) -> Target {
        Target::String(Slot::new(default, cell))
    }
}

impl Scalar for i32 {
    const KIND: Kind = Kind::Int;

    fn read(source: &dyn Source, name: &str) -> Result<Self, Error> {
        source.int(name)
    }

    fn render(&self) -> String {
        self.to_string()
    }

    fn into_target(default: Self, cell: Value<Self>) -> Target {
        Target::Int(Slot::new(default, cell))
    }
}

impl Scalar for f32 {
    const KIND: Kind = Kind::Float;

    fn read(source: &dyn Source, name: &str) -> Result<Self, Error> {
        source.float(name)
    }

    fn render(&self) -> String {
        self.to_string()
    }

    fn into_target(default: Self, cell: Value<Self>) -> Target {
        Target::Float(Slot::new(default, cell))
    }
}

impl Scalar for bool {
    const KIND: Kind = Kind::Bool;

    fn read(source: &dyn Source, name: &str) -> Result<Self, Error> {
        source.bool(name)
    }

    fn render(&self) -> String {
        self.to_string()
    }

    fn into_target(default: Self, cell: Value<Self>) -> Target {
        Target::Bool(Slot::new(default, cell))
    }
}

impl Scalar for DateTime<Utc> {
    const KIND: Kind = Kind::Time;

    fn read(source: &dyn Source, name: &str) -> Result<Self, Error> {
        source.time(name)
    }

    fn render(&self) -> String {
        self.to_rfc3339()
    }

    fn into_target(default: Self, cell: Value<Self>) -> Target {
        Target::Time(Slot::new(default, cell))
    }
}

impl Scalar for Duration {
    const KIND: Kind = Kind::Duration;

    fn read(source: &dyn Source, name: &str) -> Result<Self, Error> {
        source.duration(name)
    }

    fn render(&self) -> String {
        humantime::format_duration(*self).to_string()
    }

    fn into_target(default: Self, cell: Value<Self>) -> Target {
        Target::Duration(Slot::new(default, cell))
    }
}

/// Shared handle to an option's storage cell
///
/// The registry writes the cell during [`Options::load`](crate::Options::load);
/// every clone of the handle observes the written value.
#[derive(Debug, Default)]
pub struct Value<T>(Arc<RwLock<T>>);

impl<T> Clone for Value<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T> Value<T> {
    pub fn new(initial: T) -> Self {
        Self(Arc::new(RwLock::new(initial)))
    }

    /// Borrow the current value
    pub fn read(&self) -> RwLockReadGuard<'_, T> {
        self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn set(&self, value: T) {
        let mut guard = self.0.write().unwrap_or_else(PoisonError::into_inner);
        *guard = value;
    }
}

impl<T: Clone> Value<T> {
    /// Copy out the current value
    pub fn get(&self) -> T {
        self.read().clone()
    }
}

impl<T: PartialEq> PartialEq<T> for Value<T> {
    fn eq(&self, other: &T) -> bool {
        *self.read() == *other
    }
}
