//! Shared sequence counter definitions.

use std::str::FromStr;

use derive_more::{AsRef, Display};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};

/// Value issued by a sequence counter.
pub type Seq = i64;

/// Baseline a fresh counter starts from, so issued values never collide with
/// pre-existing externally assigned numbers.
///
/// The first issued [`Seq`] is `BASELINE + 1`.
pub const BASELINE: Seq = 1740;

/// Name identifying a shared sequence counter.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct Name(String);

impl Name {
    /// Returns the [`Name`] of the counter numbering properties.
    #[must_use]
    pub fn properties() -> Self {
        Self("properties".to_owned())
    }

    /// Creates a new [`Name`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid counter [`Name`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.len() <= 128
    }
}

impl FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `sequence::Name`")
    }
}

/// Request to issue the next [`Seq`] of a named counter.
///
/// Must be executed as a single atomic read-modify-write against the backing
/// store: a separate read followed by a write would let two concurrent
/// property creations walk away with the same number.
#[derive(Clone, Debug)]
pub struct Next {
    /// [`Name`] of the counter to increment.
    pub name: Name,
}

impl Next {
    /// Creates a new [`Next`] request for the given counter.
    #[must_use]
    pub fn new(name: Name) -> Self {
        Self { name }
    }
}
