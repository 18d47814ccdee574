//! [`Property`]-related read definitions.

use derive_more::Deref;

#[cfg(doc)]
use crate::domain::{property::Slug, Property};

/// Indicator whether a [`Slug`] is already taken by another [`Property`].
#[derive(Clone, Copy, Debug, Deref, Eq, Hash, PartialEq)]
pub struct SlugIsTaken(pub bool);

impl PartialEq<bool> for SlugIsTaken {
    fn eq(&self, other: &bool) -> bool {
        self.0 == *other
    }
}
