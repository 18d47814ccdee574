//! [`Query`] collection related to a single [`Property`].

use common::operations::By;

use crate::domain::{property, Property};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`Property`] by its internal [`property::Id`].
pub type ById = DatabaseQuery<By<Option<Property>, property::Id>>;

/// Queries a [`Property`] by its unique [`property::Slug`].
pub type BySlug = DatabaseQuery<By<Option<Property>, property::Slug>>;

/// Queries a [`Property`] by its public [`property::Code`].
pub type ByCode = DatabaseQuery<By<Option<Property>, property::Code>>;
