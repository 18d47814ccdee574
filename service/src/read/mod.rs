//! Read-side projections.

pub mod property;
