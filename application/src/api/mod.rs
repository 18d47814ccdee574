//! Definitions of the HTTP API.

pub mod property;

use axum::{routing::get, Router};

/// Builds a [`Router`] serving the HTTP API.
#[must_use]
pub fn router() -> Router {
    Router::new()
        .route(
            "/properties/:id",
            get(property::by_id)
                .put(property::save)
                .patch(property::update_details),
        )
        .route("/properties/slug/:slug", get(property::by_slug))
        .route("/properties/code/:code", get(property::by_code))
}
