//! [`Command`] definition.

pub mod save_property;
pub mod update_property_details;

use common::operations::{By, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{property, Property},
    infra::{database, Database},
    read,
};

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    save_property::SaveProperty,
    update_property_details::UpdatePropertyDetails,
};

/// Maximum number of [`property::Slug`] candidates probed before giving up.
///
/// Hitting the cap means thousands of same-named properties, which is a data
/// problem rather than something to paper over with endless probing.
pub(crate) const MAX_SLUG_ATTEMPTS: u32 = 64;

/// Picks a unique [`property::Slug`] for the [`Property`] identified by the
/// `owner` ID, derived from the given naming `source`.
///
/// The normalized form is probed first, then `-2`, `-3` and so on suffixed
/// variants, up to [`MAX_SLUG_ATTEMPTS`]. A slug held by the `owner` itself
/// doesn't count as taken.
pub(crate) async fn unique_slug<Tx>(
    tx: &Tx,
    source: &str,
    owner: property::Id,
) -> Result<property::Slug, Traced<UniqueSlugError>>
where
    Tx: Database<
        Select<By<read::property::SlugIsTaken, (property::Slug, property::Id)>>,
        Ok = read::property::SlugIsTaken,
        Err = Traced<database::Error>,
    >,
{
    use UniqueSlugError as E;

    let base = property::Slug::normalize(source);
    for attempt in 1..=MAX_SLUG_ATTEMPTS {
        let candidate = if attempt == 1 {
            base.clone()
        } else {
            base.with_suffix(attempt)
        };
        let taken = tx
            .execute(Select(By::new((candidate.clone(), owner))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if !*taken {
            if attempt > 1 {
                log::debug!("`Slug` `{base}` taken, picked `{candidate}`");
            }
            return Ok(candidate);
        }
    }
    Err(tracerr::new!(E::AttemptsExhausted(base)))
}

/// Error of picking a unique [`property::Slug`].
#[derive(Debug, Display, Error, From)]
pub enum UniqueSlugError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// Every probed candidate was already taken.
    #[display("no free `Slug` variant of `{_0}` found")]
    #[from(ignore)]
    AttemptsExhausted(#[error(not(source))] property::Slug),
}
