//! [`Command`] for saving a whole [`Property`] document.

use common::operations::{
    By, Commit, Lock, Perform, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::property::{Code, Slug};
use crate::{
    domain::{property, sequence, Property},
    infra::{database, Database},
    read, Service,
};

use super::{unique_slug, Command, UniqueSlugError};

/// [`Command`] for saving a whole [`Property`] document: rooms, beds and all.
///
/// Every derived field of the incoming document is recomputed before it hits
/// the store, so callers may send stale or garbage counters freely. The first
/// save of a [`Property`] also mints its public [`Code`] and [`Slug`].
#[derive(Clone, Debug, From)]
pub struct SaveProperty {
    /// [`Property`] document to persist.
    pub property: Property,
}

impl<Db> Command<SaveProperty> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Property, property::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Property>, property::Id>>,
            Ok = Option<Property>,
            Err = Traced<database::Error>,
        > + Database<
            Select<
                By<
                    read::property::SlugIsTaken,
                    (property::Slug, property::Id),
                >,
            >,
            Ok = read::property::SlugIsTaken,
            Err = Traced<database::Error>,
        > + Database<
            Perform<sequence::Next>,
            Ok = sequence::Seq,
            Err = Traced<database::Error>,
        > + Database<Update<Property>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Property;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: SaveProperty) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let SaveProperty { mut property } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent saves of the same `Property`.
        tx.execute(Lock(By::new(property.id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let stored = tx
            .execute(Select(By::<Option<Property>, _>::new(property.id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        property.derive();

        if let Some(stored) = &stored {
            // `Code` and creation time are write-once, whatever the incoming
            // document claims.
            if stored.code.is_some() {
                property.code.clone_from(&stored.code);
            }
            property.created_at = stored.created_at;
        }
        if property.code.is_none() {
            let seq = tx
                .execute(Perform(sequence::Next::new(
                    sequence::Name::properties(),
                )))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            let code = property::Code::from_seq(seq);
            log::debug!("issued `{code}` to `Property(id: {})`", property.id);
            property.code = Some(code);
        }

        let stored_slug = stored.as_ref().and_then(|s| s.slug.clone());
        let renamed =
            stored.as_ref().is_none_or(|s| s.name != property.name);
        property.slug = if let (Some(slug), false) = (stored_slug, renamed) {
            Some(slug)
        } else {
            Some(
                unique_slug(&tx, &property.slug_source(), property.id)
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))?,
            )
        };

        tx.execute(Update(property.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(property)
    }
}

/// Error of [`SaveProperty`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// No free [`Slug`] variant found within the probing cap.
    #[display("no free `Slug` variant of `{_0}` found")]
    #[from(ignore)]
    SlugAttemptsExhausted(#[error(not(source))] property::Slug),
}

impl From<UniqueSlugError> for ExecutionError {
    fn from(e: UniqueSlugError) -> Self {
        match e {
            UniqueSlugError::Db(e) => Self::Db(e),
            UniqueSlugError::AttemptsExhausted(slug) => {
                Self::SlugAttemptsExhausted(slug)
            }
        }
    }
}
