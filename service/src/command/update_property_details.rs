//! [`Command`] for patching top-level [`Property`] details.

use common::operations::{
    By, Commit, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::property::Slug;
use crate::{
    domain::{property, Property},
    infra::{database, Database},
    read, Service,
};

use super::{unique_slug, Command, UniqueSlugError};

/// [`Command`] for patching top-level details of a [`Property`].
///
/// Only the fields present in the [`property::Patch`] are touched; rooms,
/// beds and every derived counter stay exactly as stored. Renaming the
/// [`Property`] recomputes its [`Slug`].
#[derive(Clone, Debug, From)]
pub struct UpdatePropertyDetails {
    /// [`property::Patch`] to apply.
    pub patch: property::Patch,
}

impl<Db> Command<UpdatePropertyDetails> for Service<Db>
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
            Update<property::Patch>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdatePropertyDetails,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdatePropertyDetails { mut patch } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent actions upon the same `Property`.
        tx.execute(Lock(By::new(patch.id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut stored = tx
            .execute(Select(By::<Option<Property>, _>::new(patch.id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::PropertyNotExists(patch.id))
            .map_err(tracerr::wrap!())?;

        if patch.renames() {
            if let Some(name) = &patch.name {
                stored.name.clone_from(name);
            }
            if let Some(nick) = &patch.nick_name {
                stored.nick_name = Some(nick.clone());
            }
            patch.slug = Some(
                unique_slug(&tx, &stored.slug_source(), stored.id)
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))?,
            );
        }

        tx.execute(Update(patch))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(())
    }
}

/// Error of [`UpdatePropertyDetails`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Property`] doesn't exist.
    #[display("`Property(id: {_0})` does not exist")]
    #[from(ignore)]
    PropertyNotExists(#[error(not(source))] property::Id),

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
