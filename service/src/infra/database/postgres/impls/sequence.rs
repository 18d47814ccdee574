//! Sequence-counter [`Database`] implementations.

use common::operations::Perform;
use tracerr::Traced;

use crate::{
    domain::sequence,
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

impl<C> Database<Perform<sequence::Next>> for Postgres<C>
where
    C: Connection,
{
    type Ok = sequence::Seq;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Perform(next): Perform<sequence::Next>,
    ) -> Result<Self::Ok, Self::Err> {
        let sequence::Next { name } = next;

        // Single statement, so two concurrent increments can never read the
        // same value.
        const SQL: &str = "\
            INSERT INTO counters (name, seq) \
            VALUES ($1::VARCHAR, $2::INT8 + 1) \
            ON CONFLICT (name) DO UPDATE \
            SET seq = counters.seq + 1 \
            RETURNING seq";
        self.query_opt(SQL, &[&name, &sequence::BASELINE])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.expect("`RETURNING` always yields a row").get("seq"))
    }
}
