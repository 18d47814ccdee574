//! [`Property`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::operations::{By, Insert, Lock, Select, Update};
use tracerr::Traced;

use crate::{
    domain::{property, room, Bed, Property, Room},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

impl<C> Database<Select<By<Option<Property>, property::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Property>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Property>, property::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: property::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, code, slug, vendor_id, name, nick_name, \
                   gender, kind, \
                   city, state, area, pincode, \
                   contact_phone, contact_email, \
                   amenity_ids, main_image, common_photos, images, \
                   total_rooms, total_beds, occupied_beds, available_beds, \
                   beds_on_notice, beds_on_book, \
                   monthly_revenue, \
                   created_at \
            FROM properties \
            WHERE id = $1::UUID \
            LIMIT 1";
        let Some(row) =
            self.query_opt(SQL, &[&id]).await.map_err(tracerr::wrap!())?
        else {
            return Ok(None);
        };

        const ROOMS_SQL: &str = "\
            SELECT position, number, name, display_name, \
                   sharing, ac_type, bed_size, bathroom_type, \
                   balcony, description, amenities, \
                   rent, \
                   total_beds, occupied_beds, available_beds, \
                   on_notice_beds, on_book_beds, \
                   is_active \
            FROM property_rooms \
            WHERE property_id = $1::UUID \
            ORDER BY position";
        let room_rows = self
            .query(ROOMS_SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?;

        const BEDS_SQL: &str = "\
            SELECT room_position, number, status, \
                   student_id, student_name, \
                   rent_due_at, notice_at, booked_at \
            FROM property_beds \
            WHERE property_id = $1::UUID \
            ORDER BY room_position, position";
        let mut beds = HashMap::<i32, Vec<Bed>>::new();
        for row in self
            .query(BEDS_SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
        {
            beds.entry(row.get("room_position")).or_default().push(Bed {
                number: row.get("number"),
                status: row.get("status"),
                student_id: row.get("student_id"),
                student_name: row.get("student_name"),
                rent_due_at: row.get("rent_due_at"),
                notice_at: row.get("notice_at"),
                booked_at: row.get("booked_at"),
            });
        }

        let rooms = room_rows
            .into_iter()
            .map(|row| {
                let position: i32 = row.get("position");
                Room {
                    number: row.get("number"),
                    name: row.get("name"),
                    display_name: row.get("display_name"),
                    sharing: room::Sharing::new(
                        u8::try_from(row.get::<_, i16>("sharing"))
                            .expect("`sharing` overflow"),
                    )
                    .expect("stored `sharing` out of range"),
                    ac_type: row.get("ac_type"),
                    bed_size: row.get("bed_size"),
                    bathroom_type: row.get("bathroom_type"),
                    balcony: row.get("balcony"),
                    description: row.get("description"),
                    amenities: row.get("amenities"),
                    rent: row.get("rent"),
                    total_beds: count(&row, "total_beds"),
                    occupied_beds: count(&row, "occupied_beds"),
                    available_beds: count(&row, "available_beds"),
                    on_notice_beds: count(&row, "on_notice_beds"),
                    on_book_beds: count(&row, "on_book_beds"),
                    is_active: row.get("is_active"),
                    beds: beds.remove(&position).unwrap_or_default(),
                }
            })
            .collect();

        Ok(Some(Property {
            id,
            code: row.get("code"),
            slug: row.get("slug"),
            vendor_id: row.get("vendor_id"),
            name: row.get("name"),
            nick_name: row.get("nick_name"),
            gender: row.get("gender"),
            kind: row.get("kind"),
            city: row.get("city"),
            state: row.get("state"),
            area: row.get("area"),
            pincode: row.get("pincode"),
            contact_phone: row.get("contact_phone"),
            contact_email: row.get("contact_email"),
            amenity_ids: row.get("amenity_ids"),
            main_image: row.get("main_image"),
            common_photos: row.get("common_photos"),
            images: row.get("images"),
            total_rooms: count(&row, "total_rooms"),
            total_beds: count(&row, "total_beds"),
            occupied_beds: count(&row, "occupied_beds"),
            available_beds: count(&row, "available_beds"),
            beds_on_notice: count(&row, "beds_on_notice"),
            beds_on_book: count(&row, "beds_on_book"),
            monthly_revenue: row.get("monthly_revenue"),
            rooms,
            created_at: row.get("created_at"),
        }))
    }
}

/// Reads an `INT4` counter column as a count.
fn count(row: &tokio_postgres::Row, column: &str) -> u32 {
    u32::try_from(row.get::<_, i32>(column)).expect("counter is negative")
}

impl<C> Database<Select<By<Option<Property>, property::Slug>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<Option<Property>, property::Id>>,
        Ok = Option<Property>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Property>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Property>, property::Slug>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let slug: property::Slug = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM properties \
            WHERE slug = $1::VARCHAR \
            LIMIT 1";
        let Some(row) = self
            .query_opt(SQL, &[&slug])
            .await
            .map_err(tracerr::wrap!())?
        else {
            return Ok(None);
        };

        self.execute(Select(By::new(row.get("id"))))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Select<By<Option<Property>, property::Code>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<Option<Property>, property::Id>>,
        Ok = Option<Property>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Property>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Property>, property::Code>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let code: property::Code = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM properties \
            WHERE code = $1::VARCHAR \
            LIMIT 1";
        let Some(row) = self
            .query_opt(SQL, &[&code])
            .await
            .map_err(tracerr::wrap!())?
        else {
            return Ok(None);
        };

        self.execute(Select(By::new(row.get("id"))))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C>
    Database<
        Select<
            By<read::property::SlugIsTaken, (property::Slug, property::Id)>,
        >,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = read::property::SlugIsTaken;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::property::SlugIsTaken, (property::Slug, property::Id)>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let (slug, owner) = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM properties \
            WHERE slug = $1::VARCHAR \
              AND id <> $2::UUID \
            LIMIT 1";
        self.query_opt(SQL, &[&slug, &owner])
            .await
            .map_err(tracerr::wrap!())
            .map(|r| read::property::SlugIsTaken(r.is_some()))
    }
}

impl<C> Database<Insert<Property>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Property>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(property): Insert<Property>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(property))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Property>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(property): Update<Property>,
    ) -> Result<Self::Ok, Self::Err> {
        let Property {
            id,
            code,
            slug,
            vendor_id,
            name,
            nick_name,
            gender,
            kind,
            city,
            state,
            area,
            pincode,
            contact_phone,
            contact_email,
            amenity_ids,
            main_image,
            common_photos,
            images,
            total_rooms,
            total_beds,
            occupied_beds,
            available_beds,
            beds_on_notice,
            beds_on_book,
            monthly_revenue,
            rooms,
            created_at,
        } = property;

        let total_rooms = as_column(total_rooms);
        let total_beds = as_column(total_beds);
        let occupied_beds = as_column(occupied_beds);
        let available_beds = as_column(available_beds);
        let beds_on_notice = as_column(beds_on_notice);
        let beds_on_book = as_column(beds_on_book);

        const SQL: &str = "\
            INSERT INTO properties (\
                id, code, slug, vendor_id, name, nick_name, \
                gender, kind, \
                city, state, area, pincode, \
                contact_phone, contact_email, \
                amenity_ids, main_image, common_photos, images, \
                total_rooms, total_beds, occupied_beds, available_beds, \
                beds_on_notice, beds_on_book, \
                monthly_revenue, \
                created_at \
            ) VALUES (\
                $1::UUID, $2::VARCHAR, $3::VARCHAR, $4::UUID, \
                $5::VARCHAR, $6::VARCHAR, \
                $7::VARCHAR, $8::VARCHAR, \
                $9::VARCHAR, $10::VARCHAR, $11::VARCHAR, $12::VARCHAR, \
                $13::VARCHAR, $14::VARCHAR, \
                $15::UUID[], $16::VARCHAR, $17::VARCHAR[], $18::VARCHAR[], \
                $19::INT4, $20::INT4, $21::INT4, $22::INT4, \
                $23::INT4, $24::INT4, \
                $25::NUMERIC, \
                $26::TIMESTAMPTZ \
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET code = EXCLUDED.code, \
                slug = EXCLUDED.slug, \
                vendor_id = EXCLUDED.vendor_id, \
                name = EXCLUDED.name, \
                nick_name = EXCLUDED.nick_name, \
                gender = EXCLUDED.gender, \
                kind = EXCLUDED.kind, \
                city = EXCLUDED.city, \
                state = EXCLUDED.state, \
                area = EXCLUDED.area, \
                pincode = EXCLUDED.pincode, \
                contact_phone = EXCLUDED.contact_phone, \
                contact_email = EXCLUDED.contact_email, \
                amenity_ids = EXCLUDED.amenity_ids, \
                main_image = EXCLUDED.main_image, \
                common_photos = EXCLUDED.common_photos, \
                images = EXCLUDED.images, \
                total_rooms = EXCLUDED.total_rooms, \
                total_beds = EXCLUDED.total_beds, \
                occupied_beds = EXCLUDED.occupied_beds, \
                available_beds = EXCLUDED.available_beds, \
                beds_on_notice = EXCLUDED.beds_on_notice, \
                beds_on_book = EXCLUDED.beds_on_book, \
                monthly_revenue = EXCLUDED.monthly_revenue, \
                created_at = EXCLUDED.created_at";
        self.exec(
            SQL,
            &[
                &id,
                &code,
                &slug,
                &vendor_id,
                &name,
                &nick_name,
                &gender,
                &kind,
                &city,
                &state,
                &area,
                &pincode,
                &contact_phone,
                &contact_email,
                &amenity_ids,
                &main_image,
                &common_photos,
                &images,
                &total_rooms,
                &total_beds,
                &occupied_beds,
                &available_beds,
                &beds_on_notice,
                &beds_on_book,
                &monthly_revenue,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)?;

        // The room/bed tree is replaced wholesale: positions may shift
        // arbitrarily between saves, so updating in place would be fragile.
        const DROP_BEDS_SQL: &str = "\
            DELETE FROM property_beds \
            WHERE property_id = $1::UUID";
        self.exec(DROP_BEDS_SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)?;
        const DROP_ROOMS_SQL: &str = "\
            DELETE FROM property_rooms \
            WHERE property_id = $1::UUID";
        self.exec(DROP_ROOMS_SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)?;

        const ROOM_SQL: &str = "\
            INSERT INTO property_rooms (\
                property_id, position, number, name, display_name, \
                sharing, ac_type, bed_size, bathroom_type, \
                balcony, description, amenities, \
                rent, \
                total_beds, occupied_beds, available_beds, \
                on_notice_beds, on_book_beds, \
                is_active \
            ) VALUES (\
                $1::UUID, $2::INT4, $3::VARCHAR, $4::VARCHAR, $5::VARCHAR, \
                $6::INT2, $7::VARCHAR, $8::VARCHAR, $9::VARCHAR, \
                $10::BOOL, $11::VARCHAR, $12::VARCHAR[], \
                $13::NUMERIC, \
                $14::INT4, $15::INT4, $16::INT4, \
                $17::INT4, $18::INT4, \
                $19::BOOL \
            )";
        const BED_SQL: &str = "\
            INSERT INTO property_beds (\
                property_id, room_position, position, number, status, \
                student_id, student_name, \
                rent_due_at, notice_at, booked_at \
            ) VALUES (\
                $1::UUID, $2::INT4, $3::INT4, $4::VARCHAR, $5::VARCHAR, \
                $6::VARCHAR, $7::VARCHAR, \
                $8::TIMESTAMPTZ, $9::TIMESTAMPTZ, $10::TIMESTAMPTZ \
            )";
        for (room_position, room) in rooms.into_iter().enumerate() {
            let room_position = as_position(room_position);
            let sharing = i16::from(room.sharing.get());

            self.exec(
                ROOM_SQL,
                &[
                    &id,
                    &room_position,
                    &room.number,
                    &room.name,
                    &room.display_name,
                    &sharing,
                    &room.ac_type,
                    &room.bed_size,
                    &room.bathroom_type,
                    &room.balcony,
                    &room.description,
                    &room.amenities,
                    &room.rent,
                    &as_column(room.total_beds),
                    &as_column(room.occupied_beds),
                    &as_column(room.available_beds),
                    &as_column(room.on_notice_beds),
                    &as_column(room.on_book_beds),
                    &room.is_active,
                ],
            )
            .await
            .map_err(tracerr::wrap!())
            .map(drop)?;

            for (position, b) in room.beds.into_iter().enumerate() {
                let position = as_position(position);

                self.exec(
                    BED_SQL,
                    &[
                        &id,
                        &room_position,
                        &position,
                        &b.number,
                        &b.status,
                        &b.student_id,
                        &b.student_name,
                        &b.rent_due_at,
                        &b.notice_at,
                        &b.booked_at,
                    ],
                )
                .await
                .map_err(tracerr::wrap!())
                .map(drop)?;
            }
        }

        Ok(())
    }
}

/// Converts a count into its `INT4` column value.
fn as_column(count: room::BedCount) -> i32 {
    i32::try_from(count).expect("counter overflow")
}

/// Converts an array index into its `INT4` position column value.
fn as_position(index: usize) -> i32 {
    i32::try_from(index).expect("position overflow")
}

impl<C> Database<Update<property::Patch>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(patch): Update<property::Patch>,
    ) -> Result<Self::Ok, Self::Err> {
        let property::Patch {
            id,
            name,
            nick_name,
            gender,
            kind,
            city,
            state,
            area,
            pincode,
            contact_phone,
            contact_email,
            slug,
        } = patch;

        const SQL: &str = "\
            UPDATE properties \
            SET name = COALESCE($2::VARCHAR, name), \
                nick_name = COALESCE($3::VARCHAR, nick_name), \
                gender = COALESCE($4::VARCHAR, gender), \
                kind = COALESCE($5::VARCHAR, kind), \
                city = COALESCE($6::VARCHAR, city), \
                state = COALESCE($7::VARCHAR, state), \
                area = COALESCE($8::VARCHAR, area), \
                pincode = COALESCE($9::VARCHAR, pincode), \
                contact_phone = COALESCE($10::VARCHAR, contact_phone), \
                contact_email = COALESCE($11::VARCHAR, contact_email), \
                slug = COALESCE($12::VARCHAR, slug) \
            WHERE id = $1::UUID";
        self.exec(
            SQL,
            &[
                &id,
                &name,
                &nick_name,
                &gender,
                &kind,
                &city,
                &state,
                &area,
                &pincode,
                &contact_phone,
                &contact_email,
                &slug,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Lock<By<Property, property::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Property, property::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: property::Id = by.into_inner();

        const SQL: &str = "\
            INSERT INTO property_locks \
            VALUES ($1::UUID) \
            ON CONFLICT (id) DO NOTHING";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
