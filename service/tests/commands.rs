//! [`Command`] execution against an in-memory database double.
//!
//! [`Command`]: service::command::Command

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use common::{
    operations::{By, Commit, Lock, Perform, Select, Transact, Update},
    Amount, DateTime, Handler,
};
use service::{
    command::{SaveProperty, UpdatePropertyDetails},
    domain::{bed, property, room, sequence, Bed, Property, Room},
    infra::database,
    read, Service,
};
use tracerr::Traced;

/// In-memory [`Database`] double backing [`Command`] execution.
///
/// [`Command`]: service::command::Command
/// [`Database`]: service::infra::Database
#[derive(Clone, Debug, Default)]
struct MockDb {
    state: Arc<Mutex<State>>,
}

#[derive(Debug, Default)]
struct State {
    properties: HashMap<property::Id, Property>,
    counters: HashMap<sequence::Name, sequence::Seq>,
    /// How many times a sequence counter was incremented.
    issued: u32,
}

impl MockDb {
    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    fn insert(&self, property: Property) {
        drop(self.state().properties.insert(property.id, property));
    }

    fn stored(&self, id: property::Id) -> Property {
        self.state().properties.get(&id).cloned().unwrap()
    }

    fn issued(&self) -> u32 {
        self.state().issued
    }
}

impl Handler<Transact> for MockDb {
    type Ok = Self;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        Ok(self.clone())
    }
}

impl Handler<Commit> for MockDb {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        Ok(())
    }
}

impl Handler<Lock<By<Property, property::Id>>> for MockDb {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Lock<By<Property, property::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(())
    }
}

impl Handler<Select<By<Option<Property>, property::Id>>> for MockDb {
    type Ok = Option<Property>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Property>, property::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.state().properties.get(&by.into_inner()).cloned())
    }
}

impl
    Handler<
        Select<
            By<read::property::SlugIsTaken, (property::Slug, property::Id)>,
        >,
    > for MockDb
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
        Ok(read::property::SlugIsTaken(
            self.state()
                .properties
                .values()
                .any(|p| p.id != owner && p.slug.as_ref() == Some(&slug)),
        ))
    }
}

impl Handler<Perform<sequence::Next>> for MockDb {
    type Ok = sequence::Seq;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Perform(next): Perform<sequence::Next>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.state();
        state.issued += 1;
        let seq = state
            .counters
            .entry(next.name)
            .or_insert(sequence::BASELINE);
        *seq += 1;
        Ok(*seq)
    }
}

impl Handler<Update<Property>> for MockDb {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(property): Update<Property>,
    ) -> Result<Self::Ok, Self::Err> {
        self.insert(property);
        Ok(())
    }
}

impl Handler<Update<property::Patch>> for MockDb {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(patch): Update<property::Patch>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.state();
        let p = state.properties.get_mut(&patch.id).unwrap();
        if let Some(name) = patch.name {
            p.name = name;
        }
        if let Some(nick) = patch.nick_name {
            p.nick_name = Some(nick);
        }
        if let Some(gender) = patch.gender {
            p.gender = gender;
        }
        if let Some(kind) = patch.kind {
            p.kind = kind;
        }
        if let Some(city) = patch.city {
            p.city = city;
        }
        if let Some(state_) = patch.state {
            p.state = state_;
        }
        if let Some(area) = patch.area {
            p.area = area;
        }
        if let Some(pincode) = patch.pincode {
            p.pincode = pincode;
        }
        if let Some(phone) = patch.contact_phone {
            p.contact_phone = Some(phone);
        }
        if let Some(email) = patch.contact_email {
            p.contact_email = Some(email);
        }
        if let Some(slug) = patch.slug {
            p.slug = Some(slug);
        }
        Ok(())
    }
}

fn beds(statuses: &[bed::Status]) -> Vec<Bed> {
    statuses
        .iter()
        .enumerate()
        .map(|(i, s)| Bed {
            number: bed::Number::new(format!("B{i}")).unwrap(),
            status: *s,
            student_id: None,
            student_name: None,
            rent_due_at: None,
            notice_at: None,
            booked_at: None,
        })
        .collect()
}

fn room(rent: u32, statuses: &[bed::Status]) -> Room {
    Room {
        number: room::Number::new("101").unwrap(),
        name: None,
        display_name: room::DisplayName::derive(
            room::Sharing::new(2).unwrap(),
            room::AcType::NonAc,
        ),
        sharing: room::Sharing::new(2).unwrap(),
        ac_type: room::AcType::NonAc,
        bed_size: room::BedSize::Single,
        bathroom_type: None,
        balcony: false,
        description: None,
        amenities: vec![],
        rent: Amount::from(rent),
        total_beds: 0,
        occupied_beds: 0,
        available_beds: 0,
        on_notice_beds: 0,
        on_book_beds: 0,
        is_active: true,
        beds: beds(statuses),
    }
}

fn property(name: &str, rooms: Vec<Room>) -> Property {
    Property {
        id: property::Id::new(),
        code: None,
        slug: None,
        vendor_id: property::VendorId::from(uuid::Uuid::new_v4()),
        name: name.parse().unwrap(),
        nick_name: None,
        gender: property::Gender::Coed,
        kind: property::Kind::Pg,
        city: "Bengaluru".parse().unwrap(),
        state: "Karnataka".parse().unwrap(),
        area: "Koramangala".parse().unwrap(),
        pincode: "560034".parse().unwrap(),
        contact_phone: None,
        contact_email: None,
        amenity_ids: vec![],
        main_image: None,
        common_photos: vec![],
        images: vec![],
        total_rooms: 0,
        total_beds: 0,
        occupied_beds: 0,
        available_beds: 0,
        beds_on_notice: 0,
        beds_on_book: 0,
        monthly_revenue: Amount::ZERO,
        rooms,
        created_at: DateTime::now().coerce(),
    }
}

#[tokio::test]
async fn first_save_mints_code_and_slug() {
    use bed::Status::{Available, Occupied};

    let db = MockDb::default();
    let service = Service::new(db.clone());

    let saved = service
        .execute(SaveProperty::from(property(
            "Sunrise PG",
            vec![room(5000, &[Occupied, Available])],
        )))
        .await
        .unwrap();

    assert_eq!(AsRef::<str>::as_ref(saved.code.as_ref().unwrap()), "PG-1741");
    assert_eq!(AsRef::<str>::as_ref(saved.slug.as_ref().unwrap()), "sunrise-pg");
    assert_eq!(db.issued(), 1);

    let stored = db.stored(saved.id);
    assert_eq!(stored.total_rooms, 1);
    assert_eq!(stored.total_beds, 2);
    assert_eq!(stored.occupied_beds, 1);
    assert_eq!(stored.monthly_revenue, Amount::from(5000));
}

#[tokio::test]
async fn resave_keeps_code_and_skips_counter() {
    let db = MockDb::default();
    let service = Service::new(db.clone());

    let saved = service
        .execute(SaveProperty::from(property("Sunrise PG", vec![])))
        .await
        .unwrap();

    // Resend the whole document with the code wiped, as a stale client would.
    let mut resent = saved.clone();
    resent.code = None;
    let resaved = service
        .execute(SaveProperty::from(resent))
        .await
        .unwrap();

    assert_eq!(resaved.code, saved.code);
    assert_eq!(resaved.slug, saved.slug);
    assert_eq!(db.issued(), 1);
}

#[tokio::test]
async fn second_code_continues_the_sequence() {
    let db = MockDb::default();
    let service = Service::new(db.clone());

    let first = service
        .execute(SaveProperty::from(property("First PG", vec![])))
        .await
        .unwrap();
    let second = service
        .execute(SaveProperty::from(property("Second PG", vec![])))
        .await
        .unwrap();

    assert_eq!(AsRef::<str>::as_ref(&first.code.unwrap()), "PG-1741");
    assert_eq!(AsRef::<str>::as_ref(&second.code.unwrap()), "PG-1742");
}

#[tokio::test]
async fn colliding_slug_gets_numeric_suffix() {
    let db = MockDb::default();
    let service = Service::new(db.clone());

    let first = service
        .execute(SaveProperty::from(property("Sunrise PG", vec![])))
        .await
        .unwrap();
    let second = service
        .execute(SaveProperty::from(property("Sunrise PG", vec![])))
        .await
        .unwrap();
    let third = service
        .execute(SaveProperty::from(property("Sunrise PG", vec![])))
        .await
        .unwrap();

    assert_eq!(AsRef::<str>::as_ref(&first.slug.unwrap()), "sunrise-pg");
    assert_eq!(AsRef::<str>::as_ref(&second.slug.unwrap()), "sunrise-pg-2");
    assert_eq!(AsRef::<str>::as_ref(&third.slug.unwrap()), "sunrise-pg-3");
}

#[tokio::test]
async fn save_with_unchanged_name_keeps_slug() {
    use bed::Status::Occupied;

    let db = MockDb::default();
    let service = Service::new(db.clone());

    let saved = service
        .execute(SaveProperty::from(property("Sunrise PG", vec![])))
        .await
        .unwrap();

    // Another property takes the would-be recomputed slug in between.
    let mut squatter = property("Sunrise PG 2", vec![]);
    squatter.slug = Some(property::Slug::new("sunrise-pg-2").unwrap());
    db.insert(squatter);

    let mut resent = saved.clone();
    resent.rooms = vec![room(6000, &[Occupied])];
    let resaved = service
        .execute(SaveProperty::from(resent))
        .await
        .unwrap();

    // Only the room tree changed, so the slug must not be renegotiated.
    assert_eq!(resaved.slug, saved.slug);
}

#[tokio::test]
async fn save_rename_recomputes_slug() {
    let db = MockDb::default();
    let service = Service::new(db.clone());

    let saved = service
        .execute(SaveProperty::from(property("Sunrise PG", vec![])))
        .await
        .unwrap();

    let mut renamed = saved.clone();
    renamed.name = "Moonlight Residency".parse().unwrap();
    let resaved = service
        .execute(SaveProperty::from(renamed))
        .await
        .unwrap();

    assert_eq!(
        AsRef::<str>::as_ref(&resaved.slug.unwrap()),
        "moonlight-residency",
    );
    assert_eq!(resaved.code, saved.code);
}

#[tokio::test]
async fn rename_patch_recomputes_slug_and_keeps_counters() {
    use bed::Status::{Notice, Occupied};

    let db = MockDb::default();
    let service = Service::new(db.clone());

    let saved = service
        .execute(SaveProperty::from(property(
            "Sunrise PG",
            vec![room(5000, &[Occupied, Notice])],
        )))
        .await
        .unwrap();

    let mut patch = property::Patch::new(saved.id);
    patch.name = Some("Moonlight Residency".parse().unwrap());
    service
        .execute(UpdatePropertyDetails::from(patch))
        .await
        .unwrap();

    let stored = db.stored(saved.id);
    assert_eq!(AsRef::<str>::as_ref(&stored.name), "Moonlight Residency");
    assert_eq!(
        AsRef::<str>::as_ref(&stored.slug.unwrap()),
        "moonlight-residency",
    );
    // The patch path never touches the derived tree.
    assert_eq!(stored.total_beds, 2);
    assert_eq!(stored.monthly_revenue, Amount::from(10000));
    assert_eq!(stored.code, saved.code);
}

#[tokio::test]
async fn patch_without_rename_keeps_slug() {
    let db = MockDb::default();
    let service = Service::new(db.clone());

    let saved = service
        .execute(SaveProperty::from(property("Sunrise PG", vec![])))
        .await
        .unwrap();

    let mut patch = property::Patch::new(saved.id);
    patch.city = Some("Pune".parse().unwrap());
    service
        .execute(UpdatePropertyDetails::from(patch))
        .await
        .unwrap();

    let stored = db.stored(saved.id);
    assert_eq!(AsRef::<str>::as_ref(&stored.city), "Pune");
    assert_eq!(stored.slug, saved.slug);
}

#[tokio::test]
async fn patch_of_missing_property_fails() {
    let db = MockDb::default();
    let service = Service::new(db);

    let patch = property::Patch::new(property::Id::new());
    let err = service
        .execute(UpdatePropertyDetails::from(patch))
        .await
        .unwrap_err();

    use service::command::update_property_details::ExecutionError as E;
    assert!(matches!(err.as_ref(), E::PropertyNotExists(..)));
}
