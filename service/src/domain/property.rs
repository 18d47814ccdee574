//! [`Property`] definitions.

use std::str::FromStr;

use common::{define_kind, unit, Amount, DateTimeOf};
use derive_more::{AsRef, Display, From, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization as _};
use uuid::Uuid;

use super::{room, sequence, Room};

/// How many `common_photos` participate in the [`Property::images`]
/// derivation.
pub const COMMON_PHOTO_LIMIT: usize = 8;

/// Vendor-owned property listing, owning an ordered list of [`Room`]s.
///
/// The persisted form of this document is the single source of truth for
/// every consumer: listing/search, booking and admin reporting all read the
/// derived fields below instead of recounting beds themselves.
#[derive(Clone, Debug)]
pub struct Property {
    /// Internal ID of this [`Property`].
    pub id: Id,

    /// Public [`Code`] of this [`Property`] (`PG-<sequence>`).
    ///
    /// Assigned exactly once on the first save, immutable afterwards.
    pub code: Option<Code>,

    /// URL-safe unique [`Slug`] of this [`Property`].
    ///
    /// Regenerated whenever its naming source changes.
    pub slug: Option<Slug>,

    /// ID of the owning vendor.
    pub vendor_id: VendorId,

    /// Display [`Name`] of this [`Property`].
    pub name: Name,

    /// Short [`NickName`] of this [`Property`], if any.
    pub nick_name: Option<NickName>,

    /// [`Gender`] this [`Property`] accepts.
    pub gender: Gender,

    /// [`Kind`] of this [`Property`].
    pub kind: Kind,

    /// [`City`] this [`Property`] is located in.
    pub city: City,

    /// [`State`] this [`Property`] is located in.
    pub state: State,

    /// [`Area`] this [`Property`] is located in.
    pub area: Area,

    /// Postal [`Pincode`] of this [`Property`].
    pub pincode: Pincode,

    /// Contact [`ContactPhone`] of this [`Property`], if any.
    pub contact_phone: Option<ContactPhone>,

    /// Contact [`ContactEmail`] of this [`Property`], if any.
    pub contact_email: Option<ContactEmail>,

    /// IDs of referenced amenities.
    ///
    /// Owned elsewhere and never dereferenced here.
    pub amenity_ids: Vec<AmenityId>,

    /// Main [`ImageUrl`] of this [`Property`], if any.
    pub main_image: Option<ImageUrl>,

    /// Additional photos of this [`Property`].
    pub common_photos: Vec<ImageUrl>,

    /// Derived gallery of this [`Property`].
    ///
    /// Always the deduplicated union of [`Property::main_image`] and the
    /// first [`COMMON_PHOTO_LIMIT`] of [`Property::common_photos`], rebuilt on
    /// every save and never authored directly.
    pub images: Vec<ImageUrl>,

    /// Derived count of active [`Room`]s.
    pub total_rooms: RoomCount,

    /// Derived count of all beds in active [`Room`]s.
    pub total_beds: room::BedCount,

    /// Derived count of occupied beds in active [`Room`]s.
    pub occupied_beds: room::BedCount,

    /// Derived count of available beds in active [`Room`]s.
    pub available_beds: room::BedCount,

    /// Derived count of beds on notice in active [`Room`]s.
    pub beds_on_notice: room::BedCount,

    /// Derived count of booked beds in active [`Room`]s.
    pub beds_on_book: room::BedCount,

    /// Derived monthly revenue over active [`Room`]s.
    ///
    /// Room rent counted once per bed in `occupied` or `notice` status;
    /// booked-but-not-moved-in beds don't pay yet and are excluded.
    pub monthly_revenue: Amount,

    /// Ordered [`Room`]s owned by this [`Property`].
    pub rooms: Vec<Room>,

    /// [`DateTime`] when this [`Property`] was created.
    ///
    /// [`DateTime`]: common::DateTime
    pub created_at: CreationDateTime,
}

impl Property {
    /// Recomputes every derived field of this [`Property`] from its live
    /// [`Room`]/bed tree.
    ///
    /// Applied unconditionally before every whole-document save, so no caller
    /// ever maintains the sums by hand. Inactive [`Room`]s are recounted too
    /// (their own counters stay honest), but are excluded from all
    /// property-level aggregates.
    pub fn derive(&mut self) {
        for r in &mut self.rooms {
            r.recount();
        }

        let mut total_rooms = 0;
        let mut total_beds = 0;
        let mut occupied = 0;
        let mut available = 0;
        let mut on_notice = 0;
        let mut on_book = 0;
        let mut revenue = Amount::ZERO;
        for r in self.rooms.iter().filter(|r| r.is_active) {
            total_rooms += 1;
            total_beds += r.total_beds;
            occupied += r.occupied_beds;
            available += r.available_beds;
            on_notice += r.on_notice_beds;
            on_book += r.on_book_beds;
            revenue = revenue.saturating_add(r.revenue());
        }

        self.total_rooms = total_rooms;
        self.total_beds = total_beds;
        self.occupied_beds = occupied;
        self.available_beds = available;
        self.beds_on_notice = on_notice;
        self.beds_on_book = on_book;
        self.monthly_revenue = revenue;

        self.images =
            derive_images(self.main_image.as_ref(), &self.common_photos);
    }

    /// Returns the naming source a [`Slug`] should be computed from.
    ///
    /// Preference order: name, nick name, public code, internal ID — the
    /// first one that is present and non-blank.
    #[must_use]
    pub fn slug_source(&self) -> String {
        if !AsRef::<str>::as_ref(&self.name).trim().is_empty() {
            return self.name.to_string();
        }
        if let Some(nick) = &self.nick_name {
            if !AsRef::<str>::as_ref(nick).trim().is_empty() {
                return nick.to_string();
            }
        }
        if let Some(code) = &self.code {
            return code.to_string();
        }
        self.id.to_string()
    }
}

/// Derives the [`Property::images`] gallery.
///
/// Blank URLs cannot be constructed, so only deduplication and the
/// [`COMMON_PHOTO_LIMIT`] cap happen here.
fn derive_images(
    main_image: Option<&ImageUrl>,
    common_photos: &[ImageUrl],
) -> Vec<ImageUrl> {
    let mut images = Vec::with_capacity(1 + COMMON_PHOTO_LIMIT);
    for img in main_image
        .into_iter()
        .chain(common_photos.iter().take(COMMON_PHOTO_LIMIT))
    {
        if !images.contains(img) {
            images.push(img.clone());
        }
    }
    images
}

/// Count of [`Room`]s.
pub type RoomCount = u32;

/// Internal ID of a [`Property`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// ID of the vendor owning a [`Property`].
///
/// Many properties may share one vendor.
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    Eq,
    From,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct VendorId(Uuid);

/// ID of an amenity referenced by a [`Property`].
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    Eq,
    From,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct AmenityId(Uuid);

/// Public code of a [`Property`] in the `PG-<sequence>` format.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct Code(String);

impl Code {
    /// Formats a new [`Code`] out of the given issued sequence number.
    #[must_use]
    pub fn from_seq(seq: sequence::Seq) -> Self {
        Self(format!("PG-{seq}"))
    }

    /// Creates a new [`Code`] if the given `code` matches the format.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Option<Self> {
        let code = code.into();
        Self::check(&code).then_some(Self(code))
    }

    /// Checks whether the given `code` is a valid [`Code`].
    fn check(code: impl AsRef<str>) -> bool {
        let code = code.as_ref();
        code.strip_prefix("PG-").is_some_and(|digits| {
            !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
        })
    }
}

impl FromStr for Code {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Code`")
    }
}

/// URL-safe unique string identifier of a [`Property`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct Slug(String);

impl Slug {
    /// [`Slug`] a blank input normalizes to.
    pub const FALLBACK: &'static str = "property";

    /// Creates a new [`Slug`] if the given `slug` is already in the
    /// normalized form.
    #[must_use]
    pub fn new(slug: impl Into<String>) -> Option<Self> {
        let slug = slug.into();
        Self::check(&slug).then_some(Self(slug))
    }

    /// Normalizes an arbitrary string into a [`Slug`] candidate.
    ///
    /// Lowercases, strips diacritics (canonical decomposition with combining
    /// marks dropped), folds every run of non-`[a-z0-9]` characters into a
    /// single hyphen and trims the result. A blank input yields
    /// [`Slug::FALLBACK`].
    #[must_use]
    pub fn normalize(input: &str) -> Self {
        let mut out = String::with_capacity(input.len());
        let mut pending_hyphen = false;
        for c in input.nfd().filter(|c| !is_combining_mark(*c)) {
            for l in c.to_lowercase() {
                if l.is_ascii_alphanumeric() {
                    if pending_hyphen && !out.is_empty() {
                        out.push('-');
                    }
                    pending_hyphen = false;
                    out.push(l);
                } else {
                    pending_hyphen = true;
                }
            }
        }
        if out.is_empty() {
            Self(Self::FALLBACK.to_owned())
        } else {
            Self(out)
        }
    }

    /// Returns the `{slug}-{n}` disambiguation variant of this [`Slug`].
    #[must_use]
    pub fn with_suffix(&self, n: u32) -> Self {
        Self(format!("{}-{n}", self.0))
    }

    /// Checks whether the given `slug` is a valid [`Slug`].
    fn check(slug: impl AsRef<str>) -> bool {
        let slug = slug.as_ref();
        !slug.is_empty()
            && slug.len() <= 512
            && !slug.starts_with('-')
            && !slug.ends_with('-')
            && !slug.contains("--")
            && slug
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
    }
}

impl FromStr for Slug {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Slug`")
    }
}

define_kind! {
    #[doc = "Gender a [`Property`] accepts."]
    enum Gender {
        #[doc = "Male tenants only."]
        Male = "male",

        #[doc = "Female tenants only."]
        Female = "female",

        #[doc = "Both."]
        Coed = "coed",
    }
}

define_kind! {
    #[doc = "Kind of a [`Property`]."]
    enum Kind {
        #[doc = "A hostel."]
        Hostel = "Hostel",

        #[doc = "A paying-guest accommodation."]
        Pg = "PG",

        #[doc = "Operates as both."]
        Both = "Both",
    }
}

/// Display name of a [`Property`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`Name`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.len() <= 512
    }
}

impl FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Name`")
    }
}

/// Short nick name of a [`Property`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct NickName(String);

impl NickName {
    /// Creates a new [`NickName`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`NickName`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.len() <= 256
    }
}

impl FromStr for NickName {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `NickName`")
    }
}

/// City a [`Property`] is located in.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct City(String);

impl City {
    /// Creates a new [`City`] if the given `city` is valid.
    #[must_use]
    pub fn new(city: impl Into<String>) -> Option<Self> {
        let city = city.into();
        Self::check(&city).then_some(Self(city))
    }

    /// Checks whether the given `city` is a valid [`City`].
    fn check(city: impl AsRef<str>) -> bool {
        let city = city.as_ref();
        city.trim() == city && !city.is_empty() && city.len() <= 256
    }
}

impl FromStr for City {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `City`")
    }
}

/// State a [`Property`] is located in.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct State(String);

impl State {
    /// Creates a new [`State`] if the given `state` is valid.
    #[must_use]
    pub fn new(state: impl Into<String>) -> Option<Self> {
        let state = state.into();
        Self::check(&state).then_some(Self(state))
    }

    /// Checks whether the given `state` is a valid [`State`].
    fn check(state: impl AsRef<str>) -> bool {
        let state = state.as_ref();
        state.trim() == state && !state.is_empty() && state.len() <= 256
    }
}

impl FromStr for State {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `State`")
    }
}

/// Area a [`Property`] is located in.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct Area(String);

impl Area {
    /// Creates a new [`Area`] if the given `area` is valid.
    #[must_use]
    pub fn new(area: impl Into<String>) -> Option<Self> {
        let area = area.into();
        Self::check(&area).then_some(Self(area))
    }

    /// Checks whether the given `area` is a valid [`Area`].
    fn check(area: impl AsRef<str>) -> bool {
        let area = area.as_ref();
        area.trim() == area && !area.is_empty() && area.len() <= 256
    }
}

impl FromStr for Area {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Area`")
    }
}

/// Postal code of a [`Property`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct Pincode(String);

impl Pincode {
    /// Creates a new [`Pincode`] if the given `code` is valid.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Option<Self> {
        let code = code.into();
        Self::check(&code).then_some(Self(code))
    }

    /// Checks whether the given `code` is a valid [`Pincode`].
    fn check(code: impl AsRef<str>) -> bool {
        let code = code.as_ref();
        code.len() == 6 && code.bytes().all(|b| b.is_ascii_digit())
    }
}

impl FromStr for Pincode {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Pincode`")
    }
}

/// Contact phone of a [`Property`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct ContactPhone(String);

impl ContactPhone {
    /// Creates a new [`ContactPhone`] if the given `phone` is valid.
    #[must_use]
    pub fn new(phone: impl Into<String>) -> Option<Self> {
        let phone = phone.into();
        Self::check(&phone).then_some(Self(phone))
    }

    /// Checks whether the given `phone` is a valid [`ContactPhone`].
    fn check(phone: impl AsRef<str>) -> bool {
        let phone = phone.as_ref();
        (7..=20).contains(&phone.len())
            && phone
                .bytes()
                .all(|b| b.is_ascii_digit() || b"+- ".contains(&b))
    }
}

impl FromStr for ContactPhone {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `ContactPhone`")
    }
}

/// Contact email of a [`Property`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct ContactEmail(String);

impl ContactEmail {
    /// Creates a new [`ContactEmail`] if the given `email` is valid.
    #[must_use]
    pub fn new(email: impl Into<String>) -> Option<Self> {
        let email = email.into();
        Self::check(&email).then_some(Self(email))
    }

    /// Checks whether the given `email` is a valid [`ContactEmail`].
    fn check(email: impl AsRef<str>) -> bool {
        let email = email.as_ref();
        email.trim() == email
            && email.len() <= 320
            && email.split_once('@').is_some_and(|(local, domain)| {
                !local.is_empty() && domain.contains('.')
            })
    }
}

impl FromStr for ContactEmail {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `ContactEmail`")
    }
}

/// URL of a [`Property`] image.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct ImageUrl(String);

impl ImageUrl {
    /// Creates a new [`ImageUrl`] if the given `url` is valid.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Option<Self> {
        let url = url.into();
        Self::check(&url).then_some(Self(url))
    }

    /// Checks whether the given `url` is a valid [`ImageUrl`].
    fn check(url: impl AsRef<str>) -> bool {
        let url = url.as_ref();
        url.trim() == url && !url.is_empty() && url.len() <= 2048
    }
}

impl FromStr for ImageUrl {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `ImageUrl`")
    }
}

/// Targeted field patch of a [`Property`].
///
/// Deliberately narrow: rooms, beds and every derived counter are out of its
/// reach. Callers that mutate the room/bed tree must go through the
/// whole-document save path to get consistency back.
#[derive(Clone, Debug)]
pub struct Patch {
    /// ID of the [`Property`] to patch.
    pub id: Id,

    /// New [`Name`], if changing.
    pub name: Option<Name>,

    /// New [`NickName`], if changing.
    pub nick_name: Option<NickName>,

    /// New [`Gender`], if changing.
    pub gender: Option<Gender>,

    /// New [`Kind`], if changing.
    pub kind: Option<Kind>,

    /// New [`City`], if changing.
    pub city: Option<City>,

    /// New [`State`], if changing.
    pub state: Option<State>,

    /// New [`Area`], if changing.
    pub area: Option<Area>,

    /// New [`Pincode`], if changing.
    pub pincode: Option<Pincode>,

    /// New [`ContactPhone`], if changing.
    pub contact_phone: Option<ContactPhone>,

    /// New [`ContactEmail`], if changing.
    pub contact_email: Option<ContactEmail>,

    /// New [`Slug`], injected by the command layer when the patch renames the
    /// [`Property`].
    pub slug: Option<Slug>,
}

impl Patch {
    /// Creates a new empty [`Patch`] of the given [`Property`].
    #[must_use]
    pub fn new(id: Id) -> Self {
        Self {
            id,
            name: None,
            nick_name: None,
            gender: None,
            kind: None,
            city: None,
            state: None,
            area: None,
            pincode: None,
            contact_phone: None,
            contact_email: None,
            slug: None,
        }
    }

    /// Indicates whether this [`Patch`] changes the naming source of the
    /// [`Property`], requiring its [`Slug`] to be recomputed.
    #[must_use]
    pub fn renames(&self) -> bool {
        self.name.is_some() || self.nick_name.is_some()
    }
}

/// [`DateTime`] when a [`Property`] was created.
///
/// [`DateTime`]: common::DateTime
pub type CreationDateTime = DateTimeOf<(Property, unit::Creation)>;

#[cfg(test)]
mod spec {
    use common::{Amount, DateTime};

    use crate::domain::{bed, room, Room};

    use super::{
        Code, Gender, Id, ImageUrl, Kind, Property, Slug, VendorId,
    };

    fn bed(number: &str, status: bed::Status) -> bed::Bed {
        bed::Bed {
            number: bed::Number::new(number).unwrap(),
            status,
            student_id: None,
            student_name: None,
            rent_due_at: None,
            notice_at: None,
            booked_at: None,
        }
    }

    fn room(rent: u32, statuses: &[bed::Status]) -> Room {
        Room {
            number: room::Number::new("101").unwrap(),
            name: None,
            display_name: room::DisplayName::derive(
                room::Sharing::new(3).unwrap(),
                room::AcType::Ac,
            ),
            sharing: room::Sharing::new(3).unwrap(),
            ac_type: room::AcType::Ac,
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
            beds: statuses
                .iter()
                .enumerate()
                .map(|(i, s)| bed(&format!("B{i}"), *s))
                .collect(),
        }
    }

    fn property(rooms: Vec<Room>) -> Property {
        Property {
            id: Id::new(),
            code: None,
            slug: None,
            vendor_id: VendorId::from(uuid::Uuid::new_v4()),
            name: "Sunrise PG".parse().unwrap(),
            nick_name: None,
            gender: Gender::Coed,
            kind: Kind::Pg,
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

    #[test]
    fn derive_sums_room_counters() {
        use bed::Status::{Available, Notice, Occupied, OnBook};

        let mut p = property(vec![
            room(5000, &[Occupied, Notice, Available]),
            room(7000, &[Occupied, OnBook]),
        ]);
        p.derive();

        assert_eq!(p.total_rooms, 2);
        assert_eq!(p.total_beds, 5);
        assert_eq!(p.occupied_beds, 2);
        assert_eq!(p.available_beds, 1);
        assert_eq!(p.beds_on_notice, 1);
        assert_eq!(p.beds_on_book, 1);

        let room_total: u32 = p.rooms.iter().map(|r| r.total_beds).sum();
        assert_eq!(room_total, p.total_beds);
    }

    #[test]
    fn derive_counts_revenue_per_occupied_or_notice_bed() {
        use bed::Status::{Available, Notice, Occupied};

        let mut p = property(vec![room(5000, &[Occupied, Notice, Available])]);
        p.derive();

        assert_eq!(p.monthly_revenue, Amount::from(10000));
        assert_eq!(p.occupied_beds, 1);
        assert_eq!(p.available_beds, 1);
        assert_eq!(p.beds_on_notice, 1);
    }

    #[test]
    fn derive_excludes_inactive_rooms() {
        use bed::Status::Occupied;

        let mut p = property(vec![
            room(5000, &[Occupied, Occupied]),
            room(7000, &[Occupied]),
        ]);
        p.derive();
        assert_eq!(p.total_rooms, 2);
        assert_eq!(p.total_beds, 3);
        assert_eq!(p.monthly_revenue, Amount::from(17000));

        p.rooms[1].is_active = false;
        p.derive();

        assert_eq!(p.total_rooms, 1);
        assert_eq!(p.total_beds, 2);
        assert_eq!(p.occupied_beds, 2);
        assert_eq!(p.monthly_revenue, Amount::from(10000));
        // The room itself survives the soft delete.
        assert_eq!(p.rooms.len(), 2);
        assert_eq!(p.rooms[1].total_beds, 1);
    }

    #[test]
    fn derive_rebuilds_images() {
        let url = |s: &str| ImageUrl::new(s).unwrap();

        let mut p = property(vec![]);
        p.main_image = Some(url("a.jpg"));
        p.common_photos = (0..10)
            .map(|i| if i == 0 { url("a.jpg") } else { url(&format!("{i}.jpg")) })
            .collect();
        p.images = vec![url("stale.jpg")];
        p.derive();

        // `a.jpg` deduplicated, only the first 8 photos retained.
        assert_eq!(p.images.len(), 8);
        assert_eq!(p.images[0], url("a.jpg"));
        assert!(!p.images.contains(&url("8.jpg")));
        assert!(!p.images.contains(&url("stale.jpg")));
        let mut deduped = p.images.clone();
        deduped.dedup();
        assert_eq!(deduped.len(), p.images.len());
    }

    #[test]
    fn slug_normalization() {
        let norm = |s: &str| -> String {
            AsRef::<str>::as_ref(&Slug::normalize(s)).to_owned()
        };
        assert_eq!(norm("Sunrise PG – Koramangala!"), "sunrise-pg-koramangala");
        assert_eq!(norm("Café Déjà Vu"), "cafe-deja-vu");
        assert_eq!(norm("  --  "), Slug::FALLBACK);
        assert_eq!(norm(""), Slug::FALLBACK);
        assert_eq!(norm("PG-1741"), "pg-1741");
    }

    #[test]
    fn slug_suffix_starts_at_two() {
        let base = Slug::normalize("Sunrise PG");
        assert_eq!(
            AsRef::<str>::as_ref(&base.with_suffix(2)),
            "sunrise-pg-2",
        );
    }

    #[test]
    fn code_format() {
        assert_eq!(AsRef::<str>::as_ref(&Code::from_seq(1741)), "PG-1741");
        assert!(Code::new("PG-1741").is_some());
        assert!(Code::new("PG-").is_none());
        assert!(Code::new("HS-1741").is_none());
        assert!(Code::new("PG-17a1").is_none());
    }
}
